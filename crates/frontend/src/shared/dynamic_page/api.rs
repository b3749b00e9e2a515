//! HTTP-клиент сервиса конфигурации и REST-API строк.
//! Ошибки транспорта возвращаются строкой для показа пользователю.

use contracts::shared::data_api::{ImportRowsRequest, ImportRowsResponse, ModelListResponse, RowsResponse};
use contracts::shared::data_row::DataRow;
use gloo_net::http::{Request, RequestBuilder, Response};

use crate::shared::api_utils::api_base;
use crate::system::auth::storage;

fn with_auth(builder: RequestBuilder) -> RequestBuilder {
    match storage::get_access_token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

fn model_url(model: &str) -> String {
    format!("{}/api/data/{}", api_base(), urlencoding::encode(model))
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<contracts::shared::data_api::ApiErrorBody>().await {
        Ok(body) => format!("{} ({})", body.message, status),
        Err(_) => format!("Ошибка сервера: {}", status),
    }
}

/// Исходный текст документа; `None`, если сервис не знает модель
pub async fn fetch_page_document(model: &str) -> Result<Option<String>, String> {
    let url = format!("{}/api/page-config/{}", api_base(), urlencoding::encode(model));
    let response = with_auth(Request::get(&url))
        .send()
        .await
        .map_err(|e| format!("Ошибка сети: {}", e))?;

    if response.status() == 404 {
        return Ok(None);
    }
    if !response.ok() {
        return Err(error_message(response).await);
    }
    response
        .text()
        .await
        .map(Some)
        .map_err(|e| format!("Ошибка чтения ответа: {}", e))
}

pub async fn fetch_models() -> Result<ModelListResponse, String> {
    let url = format!("{}/api/page-config", api_base());
    let response = with_auth(Request::get(&url))
        .send()
        .await
        .map_err(|e| format!("Ошибка сети: {}", e))?;
    if !response.ok() {
        return Err(error_message(response).await);
    }
    response
        .json::<ModelListResponse>()
        .await
        .map_err(|e| format!("Ошибка парсинга: {}", e))
}

pub async fn list_rows(model: &str) -> Result<Vec<DataRow>, String> {
    let response = with_auth(Request::get(&model_url(model)))
        .header("Cache-Control", "no-cache")
        .send()
        .await
        .map_err(|e| format!("Ошибка сети: {}", e))?;
    if !response.ok() {
        return Err(error_message(response).await);
    }
    response
        .json::<RowsResponse>()
        .await
        .map(|r| r.rows)
        .map_err(|e| format!("Ошибка парсинга: {}", e))
}

pub async fn create_row(model: &str, row: &DataRow) -> Result<DataRow, String> {
    let response = with_auth(Request::post(&model_url(model)))
        .json(row)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Ошибка сети: {}", e))?;
    if !response.ok() {
        return Err(error_message(response).await);
    }
    response
        .json::<DataRow>()
        .await
        .map_err(|e| format!("Ошибка парсинга: {}", e))
}

pub async fn update_row(model: &str, id: &str, row: &DataRow) -> Result<DataRow, String> {
    let url = format!("{}/{}", model_url(model), urlencoding::encode(id));
    let response = with_auth(Request::put(&url))
        .json(row)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Ошибка сети: {}", e))?;
    if !response.ok() {
        return Err(error_message(response).await);
    }
    response
        .json::<DataRow>()
        .await
        .map_err(|e| format!("Ошибка парсинга: {}", e))
}

pub async fn delete_row(model: &str, id: &str) -> Result<(), String> {
    let url = format!("{}/{}", model_url(model), urlencoding::encode(id));
    let response = with_auth(Request::delete(&url))
        .send()
        .await
        .map_err(|e| format!("Ошибка сети: {}", e))?;
    if !response.ok() {
        return Err(error_message(response).await);
    }
    Ok(())
}

pub async fn import_rows(model: &str, rows: Vec<DataRow>) -> Result<ImportRowsResponse, String> {
    let url = format!("{}/import", model_url(model));
    let response = with_auth(Request::post(&url))
        .json(&ImportRowsRequest { rows })
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Ошибка сети: {}", e))?;
    if !response.ok() {
        return Err(error_message(response).await);
    }
    response
        .json::<ImportRowsResponse>()
        .await
        .map_err(|e| format!("Ошибка парсинга: {}", e))
}
