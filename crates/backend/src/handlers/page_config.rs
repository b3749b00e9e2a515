use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use contracts::shared::data_api::ModelListResponse;

use crate::shared::api_error::ApiError;
use crate::shared::state::AppState;

/// GET /api/page-config
pub async fn list_models(State(state): State<AppState>) -> Json<ModelListResponse> {
    Json(ModelListResponse {
        models: state.pages.models(),
    })
}

/// GET /api/page-config/:model
///
/// Отдаёт исходный текст документа: клиент сам нормализует его
/// тем же кодом, что и встроенные документы.
pub async fn get_document(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let text = state.pages.document(&model).ok_or_else(|| {
        tracing::warn!("Page configuration requested for unknown model '{}'", model);
        ApiError::not_found(format!("Конфигурация для модели '{}' не найдена", model))
    })?;
    Ok(([(header::CONTENT_TYPE, "application/json")], text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::page_catalog::PageCatalog;
    use crate::system::auth::service::AuthService;
    use axum::http::StatusCode;

    fn state() -> AppState {
        let auth = AuthService::from_config(&Default::default(), &[]).unwrap();
        AppState::new(PageCatalog::builtin().unwrap(), auth)
    }

    #[tokio::test]
    async fn models_carry_entry_views() {
        let Json(response) = list_models(State(state())).await;
        let sales = response
            .models
            .iter()
            .find(|m| m.model == "sales_order")
            .unwrap();
        assert_eq!(sales.entry_view.as_deref(), Some("list"));
        assert_eq!(sales.title, "Sales Orders");
    }

    #[tokio::test]
    async fn unknown_model_is_not_found() {
        let result = get_document(State(state()), Path("purchage_order".to_string())).await;
        assert_eq!(result.err().map(|e| e.status), Some(StatusCode::NOT_FOUND));
    }
}
