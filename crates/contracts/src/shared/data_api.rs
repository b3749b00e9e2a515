//! DTO REST-API строк и сервиса конфигурации

use super::data_row::{DataRow, MergeReport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowsResponse {
    pub model: String,
    pub rows: Vec<DataRow>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRowsRequest {
    pub rows: Vec<DataRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRowsResponse {
    #[serde(flatten)]
    pub report: MergeReport,
    pub total: usize,
}

/// Краткое описание модели для индекса приложения
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model: String,
    pub title: String,
    pub entry_view: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelListResponse {
    pub models: Vec<ModelInfo>,
}

/// Тело ответа с ошибкой
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}
