use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use contracts::shared::data_api::{ImportRowsRequest, ImportRowsResponse, RowsResponse};
use contracts::shared::data_row::DataRow;

use crate::shared::api_error::ApiError;
use crate::shared::state::AppState;

/// GET /api/data/:model
pub async fn list_rows(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<RowsResponse>, ApiError> {
    let rows = state.rows.list(&model).await?;
    Ok(Json(RowsResponse {
        model,
        total: rows.len(),
        rows,
    }))
}

/// GET /api/data/:model/:id
pub async fn get_row(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
) -> Result<Json<DataRow>, ApiError> {
    Ok(Json(state.rows.get(&model, &id).await?))
}

/// POST /api/data/:model
pub async fn create_row(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Json(row): Json<DataRow>,
) -> Result<(StatusCode, Json<DataRow>), ApiError> {
    let created = state.rows.create(&model, row).await?;
    tracing::info!("Created row in '{}'", model);
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/data/:model/:id
pub async fn update_row(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
    Json(row): Json<DataRow>,
) -> Result<Json<DataRow>, ApiError> {
    Ok(Json(state.rows.update(&model, &id, row).await?))
}

/// DELETE /api/data/:model/:id
pub async fn delete_row(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.rows.delete(&model, &id).await?;
    tracing::info!("Deleted row '{}' from '{}'", id, model);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/data/:model/import
pub async fn import_rows(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Json(request): Json<ImportRowsRequest>,
) -> Result<Json<ImportRowsResponse>, ApiError> {
    let (report, total) = state.rows.import(&model, request.rows).await?;
    tracing::info!(
        "Imported into '{}': added {}, skipped {}",
        model,
        report.added,
        report.skipped
    );
    Ok(Json(ImportRowsResponse { report, total }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::page_catalog::PageCatalog;
    use crate::system::auth::service::AuthService;

    fn state() -> AppState {
        let auth = AuthService::from_config(&Default::default(), &[]).unwrap();
        AppState::new(PageCatalog::builtin().unwrap(), auth)
    }

    #[tokio::test]
    async fn unknown_model_is_not_found() {
        let result = list_rows(State(state()), Path("nothing".to_string())).await;
        let error = result.err().unwrap();
        assert_eq!(error.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn created_row_is_listed() {
        let state = state();
        let before = list_rows(State(state.clone()), Path("purchase_order".to_string()))
            .await
            .unwrap()
            .0
            .total;

        let (status, Json(row)) = create_row(
            State(state.clone()),
            Path("purchase_order".to_string()),
            Json(serde_json::from_value(serde_json::json!({ "vendor": "Adatum", "total": 120 })).unwrap()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(row.id("id").is_some());

        let after = list_rows(State(state), Path("purchase_order".to_string()))
            .await
            .unwrap()
            .0;
        assert_eq!(after.total, before + 1);
    }

    #[tokio::test]
    async fn import_reports_skipped_duplicates() {
        let state = state();
        let rows = list_rows(State(state.clone()), Path("purchase_list".to_string()))
            .await
            .unwrap()
            .0
            .rows;

        let Json(response) = import_rows(
            State(state),
            Path("purchase_list".to_string()),
            Json(ImportRowsRequest {
                rows: vec![rows[0].clone(), DataRow::from_pairs([("id", "P-77")])],
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.report.added, 1);
        assert_eq!(response.report.skipped, 1);
        assert_eq!(response.total, rows.len() + 1);
    }
}
