use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contracts::shared::data_api::ApiErrorBody;

use super::data::row_store::StoreError;
use crate::system::auth::service::AuthError;

/// Ошибка обработчика: код статуса и тело `{ "message": ... }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiErrorBody { message: self.message })).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let status = match e {
            StoreError::UnknownModel(_) | StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Duplicate { .. } => StatusCode::CONFLICT,
        };
        Self::new(status, e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let status = match e {
            AuthError::InvalidCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::UnknownUser(_) => StatusCode::NOT_FOUND,
            AuthError::Internal(ref inner) => {
                tracing::error!("Auth failure: {:#}", inner);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let missing: ApiError = StoreError::NotFound {
            model: "sales_order".into(),
            id: "SO-1".into(),
        }
        .into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert!(missing.message.contains("SO-1"));

        let duplicate: ApiError = StoreError::Duplicate {
            model: "sales_order".into(),
            id: "SO-1".into(),
        }
        .into();
        assert_eq!(duplicate.status, StatusCode::CONFLICT);
    }

    #[test]
    fn bad_credentials_are_unauthorized() {
        let error: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
    }
}
