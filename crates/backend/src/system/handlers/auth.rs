use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use contracts::system::auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo};

use crate::shared::api_error::ApiError;
use crate::shared::state::AppState;
use crate::system::auth::extractor::CurrentUser;

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let response = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(response))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let response = state.auth.refresh(&request.refresh_token).await?;
    Ok(Json(response))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, Json(request): Json<RefreshRequest>) -> StatusCode {
    state.auth.logout(&request.refresh_token).await;
    StatusCode::OK
}

/// GET /api/auth/me (protected by middleware)
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UserInfo>, ApiError> {
    Ok(Json(state.auth.current_user(&claims)?))
}
