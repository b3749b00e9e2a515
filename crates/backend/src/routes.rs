use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::shared::state::AppState;
use crate::system::auth::middleware::require_auth;
use crate::{handlers, system};

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    // ========================================
    // ROW API (PROTECTED)
    // ========================================
    let data_routes = Router::new()
        .route(
            "/api/data/:model",
            get(handlers::data::list_rows).post(handlers::data::create_row),
        )
        .route("/api/data/:model/import", post(handlers::data::import_rows))
        .route(
            "/api/data/:model/:id",
            get(handlers::data::get_row)
                .put(handlers::data::update_row)
                .delete(handlers::data::delete_row),
        )
        .route("/api/auth/me", get(system::handlers::auth::current_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/auth/login", post(system::handlers::auth::login))
        .route("/api/auth/refresh", post(system::handlers::auth::refresh))
        .route("/api/auth/logout", post(system::handlers::auth::logout))
        // ========================================
        // PAGE CONFIGURATION SERVICE
        // ========================================
        .route("/api/page-config", get(handlers::page_config::list_models))
        .route("/api/page-config/:model", get(handlers::page_config::get_document))
        .merge(data_routes)
        .with_state(state)
}
