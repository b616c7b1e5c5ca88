use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::controllers;
use crate::{health_with_database, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    // i file caricati sono serviti dalla radice, come /<nome salvato>
    let static_files = ServeDir::new(state.uploads.path());

    Router::new()
        .route("/", get(controllers::index))
        .route("/health", get(|Extension(state): Extension<Arc<AppState>>| async move {
            health_with_database(&state.db)
        }))
        .route(
            "/api/messages",
            get(controllers::list_messages).post(controllers::create_message),
        )
        .route(
            "/api/messages/:id",
            put(controllers::update_message).delete(controllers::delete_message),
        )
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
