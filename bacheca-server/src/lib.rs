use axum::{http::StatusCode, Json};
use bacheca_core::HealthResponse;
use std::sync::Arc;

pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod form;
pub mod mongo;
pub mod routes;
pub mod store;
pub mod uploads;

pub use config::Config;
pub use database::{ConnectionState, Database};
pub use error::ApiError;
pub use store::{MemoryStore, MessageStore, StoreError};
pub use uploads::UploadDir;

/// Stato condiviso da tutti gli handler, iniettato con `Extension`.
#[derive(Clone)]
pub struct AppState {
    /// Handle verso lo store; la connessione può arrivare dopo l'avvio del server
    pub db: Arc<Database>,
    pub uploads: UploadDir,
    /// Limite del corpo delle richieste (immagini comprese)
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: Arc<Database>, config: &Config) -> Self {
        Self {
            db,
            uploads: UploadDir::new(config.upload_dir.clone()),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Controlla lo stato della connessione allo store: 200 se connesso, 503 altrimenti.
pub fn health_with_database(db: &Database) -> (StatusCode, Json<HealthResponse>) {
    let state = db.state();
    let (code, status) = match state {
        ConnectionState::Connected => (StatusCode::OK, "ok"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
    };
    let body = HealthResponse {
        status: status.to_string(),
        database: state.to_string(),
    };
    (code, Json(body))
}
