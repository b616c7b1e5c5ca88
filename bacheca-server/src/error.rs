use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bacheca_core::ErrorResponse;
use thiserror::Error;

/// Errore di un handler: ognuno diventa `{ "error": ... }` con il suo status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Campo mancante/vuoto o id malformato -> 400
    #[error("{0}")]
    Validation(String),

    /// Corpo rifiutato dall'estrattore (troppo grande, malformato, ...):
    /// si tiene lo status calcolato da axum, es. 413 oltre MAX_UPLOAD_BYTES
    #[error("{1}")]
    Rejected(StatusCode, String),

    /// Id valido ma nessun documento corrispondente -> 404
    #[error("{0}")]
    NotFound(String),

    /// Store irraggiungibile, non connesso o errore imprevisto -> 500.
    /// Al client va solo `message`, la causa finisce nel log.
    #[error("{message}: {source:#}")]
    Internal {
        message: &'static str,
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn rejected(status: StatusCode, msg: impl Into<String>) -> Self {
        ApiError::Rejected(status, msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }

    /// Errore 500 con messaggio generico per il client; `source` resta nel log.
    pub fn internal(message: &'static str, source: impl Into<anyhow::Error>) -> Self {
        ApiError::Internal { message, source: source.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Rejected(status, _) => *status,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(msg) | ApiError::Rejected(_, msg) | ApiError::NotFound(msg) => {
                ErrorResponse::new(msg)
            }
            ApiError::Internal { message, source } => {
                tracing::error!(error = ?source, "{}", message);
                ErrorResponse::new(message)
            }
        };
        (status, Json(body)).into_response()
    }
}
