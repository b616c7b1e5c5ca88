use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use bacheca_core::{now_timestamp, CreateMessageResponse, Message, StatusResponse};
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;

use crate::error::ApiError;
use crate::form::MessageForm;
use crate::store::{MessageChanges, NewMessage};
use crate::AppState;

pub const INVALID_ID: &str = "Invalid message ID";
pub const NOT_FOUND: &str = "Message not found";

/// Handler per GET /: messaggio di prontezza in testo semplice.
pub async fn index() -> &'static str {
    "Message board API is running"
}

/// Handler per POST /api/messages
pub async fn create_message(
    Extension(state): Extension<Arc<AppState>>,
    form: MessageForm,
) -> Result<(StatusCode, Json<CreateMessageResponse>), ApiError> {
    const FAILED: &str = "Failed to add message";

    // validazione prima di qualsiasi I/O
    let input = form.into_create()?;
    let store = state.db.store().map_err(|e| ApiError::internal(FAILED, e))?;

    let image = match &input.upload {
        Some(upload) => Some(state.uploads.store(upload).await.map_err(|e| ApiError::internal(FAILED, e))?),
        None => None,
    };
    let message = NewMessage {
        text: input.text,
        author: input.author,
        timestamp: now_timestamp(),
        image,
    };

    /*
     * Il file è già su disco: se l'inserimento fallisce nessun documento lo
     * referenzia, quindi va rimosso prima di restituire l'errore.
     */
    let stored_image = message.image.clone();
    let id = match store.insert(message).await {
        Ok(id) => id,
        Err(e) => {
            if let Some(name) = stored_image.as_deref() {
                state.uploads.discard(name).await;
            }
            return Err(ApiError::internal(FAILED, e));
        }
    };
    tracing::info!(message_id = %id, "message created");
    Ok((StatusCode::CREATED, Json(CreateMessageResponse::inserted(id.to_hex()))))
}

/// Handler per GET /api/messages: tutti i documenti, nell'ordine dello store.
pub async fn list_messages(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Message>>, ApiError> {
    const FAILED: &str = "Failed to fetch messages";

    let store = state.db.store().map_err(|e| ApiError::internal(FAILED, e))?;
    let messages = store.find_all().await.map_err(|e| ApiError::internal(FAILED, e))?;
    Ok(Json(messages))
}

/// Handler per PUT /api/messages/:id
pub async fn update_message(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    form: MessageForm,
) -> Result<Json<StatusResponse>, ApiError> {
    const FAILED: &str = "Failed to update message";

    let id = parse_message_id(&id)?;
    let input = form.into_update()?;
    let store = state.db.store().map_err(|e| ApiError::internal(FAILED, e))?;

    // il nuovo file ha la precedenza sul riferimento passato nel corpo;
    // se mancano entrambi `image` resta fuori dal $set
    let new_upload = match &input.upload {
        Some(upload) => Some(state.uploads.store(upload).await.map_err(|e| ApiError::internal(FAILED, e))?),
        None => None,
    };
    let changes = MessageChanges {
        text: input.text,
        author: input.author,
        timestamp: now_timestamp(),
        image: new_upload.clone().or(input.image_ref),
    };

    // errore dello store o id inesistente: il file appena salvato non serve a nessuno
    let outcome = match store.update(id, changes).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(ApiError::not_found(NOT_FOUND)),
        Err(e) => Err(ApiError::internal(FAILED, e)),
    };
    if let Err(e) = outcome {
        if let Some(name) = new_upload.as_deref() {
            state.uploads.discard(name).await;
        }
        return Err(e);
    }
    tracing::info!(message_id = %id, "message updated");
    Ok(Json(StatusResponse::new("Message updated")))
}

/// Handler per DELETE /api/messages/:id
pub async fn delete_message(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    const FAILED: &str = "Failed to delete message";

    let id = parse_message_id(&id)?;
    let store = state.db.store().map_err(|e| ApiError::internal(FAILED, e))?;

    let deleted = store.delete(id).await.map_err(|e| ApiError::internal(FAILED, e))?;
    if !deleted {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    tracing::info!(message_id = %id, "message deleted");
    Ok(Json(StatusResponse::new("Message deleted")))
}

/// Un id è valido solo se è un ObjectId esadecimale di 24 caratteri.
pub fn parse_message_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::validation(INVALID_ID))
}
