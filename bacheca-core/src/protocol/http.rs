use serde::{Deserialize, Serialize};
/*
    dto per le richieste e risposte http di /api/messages
*/

/// Campi accettati nel corpo di POST e PUT, qualunque sia il formato
/// (multipart, url-encoded o JSON). Nessun campo è obbligatorio a livello di
/// parsing: la presenza di `text` e `author` viene controllata dopo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageFields {
    pub text: Option<String>,
    pub author: Option<String>,
    /// Riferimento a un'immagine già caricata (solo PUT)
    pub image: Option<String>,
}

// Create
/// Riscontro dell'inserimento restituito con 201.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageResponse {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl CreateMessageResponse {
    pub fn inserted(id: impl Into<String>) -> Self {
        Self { acknowledged: true, inserted_id: id.into() }
    }
}

// Update / Delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

impl StatusResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

// Health
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" oppure "unavailable"
    pub status: String,
    /// stato della connessione allo store (es. "connected", "failed")
    pub database: String,
}
