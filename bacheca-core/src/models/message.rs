use serde::{Deserialize, Serialize};

/// Messaggio della bacheca così come esce da GET /api/messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// ObjectId assegnato dallo store, in forma esadecimale (24 caratteri)
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub author: String,
    pub timestamp: String, // ISO-8601 UTC, precisione al millisecondo
    /// Nome del file caricato, `null` se il messaggio non ha immagine
    #[serde(default)]
    pub image: Option<String>,
}
