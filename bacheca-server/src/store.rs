use async_trait::async_trait;
use bacheca_core::Message;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::database::ConnectionState;

/// Errori di comunicazione con lo store dei documenti.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection not established (state: {0})")]
    NotEstablished(ConnectionState),

    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("store returned a non-ObjectId identifier: {0}")]
    UnexpectedId(String),
}

/// Documento da inserire: l'id lo assegna lo store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub text: String,
    pub author: String,
    pub timestamp: String,
    pub image: Option<String>,
}

/// Insieme di campi applicati con semantica `$set`.
/// `image: None` significa "non toccare il campo", non "cancellalo".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageChanges {
    pub text: String,
    pub author: String,
    pub timestamp: String,
    pub image: Option<String>,
}

/// Operazioni sulla collezione `messages`. Ogni chiamata è un singolo tentativo.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Inserisce un documento e restituisce l'id generato dallo store.
    async fn insert(&self, message: NewMessage) -> Result<ObjectId, StoreError>;

    async fn find_all(&self) -> Result<Vec<Message>, StoreError>;

    /// `Ok(false)` se nessun documento ha quell'id.
    async fn update(&self, id: ObjectId, changes: MessageChanges) -> Result<bool, StoreError>;

    /// `Ok(false)` se nessun documento ha quell'id.
    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError>;
}

/// Store in memoria, selezionato con `MONGODB_URI=memory` e usato nei test.
/// I documenti vengono elencati in ordine di ObjectId, cioè di creazione.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: DashMap<ObjectId, Message>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert(&self, message: NewMessage) -> Result<ObjectId, StoreError> {
        let id = ObjectId::new();
        self.docs.insert(
            id,
            Message {
                id: id.to_hex(),
                text: message.text,
                author: message.author,
                timestamp: message.timestamp,
                image: message.image,
            },
        );
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<Message>, StoreError> {
        let mut entries: Vec<(ObjectId, Message)> = self
            .docs
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        Ok(entries.into_iter().map(|(_, m)| m).collect())
    }

    async fn update(&self, id: ObjectId, changes: MessageChanges) -> Result<bool, StoreError> {
        let Some(mut doc) = self.docs.get_mut(&id) else {
            return Ok(false);
        };
        doc.text = changes.text;
        doc.author = changes.author;
        doc.timestamp = changes.timestamp;
        if let Some(image) = changes.image {
            doc.image = Some(image);
        }
        Ok(true)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        Ok(self.docs.remove(&id).is_some())
    }
}
