use async_trait::async_trait;
use bacheca_core::Message;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Client, Collection,
};
use serde::{Deserialize, Serialize};

use crate::store::{MessageChanges, MessageStore, NewMessage, StoreError};

/// Nome della collezione che contiene i messaggi.
pub const COLLECTION: &str = "messages";

/// Forma del documento nella collezione `messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>, // generato da MongoDB all'inserimento
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<NewMessage> for MessageDocument {
    fn from(m: NewMessage) -> Self {
        Self { id: None, text: m.text, author: m.author, timestamp: m.timestamp, image: m.image }
    }
}

impl From<MessageDocument> for Message {
    fn from(d: MessageDocument) -> Self {
        Message {
            id: d.id.map(|id| id.to_hex()).unwrap_or_default(),
            text: d.text,
            author: d.author,
            timestamp: d.timestamp,
            image: d.image,
        }
    }
}

/// Documento per `$set`: solo i campi da sovrascrivere.
pub fn set_document(changes: MessageChanges) -> Document {
    let mut set = doc! {
        "text": changes.text,
        "author": changes.author,
        "timestamp": changes.timestamp,
    };
    /*
     * Con $set i campi non elencati restano com'erano: se image è None la
     * chiave non deve proprio comparire, altrimenti un valore null
     * cancellerebbe l'immagine già salvata.
     */
    if let Some(image) = changes.image {
        set.insert("image", image);
    }
    set
}

/// Store su MongoDB: una collezione tipizzata condivisa da tutte le richieste.
#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<MessageDocument>,
}

impl MongoStore {
    /// Apre il client e verifica la raggiungibilità del server con un `ping`
    /// (il driver è lazy: senza comandi non contatta il server).
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 }).await?;
        Ok(Self { collection: db.collection(COLLECTION) })
    }
}

#[async_trait]
impl MessageStore for MongoStore {
    async fn insert(&self, message: NewMessage) -> Result<ObjectId, StoreError> {
        let result = self.collection.insert_one(MessageDocument::from(message)).await?;
        match result.inserted_id {
            Bson::ObjectId(id) => Ok(id),
            other => Err(StoreError::UnexpectedId(other.to_string())),
        }
    }

    async fn find_all(&self) -> Result<Vec<Message>, StoreError> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<MessageDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Message::from).collect())
    }

    async fn update(&self, id: ObjectId, changes: MessageChanges) -> Result<bool, StoreError> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set_document(changes) })
            .await?;
        // matched e non modified: riscrivere gli stessi valori conta come successo
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
