use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};

use crate::mongo::MongoStore;
use crate::store::{MemoryStore, MessageStore, StoreError};

/// Valore di `MONGODB_URI` che seleziona lo store in memoria.
pub const MEMORY_URI: &str = "memory";

/// Stato della connessione allo store, esposto da /health.
///
/// Disconnected -> Connecting -> Connected | Failed. Non c'è riconnessione:
/// Connected e Failed sono stati finali.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum Slot {
    Disconnected,
    Connecting,
    Connected(Arc<dyn MessageStore>),
    Failed(String),
}

/// Handle unico verso lo store, creato all'avvio e condiviso da tutti gli handler.
/// Il lock è tenuto solo per leggere o cambiare lo stato, mai attraverso un `.await`.
pub struct Database {
    slot: RwLock<Slot>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self { slot: RwLock::new(Slot::Disconnected) }
    }

    /// Database già connesso allo store dato (usato dai test e dallo store in memoria).
    pub fn with_store(store: Arc<dyn MessageStore>) -> Self {
        Self { slot: RwLock::new(Slot::Connected(store)) }
    }

    pub fn state(&self) -> ConnectionState {
        match &*self.slot.read().unwrap_or_else(PoisonError::into_inner) {
            Slot::Disconnected => ConnectionState::Disconnected,
            Slot::Connecting => ConnectionState::Connecting,
            Slot::Connected(_) => ConnectionState::Connected,
            Slot::Failed(_) => ConnectionState::Failed,
        }
    }

    /// Errore dell'ultimo tentativo di connessione, se è fallito.
    pub fn last_error(&self) -> Option<String> {
        match &*self.slot.read().unwrap_or_else(PoisonError::into_inner) {
            Slot::Failed(e) => Some(e.clone()),
            _ => None,
        }
    }

    /// Restituisce lo store se la connessione è stabilita, altrimenti fallisce subito.
    pub fn store(&self) -> Result<Arc<dyn MessageStore>, StoreError> {
        match &*self.slot.read().unwrap_or_else(PoisonError::into_inner) {
            Slot::Connected(store) => Ok(store.clone()),
            Slot::Disconnected => Err(StoreError::NotEstablished(ConnectionState::Disconnected)),
            Slot::Connecting => Err(StoreError::NotEstablished(ConnectionState::Connecting)),
            Slot::Failed(_) => Err(StoreError::NotEstablished(ConnectionState::Failed)),
        }
    }

    /// Esegue un solo tentativo di connessione con la funzione data.
    /// Se lo stato non è Disconnected non fa nulla e restituisce lo stato attuale.
    pub async fn connect_with<F, Fut>(&self, open: F) -> ConnectionState
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn MessageStore>, StoreError>>,
    {
        /*
         * La transizione Disconnected -> Connecting avviene sotto write lock,
         * così due chiamate concorrenti non possono partire entrambe. Il lock
         * viene rilasciato alla fine del blocco, prima dell'await: durante la
         * connessione le richieste leggono lo stato Connecting e falliscono
         * subito invece di restare in attesa.
         */
        {
            let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
            if !matches!(*slot, Slot::Disconnected) {
                drop(slot);
                return self.state();
            }
            *slot = Slot::Connecting;
        }
        tracing::info!("connecting to document store");

        // unico tentativo: sia Connected sia Failed sono stati finali
        let next = match open().await {
            Ok(store) => {
                tracing::info!("connected to document store");
                Slot::Connected(store)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to connect to document store");
                Slot::Failed(e.to_string())
            }
        };
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = next;
        self.state()
    }

    /// Connessione allo store indicato da `uri`: `memory` oppure un URI MongoDB.
    pub async fn connect(&self, uri: &str, db_name: &str) -> ConnectionState {
        self.connect_with(|| open_store(uri, db_name)).await
    }
}

async fn open_store(uri: &str, db_name: &str) -> Result<Arc<dyn MessageStore>, StoreError> {
    if uri == MEMORY_URI {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let store = MongoStore::connect(uri, db_name).await?;
    Ok(Arc::new(store))
}
