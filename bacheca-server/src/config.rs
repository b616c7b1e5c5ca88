use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DB_NAME: &str = "myWebsiteDB";
pub const DEFAULT_UPLOAD_DIR: &str = "public";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Configurazione del processo, letta una volta all'avvio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// URI MongoDB, oppure `memory` per lo store in memoria
    pub mongodb_uri: String,
    pub db_name: String,
    /// Directory dove finiscono le immagini caricate, servita anche come statica
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_filter: String,
}

impl Config {
    /// Legge la configurazione dalle variabili d'ambiente, con default per ognuna.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Come [`Config::from_env`] ma con una sorgente qualsiasi (comoda nei test).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        // converte la stringa in SocketAddr (host + porta)
        let bind_addr: SocketAddr = bind
            .parse()
            .with_context(|| format!("parse BIND_ADDR {:?}", bind))?;

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("parse MAX_UPLOAD_BYTES {:?}", raw))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            bind_addr,
            mongodb_uri: get("MONGODB_URI", DEFAULT_MONGODB_URI),
            db_name: get("DB_NAME", DEFAULT_DB_NAME),
            upload_dir: PathBuf::from(get("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            max_upload_bytes,
            log_filter: get("RUST_LOG", DEFAULT_LOG_FILTER),
        })
    }
}
