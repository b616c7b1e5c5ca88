use anyhow::Context;
use axum::body::Bytes;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;
use uuid::Uuid;

/// File arrivato nel campo `image` di un form multipart, ancora in memoria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Nome del file dichiarato dal client, se presente
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Directory dove vengono salvate le immagini caricate.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Crea la directory (e le genitrici) se non esiste.
    pub async fn ensure_exists(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload dir {:?}", self.root))
    }

    /// Salva il file e restituisce il nome con cui è stato memorizzato,
    /// cioè il valore da mettere nel campo `image` del messaggio.
    pub async fn store(&self, upload: &Upload) -> anyhow::Result<String> {
        self.ensure_exists().await?;
        let name = stored_name(upload.file_name.as_deref(), unix_millis());
        let path = self.root.join(&name);
        fs::write(&path, &upload.data)
            .await
            .with_context(|| format!("write upload {:?}", path))?;
        tracing::info!(file = %name, size_bytes = upload.data.len(), "image stored");
        Ok(name)
    }

    /// Rimuove un file salvato con [`UploadDir::store`] quando la scrittura sullo
    /// store non è andata a buon fine. Un errore di rimozione viene solo loggato.
    pub async fn discard(&self, name: &str) {
        let path = self.root.join(name);
        match fs::remove_file(&path).await {
            Ok(()) => tracing::info!(file = %name, "orphaned image removed"),
            Err(e) => tracing::warn!(file = %name, error = %e, "failed to remove orphaned image"),
        }
    }
}

/// `<millis>-<nome originale>`; del nome originale si tiene solo l'ultima
/// componente del percorso. Senza nome si usa un UUID.
pub fn stored_name(original: Option<&str>, millis: u128) -> String {
    let base = original
        .and_then(|n| Path::new(n.trim()).file_name())
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    format!("{}-{}", millis, base)
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
