use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use bacheca_core::MessageFields;

use crate::error::ApiError;
use crate::uploads::Upload;

pub const MISSING_FIELDS: &str = "Text and author are required";

/// Corpo di POST/PUT /api/messages: campi testuali più l'eventuale file `image`.
///
/// Accetta multipart/form-data, application/x-www-form-urlencoded e
/// application/json. Con qualsiasi altro Content-Type (o nessuno) i campi
/// risultano vuoti e la validazione risponde 400.
#[derive(Debug, Default)]
pub struct MessageForm {
    pub fields: MessageFields,
    pub upload: Option<Upload>,
}

/// Campi validati per la creazione.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInput {
    pub text: String,
    pub author: String,
    pub upload: Option<Upload>,
}

/// Campi validati per l'aggiornamento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInput {
    pub text: String,
    pub author: String,
    pub upload: Option<Upload>,
    /// Riferimento a un'immagine esistente passato nel corpo (non vuoto)
    pub image_ref: Option<String>,
}

impl MessageForm {
    fn required(&mut self) -> Result<(String, String), ApiError> {
        let text = self.fields.text.take().filter(|s| !s.is_empty());
        let author = self.fields.author.take().filter(|s| !s.is_empty());
        match (text, author) {
            (Some(text), Some(author)) => Ok((text, author)),
            _ => Err(ApiError::validation(MISSING_FIELDS)),
        }
    }

    pub fn into_create(mut self) -> Result<CreateInput, ApiError> {
        let (text, author) = self.required()?;
        Ok(CreateInput { text, author, upload: self.upload })
    }

    pub fn into_update(mut self) -> Result<UpdateInput, ApiError> {
        let (text, author) = self.required()?;
        let image_ref = self.fields.image.take().filter(|s| !s.is_empty());
        Ok(UpdateInput { text, author, upload: self.upload, image_ref })
    }
}

#[async_trait]
impl<S> FromRequest<S> for MessageForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            return read_multipart(multipart).await;
        }
        if content_type.starts_with("application/json") {
            let Json(fields) = Json::<MessageFields>::from_request(req, state)
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            return Ok(Self { fields, upload: None });
        }
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<MessageFields>::from_request(req, state)
                .await
                .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
            return Ok(Self { fields, upload: None });
        }
        Ok(Self::default())
    }
}

// Estrae i campi dal multipart: solo `image` può essere un file, gli altri
// campi sconosciuti vengono ignorati.
async fn read_multipart(mut multipart: Multipart) -> Result<MessageForm, ApiError> {
    let mut form = MessageForm::default();

    /*
     * next_field legge il corpo in streaming, un campo alla volta, quindi il
     * limite DefaultBodyLimit scatta qui (o in field.bytes()) e non prima:
     * in quel caso lo status del rifiuto è 413 e va conservato così com'è.
     * Un campo `image` con filename è il file caricato; senza filename è il
     * riferimento testuale a un'immagine già salvata (usato dalla PUT).
     */
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" if field.file_name().is_some() => {
                let file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
                // input file lasciato vuoto dal browser: nessun upload
                let empty = data.is_empty() && file_name.as_deref().map_or(true, str::is_empty);
                if !empty {
                    form.upload = Some(Upload { file_name, data });
                }
            }
            "text" | "author" | "image" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::rejected(e.status(), e.body_text()))?;
                match name.as_str() {
                    "text" => form.fields.text = Some(value),
                    "author" => form.fields.author = Some(value),
                    _ => form.fields.image = Some(value),
                }
            }
            _ => continue,
        }
    }
    Ok(form)
}
