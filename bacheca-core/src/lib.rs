//! bacheca-core: tipi condivisi della bacheca (modello, DTO HTTP, errori) esposti sul wire.
//! Niente I/O: il crate dipende solo da serde e time.

pub mod models;
pub mod protocol;
pub mod error;
pub mod utils;

// Re-export utili per ridurre i percorsi nel crate server
pub use error::ErrorResponse;
pub use models::Message;
pub use protocol::http::{CreateMessageResponse, HealthResponse, MessageFields, StatusResponse};
pub use utils::{format_timestamp, now_timestamp, parse_timestamp};
