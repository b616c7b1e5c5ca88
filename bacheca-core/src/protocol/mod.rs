pub mod http;

// Re-export comodi
pub use http::{CreateMessageResponse, HealthResponse, MessageFields, StatusResponse};
