//! Middleware components for the HTTP server.

pub mod request_id;

// Re-export commonly used types
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
