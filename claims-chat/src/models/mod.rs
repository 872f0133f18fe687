pub mod api;
pub mod message;

pub use api::{BackendHealth, IngestResponse, QueryRequest, QueryResponse};
pub use message::{Message, ResponseMetadata, Role, Source};
