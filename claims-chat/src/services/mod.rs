pub mod metrics;
pub mod mock_backend;
pub mod rag_client;

pub use mock_backend::MockRagBackend;
pub use rag_client::{ClientError, HttpRagBackend, RagBackend};
