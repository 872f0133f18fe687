pub mod chat;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use chat::SessionRegistry;
use config::UiSettings;
use services::RagBackend;
use std::sync::Arc;

/// Shared application state: the backend collaborator and the live chats.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn RagBackend>,
    pub chats: Arc<SessionRegistry>,
    pub ui: Arc<UiSettings>,
}

impl AppState {
    pub fn new(backend: Arc<dyn RagBackend>, chats: Arc<SessionRegistry>, ui: UiSettings) -> Self {
        Self {
            backend,
            chats,
            ui: Arc::new(ui),
        }
    }
}
