use super::registry::ChatHandle;
use crate::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use service_core::error::AppError;
use tower_sessions::Session;
use uuid::Uuid;

const CHAT_ID_KEY: &str = "chat_id";

/// The chat bound to the caller's browser session, created on first use.
pub struct ActiveChat {
    pub id: Uuid,
    pub chat: ChatHandle,
}

#[async_trait]
impl FromRequestParts<AppState> for ActiveChat {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::SessionError(msg.to_string()))?;

        let stored: Option<Uuid> = session
            .get(CHAT_ID_KEY)
            .await
            .map_err(|e| AppError::SessionError(e.to_string()))?;

        let id = match stored {
            Some(id) => id,
            None => {
                let id = Uuid::new_v4();
                session
                    .insert(CHAT_ID_KEY, id)
                    .await
                    .map_err(|e| AppError::SessionError(e.to_string()))?;
                id
            }
        };

        Ok(ActiveChat {
            id,
            chat: state.chats.get_or_create(id),
        })
    }
}
