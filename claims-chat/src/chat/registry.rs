//! In-memory map from browser session to chat session.

use super::session::ChatSession;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

pub type ChatHandle = Arc<Mutex<ChatSession>>;

struct Entry {
    chat: ChatHandle,
    last_seen: Instant,
}

#[derive(Default)]
pub struct SessionRegistry {
    chats: DashMap<Uuid, Entry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the chat for `id`, creating a freshly seeded one if it is unknown
    /// or was evicted.
    pub fn get_or_create(&self, id: Uuid) -> ChatHandle {
        let mut entry = self.chats.entry(id).or_insert_with(|| {
            tracing::debug!(chat_id = %id, "Starting chat session");
            Entry {
                chat: Arc::new(Mutex::new(ChatSession::new())),
                last_seen: Instant::now(),
            }
        });
        entry.last_seen = Instant::now();
        entry.chat.clone()
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Drop chats not seen for longer than `max_idle`. Returns how many were removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.chats.len();
        self.chats
            .retain(|_, entry| entry.last_seen.elapsed() <= max_idle);
        let removed = before.saturating_sub(self.chats.len());

        if removed > 0 {
            tracing::info!(removed, remaining = self.chats.len(), "Evicted idle chat sessions");
        }
        removed
    }
}

/// Periodically evict idle chats for the life of the process.
pub fn spawn_sweeper(registry: Arc<SessionRegistry>, max_idle: Duration) -> tokio::task::JoinHandle<()> {
    let period = (max_idle / 4).max(Duration::from_secs(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            registry.evict_idle(max_idle);
        }
    })
}
