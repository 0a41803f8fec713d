use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{MessageStat, NewMessage, Turn, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{table} returned {status}: {body}")]
    Status {
        table: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Table-oriented access to `users` and `messages`.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn find_user(&self, cedula: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a user and returns the row the store confirmed, if any.
    async fn insert_user(&self, user: &User) -> Result<Option<User>, StoreError>;

    /// The `limit` most recent turns for a user, newest first.
    async fn recent_turns(&self, cedula: &str, limit: usize) -> Result<Vec<Turn>, StoreError>;

    async fn insert_message(&self, message: &NewMessage) -> Result<(), StoreError>;

    async fn message_stats(&self) -> Result<Vec<MessageStat>, StoreError>;
}

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    messages: Vec<(NewMessage, chrono::DateTime<Utc>)>,
}

/// In-process store for local development and tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn find_user(&self, cedula: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.cedula == cedula).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<Option<User>, StoreError> {
        let mut tables = self.tables.write().await;
        // primary key on cedula
        if tables.users.iter().any(|u| u.cedula == user.cedula) {
            return Ok(None);
        }
        tables.users.push(user.clone());
        Ok(Some(user.clone()))
    }

    async fn recent_turns(&self, cedula: &str, limit: usize) -> Result<Vec<Turn>, StoreError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<_> = tables
            .messages
            .iter()
            .filter(|(m, _)| m.user_cedula == cedula)
            .collect();
        // stable sort keeps insertion order for equal timestamps; reverse puts newest first
        rows.sort_by_key(|(_, created_at)| *created_at);
        Ok(rows
            .into_iter()
            .rev()
            .take(limit)
            .map(|(m, _)| Turn {
                user_message: m.user_message.clone(),
                bot_response: m.bot_response.clone(),
            })
            .collect())
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.messages.push((message.clone(), Utc::now()));
        Ok(())
    }

    async fn message_stats(&self) -> Result<Vec<MessageStat>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .iter()
            .map(|(m, created_at)| MessageStat {
                user_cedula: m.user_cedula.clone(),
                intent_summary: m.intent_summary.clone(),
                response_time_ms: m.response_time_ms,
                created_at: *created_at,
            })
            .collect())
    }
}
