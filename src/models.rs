use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub cedula: String,
    pub nombre: String,
}

/// A chat turn as written to the `messages` table. `created_at` is assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessage {
    pub user_cedula: String,
    pub user_message: String,
    pub bot_response: String,
    pub intent_summary: String,
    pub response_time_ms: u64,
}

/// The part of a stored turn that is replayed into the prompt.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Turn {
    pub user_message: String,
    pub bot_response: String,
}

/// Projection of a stored message used for usage metrics.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageStat {
    pub user_cedula: String,
    pub intent_summary: String,
    pub response_time_ms: u64,
    pub created_at: DateTime<Utc>,
}
