//! PostgREST access to the hosted `users` and `messages` tables.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::models::{MessageStat, NewMessage, Turn, User};
use crate::store::{ConversationStore, StoreError};

const USERS: &str = "users";
const MESSAGES: &str = "messages";

pub struct SupabaseStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseStore {
    pub fn new(url: &str, api_key: impl Into<String>) -> Self {
        SupabaseStore {
            http: reqwest::Client::new(),
            base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    fn table(&self, method: reqwest::Method, table: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.base_url, table))
            .header("apikey", self.api_key.as_str())
            .bearer_auth(&self.api_key)
    }

    async fn read<T: DeserializeOwned>(
        table: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = check(table, request.send().await?).await?;
        Ok(response.json().await?)
    }
}

async fn check(
    table: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, StoreError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    Err(StoreError::Status { table, status, body })
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl ConversationStore for SupabaseStore {
    async fn find_user(&self, cedula: &str) -> Result<Option<User>, StoreError> {
        let request = self
            .table(reqwest::Method::GET, USERS)
            .query(&[("select", "cedula,nombre"), ("cedula", eq(cedula).as_str())]);
        let users: Vec<User> = Self::read(USERS, request).await?;
        Ok(users.into_iter().next())
    }

    async fn insert_user(&self, user: &User) -> Result<Option<User>, StoreError> {
        let request = self
            .table(reqwest::Method::POST, USERS)
            .header("Prefer", "return=representation")
            .json(&[user]);
        let users: Vec<User> = Self::read(USERS, request).await?;
        Ok(users.into_iter().next())
    }

    async fn recent_turns(&self, cedula: &str, limit: usize) -> Result<Vec<Turn>, StoreError> {
        let limit = limit.to_string();
        let request = self.table(reqwest::Method::GET, MESSAGES).query(&[
            ("select", "user_message,bot_response"),
            ("user_cedula", eq(cedula).as_str()),
            ("order", "created_at.desc"),
            ("limit", limit.as_str()),
        ]);
        Self::read(MESSAGES, request).await
    }

    async fn insert_message(&self, message: &NewMessage) -> Result<(), StoreError> {
        let request = self
            .table(reqwest::Method::POST, MESSAGES)
            .header("Prefer", "return=minimal")
            .json(&[message]);
        check(MESSAGES, request.send().await?).await?;
        Ok(())
    }

    async fn message_stats(&self) -> Result<Vec<MessageStat>, StoreError> {
        let request = self.table(reqwest::Method::GET, MESSAGES).query(&[(
            "select",
            "intent_summary,response_time_ms,user_cedula,created_at",
        )]);
        Self::read(MESSAGES, request).await
    }
}
