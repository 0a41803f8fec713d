//! Request handlers for `/login`, `/chat` and `/metrics`.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::metrics::{self, Aggregates};
use crate::models::{NewMessage, User};
use crate::prompt::{construct_intent_prompt, construct_prompt, render_history};
use crate::server::AppContext;
use crate::utils::{elapsed_ms, non_blank, single_line};

const HISTORY_TURNS: usize = 4;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub cedula: Option<String>,
    pub nombre: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub cedula: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// `POST /login`: returns the stored user, registering it on first sight.
pub async fn login(
    State(ctx): State<AppContext>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    let Json(body) = body?;
    let (Some(cedula), Some(nombre)) = (non_blank(body.cedula), non_blank(body.nombre)) else {
        return Err(AppError::Validation("cedula and nombre are required".into()));
    };

    if let Some(user) = ctx.store.find_user(&cedula).await? {
        return Ok((
            StatusCode::OK,
            Json(LoginResponse {
                message: format!("Welcome back, {}!", user.nombre),
                user,
            }),
        ));
    }

    let user = ctx
        .store
        .insert_user(&User { cedula, nombre })
        .await?
        .ok_or_else(|| AppError::Registration("Could not register the user".into()))?;

    info!(cedula = %user.cedula, "registered new user");
    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            message: format!("Welcome, {}!", user.nombre),
            user,
        }),
    ))
}

/// `POST /chat`: answers from FAQ context and recent history, then records
/// the turn. A failed write is logged and does not fail the request.
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn chat(
    State(ctx): State<AppContext>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let start = Instant::now();

    let Json(body) = body?;
    let (Some(cedula), Some(user_message)) = (non_blank(body.cedula), non_blank(body.message))
    else {
        return Err(AppError::Validation("cedula and message are required".into()));
    };

    let context = ctx.retriever.retrieve(&user_message);

    let mut turns = ctx.store.recent_turns(&cedula, HISTORY_TURNS).await?;
    turns.reverse();
    let history = render_history(&turns);

    let prompt = construct_prompt(&context, &history, &user_message);
    let bot_response = ctx.model.generate(&prompt).await?.trim().to_string();

    let intent_summary = single_line(
        &ctx.model
            .generate(&construct_intent_prompt(&user_message))
            .await?,
    );

    let response_time_ms = elapsed_ms(start);

    let message = NewMessage {
        user_cedula: cedula,
        user_message,
        bot_response,
        intent_summary,
        response_time_ms,
    };
    if let Err(e) = ctx.store.insert_message(&message).await {
        error!(error = %e, response_time_ms, "failed to save chat turn");
    }

    Ok(Json(ChatResponse {
        response: message.bot_response,
    }))
}

/// `GET /metrics`: usage aggregates over every stored turn.
pub async fn metrics(State(ctx): State<AppContext>) -> AppResult<Json<Aggregates>> {
    let rows = ctx
        .store
        .message_stats()
        .await
        .map_err(|e| AppError::Metrics(e.to_string()))?;

    metrics::aggregate(&rows)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No data to display".into()))
}
