//! Messaging endpoints, nested inside matches.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use lovear_common::AppResult;
use lovear_store::entities::Message;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create the messaging router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/matches/{id}/messages", get(conversation))
        .route("/matches/{id}/messages", post(send_message))
        .route("/matches/{id}/messages/read", post(mark_read))
        .route("/messages/unread/count", get(unread_count))
}

/// Message response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub match_id: String,
    pub sender_id: String,
    pub content: String,
    pub is_read: bool,
    pub sent_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            match_id: m.match_id,
            sender_id: m.sender_id,
            content: m.content,
            is_read: m.is_read,
            sent_at: m.sent_at,
        }
    }
}

/// Conversation query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationQuery {
    pub limit: Option<usize>,
    /// Return messages older than this message id.
    pub until_id: Option<String>,
}

/// Page through a conversation, newest first.
async fn conversation(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ConversationQuery>,
) -> AppResult<ApiResponse<Vec<MessageResponse>>> {
    let messages = state
        .messaging_service
        .conversation(&id, &user.id, query.limit, query.until_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(messages.into_iter().map(Into::into).collect()))
}

/// Send message request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
}

/// Send a message within a match.
async fn send_message(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> AppResult<ApiResponse<MessageResponse>> {
    let message = state
        .messaging_service
        .send_message(
            &id,
            &user.id,
            lovear_core::SendMessageInput {
                content: req.content,
            },
        )
        .await?;
    Ok(ApiResponse::ok(message.into()))
}

/// Mark-read response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadResponse {
    pub marked: u64,
}

/// Mark the partner's messages as read.
async fn mark_read(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MarkReadResponse>> {
    let marked = state.messaging_service.mark_read(&id, &user.id).await?;
    Ok(ApiResponse::ok(MarkReadResponse { marked }))
}

/// Unread count response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub count: u64,
}

/// Unread messages across the user's active matches.
async fn unread_count(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UnreadCountResponse>> {
    let count = state.messaging_service.unread_count(&user.id).await?;
    Ok(ApiResponse::ok(UnreadCountResponse { count }))
}
