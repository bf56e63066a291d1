//! Chat Handlers

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateChatRequest, SendMessageRequest};
use crate::application::dto::response::{ChatResponse, CreateChatResponse};
use crate::domain::ChatMessage;
use crate::presentation::middleware::RequestCancellation;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create a new chat
pub async fn create_chat(
    State(state): State<AppState>,
    Extension(RequestCancellation(cancel)): Extension<RequestCancellation>,
    Json(request): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<CreateChatResponse>), AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let id = state
        .chat_service
        .create_chat(request.usernames, &cancel)
        .await?;

    Ok((StatusCode::CREATED, Json(CreateChatResponse { id })))
}

/// Get a chat by id
pub async fn get_chat(
    State(state): State<AppState>,
    Extension(RequestCancellation(cancel)): Extension<RequestCancellation>,
    Path(chat_id): Path<i64>,
) -> Result<Json<ChatResponse>, AppError> {
    let chat = state.chat_service.get_chat(chat_id, &cancel).await?;
    Ok(Json(ChatResponse::from(chat)))
}

/// Delete a chat
pub async fn delete_chat(
    State(state): State<AppState>,
    Extension(RequestCancellation(cancel)): Extension<RequestCancellation>,
    Path(chat_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.chat_service.delete_chat(chat_id, &cancel).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Send a message to a chat
pub async fn send_message(
    State(state): State<AppState>,
    Extension(RequestCancellation(cancel)): Extension<RequestCancellation>,
    Path(chat_id): Path<i64>,
    Json(request): Json<SendMessageRequest>,
) -> Result<StatusCode, AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let message = ChatMessage::new(chat_id, request.sender, request.text);
    state.chat_service.send_message(message, &cancel).await?;

    Ok(StatusCode::ACCEPTED)
}
