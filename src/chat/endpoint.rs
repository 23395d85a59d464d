//! The JSON endpoint that relays chat messages to the generative language API.

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, chat::ChatClient};

/// The state needed for the chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatState {
    pub client: ChatClient,
}

impl FromRef<AppState> for ChatState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            client: state.chat_client.clone(),
        }
    }
}

/// A message from the user.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// The model's reply.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ChatError {
    error: &'static str,
}

/// Forward the user's message and reply with the model's answer.
///
/// Any failure talking to the API is reported as a 500 with a generic error
/// message. The details are only logged.
pub async fn chat_endpoint(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    match state.client.send(&request.message).await {
        Ok(message) => Json(ChatReply { message }).into_response(),
        Err(error) => {
            tracing::error!("Could not get a chat reply: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatError {
                    error: "Failed to process your request",
                }),
            )
                .into_response()
        }
    }
}
