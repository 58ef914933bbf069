use std::sync::Arc;

use axum::{
    extract::State,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::{debug, error};
use uuid::Uuid;

use super::assistant::Assistant;
use crate::wire::{ChatReply, ChatRequest};

pub const SESSION_COOKIE: &str = "chat_session";

pub fn router(assistant: Arc<Assistant>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/cancel_booking", post(cancel_booking))
        .with_state(assistant)
}

async fn chat(
    State(assistant): State<Arc<Assistant>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Response, RouteError> {
    let (session, fresh) = session_from(&headers);
    debug!(%session, fresh, "chat request");
    let text = assistant.respond(session, &request.user_input).await?;
    Ok(reply_for(session, fresh, text))
}

async fn cancel_booking(State(assistant): State<Arc<Assistant>>, headers: HeaderMap) -> Response {
    let (session, fresh) = session_from(&headers);
    let text = assistant.cancel_booking(session);
    reply_for(session, fresh, text)
}

/// The session named by the request cookie, or a new one (`true`).
fn session_from(headers: &HeaderMap) -> (Uuid, bool) {
    let existing = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value).ok());

    match existing {
        Some(session) => (session, false),
        None => (Uuid::new_v4(), true),
    }
}

fn reply_for(session: Uuid, fresh: bool, text: impl Into<String>) -> Response {
    let mut response = Json(ChatReply::new(text)).into_response();
    if fresh {
        let cookie = format!("{SESSION_COOKIE}={session}; Path=/; HttpOnly; SameSite=Lax");
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
    response
}

/// Any failure while producing a reply. Answers `502` with an error body.
pub struct RouteError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for RouteError {
    fn from(err: E) -> Self {
        RouteError(err.into())
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        error!("chat request failed: {:#}", self.0);
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
