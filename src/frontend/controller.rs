use std::sync::Arc;

use dioxus::html::input_data::keyboard_types::Key;
use futures::future::{FutureExt, LocalBoxFuture};
use tracing::error;

use super::client::{ChatBackend, ChatError};
use super::types::{Message, Sender};
use super::view::ChatView;
use crate::wire::{ChatReply, ChatRequest};

/// Resolves once the reply for one submission has been rendered, or with the
/// failure that kept it from being rendered.
pub type PendingReply = LocalBoxFuture<'static, Result<Message, ChatError>>;

/// Drives one chat widget: renders into `view` and exchanges messages with
/// `backend`.
#[derive(Clone)]
pub struct ChatController<V> {
    view: V,
    backend: Arc<dyn ChatBackend>,
}

impl<V: ChatView> ChatController<V> {
    pub fn new(view: V, backend: Arc<dyn ChatBackend>) -> ChatController<V> {
        ChatController { view, backend }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Renders `raw_input` as a user message and posts it to the backend.
    ///
    /// Whitespace-only input is ignored. The request is already in flight when
    /// this returns and is not cancelled if the returned future is dropped;
    /// the reply is only rendered while that future is being polled.
    pub fn submit(&self, raw_input: &str) -> Option<PendingReply> {
        if raw_input.trim().is_empty() {
            return None;
        }

        self.render(Sender::User, raw_input);
        self.view.clear_input();

        let backend = self.backend.clone();
        let request = ChatRequest {
            user_input: raw_input.to_string(),
        };
        let in_flight = tokio::spawn(async move { backend.send(request).await });

        let controller = self.clone();
        let pending = async move {
            let outcome = in_flight
                .await
                .unwrap_or_else(|err| Err(ChatError::from(err)));
            match outcome {
                Ok(reply) => Ok(controller.on_response(reply)),
                Err(err) => {
                    error!(error = %err, "chat exchange failed");
                    Err(err)
                }
            }
        };
        Some(pending.boxed_local())
    }

    /// Submits whatever the input field currently holds.
    pub fn send_draft(&self) -> Option<PendingReply> {
        self.submit(&self.view.input())
    }

    pub fn on_response(&self, reply: ChatReply) -> Message {
        self.render(Sender::Chatbot, reply.chatbot_response)
    }

    pub fn on_key(&self, key: &Key) -> Option<PendingReply> {
        match key {
            Key::Enter => self.send_draft(),
            _ => None,
        }
    }

    pub fn render(&self, sender: Sender, text: impl Into<String>) -> Message {
        let message = Message::new(sender, text);
        self.view.append(message.clone());
        self.view.scroll_to_bottom();
        message
    }
}
