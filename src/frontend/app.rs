use std::sync::Arc;

use dioxus::prelude::*;

use super::client::ChatBackend;
use super::components::*;
use super::controller::{ChatController, PendingReply};
use super::types::{Message, Transcript};
use super::view::ChatView;

/// Element id of the transcript container; the page script scrolls it.
pub const TRANSCRIPT_ID: &str = "chat-messages";

pub struct AppProps {
    pub backend: Arc<dyn ChatBackend>,
}

/// `ChatView` over the component's state. Every change schedules a re-render.
#[derive(Clone)]
pub struct LiveChatView {
    transcript: UseRef<Transcript>,
    draft: UseRef<String>,
    scroll_requests: UseRef<u64>,
}

impl ChatView for LiveChatView {
    fn input(&self) -> String {
        self.draft.read().clone()
    }

    fn clear_input(&self) {
        self.draft.set(String::new());
    }

    fn append(&self, message: Message) {
        self.transcript.write().append(message);
    }

    fn scroll_to_bottom(&self) {
        self.scroll_requests.with_mut(|n| *n = n.wrapping_add(1));
    }
}

pub fn app(cx: Scope<AppProps>) -> Element {
    let transcript = use_ref(cx, Transcript::new);
    let draft = use_ref(cx, String::new);
    let scroll_requests = use_ref(cx, || 0u64);

    let controller = ChatController::new(
        LiveChatView {
            transcript: transcript.clone(),
            draft: draft.clone(),
            scroll_requests: scroll_requests.clone(),
        },
        cx.props.backend.clone(),
    );

    let await_reply = move |pending: PendingReply| {
        cx.spawn(async move {
            // failures are logged by the controller
            _ = pending.await;
        });
    };

    let send_enter = {
        to_owned![controller];
        move |e: Event<KeyboardData>| {
            if let Some(pending) = controller.on_key(&e.data.key()) {
                await_reply(pending);
            }
        }
    };

    let send_button = move |_| {
        if let Some(pending) = controller.send_draft() {
            await_reply(pending);
        }
    };

    let scroll_epoch = *scroll_requests.read();

    cx.render(rsx!(
        style { include_str!("./style.css") }
        div {
            id: "header",
            h1 {"Clinic assistant"}
            h2 {"Ask a question, or book an appointment"}
        }
        div {
            id: "{TRANSCRIPT_ID}",
            class: "chat-messages",
            "data-scroll": "{scroll_epoch}",
            for (index, message) in transcript.read().iter().enumerate() {
                ChatEntry { key: "{index}", message: message.clone() }
            }
        }
        div {
            id: "input-area",
            ChatInput {
                draft: draft,
                on_key: send_enter,
            }
            button {
                id: "send-button",
                onclick: send_button, "Send" }
        }
    ))
}
