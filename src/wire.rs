//! JSON bodies exchanged between the chat widget and `POST /chat`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub user_input: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub chatbot_response: String,
}

impl ChatReply {
    pub fn new(text: impl Into<String>) -> ChatReply {
        ChatReply {
            chatbot_response: text.into(),
        }
    }
}
