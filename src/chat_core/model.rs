use anyhow::{anyhow, Result};
use async_openai::{config::OpenAIConfig, types as openai_types, Client};
use async_trait::async_trait;
use lazy_static::lazy_static;

type Model = openai_types::CreateChatCompletionRequest;
type Message = openai_types::ChatCompletionRequestMessage;
type ModelArgs = openai_types::CreateChatCompletionRequestArgs;
type MessageArgs = openai_types::ChatCompletionRequestMessageArgs;

static SYSTEM_INIT: &str = "You are the assistant of a medical clinic. Answer questions politely and briefly. Users can book an appointment by saying \"book appointment\", list theirs with \"show bookings\" and stop a booking with \"cancel booking\".";

lazy_static! {
    static ref MODEL_INIT: ModelArgs = ModelArgs::default().max_tokens(1024u16).to_owned();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub content: String,
}

impl Turn {
    pub fn new(speaker: Speaker, content: impl Into<String>) -> Turn {
        Turn {
            speaker,
            content: content.into(),
        }
    }
}

/// Produces free-form replies for anything the booking flow doesn't handle.
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    async fn reply(&self, history: &[Turn], input: &str) -> Result<String>;
}

/// OpenAI chat completions. The API key comes from `OPENAI_API_KEY`.
pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiModel {
    pub fn new(model: impl Into<String>) -> OpenAiModel {
        OpenAiModel {
            client: Client::new(),
            model: model.into(),
        }
    }

    fn build_model(&self, history: &[Turn], input: &str) -> Result<Model> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(message(openai_types::Role::System, SYSTEM_INIT)?);
        for turn in history {
            let role = match turn.speaker {
                Speaker::User => openai_types::Role::User,
                Speaker::Assistant => openai_types::Role::Assistant,
            };
            messages.push(message(role, &turn.content)?);
        }
        messages.push(message(openai_types::Role::User, input)?);

        let model = MODEL_INIT
            .to_owned()
            .model(self.model.as_str())
            .messages(messages)
            .build()?;
        Ok(model)
    }
}

fn message(role: openai_types::Role, content: &str) -> Result<Message> {
    Ok(MessageArgs::default().role(role).content(content).build()?)
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn reply(&self, history: &[Turn], input: &str) -> Result<String> {
        let model = self.build_model(history, input)?;
        let choice = self
            .client
            .chat()
            .create(model)
            .await?
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Model returned no choices"))?;
        choice
            .message
            .content
            .ok_or_else(|| anyhow!("Model returned an empty reply"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_system_history_and_input() {
        let model = OpenAiModel::new("gpt-test");
        let history = vec![
            Turn::new(Speaker::User, "hello"),
            Turn::new(Speaker::Assistant, "hi, how can I help?"),
        ];
        let request = model.build_model(&history, "what are your hours?").unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "gpt-test");
        assert_eq!(body["max_tokens"], 1024);
        let roles: Vec<_> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert_eq!(body["messages"][3]["content"], "what are your hours?");
    }
}
