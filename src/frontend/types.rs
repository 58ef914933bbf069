#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Chatbot,
}

impl Sender {
    /// Styling variant of a transcript entry.
    pub fn css_class(self) -> &'static str {
        match self {
            Sender::User => "user-message",
            Sender::Chatbot => "chatbot-message",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You:",
            Sender::Chatbot => "Chatbot:",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Message {
        Message {
            sender,
            text: text.into(),
        }
    }
}

/// Rendered chat messages in arrival order. Entries are only ever appended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Transcript {
        Transcript::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_variants() {
        assert_eq!(Sender::User.css_class(), "user-message");
        assert_eq!(Sender::Chatbot.css_class(), "chatbot-message");
        assert_eq!(Sender::User.label(), "You:");
        assert_eq!(Sender::Chatbot.label(), "Chatbot:");
    }

    #[test]
    fn test_transcript_keeps_arrival_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());

        transcript.append(Message::new(Sender::User, "Hi"));
        transcript.append(Message::new(Sender::Chatbot, "Hello back"));

        let texts: Vec<_> = transcript.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["Hi", "Hello back"]);
        assert_eq!(transcript.last().map(|m| m.sender), Some(Sender::Chatbot));
    }
}
