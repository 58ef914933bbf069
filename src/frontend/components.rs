#![allow(non_snake_case)]

use dioxus::prelude::*;

use super::types::Message;

#[derive(PartialEq, Props)]
pub struct EntryProps {
    message: Message,
}

/// One transcript entry. Text is rendered as a text node, never as markup.
pub fn ChatEntry(cx: Scope<EntryProps>) -> Element {
    let sender = cx.props.message.sender;
    let class = sender.css_class();
    let label = sender.label();
    let text = &cx.props.message.text;
    cx.render(rsx!(
        div {
            class: "chat-message {class}",
            strong { "{label}" }
            " {text}"
        }
    ))
}

#[derive(Props)]
pub struct ChatInputProps<'a> {
    draft: &'a UseRef<String>,
    on_key: EventHandler<'a, Event<KeyboardData>>,
}

pub fn ChatInput<'a>(cx: Scope<'a, ChatInputProps<'a>>) -> Element<'a> {
    let draft = cx.props.draft;
    let value = draft.read().clone();
    cx.render(rsx!(input {
        id: "chat-input",
        r#type: "text",
        placeholder: "Type your message here",
        value: "{value}",
        oninput: move |e: Event<FormData>| {
            draft.set(e.value.clone());
        },
        onkeydown: move |e: Event<KeyboardData>| {
            cx.props.on_key.call(e);
        },
    }))
}
