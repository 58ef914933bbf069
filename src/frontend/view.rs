use super::types::Message;

/// The two page elements a chat widget drives: the transcript container and
/// the text input field.
///
/// Implementations are cheap handles onto shared view state, so the controller
/// can clone them into the task that waits for a reply.
pub trait ChatView: Clone + 'static {
    /// Current content of the input field.
    fn input(&self) -> String;

    fn clear_input(&self);

    /// Inserts an entry at the end of the transcript container.
    fn append(&self, message: Message);

    /// Moves the transcript container's scroll offset to its full height.
    fn scroll_to_bottom(&self);
}
