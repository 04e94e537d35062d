//! Conversation log for one idea session

use crate::llm::{Message, Role};

/// Ordered, append-only log of the messages exchanged with the model.
///
/// The whole log is replayed to the engine on every chat turn. When the log
/// was seeded by an idea generation, its first entry is the synthetic prompt,
/// which never shows up in exports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHistory {
    messages: Vec<Message>,
    seeded: bool,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and start over from the generation prompt
    pub fn reset_with_prompt(&mut self, prompt: impl Into<String>) {
        self.messages.clear();
        self.messages.push(Message::user(prompt));
        self.seeded = true;
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Every message, synthetic prompt included, in turn order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages a person should see: everything but the synthetic prompt
    pub fn transcript(&self) -> &[Message] {
        if self.seeded { &self.messages[1..] } else { &self.messages }
    }

    /// First assistant reply of the session, i.e. the generated idea
    pub fn idea(&self) -> Option<&Message> {
        self.transcript().iter().find(|m| m.role == Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_keeps_only_prompt() {
        let mut history = ConversationHistory::new();
        history.push_user("stale");
        history.push_assistant("stale reply");

        history.reset_with_prompt("Act as a strategist");
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0], Message::user("Act as a strategist"));
        assert!(history.transcript().is_empty());
    }

    #[test]
    fn test_transcript_skips_synthetic_prompt() {
        let mut history = ConversationHistory::new();
        history.reset_with_prompt("prompt");
        history.push_assistant("idea");
        history.push_user("question");

        let transcript = history.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].content, "idea");
        assert_eq!(history.messages()[0].content, "prompt");
        assert_eq!(history.idea().map(|m| m.content.as_str()), Some("idea"));
    }

    #[test]
    fn test_unseeded_history_is_fully_visible() {
        let mut history = ConversationHistory::new();
        history.push_user("hello");
        assert_eq!(history.transcript(), history.messages());
        assert!(history.idea().is_none());
    }
}
