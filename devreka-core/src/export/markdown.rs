//! Markdown export of a conversation

use super::ExportError;
use crate::llm::Role;
use crate::session::ConversationHistory;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MARKDOWN_FILE_NAME: &str = "devreka-idea-conversation.md";

/// Render the visible conversation: the idea under its own heading, every
/// other message as a labelled paragraph.
pub fn render_markdown(history: &ConversationHistory) -> String {
    let mut markdown = String::from("# Devreka! Ideas Conversation\n\n");

    let transcript = history.transcript();
    let idea_index = transcript.iter().position(|m| m.role == Role::Assistant);

    for (index, message) in transcript.iter().enumerate() {
        if Some(index) == idea_index {
            markdown.push_str("## Your Next Big Idea:\n\n");
            markdown.push_str(&message.content);
            markdown.push_str("\n\n");
            continue;
        }

        let label = match message.role {
            Role::User => "You",
            Role::Assistant => "AI",
        };
        markdown.push_str(&format!("**{}:** {}\n\n", label, message.content));
    }

    markdown
}

/// Write the conversation as Markdown into `directory`
pub fn export_markdown(
    history: &ConversationHistory,
    directory: &Path,
) -> Result<PathBuf, ExportError> {
    if history.transcript().is_empty() {
        return Err(ExportError::Empty);
    }

    let path = directory.join(MARKDOWN_FILE_NAME);
    std::fs::write(&path, render_markdown(history))?;
    info!("Exported Markdown to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMPT: &str = "Act as an expert business strategist";

    fn conversation() -> ConversationHistory {
        let mut history = ConversationHistory::new();
        history.reset_with_prompt(PROMPT);
        history.push_assistant("# Plant Radar\nSensors for balcony gardens 🌱");
        history.push_user("What stack?");
        history.push_assistant("Rust and SQLite.");
        history
    }

    #[test]
    fn test_render_layout() {
        let markdown = render_markdown(&conversation());
        assert_eq!(
            markdown,
            "# Devreka! Ideas Conversation\n\n\
             ## Your Next Big Idea:\n\n\
             # Plant Radar\nSensors for balcony gardens 🌱\n\n\
             **You:** What stack?\n\n\
             **AI:** Rust and SQLite.\n\n"
        );
    }

    #[test]
    fn test_never_includes_synthetic_prompt() {
        let markdown = render_markdown(&conversation());
        assert!(!markdown.contains(PROMPT));
        assert_eq!(markdown.matches("Plant Radar").count(), 1);
    }

    #[test]
    fn test_export_writes_fixed_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let history = conversation();

        let path = export_markdown(&history, dir.path()).unwrap();
        assert_eq!(path, dir.path().join(MARKDOWN_FILE_NAME));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), render_markdown(&history));
        assert_eq!(history.len(), 4);
    }

    #[test]
    fn test_export_refuses_prompt_only_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = ConversationHistory::new();
        history.reset_with_prompt(PROMPT);

        assert!(matches!(export_markdown(&history, dir.path()), Err(ExportError::Empty)));
        assert!(!dir.path().join(MARKDOWN_FILE_NAME).exists());
    }
}
