//! Presentation surface driven by an idea session
//!
//! The session never prints or draws anything itself. Front-ends implement
//! `SessionView` and receive every state change as a call.

/// Surface the session renders into
pub trait SessionView: Send {
    /// Loading indicator on/off; while busy the generate control is disabled
    fn set_busy(&mut self, busy: bool);

    /// Label of the generate control
    fn set_generate_label(&mut self, label: &str);

    /// Clear the previous idea, hide the chat and the export controls
    fn reset_result(&mut self);

    /// Re-render the idea being generated with the full text so far
    fn render_idea(&mut self, markdown: &str);

    /// Inline error in place of the idea
    fn show_idea_error(&mut self, message: &str);

    /// The idea is complete: echo it into the chat, reveal chat and exports
    fn idea_ready(&mut self, idea: &str);

    /// Append a message typed by the user to the chat
    fn chat_user(&mut self, text: &str);

    /// Open a fresh container for the assistant reply
    fn chat_reply_started(&mut self);

    /// Re-render the assistant reply with the full text so far
    fn render_chat_reply(&mut self, markdown: &str);

    /// Append an error message to the chat
    fn chat_error(&mut self, message: &str);

    fn set_send_enabled(&mut self, enabled: bool);

    fn set_typing(&mut self, visible: bool);

    /// Show and clear the read-only meta-prompt panel
    fn meta_prompt_started(&mut self);

    /// Re-render the meta-prompt panel with the full text so far
    fn render_meta_prompt(&mut self, text: &str);

    /// User-facing notice, e.g. a validation message
    fn notify(&mut self, message: &str);
}
