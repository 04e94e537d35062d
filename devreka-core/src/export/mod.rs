//! Conversation exports
//!
//! Markdown and PDF documents built from a `ConversationHistory`. Exports
//! only read the history and always leave out the synthetic prompt.

pub mod blocks;
pub mod markdown;
pub mod pdf;

pub use blocks::{Block, BlockVisitor, lex};
pub use markdown::{MARKDOWN_FILE_NAME, export_markdown, render_markdown};
pub use pdf::{PDF_FILE_NAME, PdfLayout, PdfSurface, PrintPdfSurface, export_pdf, layout_conversation};

use thiserror::Error;

/// Errors raised while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing but the synthetic prompt (or nothing at all) to export
    #[error("Nothing to export yet, generate an idea first")]
    Empty,

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {message}")]
    Pdf { message: String },
}

impl ExportError {
    pub fn pdf(message: impl Into<String>) -> Self {
        Self::Pdf { message: message.into() }
    }
}
