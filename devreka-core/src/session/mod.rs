//! Idea sessions
//!
//! A session owns the conversation with the model: it builds the idea
//! prompt, picks the engine for each turn, streams replies into a
//! `SessionView` and keeps the history the exports read from.

pub mod conversation;
pub mod engines;
pub mod errors;
pub mod orchestrator;
pub mod progress;
pub mod prompts;
pub mod quotes;
pub mod view;

pub use conversation::ConversationHistory;
pub use engines::{ActiveEngine, EnginePair, EnginePool, Speed};
pub use errors::{SessionError, SessionResult};
pub use orchestrator::{IdeaOptions, IdeaSelection, IdeaSession, TurnState, fold_stream};
pub use progress::{ProgressTracker, ProgressUpdate, format_report};
pub use prompts::{Difficulty, IdeaType};
pub use quotes::QuoteRotator;
pub use view::SessionView;
