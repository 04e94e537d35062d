//! Core functionality for devreka
//!
//! This crate contains the idea session logic: local model engines, the
//! conversation with them, and the exports built from that conversation.

pub mod config;
pub mod export;
pub mod llm;
pub mod session;

pub use config::Config;
