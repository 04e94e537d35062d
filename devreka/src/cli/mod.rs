pub mod app;
pub mod commands;
pub mod terminal;

pub use app::{Cli, Commands};
