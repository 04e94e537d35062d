use clap::{Parser, Subcommand};
use devreka_core::session::{Difficulty, IdeaType, Speed};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "devreka",
    version,
    about = "Devreka - project ideas from a local language model",
    long_about = "Devreka asks a locally running model for an original software project idea, lets you chat about it, and exports the conversation to Markdown, PDF or a prompt for a coding assistant."
)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an idea and chat about it
    #[command(about = "Generate a project idea, then chat about it and export it")]
    Generate(GenerateArgs),

    /// Show or create the configuration file
    #[command(about = "Print the effective configuration or write a default one")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Kind of developer the idea targets
    #[arg(
        long,
        help = "Idea type: frontend, backend, fullstack, mobile, games, data-ai"
    )]
    pub idea_type: Option<IdeaType>,

    /// Implementation difficulty
    #[arg(long, help = "Difficulty: easy, medium, hard")]
    pub difficulty: Option<Difficulty>,

    /// Response speed
    #[arg(long, help = "Response speed: quick (short replies) or detailed (longer replies)")]
    pub speed: Option<Speed>,

    /// Exit after the idea instead of starting the chat
    #[arg(long, help = "Print the idea and exit without starting the chat")]
    pub no_chat: bool,

    /// Directory for exported files
    #[arg(long, help = "Directory exports are written to (overrides the config file)")]
    pub export_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Write a default configuration file
    #[arg(long, help = "Write the default configuration to the config path")]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "devreka",
            "-v",
            "generate",
            "--idea-type",
            "mobile",
            "--difficulty",
            "hard",
            "--speed",
            "detailed",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.idea_type, Some(IdeaType::Mobile));
                assert_eq!(args.difficulty, Some(Difficulty::Hard));
                assert_eq!(args.speed, Some(Speed::Detailed));
                assert!(!args.no_chat);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_choice() {
        let result = Cli::try_parse_from(["devreka", "generate", "--speed", "slow"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_force_requires_init() {
        assert!(Cli::try_parse_from(["devreka", "config", "--force"]).is_err());
        assert!(Cli::try_parse_from(["devreka", "config", "--init", "--force"]).is_ok());
    }
}
