use crate::cli::app::GenerateArgs;
use crate::cli::terminal::{Spinner, TerminalView};
use anyhow::{Context, Result};
use devreka_core::Config;
use devreka_core::export::{export_markdown, export_pdf};
use devreka_core::llm::OllamaFactory;
use devreka_core::session::{EnginePool, IdeaSelection, IdeaSession, SessionError, Speed};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

const HELP: &str = "\
Commands:
  /md               export the conversation to Markdown
  /pdf              export the conversation to PDF
  /prompt           turn the idea into a prompt for a coding assistant
  /copy             copy that prompt to the clipboard
  /speed <s>        switch response speed (quick or detailed)
  /new              generate another idea with the same options
  /help             show this help
  /quit             leave
Anything else is sent to the AI.";

/// One line typed in the chat
#[derive(Debug, Clone, PartialEq, Eq)]
enum ChatCommand {
    Message(String),
    ExportMarkdown,
    ExportPdf,
    MetaPrompt,
    Copy,
    Speed(Speed),
    Regenerate,
    Help,
    Quit,
    Unknown(String),
}

impl ChatCommand {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return Self::Message(line.to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next().unwrap_or(""), parts.next()) {
            ("md", None) => Self::ExportMarkdown,
            ("pdf", None) => Self::ExportPdf,
            ("prompt", None) => Self::MetaPrompt,
            ("copy", None) => Self::Copy,
            ("speed", Some(value)) => match value.parse() {
                Ok(speed) => Self::Speed(speed),
                Err(_) => Self::Unknown(line.to_string()),
            },
            ("new", None) => Self::Regenerate,
            ("help", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Generate an idea, then run the chat loop
pub async fn execute(args: GenerateArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let export_dir = args.export_dir.clone().unwrap_or_else(|| config.export.directory());
    debug!("Using config: {:?}", config);

    let spinner = Spinner::new();
    let factory = Arc::new(OllamaFactory::new(config.ollama.clone())?);
    let pool = Arc::new(EnginePool::new(factory, config.models.clone(), spinner.progress_sink(2)));

    // Start loading right away; the first generation joins this load.
    spinner.start();
    let preload = pool.clone();
    tokio::spawn(async move {
        if let Err(e) = preload.initialize().await {
            warn!("Engine preload failed: {}", e);
        }
    });

    let selection = IdeaSelection {
        idea_type: args.idea_type,
        difficulty: args.difficulty,
        speed: args.speed,
    };

    let mut view = TerminalView::new(spinner.clone());
    let mut session = IdeaSession::new(pool, config.prompt.language.clone());

    let generated = session.generate(&selection, &mut view).await;
    spinner.stop();
    match generated {
        Ok(()) => {}
        Err(e @ (SessionError::MissingSelection { .. } | SessionError::InvalidChoice { .. })) => {
            return Err(e).context("Choose --idea-type, --difficulty and --speed");
        }
        Err(e) => error!("Idea generation failed: {}", e),
    }

    if args.no_chat {
        return Ok(());
    }

    println!("\n💬 Chat about your idea. Type /help for commands.");
    chat_loop(&mut session, &mut view, &selection, &export_dir).await
}

async fn chat_loop(
    session: &mut IdeaSession,
    view: &mut TerminalView,
    selection: &IdeaSelection,
    export_dir: &Path,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut selection = selection.clone();

    loop {
        print!("{}", view.input_prompt());
        std::io::Write::flush(&mut std::io::stdout())?;
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match ChatCommand::parse(&line) {
            ChatCommand::Message(text) => {
                match session.send_message(&text, view).await {
                    Ok(false) if session.active_engine().is_none() => {
                        println!("Generate an idea first with /new.");
                    }
                    Ok(_) => {}
                    Err(e) => debug!("Chat turn failed: {}", e),
                }
            }
            ChatCommand::ExportMarkdown => match export_markdown(session.history(), export_dir) {
                Ok(path) => println!("📝 Saved {}", path.display()),
                Err(e) => eprintln!("❌ {}", e),
            },
            ChatCommand::ExportPdf => match export_pdf(session.history(), export_dir) {
                Ok(path) => println!("📄 Saved {}", path.display()),
                Err(e) => eprintln!("❌ {}", e),
            },
            ChatCommand::MetaPrompt => {
                if session.generate_meta_prompt(view).await.is_ok() {
                    println!("\nUse /copy to copy it to the clipboard.");
                }
            }
            ChatCommand::Copy => copy_meta_prompt(session.meta_prompt()),
            ChatCommand::Speed(speed) => {
                selection.speed = Some(speed);
                session.set_speed(speed);
                println!("Response speed set to {}", speed);
            }
            ChatCommand::Regenerate => {
                println!("🔄 {}", view.generate_label());
                if let Err(e) = session.generate(&selection, view).await {
                    error!("Idea generation failed: {}", e);
                }
            }
            ChatCommand::Help => println!("{}", HELP),
            ChatCommand::Quit => break,
            ChatCommand::Unknown(line) => println!("Unknown command '{}'. Type /help.", line),
        }
    }

    info!("Session finished");
    Ok(())
}

fn copy_meta_prompt(prompt: Option<&str>) {
    let Some(prompt) = prompt else {
        println!("Generate the prompt first with /prompt.");
        return;
    };

    let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(prompt));
    match copied {
        Ok(()) => println!("📋 Prompt copied to the clipboard!"),
        Err(e) => {
            warn!("Clipboard unavailable: {}", e);
            eprintln!("Error copying the prompt to the clipboard.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_message() {
        assert_eq!(
            ChatCommand::parse("  what stack should I use?  "),
            ChatCommand::Message("what stack should I use?".to_string())
        );
        assert_eq!(ChatCommand::parse(""), ChatCommand::Message(String::new()));
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ChatCommand::parse("/md"), ChatCommand::ExportMarkdown);
        assert_eq!(ChatCommand::parse("/pdf"), ChatCommand::ExportPdf);
        assert_eq!(ChatCommand::parse("/prompt"), ChatCommand::MetaPrompt);
        assert_eq!(ChatCommand::parse("/copy"), ChatCommand::Copy);
        assert_eq!(ChatCommand::parse("/new"), ChatCommand::Regenerate);
        assert_eq!(ChatCommand::parse("/exit"), ChatCommand::Quit);
        assert_eq!(ChatCommand::parse("/speed detailed"), ChatCommand::Speed(Speed::Detailed));
    }

    #[test]
    fn test_parse_unknown_commands() {
        assert!(matches!(ChatCommand::parse("/speed warp"), ChatCommand::Unknown(_)));
        assert!(matches!(ChatCommand::parse("/speed"), ChatCommand::Unknown(_)));
        assert!(matches!(ChatCommand::parse("/md now"), ChatCommand::Unknown(_)));
        assert!(matches!(ChatCommand::parse("/dance"), ChatCommand::Unknown(_)));
    }
}
