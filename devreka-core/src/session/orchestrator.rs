//! Idea generation, follow-up chat and meta-prompt turns

use super::conversation::ConversationHistory;
use super::engines::{ActiveEngine, EnginePool, Speed};
use super::errors::{SessionError, SessionResult};
use super::prompts::{self, Difficulty, IdeaType};
use super::view::SessionView;
use crate::llm::{ChunkStream, CompletionOptions, LLMError, Message};
use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const IDEA_ERROR: &str = "There was an error generating the idea. Please try again.";
const CHAT_ERROR: &str = "There was an error answering. Please try again.";
const META_PROMPT_ERROR: &str = "There was an error generating the prompt for the AI.";
const GENERATE_AGAIN_LABEL: &str = "Generate Another Idea";

/// Where a turn currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingEngines,
    Requesting,
    Streaming,
    Completed,
    Failed,
}

/// Where a streamed reply is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Idea,
    Chat,
    MetaPrompt,
}

/// Raw option selections; every group must be chosen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaSelection {
    pub idea_type: Option<IdeaType>,
    pub difficulty: Option<Difficulty>,
    pub speed: Option<Speed>,
}

/// Validated options for one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdeaOptions {
    pub idea_type: IdeaType,
    pub difficulty: Difficulty,
    pub speed: Speed,
}

impl IdeaSelection {
    pub fn validate(&self) -> SessionResult<IdeaOptions> {
        Ok(IdeaOptions {
            idea_type: self.idea_type.ok_or_else(|| SessionError::missing("idea type"))?,
            difficulty: self.difficulty.ok_or_else(|| SessionError::missing("difficulty"))?,
            speed: self.speed.ok_or_else(|| SessionError::missing("response speed"))?,
        })
    }
}

/// Fold a reply stream into one buffer, handing the buffer to `on_update`
/// after every fragment.
pub async fn fold_stream(
    mut stream: ChunkStream,
    mut on_update: impl FnMut(&str),
) -> Result<String, LLMError> {
    let mut buffer = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        buffer.push_str(chunk.text());
        on_update(&buffer);
    }
    Ok(buffer)
}

/// One user's idea session: conversation, engine selection and turns
pub struct IdeaSession {
    engines: Arc<EnginePool>,
    history: ConversationHistory,
    active: Option<ActiveEngine>,
    speed: Option<Speed>,
    language: String,
    meta_prompt: Option<String>,
    state: TurnState,
}

impl IdeaSession {
    pub fn new(engines: Arc<EnginePool>, language: impl Into<String>) -> Self {
        Self {
            engines,
            history: ConversationHistory::new(),
            active: None,
            speed: None,
            language: language.into(),
            meta_prompt: None,
            state: TurnState::Idle,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn active_engine(&self) -> Option<&ActiveEngine> {
        self.active.as_ref()
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Last generated meta-prompt
    pub fn meta_prompt(&self) -> Option<&str> {
        self.meta_prompt.as_deref()
    }

    /// Speed preference used by the next chat turn
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = Some(speed);
    }

    /// Generate a fresh idea, replacing the whole conversation.
    pub async fn generate(
        &mut self,
        selection: &IdeaSelection,
        view: &mut dyn SessionView,
    ) -> SessionResult<()> {
        let options = match selection.validate() {
            Ok(options) => options,
            Err(e) => {
                view.notify(&e.to_string());
                return Err(e);
            }
        };
        self.speed = Some(options.speed);

        if !self.engines.is_ready() {
            debug!("Engines not loaded yet, waiting");
            self.state = TurnState::AwaitingEngines;
            view.set_busy(true);
        }
        let engine = match self.engines.select(options.speed).await {
            Ok(engine) => engine,
            Err(e) => {
                error!("Engines unavailable: {}", e);
                view.set_busy(false);
                let err = SessionError::EnginesUnavailable(e);
                view.show_idea_error(&err.to_string());
                self.state = TurnState::Idle;
                return Err(err);
            }
        };
        self.active = Some(engine.clone());

        view.reset_result();
        view.set_busy(true);

        let prompt = prompts::idea_prompt(options.idea_type, options.difficulty, &self.language);
        self.history.reset_with_prompt(prompt);
        self.meta_prompt = None;

        info!(
            "Generating {} idea ({}) with {}",
            options.idea_type,
            options.difficulty,
            engine.handle.model()
        );

        let messages = self.history.messages().to_vec();
        let result =
            self.run_turn(&engine, messages, Some(engine.max_length), view, Panel::Idea).await;

        let outcome = match result {
            Ok(reply) => {
                self.history.push_assistant(reply.clone());
                view.idea_ready(&reply);
                Ok(())
            }
            Err(e) => {
                error!("Error during generation: {}", e);
                view.show_idea_error(IDEA_ERROR);
                Err(SessionError::Generation(e))
            }
        };

        view.set_busy(false);
        view.set_generate_label(GENERATE_AGAIN_LABEL);
        self.state = TurnState::Idle;
        outcome
    }

    /// Send a follow-up chat message.
    ///
    /// Returns `Ok(false)` without doing anything when the message is blank or
    /// no idea has been generated yet.
    pub async fn send_message(
        &mut self,
        text: &str,
        view: &mut dyn SessionView,
    ) -> SessionResult<bool> {
        let message = text.trim();
        let Some(current) = self.active.clone() else {
            return Ok(false);
        };
        if message.is_empty() {
            return Ok(false);
        }

        view.chat_user(message);
        self.history.push_user(message);
        view.set_send_enabled(false);
        view.set_typing(true);

        let speed = self.speed.unwrap_or(current.speed);
        let outcome = match self.engines.select(speed).await {
            Ok(engine) => {
                self.active = Some(engine.clone());
                let messages = self.history.messages().to_vec();
                self.run_turn(&engine, messages, Some(engine.max_length), view, Panel::Chat).await
            }
            Err(e) => Err(e),
        };

        let outcome = match outcome {
            Ok(reply) => {
                self.history.push_assistant(reply);
                Ok(true)
            }
            Err(e) => {
                error!("Error during chat: {}", e);
                view.chat_error(CHAT_ERROR);
                Err(SessionError::Generation(e))
            }
        };

        view.set_send_enabled(true);
        view.set_typing(false);
        self.state = TurnState::Idle;
        outcome
    }

    /// Turn the generated idea into a prompt for a coding assistant.
    ///
    /// The exchange is shown in the meta-prompt panel only; the conversation
    /// is left untouched.
    pub async fn generate_meta_prompt(
        &mut self,
        view: &mut dyn SessionView,
    ) -> SessionResult<String> {
        let (engine, idea) = match (&self.active, self.history.idea()) {
            (Some(engine), Some(idea)) if self.history.len() >= 2 => {
                (engine.clone(), idea.content.clone())
            }
            _ => {
                warn!("Meta-prompt requested before an idea exists");
                view.notify("Generate an idea first.");
                return Err(SessionError::NoIdea);
            }
        };

        view.set_busy(true);
        view.meta_prompt_started();
        self.meta_prompt = None;

        let messages = vec![Message::user(prompts::meta_prompt(&idea, &self.language))];
        let result = self.run_turn(&engine, messages, None, view, Panel::MetaPrompt).await;

        let outcome = match result {
            Ok(text) => {
                self.meta_prompt = Some(text.clone());
                Ok(text)
            }
            Err(e) => {
                error!("Error generating the meta-prompt: {}", e);
                view.render_meta_prompt(META_PROMPT_ERROR);
                Err(SessionError::Generation(e))
            }
        };

        view.set_busy(false);
        self.state = TurnState::Idle;
        outcome
    }

    /// Request a streamed reply and fold it into `panel`, tracking the turn state
    async fn run_turn(
        &mut self,
        engine: &ActiveEngine,
        messages: Vec<Message>,
        max_length: Option<usize>,
        view: &mut dyn SessionView,
        panel: Panel,
    ) -> Result<String, LLMError> {
        self.state = TurnState::Requesting;
        let stream = engine
            .handle
            .complete_stream(messages, CompletionOptions::with_max_tokens(max_length))
            .await;

        let result = match stream {
            Ok(stream) => {
                self.state = TurnState::Streaming;
                if panel == Panel::Chat {
                    view.chat_reply_started();
                }
                fold_stream(stream, |buffer| match panel {
                    Panel::Idea => view.render_idea(buffer),
                    Panel::Chat => view.render_chat_reply(buffer),
                    Panel::MetaPrompt => view.render_meta_prompt(buffer),
                })
                .await
            }
            Err(e) => Err(e),
        };

        self.state = if result.is_ok() { TurnState::Completed } else { TurnState::Failed };
        result
    }
}
