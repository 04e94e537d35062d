//! Terminal rendering of an idea session

use devreka_core::session::{ProgressTracker, ProgressUpdate, QuoteRotator, SessionView};
use devreka_core::llm::{LoadProgress, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

const QUOTE_INTERVAL: Duration = Duration::from_secs(2);
const TICK_INTERVAL: Duration = Duration::from_millis(120);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Loading indicator shared by the session view and the engine progress sink.
///
/// While running, the message line cycles through motivational quotes and the
/// prefix shows the latest loading status.
#[derive(Clone, Default)]
pub struct Spinner {
    bar: Arc<Mutex<Option<ProgressBar>>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the indicator; no-op when already shown
    pub fn start(&self) {
        let mut slot = lock(&self.bar);
        if slot.is_some() {
            return;
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.dim} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(TICK_INTERVAL);

        let mut quotes = QuoteRotator::new();
        bar.set_message(quotes.next_quote());

        let ticking = bar.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(QUOTE_INTERVAL);
            interval.tick().await;
            loop {
                interval.tick().await;
                ticking.set_message(quotes.next_quote());
            }
        });

        *slot = Some(bar);
        *lock(&self.ticker) = Some(handle);
    }

    /// Status line next to the quote
    pub fn set_status(&self, status: &str) {
        if let Some(bar) = lock(&self.bar).as_ref() {
            bar.set_prefix(status.to_string());
        }
    }

    /// Hide the indicator and stop rotating quotes
    pub fn stop(&self) {
        if let Some(handle) = lock(&self.ticker).take() {
            handle.abort();
        }
        if let Some(bar) = lock(&self.bar).take() {
            bar.finish_and_clear();
        }
    }

    /// Progress sink feeding engine loading reports into this indicator
    pub fn progress_sink(&self, expected_engines: usize) -> ProgressSink {
        let spinner = self.clone();
        let tracker = ProgressTracker::new(expected_engines);
        Arc::new(move |report: LoadProgress| match tracker.observe(&report) {
            ProgressUpdate::Show(text) => spinner.set_status(&text),
            ProgressUpdate::Finished => spinner.stop(),
            ProgressUpdate::Suppressed => {}
        })
    }
}

/// What the last streamed render belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    None,
    Idea,
    Reply,
    MetaPrompt,
}

/// `SessionView` writing to stdout, with the indicator on stderr
pub struct TerminalView {
    spinner: Spinner,
    target: Target,
    printed: usize,
    generate_label: String,
    send_enabled: bool,
}

impl TerminalView {
    pub fn new(spinner: Spinner) -> Self {
        Self {
            spinner,
            target: Target::None,
            printed: 0,
            generate_label: "Generate Idea".to_string(),
            send_enabled: false,
        }
    }

    pub fn generate_label(&self) -> &str {
        &self.generate_label
    }

    /// Input prompt; without an idea only commands such as `/new` are useful
    pub fn input_prompt(&self) -> &'static str {
        if self.send_enabled { "> " } else { "devreka> " }
    }

    fn begin(&mut self, target: Target, header: Option<&str>) {
        self.finish_line();
        self.target = target;
        self.printed = 0;
        if let Some(header) = header {
            println!("{}", header);
        }
    }

    /// Print whatever part of `buffer` has not been printed yet
    fn render(&mut self, target: Target, buffer: &str) {
        if self.target != target {
            self.begin(target, None);
        }
        self.spinner.stop();

        // Buffers only grow within one render; anything else starts over.
        let fresh = if buffer.is_char_boundary(self.printed) {
            &buffer[self.printed..]
        } else {
            println!();
            buffer
        };

        print!("{}", fresh);
        let _ = std::io::stdout().flush();
        self.printed = buffer.len();
    }

    fn finish_line(&mut self) {
        if self.printed > 0 {
            println!();
        }
        self.printed = 0;
        self.target = Target::None;
    }
}

impl SessionView for TerminalView {
    fn set_busy(&mut self, busy: bool) {
        if busy {
            self.spinner.start();
        } else {
            self.spinner.stop();
        }
    }

    fn set_generate_label(&mut self, label: &str) {
        self.generate_label = label.to_string();
    }

    fn reset_result(&mut self) {
        self.finish_line();
        self.send_enabled = false;
    }

    fn render_idea(&mut self, markdown: &str) {
        if self.target != Target::Idea {
            self.begin(Target::Idea, Some("\n== Your Next Big Idea ==\n"));
        }
        self.render(Target::Idea, markdown);
    }

    fn show_idea_error(&mut self, message: &str) {
        self.finish_line();
        eprintln!("{}", message);
    }

    fn idea_ready(&mut self, _idea: &str) {
        self.finish_line();
        self.send_enabled = true;
    }

    fn chat_user(&mut self, text: &str) {
        self.finish_line();
        println!("You: {}", text);
    }

    fn chat_reply_started(&mut self) {
        self.begin(Target::Reply, None);
        print!("AI: ");
        let _ = std::io::stdout().flush();
    }

    fn render_chat_reply(&mut self, markdown: &str) {
        self.render(Target::Reply, markdown);
    }

    fn chat_error(&mut self, message: &str) {
        self.finish_line();
        eprintln!("AI: {}", message);
    }

    fn set_send_enabled(&mut self, enabled: bool) {
        self.send_enabled = enabled;
        if enabled {
            self.finish_line();
        }
    }

    fn set_typing(&mut self, visible: bool) {
        if visible {
            self.spinner.start();
            self.spinner.set_status("AI is typing...");
        } else {
            self.spinner.stop();
        }
    }

    fn meta_prompt_started(&mut self) {
        self.begin(Target::MetaPrompt, Some("\n== Prompt for your coding assistant ==\n"));
    }

    fn render_meta_prompt(&mut self, text: &str) {
        self.render(Target::MetaPrompt, text);
    }

    fn notify(&mut self, message: &str) {
        self.finish_line();
        eprintln!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spinner_start_stop_is_idempotent() {
        let spinner = Spinner::new();
        spinner.start();
        spinner.start();
        spinner.set_status("loading");
        spinner.stop();
        spinner.stop();
        assert!(lock(&spinner.bar).is_none());
        assert!(lock(&spinner.ticker).is_none());
    }

    #[tokio::test]
    async fn test_progress_sink_hides_spinner_after_all_engines() {
        let spinner = Spinner::new();
        spinner.start();
        let sink = spinner.progress_sink(2);

        sink(LoadProgress::new("Finish loading", Some(1.0)));
        assert!(lock(&spinner.bar).is_some());

        sink(LoadProgress::new("Finish loading", Some(1.0)));
        assert!(lock(&spinner.bar).is_none());
    }

    #[tokio::test]
    async fn test_view_tracks_labels_and_send_state() {
        let mut view = TerminalView::new(Spinner::new());
        assert_eq!(view.generate_label(), "Generate Idea");
        assert!(!view.send_enabled);

        view.render_idea("Hel");
        assert_eq!(view.printed, 3);
        view.render_idea("Hello");
        assert_eq!(view.printed, 5);
        view.idea_ready("Hello");
        view.set_generate_label("Generate Another Idea");

        assert_eq!(view.generate_label(), "Generate Another Idea");
        assert!(view.send_enabled);
        assert_eq!(view.input_prompt(), "> ");
        assert_eq!(view.printed, 0);
    }

    #[tokio::test]
    async fn test_failed_idea_still_prompts_for_commands() {
        let mut view = TerminalView::new(Spinner::new());
        view.set_busy(true);
        view.reset_result();
        view.show_idea_error("There was an error generating the idea. Please try again.");
        view.set_busy(false);

        assert!(!view.send_enabled);
        assert_eq!(view.input_prompt(), "devreka> ");
    }
}
