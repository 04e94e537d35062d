//! Loading progress interpretation

use crate::llm::{LoadProgress, LOAD_COMPLETE_TEXT};
use std::sync::Mutex;

/// What the loading indicator should do with one report
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// Show this status line
    Show(String),
    /// Every engine is loaded; hide the indicator
    Finished,
    /// Loading already finished; ignore the report
    Suppressed,
}

/// Turns raw engine reports into indicator updates.
///
/// Each engine sends the completion sentinel once. After the last expected
/// sentinel the tracker reports `Finished` exactly once and swallows every
/// later report.
#[derive(Debug)]
pub struct ProgressTracker {
    expected: usize,
    state: Mutex<TrackerState>,
}

#[derive(Debug, Default)]
struct TrackerState {
    loaded: usize,
    finished: bool,
}

impl ProgressTracker {
    pub fn new(expected: usize) -> Self {
        Self { expected: expected.max(1), state: Mutex::new(TrackerState::default()) }
    }

    pub fn observe(&self, report: &LoadProgress) -> ProgressUpdate {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if state.finished {
            return ProgressUpdate::Suppressed;
        }

        if report.text == LOAD_COMPLETE_TEXT {
            state.loaded += 1;
            if state.loaded >= self.expected {
                state.finished = true;
                return ProgressUpdate::Finished;
            }
            return ProgressUpdate::Show(format!(
                "{} of {} engines ready",
                state.loaded, self.expected
            ));
        }

        ProgressUpdate::Show(format_report(report))
    }
}

/// Status line for a report: measurable stages get a percentage
pub fn format_report(report: &LoadProgress) -> String {
    match report.progress {
        Some(progress) if progress > 0.0 && progress < 1.0 => {
            format!("{} ({:.2}%)", report.text, progress * 100.0)
        }
        _ => report.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_report() {
        let report = LoadProgress::new("Fetching weights", Some(0.4567));
        assert_eq!(format_report(&report), "Fetching weights (45.67%)");

        let report = LoadProgress::new("Checking cache", None);
        assert_eq!(format_report(&report), "Checking cache");

        let report = LoadProgress::new("Done fetching", Some(1.0));
        assert_eq!(format_report(&report), "Done fetching");
    }

    #[test]
    fn test_sentinel_finishes_once_and_suppresses_rest() {
        let tracker = ProgressTracker::new(2);
        let done = LoadProgress::new(LOAD_COMPLETE_TEXT, Some(1.0));

        assert_eq!(
            tracker.observe(&done),
            ProgressUpdate::Show("1 of 2 engines ready".to_string())
        );

        assert_eq!(tracker.observe(&done), ProgressUpdate::Finished);

        let late = LoadProgress::new("Loading shards", Some(0.5));
        assert_eq!(tracker.observe(&late), ProgressUpdate::Suppressed);
        assert_eq!(tracker.observe(&done), ProgressUpdate::Suppressed);
    }
}
