//! Submission lifecycle state and the events the background worker emits.

use eframe::egui;

use crate::client::PredictionResult;
use crate::error::AppError;

/// Where the current submission stands.
///
/// Exactly one submission can be in flight at a time; terminal states stay on
/// screen until the next submission replaces them.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum UiState {
    /// No submission yet, or the last one was cleared by a new trigger.
    #[default]
    Idle,
    /// A request is on the wire; inputs and the trigger are disabled.
    InFlight,
    /// The server returned a diagnosis.
    Succeeded(PredictionResult),
    /// The submission failed; holds the user-facing message.
    Failed(String),
}

impl UiState {
    pub fn in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    /// Attempts to start a submission.
    ///
    /// Returns false without changing state when one is already in flight,
    /// which makes a double trigger a no-op.
    pub fn begin_submission(&mut self) -> bool {
        if self.in_flight() {
            return false;
        }
        *self = Self::InFlight;
        true
    }
}

/// Messages sent from background threads back to the UI thread.
pub(crate) enum WorkerEvent {
    /// The submission reached a terminal state.
    Outcome(Result<PredictionResult, AppError>),
    /// A preview image finished decoding.
    Preview {
        generation: u64,
        image: egui::ColorImage,
    },
    /// A preview could not be loaded; the message replaces the preview area.
    PreviewFailed { generation: u64, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_trigger_is_a_no_op() {
        let mut state = UiState::Idle;
        assert!(state.begin_submission());
        assert!(!state.begin_submission());
        assert_eq!(state, UiState::InFlight);
    }

    #[test]
    fn terminal_states_allow_a_new_submission() {
        let mut state = UiState::Failed("server error 503".into());
        assert!(state.begin_submission());
        assert!(state.in_flight());
    }
}
