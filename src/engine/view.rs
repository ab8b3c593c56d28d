use crate::core::StatusMessage;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingWizardView {
    pub identifier: String,
    pub title: String,
    pub explanation: String,
    pub render_next_button: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingReport {
    pub pending: Vec<PendingWizardView>,
    /// Visited wizards that no longer need to run.
    pub done: Vec<String>,
    pub total: usize,
    pub percent_complete: u8,
    pub needs_initial_schema: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOutcome {
    Listed(PendingReport),
    /// Nothing to list; carries the warning to show instead.
    NoWizards(StatusMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptView {
    pub identifier: String,
    pub title: String,
    /// Opaque form fragment owned by the wizard; empty without an input form.
    pub form: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateState {
    Validating,
    Executing,
    Done,
    Rejected,
    Failed,
}

impl UpdateState {
    pub fn is_terminal(self) -> bool {
        matches!(self, UpdateState::Done | UpdateState::Rejected | UpdateState::Failed)
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdateState::Validating => "validating",
            UpdateState::Executing => "executing",
            UpdateState::Done => "done",
            UpdateState::Rejected => "rejected",
            UpdateState::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    pub identifier: String,
    pub title: String,
    pub state: UpdateState,
    /// Wizard to offer next, `None` when the upgrade path is complete.
    pub next_identifier: Option<String>,
}

impl UpdateReport {
    pub fn input_broken(&self) -> bool {
        self.state == UpdateState::Rejected
    }
}
