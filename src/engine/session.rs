use super::orchestration::OrchestrationEngine;
use super::view::{PendingOutcome, PendingReport, PromptView, UpdateReport, UpdateState};
use crate::core::{FormValues, Result, StatusMessage, WizardError};
use crate::wizard::{InputCheck, Registry};
use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use tracing::info_span;

const SQL_ERROR: &str = "SQL error";
const GENERIC_REJECTION: &str = "Something went wrong!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    GetUserInput(String),
    PerformUpdate(String),
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::List => write!(f, "list"),
            Mode::GetUserInput(id) => write!(f, "getUserInput({})", id),
            Mode::PerformUpdate(id) => write!(f, "performUpdate({})", id),
        }
    }
}

/// One request against the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub mode: Mode,
    pub values: FormValues,
    pub show_database_queries: bool,
}

impl Invocation {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            values: FormValues::new(),
            show_database_queries: false,
        }
    }

    pub fn list() -> Self {
        Self::new(Mode::List)
    }

    pub fn get_user_input(identifier: impl Into<String>) -> Self {
        Self::new(Mode::GetUserInput(identifier.into()))
    }

    pub fn perform_update(identifier: impl Into<String>) -> Self {
        Self::new(Mode::PerformUpdate(identifier.into()))
    }

    pub fn with_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    pub fn show_database_queries(mut self, show: bool) -> Self {
        self.show_database_queries = show;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SessionView {
    Pending(PendingReport),
    NoWizards,
    Prompt(PromptView),
    Update(UpdateReport),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOutput {
    /// Errors collected before the mode ran (bootstrap, bookend checks).
    pub notices: Vec<StatusMessage>,
    /// Status of the mode itself. A plain list has none.
    pub result: Option<StatusMessage>,
    pub view: SessionView,
}

impl SessionOutput {
    pub fn messages(&self) -> impl Iterator<Item = &StatusMessage> {
        self.notices.iter().chain(self.result.iter())
    }

    pub fn has_errors(&self) -> bool {
        self.messages().any(StatusMessage::is_error)
    }
}

/// Runs a single invocation: bootstrap, bookend placement, then the mode.
///
/// Nothing survives the call; the next invocation starts from the external
/// state again.
pub struct ExecutionSession<'a> {
    engine: &'a OrchestrationEngine,
}

impl<'a> ExecutionSession<'a> {
    pub fn new(engine: &'a OrchestrationEngine) -> Self {
        Self { engine }
    }

    pub fn run(&self, invocation: &Invocation) -> Result<SessionOutput> {
        let span = info_span!("upgrade.invocation", mode = %invocation.mode);
        let _enter = span.enter();

        let mut notices = Vec::new();
        if let Some(bootstrap) = self.engine.bootstrap()
            && let Err(err) = bootstrap.ensure()
        {
            warn!("Bootstrap schema could not be installed: {}", err);
            notices.push(StatusMessage::error(SQL_ERROR).with_message(err.to_string()));
        }

        let placement = self.engine.with_bookends(&invocation.values);
        for err in placement.errors {
            warn!("Bookend eligibility check failed: {}", err);
            notices.push(StatusMessage::error(SQL_ERROR).with_message(err.to_string()));
        }

        let (result, view) = match &invocation.mode {
            Mode::List => match self
                .engine
                .compute_pending(&placement.registry, &invocation.values)?
            {
                PendingOutcome::Listed(report) => (None, SessionView::Pending(report)),
                PendingOutcome::NoWizards(warning) => (Some(warning), SessionView::NoWizards),
            },
            Mode::GetUserInput(identifier) => {
                let prompt = self.engine.prompt(identifier, &invocation.values)?;
                (
                    Some(StatusMessage::ok("Show wizard options")),
                    SessionView::Prompt(prompt),
                )
            }
            Mode::PerformUpdate(identifier) => {
                let (status, report) = self.perform(&placement.registry, identifier, invocation)?;
                (Some(status), SessionView::Update(report))
            }
        };

        Ok(SessionOutput {
            notices,
            result,
            view,
        })
    }

    fn perform(
        &self,
        placed: &Registry,
        identifier: &str,
        invocation: &Invocation,
    ) -> Result<(StatusMessage, UpdateReport)> {
        let values = &invocation.values;
        let mut wizard = self.engine.wizard(identifier, values)?;
        let input = values.for_wizard(identifier);

        let mut state = UpdateState::Validating;
        debug!("Update wizard '{}': {}", identifier, state);

        let status = match wizard.validate_input(&input) {
            Some(InputCheck::Invalid(reason)) => {
                state = UpdateState::Rejected;
                let reason = if reason.is_empty() {
                    GENERIC_REJECTION.to_string()
                } else {
                    reason
                };
                StatusMessage::error("Input parameter broken").with_message(reason)
            }
            Some(InputCheck::Valid) | None => {
                state = UpdateState::Executing;
                debug!("Update wizard '{}': {}", identifier, state);

                let outcome = wizard
                    .execute(&input)
                    .ok_or_else(|| WizardError::MissingExecutor(identifier.to_string()))?;

                let mut status = if outcome.success {
                    state = UpdateState::Done;
                    StatusMessage::ok("Update successful")
                } else {
                    state = UpdateState::Failed;
                    StatusMessage::error("Update failed!").with_message(outcome.message)
                };
                if invocation.show_database_queries {
                    status = status.with_diagnostics(outcome.statements);
                }
                status
            }
        };
        debug!("Update wizard '{}': {}", identifier, state);

        let next_identifier = self.engine.resolve_next(placed, identifier, values)?;

        Ok((
            status,
            UpdateReport {
                identifier: identifier.to_string(),
                title: wizard.title(),
                state,
                next_identifier,
            },
        ))
    }
}
