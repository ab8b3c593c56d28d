//! Upgrade wizard capability contract.
//!
//! A wizard is a unit of one-time migration logic. What a wizard can do is
//! fixed by the variant of [`WizardInstance`] it is wrapped in, never inspected at
//! call time:
//!
//! - `Notice` - informational only, cannot be executed
//! - `Simple` - eligibility check and executor
//! - `Interactive` - additionally renders an input form
//! - `Validated` - additionally validates submitted input before executing

pub mod bookends;
pub mod registry;
pub mod sql;

pub use bookends::{FinalSchemaWizard, InitialSchemaWizard, register_schema_bookends};
pub use registry::{
    Bookend, BookendPlacement, FINAL_SCHEMA, INITIAL_SCHEMA, Registry, WizardDescriptor,
    WizardFactory,
};
pub use sql::{SqlWizard, SqlWizardSpec};

use crate::core::{Result, UserInput};
use crate::store::CompletionStore;
use crate::storage::SchemaConnection;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Collaborators of the host application that wizards may use.
#[derive(Clone)]
pub struct HostContext {
    pub schema: Arc<dyn SchemaConnection>,
    pub completions: Arc<dyn CompletionStore>,
}

impl HostContext {
    pub fn new(schema: Arc<dyn SchemaConnection>, completions: Arc<dyn CompletionStore>) -> Self {
        Self {
            schema,
            completions,
        }
    }
}

/// Everything a wizard is constructed from. Built fresh for each instance.
#[derive(Clone)]
pub struct WizardContext {
    pub identifier: String,
    pub target_version: u32,
    pub input: UserInput,
    pub host: HostContext,
}

pub trait Wizard {
    fn identifier(&self) -> &str;

    fn title(&self) -> String;

    /// Whether the wizard still needs to run. Must be derived from current
    /// external state on every call.
    fn is_eligible(&self) -> Result<bool>;

    /// Text shown next to the wizard in the pending list.
    fn explanation(&self) -> String {
        String::new()
    }

    /// Informational wizards return `false` to suppress the "next" button.
    fn wants_next_button(&self) -> bool {
        true
    }
}

pub trait Upgrade: Wizard {
    fn execute(&mut self, input: &UserInput) -> UpdateOutcome;
}

pub trait InteractiveUpgrade: Upgrade {
    /// Renders the input form. Field names are expected under `field_prefix`.
    fn render_input_form(&self, field_prefix: &str) -> String;
}

pub trait ValidatedUpgrade: InteractiveUpgrade {
    fn validate_input(&self, input: &UserInput) -> InputCheck;
}

/// Result reported by a wizard's executor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub success: bool,
    /// Statements issued, in order.
    pub statements: Vec<String>,
    pub message: String,
}

impl UpdateOutcome {
    pub fn succeeded(statements: Vec<String>) -> Self {
        Self {
            success: true,
            statements,
            message: String::new(),
        }
    }

    pub fn failed(statements: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            statements,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCheck {
    Valid,
    /// The message may be empty; callers substitute a generic one.
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Notice,
    Simple,
    Interactive,
    Validated,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Notice => "notice",
            Capability::Simple => "simple",
            Capability::Interactive => "interactive",
            Capability::Validated => "validated",
        };
        f.write_str(name)
    }
}

pub enum WizardInstance {
    Notice(Box<dyn Wizard>),
    Simple(Box<dyn Upgrade>),
    Interactive(Box<dyn InteractiveUpgrade>),
    Validated(Box<dyn ValidatedUpgrade>),
}

macro_rules! each_variant {
    ($instance:expr, $w:ident => $body:expr) => {
        match $instance {
            WizardInstance::Notice($w) => $body,
            WizardInstance::Simple($w) => $body,
            WizardInstance::Interactive($w) => $body,
            WizardInstance::Validated($w) => $body,
        }
    };
}

impl WizardInstance {
    pub fn notice(wizard: impl Wizard + 'static) -> Self {
        Self::Notice(Box::new(wizard))
    }

    pub fn simple(wizard: impl Upgrade + 'static) -> Self {
        Self::Simple(Box::new(wizard))
    }

    pub fn interactive(wizard: impl InteractiveUpgrade + 'static) -> Self {
        Self::Interactive(Box::new(wizard))
    }

    pub fn validated(wizard: impl ValidatedUpgrade + 'static) -> Self {
        Self::Validated(Box::new(wizard))
    }

    pub fn capability(&self) -> Capability {
        match self {
            WizardInstance::Notice(_) => Capability::Notice,
            WizardInstance::Simple(_) => Capability::Simple,
            WizardInstance::Interactive(_) => Capability::Interactive,
            WizardInstance::Validated(_) => Capability::Validated,
        }
    }

    pub fn identifier(&self) -> &str {
        each_variant!(self, w => w.identifier())
    }

    pub fn title(&self) -> String {
        each_variant!(self, w => w.title())
    }

    pub fn is_eligible(&self) -> Result<bool> {
        each_variant!(self, w => w.is_eligible())
    }

    pub fn explanation(&self) -> String {
        each_variant!(self, w => w.explanation())
    }

    pub fn wants_next_button(&self) -> bool {
        each_variant!(self, w => w.wants_next_button())
    }

    /// `None` when the wizard has no input form.
    pub fn render_input_form(&self, field_prefix: &str) -> Option<String> {
        match self {
            WizardInstance::Interactive(w) => Some(w.render_input_form(field_prefix)),
            WizardInstance::Validated(w) => Some(w.render_input_form(field_prefix)),
            WizardInstance::Notice(_) | WizardInstance::Simple(_) => None,
        }
    }

    /// `None` when the wizard has no validator.
    pub fn validate_input(&self, input: &UserInput) -> Option<InputCheck> {
        match self {
            WizardInstance::Validated(w) => Some(w.validate_input(input)),
            _ => None,
        }
    }

    /// `None` when the wizard has no executor.
    pub fn execute(&mut self, input: &UserInput) -> Option<UpdateOutcome> {
        match self {
            WizardInstance::Notice(_) => None,
            WizardInstance::Simple(w) => Some(w.execute(input)),
            WizardInstance::Interactive(w) => Some(w.execute(input)),
            WizardInstance::Validated(w) => Some(w.execute(input)),
        }
    }
}

impl fmt::Debug for WizardInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardInstance")
            .field("identifier", &self.identifier())
            .field("capability", &self.capability())
            .finish()
    }
}
