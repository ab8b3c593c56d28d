use super::registry::WizardDescriptor;
use super::{
    HostContext, InputCheck, InteractiveUpgrade, UpdateOutcome, Upgrade, ValidatedUpgrade, Wizard,
    WizardInstance,
};
use crate::core::{Result, UserInput};
use crate::migration::SchemaMigrator;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Declarative wizard: a list of statements that runs once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlWizardSpec {
    pub identifier: String,
    pub title: String,
    #[serde(default)]
    pub explanation: String,
    pub statements: Vec<String>,
    /// Ask the user to tick a confirmation box before running.
    #[serde(default)]
    pub requires_confirmation: bool,
    #[serde(default = "default_next_button")]
    pub next_button: bool,
}

fn default_next_button() -> bool {
    true
}

impl SqlWizardSpec {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            explanation: String::new(),
            statements: Vec::new(),
            requires_confirmation: false,
            next_button: true,
        }
    }

    pub fn explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn statement(mut self, sql: impl Into<String>) -> Self {
        self.statements.push(sql.into());
        self
    }

    pub fn requires_confirmation(mut self) -> Self {
        self.requires_confirmation = true;
        self
    }

    pub fn without_next_button(mut self) -> Self {
        self.next_button = false;
        self
    }

    pub fn into_descriptor(self) -> WizardDescriptor {
        let spec = Arc::new(self);
        WizardDescriptor::new(spec.identifier.clone(), move |ctx| {
            let wizard = SqlWizard {
                spec: Arc::clone(&spec),
                host: ctx.host,
            };
            if wizard.spec.requires_confirmation {
                WizardInstance::validated(wizard)
            } else {
                WizardInstance::simple(wizard)
            }
        })
    }
}

/// Field that must be `"1"` for a wizard requiring confirmation.
pub const CONFIRM_FIELD: &str = "confirm";

pub struct SqlWizard {
    spec: Arc<SqlWizardSpec>,
    host: HostContext,
}

impl Wizard for SqlWizard {
    fn identifier(&self) -> &str {
        &self.spec.identifier
    }

    fn title(&self) -> String {
        self.spec.title.clone()
    }

    fn is_eligible(&self) -> Result<bool> {
        Ok(!self.host.completions.is_done(&self.spec.identifier)?)
    }

    fn explanation(&self) -> String {
        self.spec.explanation.clone()
    }

    fn wants_next_button(&self) -> bool {
        self.spec.next_button
    }
}

impl Upgrade for SqlWizard {
    fn execute(&mut self, _input: &UserInput) -> UpdateOutcome {
        let migrator = SchemaMigrator::new(Arc::clone(&self.host.schema));
        // A retry after a partial failure leaves out what the last attempt applied.
        let run = migrator.resume(&self.spec.statements);

        if let Some(err) = run.error {
            warn!("Update wizard '{}' failed: {}", self.spec.identifier, err);
            return UpdateOutcome::failed(run.executed, err.to_string());
        }

        if let Err(err) = self.host.completions.mark_done(&self.spec.identifier) {
            return UpdateOutcome::failed(
                run.executed,
                format!("Statements applied, but marking the wizard done failed: {}", err),
            );
        }

        info!(
            "Update wizard '{}' applied {} statement(s), {} already in place",
            self.spec.identifier,
            run.executed.len(),
            run.skipped.len()
        );
        UpdateOutcome::succeeded(run.executed)
    }
}

impl InteractiveUpgrade for SqlWizard {
    fn render_input_form(&self, field_prefix: &str) -> String {
        format!(
            "<label><input type=\"checkbox\" name=\"{}[{}]\" value=\"1\"> {}</label>",
            field_prefix, CONFIRM_FIELD, "I have a backup and want to run this update"
        )
    }
}

impl ValidatedUpgrade for SqlWizard {
    fn validate_input(&self, input: &UserInput) -> InputCheck {
        match input.get(CONFIRM_FIELD) {
            Some("1") => InputCheck::Valid,
            _ => InputCheck::Invalid("Please confirm that you want to run this update.".into()),
        }
    }
}
