use super::registry::{FINAL_SCHEMA, INITIAL_SCHEMA, Registry, WizardDescriptor};
use super::{UpdateOutcome, Upgrade, Wizard, WizardContext, WizardInstance};
use crate::core::{Result, UserInput};
use crate::migration::{SchemaDiff, SchemaMigrator};
use crate::parser::SchemaDefinition;
use std::sync::Arc;

/// Registers the initial-schema and final-schema wizards for `expected`.
///
/// Where they are registered does not matter: both are placed at the ends of
/// the registry on every invocation.
pub fn register_schema_bookends(registry: &mut Registry, expected: SchemaDefinition) -> Result<()> {
    let expected = Arc::new(expected);

    let initial = Arc::clone(&expected);
    registry.register(WizardDescriptor::new(INITIAL_SCHEMA, move |ctx| {
        WizardInstance::simple(InitialSchemaWizard::new(&ctx, Arc::clone(&initial)))
    }))?;

    registry.register(WizardDescriptor::new(FINAL_SCHEMA, move |ctx| {
        WizardInstance::simple(FinalSchemaWizard::new(&ctx, Arc::clone(&expected)))
    }))
}

fn explain(statements: &[String]) -> String {
    statements.join(";\n")
}

fn outcome(migrator: &SchemaMigrator, statements: &[String]) -> UpdateOutcome {
    let run = migrator.run(statements);
    match run.error {
        None => UpdateOutcome::succeeded(run.executed),
        Some(err) => UpdateOutcome::failed(run.executed, err.to_string()),
    }
}

/// Creates the tables and columns the new version expects but the database
/// lacks. Runs before every other wizard.
pub struct InitialSchemaWizard {
    identifier: String,
    migrator: SchemaMigrator,
    expected: Arc<SchemaDefinition>,
}

impl InitialSchemaWizard {
    pub fn new(ctx: &WizardContext, expected: Arc<SchemaDefinition>) -> Self {
        Self {
            identifier: ctx.identifier.clone(),
            migrator: SchemaMigrator::new(Arc::clone(&ctx.host.schema)),
            expected,
        }
    }

    fn diff(&self) -> Result<SchemaDiff> {
        self.migrator.diff(&self.expected)
    }
}

impl Wizard for InitialSchemaWizard {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn title(&self) -> String {
        "Update database schema: Create tables and fields".to_string()
    }

    fn is_eligible(&self) -> Result<bool> {
        Ok(self.diff()?.has_missing_structures())
    }

    fn explanation(&self) -> String {
        match self.diff() {
            Ok(diff) => format!(
                "There are tables or fields missing in the database. \
                 The following statements will be executed:\n{}",
                explain(&diff.missing_structure_statements())
            ),
            Err(err) => err.to_string(),
        }
    }
}

impl Upgrade for InitialSchemaWizard {
    fn execute(&mut self, _input: &UserInput) -> UpdateOutcome {
        match self.diff() {
            Ok(diff) => outcome(&self.migrator, &diff.missing_structure_statements()),
            Err(err) => UpdateOutcome::failed(Vec::new(), err.to_string()),
        }
    }
}

/// Applies whatever schema changes remain once every other wizard has run,
/// including column type changes.
pub struct FinalSchemaWizard {
    identifier: String,
    migrator: SchemaMigrator,
    expected: Arc<SchemaDefinition>,
}

impl FinalSchemaWizard {
    pub fn new(ctx: &WizardContext, expected: Arc<SchemaDefinition>) -> Self {
        Self {
            identifier: ctx.identifier.clone(),
            migrator: SchemaMigrator::new(Arc::clone(&ctx.host.schema)),
            expected,
        }
    }

    fn pending_statements(&self) -> Result<Vec<String>> {
        let diff = self.migrator.diff(&self.expected)?;
        let mut statements = diff.missing_structure_statements();
        statements.extend(diff.type_change_statements());
        Ok(statements)
    }
}

impl Wizard for FinalSchemaWizard {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn title(&self) -> String {
        "Update database schema: Modify tables and fields".to_string()
    }

    fn is_eligible(&self) -> Result<bool> {
        Ok(!self.pending_statements()?.is_empty())
    }

    fn explanation(&self) -> String {
        match self.pending_statements() {
            Ok(statements) => format!(
                "The database schema differs from the expected one. \
                 The following statements will be executed:\n{}",
                explain(&statements)
            ),
            Err(err) => err.to_string(),
        }
    }
}

impl Upgrade for FinalSchemaWizard {
    fn execute(&mut self, _input: &UserInput) -> UpdateOutcome {
        match self.pending_statements() {
            Ok(statements) => outcome(&self.migrator, &statements),
            Err(err) => UpdateOutcome::failed(Vec::new(), err.to_string()),
        }
    }
}
