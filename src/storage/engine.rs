use super::catalog::Catalog;
use crate::core::Result;

/// Connection to the database whose schema the wizards migrate.
///
/// The orchestration engine never talks to it directly; schema bootstrap and
/// the schema wizards do.
pub trait SchemaConnection: Send + Sync {
    /// Snapshot of the tables that currently exist.
    fn catalog(&self) -> Result<Catalog>;

    /// Executes a single DDL statement.
    ///
    /// Malformed or rejected statements fail with `WizardError::StatementError`.
    fn execute(&self, statement: &str) -> Result<()>;
}
