use super::migrator::SchemaMigrator;
use crate::core::Result;
use crate::parser::SchemaDefinition;
use crate::storage::SchemaConnection;
use log::{debug, info};
use std::sync::Arc;

/// Ensures the infrastructure tables (caches, registry) that wizards rely on
/// exist before any wizard is instantiated.
pub struct SchemaBootstrap {
    migrator: SchemaMigrator,
    required: SchemaDefinition,
}

impl SchemaBootstrap {
    pub fn new(connection: Arc<dyn SchemaConnection>, required: SchemaDefinition) -> Self {
        Self {
            migrator: SchemaMigrator::new(connection),
            required,
        }
    }

    pub fn from_sql(connection: Arc<dyn SchemaConnection>, sql: &str) -> Result<Self> {
        Ok(Self::new(connection, SchemaDefinition::from_sql(sql)?))
    }

    pub fn required(&self) -> &SchemaDefinition {
        &self.required
    }

    /// Creates whatever is missing and returns the number of statements issued.
    ///
    /// A rejected statement fails with `WizardError::StatementError`; tables
    /// created before it are kept.
    pub fn ensure(&self) -> Result<usize> {
        let executed = self.migrator.install(&self.required)?;
        if executed.is_empty() {
            debug!("Bootstrap schema is up to date");
        } else {
            info!("Bootstrap schema: {} statement(s) applied", executed.len());
        }
        Ok(executed.len())
    }
}
