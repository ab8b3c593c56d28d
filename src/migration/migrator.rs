use crate::core::{Result, WizardError};
use crate::parser::{SchemaDefinition, SqlParserAdapter};
use crate::parser::ast::{AlterTableOperation, AlterTableStmt, Statement};
use crate::storage::{Catalog, SchemaConnection};
use log::{debug, warn};
use std::sync::Arc;

/// Differences between an expected schema and the live catalog.
///
/// Statements are grouped by how disruptive they are: creating tables and
/// adding columns never touches existing data, changing a column type may.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    pub create_tables: Vec<Statement>,
    pub add_columns: Vec<Statement>,
    pub change_columns: Vec<Statement>,
}

impl SchemaDiff {
    pub fn compute(expected: &SchemaDefinition, current: &Catalog) -> Self {
        let mut diff = Self::default();

        for table in expected.tables() {
            let Ok(existing) = current.get_table(&table.table_name) else {
                diff.create_tables.push(Statement::CreateTable(table.clone()));
                continue;
            };

            for column in &table.columns {
                match existing.column(&column.name) {
                    None => diff.add_columns.push(Statement::AlterTable(AlterTableStmt {
                        table_name: table.table_name.clone(),
                        operation: AlterTableOperation::AddColumn(column.clone()),
                    })),
                    Some(live) if live.data_type != column.data_type => {
                        diff.change_columns.push(Statement::AlterTable(AlterTableStmt {
                            table_name: table.table_name.clone(),
                            operation: AlterTableOperation::SetDataType {
                                column: column.name.clone(),
                                data_type: column.data_type.clone(),
                            },
                        }))
                    }
                    Some(_) => {}
                }
            }
        }

        diff
    }

    pub fn is_empty(&self) -> bool {
        !self.has_missing_structures() && self.change_columns.is_empty()
    }

    /// Whether tables or columns are missing altogether.
    pub fn has_missing_structures(&self) -> bool {
        !self.create_tables.is_empty() || !self.add_columns.is_empty()
    }

    /// CREATE TABLE statements followed by ADD COLUMN statements.
    pub fn missing_structure_statements(&self) -> Vec<String> {
        self.create_tables
            .iter()
            .chain(&self.add_columns)
            .map(ToString::to_string)
            .collect()
    }

    pub fn type_change_statements(&self) -> Vec<String> {
        self.change_columns.iter().map(ToString::to_string).collect()
    }
}

/// Outcome of executing a batch of statements.
///
/// Execution stops at the first rejected statement; statements before it stay
/// applied.
#[derive(Debug, Default)]
pub struct MigrationRun {
    pub executed: Vec<String>,
    /// Statements left out because the catalog already showed their effect
    pub skipped: Vec<String>,
    pub error: Option<WizardError>,
}

impl MigrationRun {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Vec<String>> {
        match self.error {
            None => Ok(self.executed),
            Some(err) => Err(err),
        }
    }
}

/// Brings a database in line with a [`SchemaDefinition`].
#[derive(Clone)]
pub struct SchemaMigrator {
    connection: Arc<dyn SchemaConnection>,
}

impl SchemaMigrator {
    pub fn new(connection: Arc<dyn SchemaConnection>) -> Self {
        Self { connection }
    }

    pub fn diff(&self, expected: &SchemaDefinition) -> Result<SchemaDiff> {
        let catalog = self.connection.catalog()?;
        Ok(SchemaDiff::compute(expected, &catalog))
    }

    /// Creates missing tables and columns only. Existing structures are never
    /// altered, so running it against a matching schema issues nothing.
    pub fn install(&self, expected: &SchemaDefinition) -> Result<Vec<String>> {
        let diff = self.diff(expected)?;
        self.run(&diff.missing_structure_statements()).into_result()
    }

    pub fn run(&self, statements: &[String]) -> MigrationRun {
        let mut run = MigrationRun::default();
        for statement in statements {
            if let Err(err) = self.apply(statement) {
                run.error = Some(err);
                break;
            }
            run.executed.push(statement.clone());
        }
        run
    }

    /// Like [`run`](Self::run), but leaves out statements whose effect the
    /// catalog already shows. A batch that stopped half way picks up at the
    /// first statement it never applied.
    pub fn resume(&self, statements: &[String]) -> MigrationRun {
        let parser = SqlParserAdapter::new();
        let mut run = MigrationRun::default();
        for statement in statements {
            match self.is_applied(&parser, statement) {
                Ok(true) => {
                    debug!("Schema statement already applied: {}", statement);
                    run.skipped.push(statement.clone());
                    continue;
                }
                Ok(false) => {}
                Err(err) => {
                    run.error = Some(err);
                    break;
                }
            }
            if let Err(err) = self.apply(statement) {
                run.error = Some(err);
                break;
            }
            run.executed.push(statement.clone());
        }
        run
    }

    fn is_applied(&self, parser: &SqlParserAdapter, statement: &str) -> Result<bool> {
        // Unparseable statements are handed to the connection, which reports them.
        let Ok(parsed) = parser.parse(statement) else {
            return Ok(false);
        };
        let catalog = self.connection.catalog()?;
        Ok(!parsed.is_empty() && parsed.iter().all(|stmt| catalog.reflects(stmt)))
    }

    fn apply(&self, statement: &str) -> Result<()> {
        match self.connection.execute(statement) {
            Ok(()) => {
                debug!("Schema statement applied: {}", statement);
                Ok(())
            }
            Err(err) => {
                warn!("Schema statement rejected: {}", err);
                Err(match err {
                    WizardError::StatementError(_) => err,
                    other => WizardError::StatementError(format!("{} [{}]", other, statement)),
                })
            }
        }
    }
}
