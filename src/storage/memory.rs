use super::catalog::Catalog;
use super::engine::SchemaConnection;
use super::persistence::{read_json, write_json_atomic};
use crate::core::{Result, WizardError};
use crate::parser::SqlParserAdapter;
use crate::parser::ast::{AlterTableOperation, Statement};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

/// Schema held in memory, driven by parsed DDL.
///
/// Every statement handed to [`SchemaConnection::execute`] is recorded, which
/// makes the schema usable as a statement-count spy in tests. A schema opened
/// from a file writes the catalog back after every accepted statement.
pub struct MemorySchema {
    catalog: RwLock<Catalog>,
    issued: Mutex<Vec<String>>,
    parser: SqlParserAdapter,
    backing_file: Option<PathBuf>,
}

impl MemorySchema {
    pub fn new() -> Self {
        Self::from_catalog(Catalog::new())
    }

    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            issued: Mutex::new(Vec::new()),
            parser: SqlParserAdapter::new(),
            backing_file: None,
        }
    }

    /// Loads a catalog saved with [`MemorySchema::save`]; a missing file is an
    /// empty database.
    pub fn load(path: &Path) -> Result<Self> {
        let catalog: Option<Catalog> = read_json(path)?;
        Ok(Self::from_catalog(catalog.unwrap_or_default()))
    }

    /// Like [`MemorySchema::load`], but every statement that changes the
    /// catalog is written to `path` before it counts as applied.
    pub fn open(path: &Path) -> Result<Self> {
        let mut schema = Self::load(path)?;
        schema.backing_file = Some(path.to_path_buf());
        Ok(schema)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let catalog = self.catalog.read()?.clone();
        write_json_atomic(path, &catalog)
    }

    /// Statements issued so far, including rejected ones.
    pub fn issued_statements(&self) -> Result<Vec<String>> {
        Ok(self.issued.lock()?.clone())
    }

    pub fn statement_count(&self) -> Result<usize> {
        Ok(self.issued.lock()?.len())
    }

    fn apply(&self, catalog: Catalog, stmt: Statement) -> Result<Catalog> {
        match stmt {
            Statement::CreateTable(create) => {
                if create.if_not_exists && catalog.table_exists(&create.table_name) {
                    return Ok(catalog);
                }
                catalog.with_table(create)
            }
            Statement::AlterTable(alter) => match alter.operation {
                AlterTableOperation::AddColumn(column) => {
                    catalog.with_column(&alter.table_name, column)
                }
                AlterTableOperation::SetDataType { column, data_type } => {
                    catalog.with_column_type(&alter.table_name, &column, &data_type)
                }
            },
        }
    }
}

impl Default for MemorySchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaConnection for MemorySchema {
    fn catalog(&self) -> Result<Catalog> {
        Ok(self.catalog.read()?.clone())
    }

    fn execute(&self, statement: &str) -> Result<()> {
        self.issued.lock()?.push(statement.to_string());
        debug!("Executing schema statement: {}", statement);

        let rejected = |e: WizardError| WizardError::StatementError(format!("{} [{}]", e, statement));
        let stmts = self.parser.parse(statement).map_err(rejected)?;

        let mut guard = self.catalog.write()?;
        let mut next = guard.clone();
        for stmt in stmts {
            next = self.apply(next, stmt).map_err(rejected)?;
        }
        if let Some(path) = &self.backing_file {
            write_json_atomic(path, &next)?;
        }
        *guard = next;
        Ok(())
    }
}
