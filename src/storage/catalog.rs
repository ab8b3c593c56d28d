use crate::core::{Result, WizardError};
use crate::parser::ast::{AlterTableOperation, ColumnDef, CreateTableStmt, Statement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Snapshot of the tables and columns that currently exist.
///
/// Immutable once built: every change returns a new `Catalog`, so snapshots
/// handed to wizards never move under them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    tables: Arc<BTreeMap<String, CreateTableStmt>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table - returns a NEW Catalog.
    pub fn with_table(self, table: CreateTableStmt) -> Result<Self> {
        let name = table.table_name.clone();
        if self.tables.contains_key(&name) {
            return Err(WizardError::TableExists(name));
        }

        let mut new_tables = (*self.tables).clone();
        new_tables.insert(
            name,
            CreateTableStmt {
                if_not_exists: false,
                ..table
            },
        );

        Ok(Self {
            tables: Arc::new(new_tables),
        })
    }

    pub fn with_column(self, table_name: &str, column: ColumnDef) -> Result<Self> {
        let table = self.get_table(table_name)?;
        if table.column(&column.name).is_some() {
            return Err(WizardError::ColumnExists(column.name, table_name.to_string()));
        }

        let mut new_tables = (*self.tables).clone();
        if let Some(table) = new_tables.get_mut(table_name) {
            table.columns.push(column);
        }

        Ok(Self {
            tables: Arc::new(new_tables),
        })
    }

    pub fn with_column_type(self, table_name: &str, column: &str, data_type: &str) -> Result<Self> {
        if self.column(table_name, column).is_none() {
            // Distinguish a missing table from a missing column.
            self.get_table(table_name)?;
            return Err(WizardError::ColumnNotFound(
                column.to_string(),
                table_name.to_string(),
            ));
        }

        let mut new_tables = (*self.tables).clone();
        if let Some(def) = new_tables
            .get_mut(table_name)
            .and_then(|t| t.columns.iter_mut().find(|c| c.name == column))
        {
            def.data_type = data_type.to_string();
        }

        Ok(Self {
            tables: Arc::new(new_tables),
        })
    }

    pub fn get_table(&self, name: &str) -> Result<&CreateTableStmt> {
        self.tables
            .get(name)
            .ok_or_else(|| WizardError::TableNotFound(name.to_string()))
    }

    pub fn column(&self, table_name: &str, column: &str) -> Option<&ColumnDef> {
        self.tables.get(table_name).and_then(|t| t.column(column))
    }

    /// Whether the effect of `stmt` is already present, so that applying it
    /// again would change nothing.
    pub fn reflects(&self, stmt: &Statement) -> bool {
        match stmt {
            Statement::CreateTable(create) => {
                self.get_table(&create.table_name).is_ok_and(|existing| {
                    create
                        .columns
                        .iter()
                        .all(|column| existing.column(&column.name).is_some())
                })
            }
            Statement::AlterTable(alter) => match &alter.operation {
                AlterTableOperation::AddColumn(column) => {
                    self.column(&alter.table_name, &column.name).is_some()
                }
                AlterTableOperation::SetDataType { column, data_type } => self
                    .column(&alter.table_name, column)
                    .is_some_and(|def| &def.data_type == data_type),
            },
        }
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn list_tables(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
