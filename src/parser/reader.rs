use super::adapter::SqlParserAdapter;
use super::ast::{CreateTableStmt, Statement};
use crate::core::{Result, WizardError};

/// The table layout a software version expects, read from SQL `CREATE TABLE`
/// documents.
///
/// Several documents may define the same table; their columns are merged in
/// order of appearance, the first definition of a column winning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDefinition {
    tables: Vec<CreateTableStmt>,
}

impl SchemaDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sql(sql: &str) -> Result<Self> {
        let mut definition = Self::new();
        definition.extend_from_sql(sql)?;
        Ok(definition)
    }

    /// Merges the tables of another SQL document into this definition.
    pub fn extend_from_sql(&mut self, sql: &str) -> Result<()> {
        for stmt in SqlParserAdapter::new().parse(sql)? {
            match stmt {
                Statement::CreateTable(create) => self.merge_table(create),
                Statement::AlterTable(alter) => {
                    return Err(WizardError::ParseError(format!(
                        "Schema definitions may only contain CREATE TABLE, found ALTER TABLE {}",
                        alter.table_name
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn with_table(mut self, table: CreateTableStmt) -> Self {
        self.merge_table(table);
        self
    }

    fn merge_table(&mut self, table: CreateTableStmt) {
        match self
            .tables
            .iter_mut()
            .find(|t| t.table_name == table.table_name)
        {
            Some(existing) => {
                for column in table.columns {
                    if existing.column(&column.name).is_none() {
                        existing.columns.push(column);
                    }
                }
            }
            None => self.tables.push(CreateTableStmt {
                if_not_exists: false,
                ..table
            }),
        }
    }

    pub fn tables(&self) -> &[CreateTableStmt] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&CreateTableStmt> {
        self.tables.iter().find(|t| t.table_name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
