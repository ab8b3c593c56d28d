use serde::{Deserialize, Serialize};
use std::fmt;

/// Schema statement understood by the migrator and the in-memory schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable(CreateTableStmt),
    AlterTable(AlterTableStmt),
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTableStmt {
    pub table_name: String,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub if_not_exists: bool,
}

impl CreateTableStmt {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// ALTER TABLE statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTableStmt {
    pub table_name: String,
    pub operation: AlterTableOperation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableOperation {
    AddColumn(ColumnDef),
    SetDataType { column: String, data_type: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// Normalized, upper-case SQL type (`INTEGER`, `VARCHAR(255)`, ...).
    pub data_type: String,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            data_type: normalize_data_type(data_type.as_ref()),
        }
    }
}

/// Folds type aliases so that `int` and `INTEGER` compare equal.
pub fn normalize_data_type(data_type: &str) -> String {
    let upper = data_type.trim().to_uppercase();
    match upper.as_str() {
        "INT" | "INT4" => "INTEGER".to_string(),
        "INT8" => "BIGINT".to_string(),
        "BOOL" => "BOOLEAN".to_string(),
        _ => upper,
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.data_type)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::CreateTable(create) => {
                let columns = create
                    .columns
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                let if_not_exists = if create.if_not_exists { "IF NOT EXISTS " } else { "" };
                write!(f, "CREATE TABLE {}{} ({})", if_not_exists, create.table_name, columns)
            }
            Statement::AlterTable(alter) => match &alter.operation {
                AlterTableOperation::AddColumn(column) => {
                    write!(f, "ALTER TABLE {} ADD COLUMN {}", alter.table_name, column)
                }
                AlterTableOperation::SetDataType { column, data_type } => write!(
                    f,
                    "ALTER TABLE {} ALTER COLUMN {} SET DATA TYPE {}",
                    alter.table_name, column, data_type
                ),
            },
        }
    }
}
