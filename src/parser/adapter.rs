// ============================================================================
// src/parser/adapter.rs - sqlparser to schema statements
// ============================================================================

use crate::core::{Result, WizardError};
use crate::parser::ast::*;
use sqlparser::ast as sql_ast;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

pub struct SqlParserAdapter {
    dialect: PostgreSqlDialect,
}

impl SqlParserAdapter {
    pub fn new() -> Self {
        Self {
            dialect: PostgreSqlDialect {},
        }
    }

    pub fn parse(&self, sql: &str) -> Result<Vec<Statement>> {
        let external_stmts = Parser::parse_sql(&self.dialect, sql)
            .map_err(|e| WizardError::ParseError(e.to_string()))?;

        let mut statements = Vec::with_capacity(external_stmts.len());
        for stmt in external_stmts {
            statements.extend(self.convert_statement(stmt)?);
        }
        Ok(statements)
    }

    fn convert_statement(&self, stmt: sql_ast::Statement) -> Result<Vec<Statement>> {
        match stmt {
            sql_ast::Statement::CreateTable(create) => {
                Ok(vec![Statement::CreateTable(self.convert_create_table(create)?)])
            }
            sql_ast::Statement::AlterTable { name, operations, .. } => {
                let table_name = extract_table_name(&name)?;
                operations
                    .into_iter()
                    .map(|op| {
                        Ok(Statement::AlterTable(AlterTableStmt {
                            table_name: table_name.clone(),
                            operation: self.convert_alter_operation(op)?,
                        }))
                    })
                    .collect()
            }
            _ => Err(WizardError::ParseError(format!(
                "Statement type not supported in schema definitions: {}",
                stmt
            ))),
        }
    }

    fn convert_create_table(&self, create: sql_ast::CreateTable) -> Result<CreateTableStmt> {
        let table_name = extract_table_name(&create.name)?;
        let columns = create
            .columns
            .into_iter()
            .map(|col| self.convert_column_def(col))
            .collect::<Vec<_>>();

        if columns.is_empty() {
            return Err(WizardError::ParseError(format!(
                "Table '{}' defines no columns",
                table_name
            )));
        }

        Ok(CreateTableStmt {
            table_name,
            columns,
            if_not_exists: create.if_not_exists,
        })
    }

    fn convert_column_def(&self, col: sql_ast::ColumnDef) -> ColumnDef {
        ColumnDef::new(col.name.value, col.data_type.to_string())
    }

    fn convert_alter_operation(
        &self,
        operation: sql_ast::AlterTableOperation,
    ) -> Result<AlterTableOperation> {
        match operation {
            sql_ast::AlterTableOperation::AddColumn { column_def, .. } => {
                Ok(AlterTableOperation::AddColumn(self.convert_column_def(column_def)))
            }
            sql_ast::AlterTableOperation::AlterColumn { column_name, op } => match op {
                sql_ast::AlterColumnOperation::SetDataType { data_type, .. } => {
                    Ok(AlterTableOperation::SetDataType {
                        column: column_name.value,
                        data_type: normalize_data_type(&data_type.to_string()),
                    })
                }
                other => Err(WizardError::ParseError(format!(
                    "Unsupported ALTER COLUMN operation: {}",
                    other
                ))),
            },
            other => Err(WizardError::ParseError(format!(
                "Unsupported ALTER TABLE operation: {}",
                other
            ))),
        }
    }
}

impl Default for SqlParserAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_table_name(name: &sql_ast::ObjectName) -> Result<String> {
    name.0
        .last()
        .and_then(|part| part.as_ident())
        .map(|ident| ident.value.clone())
        .ok_or_else(|| WizardError::ParseError(format!("Invalid table name: {}", name)))
}

// ============================================================================
// TESTS
// ============================================================================
