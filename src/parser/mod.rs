pub mod adapter;
pub mod ast;
pub mod reader;

pub use adapter::SqlParserAdapter;
pub use ast::{AlterTableOperation, AlterTableStmt, ColumnDef, CreateTableStmt, Statement};
pub use reader::SchemaDefinition;
