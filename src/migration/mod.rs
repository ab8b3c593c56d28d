pub mod bootstrap;
pub mod migrator;

pub use bootstrap::SchemaBootstrap;
pub use migrator::{MigrationRun, SchemaDiff, SchemaMigrator};
