pub mod catalog;
pub mod engine;
pub mod memory;
pub mod persistence;

pub use catalog::Catalog;
pub use engine::SchemaConnection;
pub use memory::MemorySchema;
