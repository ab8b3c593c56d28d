// ============================================================================
// Upgrade Wizard Library
// ============================================================================

pub mod config;
pub mod core;
pub mod engine;
pub mod migration;
pub mod parser;
pub mod storage;
pub mod store;
pub mod wizard;

// Re-export main types for convenience
pub use config::UpgradeConfig;
pub use crate::core::{
    FormValues, Result, Status, StatusMessage, UserInput, WizardError, version_ordinal,
    version_string,
};

// Re-export the orchestration API
pub use engine::{
    ExecutionSession, Invocation, Mode, OrchestrationEngine, PendingOutcome, PendingReport,
    PendingWizardView, PromptView, SessionOutput, SessionView, UpdateReport, UpdateState,
};

// Re-export the wizard contract
pub use wizard::{
    Bookend, Capability, FINAL_SCHEMA, HostContext, INITIAL_SCHEMA, InputCheck,
    InteractiveUpgrade, Registry, SqlWizardSpec, UpdateOutcome, Upgrade, ValidatedUpgrade,
    Wizard, WizardContext, WizardDescriptor, WizardInstance, register_schema_bookends,
};

// ============================================================================
// Schema and state backends
// ============================================================================

pub use migration::{SchemaBootstrap, SchemaDiff, SchemaMigrator};
pub use parser::SchemaDefinition;
pub use storage::{Catalog, MemorySchema, SchemaConnection};
pub use store::{CompletionStore, FileCompletionStore, MemoryCompletionStore};
