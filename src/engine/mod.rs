pub mod orchestration;
pub mod session;
pub mod view;

pub use orchestration::{DEFAULT_FIELD_PREFIX, OrchestrationEngine};
pub use session::{ExecutionSession, Invocation, Mode, SessionOutput, SessionView};
pub use view::{
    PendingOutcome, PendingReport, PendingWizardView, PromptView, UpdateReport, UpdateState,
};
