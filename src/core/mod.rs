pub mod error;
pub mod types;
pub mod version;

pub use error::{Result, WizardError};
pub use types::{FormValues, Status, StatusMessage, UserInput};
pub use version::{version_ordinal, version_string};
