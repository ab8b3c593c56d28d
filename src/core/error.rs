use thiserror::Error;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Statement error: {0}")]
    StatementError(String),

    #[error("Table '{0}' already exists")]
    TableExists(String),

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Column '{0}' already exists in table '{1}'")]
    ColumnExists(String, String),

    #[error("Column '{0}' not found in table '{1}'")]
    ColumnNotFound(String, String),

    #[error("No update wizard registered with identifier '{0}'")]
    UnknownWizard(String),

    #[error("Update wizard '{0}' is already registered")]
    DuplicateIdentifier(String),

    #[error("No performUpdate method in update wizard with identifier {0}")]
    MissingExecutor(String),

    #[error("Invalid version number: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Completion store error: {0}")]
    StoreError(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl WizardError {
    /// Configuration defects abort an invocation instead of being reported
    /// as a status message.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownWizard(_)
                | Self::DuplicateIdentifier(_)
                | Self::MissingExecutor(_)
                | Self::ConfigError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, WizardError>;

impl<T> From<std::sync::PoisonError<T>> for WizardError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<std::io::Error> for WizardError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}
