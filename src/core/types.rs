use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warning,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Warning => write!(f, "WARNING"),
            Status::Error => write!(f, "ERROR"),
        }
    }
}

/// A status entry reported back to the caller of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: Status,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Raw statements issued by a wizard, attached only on request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<Vec<String>>,
}

impl StatusMessage {
    pub fn new(status: Status, title: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            message: String::new(),
            diagnostics: None,
        }
    }

    pub fn ok(title: impl Into<String>) -> Self {
        Self::new(Status::Ok, title)
    }

    pub fn warning(title: impl Into<String>) -> Self {
        Self::new(Status::Warning, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(Status::Error, title)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_diagnostics(mut self, statements: Vec<String>) -> Self {
        self.diagnostics = Some(statements);
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }
}

/// Raw field input submitted for a single wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserInput(BTreeMap<String, String>);

impl UserInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UserInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Submitted form values of one invocation, keyed by wizard identifier.
///
/// Every wizard instance receives only its own slice of the values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, UserInput>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, identifier: impl Into<String>, input: UserInput) -> Self {
        self.0.insert(identifier.into(), input);
        self
    }

    pub fn set_field(
        &mut self,
        identifier: &str,
        field: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.0
            .entry(identifier.to_string())
            .or_default()
            .insert(field, value);
    }

    pub fn for_wizard(&self, identifier: &str) -> UserInput {
        self.0.get(identifier).cloned().unwrap_or_default()
    }
}
