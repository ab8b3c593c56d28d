use crate::core::{Result, WizardError, version_ordinal};
use crate::engine::DEFAULT_FIELD_PREFIX;
use crate::parser::SchemaDefinition;
use crate::wizard::{Bookend, Registry, SqlWizardSpec, register_schema_bookends};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Upgrade configuration
///
/// Usually read from a JSON file next to the schema files it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeConfig {
    /// Version being upgraded to, e.g. "12.4.0"
    pub target_version: String,

    /// Name prefix of the input form fields
    #[serde(default = "default_field_prefix")]
    pub field_prefix: String,

    /// Report executed statements by default
    #[serde(default)]
    pub show_database_queries: bool,

    /// SQL file with the schema the new version expects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_schema: Option<PathBuf>,

    /// SQL file with infrastructure tables that must exist before any wizard runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_schema: Option<PathBuf>,

    /// Declarative wizards, in the order they are offered
    #[serde(default)]
    pub wizards: Vec<SqlWizardSpec>,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

fn default_field_prefix() -> String {
    DEFAULT_FIELD_PREFIX.to_string()
}

impl UpgradeConfig {
    pub fn new(target_version: &str) -> Self {
        Self {
            target_version: target_version.to_string(),
            field_prefix: default_field_prefix(),
            show_database_queries: false,
            expected_schema: None,
            bootstrap_schema: None,
            wizards: Vec::new(),
            base_dir: None,
        }
    }

    /// Set the form field prefix
    pub fn field_prefix(mut self, prefix: &str) -> Self {
        self.field_prefix = prefix.to_string();
        self
    }

    pub fn show_database_queries(mut self, show: bool) -> Self {
        self.show_database_queries = show;
        self
    }

    pub fn expected_schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.expected_schema = Some(path.into());
        self
    }

    pub fn bootstrap_schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.bootstrap_schema = Some(path.into());
        self
    }

    /// Append a declarative wizard
    pub fn wizard(mut self, spec: SqlWizardSpec) -> Self {
        self.wizards.push(spec);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| WizardError::ConfigError(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file. Relative schema paths are resolved against
    /// the directory of the file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WizardError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let mut config = Self::from_json_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!("Loaded upgrade configuration from '{}'", path.display());
        Ok(config)
    }

    /// Checks the target version and the wizard identifiers.
    pub fn validate(&self) -> Result<()> {
        version_ordinal(&self.target_version)?;

        for spec in &self.wizards {
            if spec.identifier.trim().is_empty() {
                return Err(WizardError::ConfigError(
                    "Wizard identifier must not be empty".into(),
                ));
            }
            if Bookend::of(&spec.identifier).is_some() {
                return Err(WizardError::ConfigError(format!(
                    "Wizard identifier '{}' is reserved",
                    spec.identifier
                )));
            }
        }
        Ok(())
    }

    pub fn target_ordinal(&self) -> Result<u32> {
        version_ordinal(&self.target_version)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    fn load_schema(&self, path: Option<&PathBuf>) -> Result<Option<SchemaDefinition>> {
        let Some(path) = path else {
            return Ok(None);
        };
        let path = self.resolve(path);
        let sql = fs::read_to_string(&path).map_err(|e| {
            WizardError::ConfigError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        Ok(Some(SchemaDefinition::from_sql(&sql)?))
    }

    pub fn load_expected_schema(&self) -> Result<Option<SchemaDefinition>> {
        self.load_schema(self.expected_schema.as_ref())
    }

    pub fn load_bootstrap_schema(&self) -> Result<Option<SchemaDefinition>> {
        self.load_schema(self.bootstrap_schema.as_ref())
    }

    /// Builds the wizard registry: the schema bookends when an expected schema
    /// is configured, then the declarative wizards in file order.
    pub fn build_registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        if let Some(expected) = self.load_expected_schema()? {
            register_schema_bookends(&mut registry, expected)?;
        }
        for spec in &self.wizards {
            registry.register(spec.clone().into_descriptor())?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{FINAL_SCHEMA, INITIAL_SCHEMA};
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = UpgradeConfig::from_json_str(r#"{"target_version": "12.4.0"}"#).unwrap();
        assert_eq!(config.field_prefix, "install[values]");
        assert!(!config.show_database_queries);
        assert!(config.wizards.is_empty());
        assert_eq!(config.target_ordinal().unwrap(), 12_004_000);
    }

    #[test]
    fn test_invalid_version_is_rejected_at_load() {
        let err = UpgradeConfig::from_json_str(r#"{"target_version": "12.4000"}"#).unwrap_err();
        assert!(matches!(err, WizardError::InvalidVersion(_)));
    }

    #[test]
    fn test_reserved_identifier() {
        let config = UpgradeConfig::new("12.4").wizard(SqlWizardSpec::new(FINAL_SCHEMA, "Nope"));
        assert!(matches!(config.validate(), Err(WizardError::ConfigError(_))));
    }

    #[test]
    fn test_registry_from_file() {
        let dir = TempDir::new().unwrap();
        let mut schema = fs::File::create(dir.path().join("tables.sql")).unwrap();
        writeln!(schema, "CREATE TABLE pages (uid int, title varchar(255));").unwrap();

        let config_path = dir.path().join("upgrade.json");
        fs::write(
            &config_path,
            r#"{
                "target_version": "12.4.0",
                "expected_schema": "tables.sql",
                "wizards": [
                    {"identifier": "pagesSlug", "title": "Fill slugs", "statements": []},
                    {"identifier": "sysNote", "title": "Notes", "statements": []}
                ]
            }"#,
        )
        .unwrap();

        let config = UpgradeConfig::from_json_file(&config_path).unwrap();
        let registry = config.build_registry().unwrap();
        assert_eq!(
            registry.identifiers(),
            vec![INITIAL_SCHEMA, FINAL_SCHEMA, "pagesSlug", "sysNote"]
        );
    }

    #[test]
    fn test_missing_schema_file() {
        let config = UpgradeConfig::new("12.4").expected_schema("/nonexistent/tables.sql");
        assert!(matches!(
            config.build_registry(),
            Err(WizardError::ConfigError(_))
        ));
    }
}
