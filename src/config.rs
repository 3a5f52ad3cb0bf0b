//! Manager configuration, persisted as TOML.
//!
//! ```toml
//! document_format = "turtle"
//! validation = "same-namespace"
//!
//! [prefixes]
//! person = "http://autumncode.com/ontologies/person.owl#"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::change::ValidationPolicy;
use crate::codec::{DocumentFormat, Prefixes};
use crate::error::ConfigError;
use crate::resource::Iri;

/// Result of loading or validating a configuration.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings for an [`crate::manager::OntologyManager`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Format used by `save` / `load` when none is given.
    #[serde(default)]
    pub document_format: DocumentFormat,
    /// Policy checked for every change in a batch.
    #[serde(default)]
    pub validation: ValidationPolicy,
    /// Extra Turtle prefixes. `rdf`, `rdfs`, `owl` and `xsd` are always written.
    #[serde(default)]
    pub prefixes: Prefixes,
}

impl ManagerConfig {
    /// Set the default document format.
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.document_format = format;
        self
    }

    /// Set the validation policy.
    pub fn with_validation(mut self, validation: ValidationPolicy) -> Self {
        self.validation = validation;
        self
    }

    /// Add a Turtle prefix.
    pub fn with_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.prefixes.insert(prefix.to_string(), namespace.to_string());
        self
    }

    /// Check that every prefix maps to an absolute IRI.
    pub fn validate(&self) -> ConfigResult<()> {
        for (prefix, namespace) in &self.prefixes {
            if Iri::parse(namespace.as_str()).is_err() {
                return Err(ConfigError::InvalidPrefix {
                    prefix: prefix.clone(),
                    namespace: namespace.clone(),
                });
            }
        }
        Ok(())
    }

    /// Parse from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<string>".into(),
            message: e.to_string(),
        })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.document_format, DocumentFormat::Turtle);
        assert_eq!(config.validation, ValidationPolicy::Optimistic);
        assert!(config.prefixes.is_empty());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ManagerConfig::from_toml_str("").unwrap(), ManagerConfig::default());
    }

    #[test]
    fn parse_all_fields() {
        let config = ManagerConfig::from_toml_str(
            r#"
document_format = "ntriples"
validation = "same-namespace"

[prefixes]
person = "http://autumncode.com/ontologies/person.owl#"
"#,
        )
        .unwrap();
        assert_eq!(config.document_format, DocumentFormat::NTriples);
        assert_eq!(config.validation, ValidationPolicy::SameNamespace);
        assert_eq!(
            config.prefixes["person"],
            "http://autumncode.com/ontologies/person.owl#"
        );
    }

    #[test]
    fn unknown_policy_is_parse_error() {
        let err = ManagerConfig::from_toml_str("validation = \"pessimistic\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn invalid_prefix_namespace() {
        let config = ManagerConfig::default().with_prefix("bad", "not a namespace");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("manager.toml");
        let config = ManagerConfig::default()
            .with_format(DocumentFormat::Json)
            .with_prefix("ex", "http://example.com/ns#");
        config.save(&path).unwrap();

        let loaded = ManagerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = ManagerConfig::load(Path::new("/nonexistent/manager.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
