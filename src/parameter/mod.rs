pub mod ecr_tag;
pub mod error;

pub use ecr_tag::{EcrTagParameterDefinition, EcrTagParameterFactory};
pub use error::ParameterError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::resolver::OptionList;

/// A configured parameter as it appears in settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Catalog key of the parameter type (e.g., "ecrTag")
    #[serde(rename = "type")]
    pub parameter_type: String,
    /// Parameter name, also used as the environment variable name of its value
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Repository identifiers (names or ARNs), in display order
    #[serde(default, alias = "repository_arns")]
    pub repositories: Vec<String>,
}

/// Concrete value chosen for an image tag parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterValue {
    pub name: String,
    pub repository: String,
    pub tag: String,
}

impl ParameterValue {
    /// Full image reference, `repository:tag`
    pub fn image_reference(&self) -> String {
        crate::resolver::format_option(&self.repository, &self.tag)
    }

    /// Environment variable handed to the build, `(name, repository:tag)`
    pub fn env_var(&self) -> (String, String) {
        (self.name.clone(), self.image_reference())
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.image_reference())
    }
}

/// A build parameter whose choices were resolved up front
pub trait ParameterDefinition: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str>;

    /// Catalog key of this parameter's type
    fn parameter_type(&self) -> &str;

    /// Choices resolved when the definition was created
    fn choices(&self) -> &OptionList;

    /// Convert a selected choice into a concrete value
    fn create_value(&self, selected: &str) -> Result<ParameterValue, ParameterError>;

    /// Value used when nothing was selected
    fn default_value(&self) -> Option<ParameterValue> {
        self.choices()
            .first()
            .and_then(|choice| self.create_value(choice).ok())
    }

    /// Convert a form submission of the shape `{"name": ..., "value": ...}`
    ///
    /// A missing `name` is accepted; a different one is rejected.
    fn create_value_from_json(&self, submission: &Value) -> Result<ParameterValue, ParameterError> {
        if let Some(actual) = submission.get("name").and_then(Value::as_str) {
            if actual != self.name() {
                return Err(ParameterError::NameMismatch {
                    expected: self.name().to_string(),
                    actual: actual.to_string(),
                });
            }
        }

        let selected = submission
            .get("value")
            .and_then(Value::as_str)
            .ok_or_else(|| ParameterError::MissingValue {
                name: self.name().to_string(),
            })?;

        self.create_value(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_accepts_repository_arns_alias() {
        let spec: ParameterSpec = serde_json::from_value(serde_json::json!({
            "type": "ecrTag",
            "name": "IMAGE",
            "repository_arns": ["repoA", "repoB"]
        }))
        .unwrap();

        assert_eq!(spec.parameter_type, "ecrTag");
        assert_eq!(spec.repositories, vec!["repoA", "repoB"]);
        assert_eq!(spec.description, None);
    }

    #[test]
    fn test_value_rendering() {
        let value = ParameterValue {
            name: "IMAGE".to_string(),
            repository: "repoA".to_string(),
            tag: "abc123".to_string(),
        };
        assert_eq!(value.image_reference(), "repoA:abc123");
        assert_eq!(
            value.env_var(),
            ("IMAGE".to_string(), "repoA:abc123".to_string())
        );
        assert_eq!(value.to_string(), "IMAGE=repoA:abc123");
    }
}
