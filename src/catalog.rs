use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::parameter::{ParameterDefinition, ParameterSpec};
use crate::resolver::ResolutionError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown parameter type '{0}'")]
    UnknownType(String),

    #[error("Failed to create parameter '{name}'")]
    Resolution {
        name: String,
        #[source]
        source: ResolutionError,
    },
}

/// Creates parameter definitions of one type from their configuration
#[async_trait]
pub trait ParameterFactory: Send + Sync {
    /// Parameter type identifier, used as the catalog key (e.g., "ecrTag")
    fn parameter_type(&self) -> &str;

    /// Human-readable name of the parameter type
    fn display_name(&self) -> &str;

    async fn create(
        &self,
        spec: &ParameterSpec,
    ) -> Result<Box<dyn ParameterDefinition>, CatalogError>;
}

/// Catalog of parameter types, keyed by type identifier
pub struct ParameterCatalog {
    factories: HashMap<String, Arc<dyn ParameterFactory>>,
}

impl ParameterCatalog {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a parameter type
    ///
    /// A factory registered under an existing type identifier replaces the
    /// previous one.
    pub fn register(&mut self, factory: Arc<dyn ParameterFactory>) {
        let parameter_type = factory.parameter_type().to_string();
        if self
            .factories
            .insert(parameter_type.clone(), factory)
            .is_some()
        {
            tracing::debug!("Replaced factory for parameter type {}", parameter_type);
        }
    }

    pub fn get(&self, parameter_type: &str) -> Option<Arc<dyn ParameterFactory>> {
        self.factories.get(parameter_type).cloned()
    }

    /// Registered types as `(type, display name)`, sorted by type
    pub fn list(&self) -> Vec<(String, String)> {
        let mut types: Vec<_> = self
            .factories
            .values()
            .map(|f| (f.parameter_type().to_string(), f.display_name().to_string()))
            .collect();
        types.sort();
        types
    }

    /// Create a parameter definition through the factory for its type
    pub async fn create(
        &self,
        spec: &ParameterSpec,
    ) -> Result<Box<dyn ParameterDefinition>, CatalogError> {
        let factory = self
            .get(&spec.parameter_type)
            .ok_or_else(|| CatalogError::UnknownType(spec.parameter_type.clone()))?;
        factory.create(spec).await
    }
}

impl Default for ParameterCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ecr_tag::{ECR_TAG_DISPLAY_NAME, ECR_TAG_TYPE};
    use crate::parameter::EcrTagParameterFactory;
    use crate::registry::providers::FixedRegistry;
    use crate::resolver::TagResolver;

    fn catalog(registry: FixedRegistry) -> ParameterCatalog {
        let resolver = Arc::new(TagResolver::new(Arc::new(registry)));
        let mut catalog = ParameterCatalog::new();
        catalog.register(Arc::new(EcrTagParameterFactory::new(resolver)));
        catalog
    }

    fn spec(parameter_type: &str, repositories: &[&str]) -> ParameterSpec {
        ParameterSpec {
            parameter_type: parameter_type.to_string(),
            name: "IMAGE".to_string(),
            description: None,
            repositories: repositories.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_list_registered_types() {
        let catalog = catalog(FixedRegistry::new());
        assert_eq!(
            catalog.list(),
            vec![(ECR_TAG_TYPE.to_string(), ECR_TAG_DISPLAY_NAME.to_string())]
        );
        assert!(catalog.get(ECR_TAG_TYPE).is_some());
        assert!(catalog.get("choice").is_none());
    }

    #[tokio::test]
    async fn test_create_through_catalog() {
        let catalog = catalog(FixedRegistry::new().with_latest_tags("repoA", ["abc123"]));

        let definition = catalog.create(&spec(ECR_TAG_TYPE, &["repoA"])).await.unwrap();
        assert_eq!(definition.parameter_type(), ECR_TAG_TYPE);
        assert_eq!(definition.choices().as_slice(), ["repoA:abc123"]);
    }

    #[tokio::test]
    async fn test_unknown_type() {
        let catalog = catalog(FixedRegistry::new());

        let err = catalog.create(&spec("choice", &[])).await.unwrap_err();
        assert!(matches!(err, CatalogError::UnknownType(ref t) if t == "choice"));
    }

    #[tokio::test]
    async fn test_resolution_failure_names_parameter() {
        let catalog = catalog(FixedRegistry::new());

        let err = catalog
            .create(&spec(ECR_TAG_TYPE, &["missing"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to create parameter 'IMAGE'");
        assert!(matches!(err, CatalogError::Resolution { .. }));
    }
}
