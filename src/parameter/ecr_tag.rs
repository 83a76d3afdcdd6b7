use async_trait::async_trait;
use std::sync::Arc;

use super::{ParameterDefinition, ParameterError, ParameterSpec, ParameterValue};
use crate::catalog::{CatalogError, ParameterFactory};
use crate::resolver::{OptionList, ResolutionError, TagResolver};

/// Catalog key of the ECR image tag parameter
pub const ECR_TAG_TYPE: &str = "ecrTag";

/// Human-readable name of the ECR image tag parameter type
pub const ECR_TAG_DISPLAY_NAME: &str = "ECR Image Tags Parameter";

/// Build parameter offering the latest `repository:tag` of each configured repository
///
/// Choices are resolved once, when the definition is created, and kept for
/// presentation. A registry failure during creation fails the definition.
#[derive(Debug, Clone)]
pub struct EcrTagParameterDefinition {
    name: String,
    description: Option<String>,
    repositories: Vec<String>,
    choices: OptionList,
}

impl EcrTagParameterDefinition {
    /// Create the definition, resolving its choices immediately
    pub async fn new(
        name: impl Into<String>,
        repositories: Vec<String>,
        resolver: &TagResolver,
    ) -> Result<Self, ResolutionError> {
        let name = name.into();
        let choices = resolver.resolve_tags(repositories.as_slice()).await?;

        tracing::info!(
            "Resolved {} of {} repositories for parameter {}",
            choices.len(),
            repositories.len(),
            name
        );

        Ok(Self {
            name,
            description: None,
            repositories,
            choices,
        })
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }
}

impl ParameterDefinition for EcrTagParameterDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn parameter_type(&self) -> &str {
        ECR_TAG_TYPE
    }

    fn choices(&self) -> &OptionList {
        &self.choices
    }

    fn create_value(&self, selected: &str) -> Result<ParameterValue, ParameterError> {
        let (repository, tag) = self.choices.lookup(selected).ok_or_else(|| {
            ParameterError::UnknownOption {
                name: self.name.clone(),
                value: selected.to_string(),
            }
        })?;

        Ok(ParameterValue {
            name: self.name.clone(),
            repository: repository.to_string(),
            tag: tag.to_string(),
        })
    }
}

/// Catalog factory creating [`EcrTagParameterDefinition`]s with a shared resolver
pub struct EcrTagParameterFactory {
    resolver: Arc<TagResolver>,
}

impl EcrTagParameterFactory {
    pub fn new(resolver: Arc<TagResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ParameterFactory for EcrTagParameterFactory {
    fn parameter_type(&self) -> &str {
        ECR_TAG_TYPE
    }

    fn display_name(&self) -> &str {
        ECR_TAG_DISPLAY_NAME
    }

    async fn create(
        &self,
        spec: &ParameterSpec,
    ) -> Result<Box<dyn ParameterDefinition>, CatalogError> {
        let definition =
            EcrTagParameterDefinition::new(&spec.name, spec.repositories.clone(), &self.resolver)
                .await
                .map_err(|source| CatalogError::Resolution {
                    name: spec.name.clone(),
                    source,
                })?
                .with_description(spec.description.clone());

        Ok(Box::new(definition))
    }
}
