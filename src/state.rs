use anyhow::Result;
use std::sync::Arc;

use crate::catalog::ParameterCatalog;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::parameter::{EcrTagParameterFactory, ParameterDefinition};
use crate::registry::{providers::FixedRegistry, RegistryClient};
use crate::resolver::TagResolver;
use crate::settings::{RegistrySettings, Settings};

/// Shared services built from settings
#[derive(Clone)]
pub struct AppState {
    pub registry_client: Arc<dyn RegistryClient>,
    pub resolver: Arc<TagResolver>,
    pub catalog: Arc<ParameterCatalog>,
}

/// Initialize the registry client from settings
async fn init_registry_client(settings: &RegistrySettings) -> Result<Arc<dyn RegistryClient>> {
    match settings {
        #[cfg(feature = "aws")]
        RegistrySettings::Ecr(ecr_config) => {
            use crate::registry::providers::EcrRegistryClient;
            use anyhow::Context;

            let client = EcrRegistryClient::new(ecr_config.clone())
                .await
                .context("Failed to initialize ECR registry client")?;
            tracing::info!("Initialized ECR registry client in {}", client.region());
            Ok(Arc::new(client))
        }
        #[cfg(not(feature = "aws"))]
        RegistrySettings::Ecr(_) => {
            anyhow::bail!("ECR registry configured but this build has no AWS support (enable the 'aws' feature)")
        }
        RegistrySettings::Fixed(fixed_config) => {
            tracing::info!(
                "Initialized fixed registry with {} repositories",
                fixed_config.repositories.len()
            );
            Ok(Arc::new(FixedRegistry::from_config(fixed_config.clone())))
        }
    }
}

impl AppState {
    pub async fn new(settings: &Settings) -> Result<Self> {
        let registry_client = init_registry_client(&settings.registry).await?;
        Ok(Self::with_registry_client(
            settings,
            registry_client,
            Arc::new(TracingSink),
        ))
    }

    /// Build state around an existing registry client and diagnostic sink
    pub fn with_registry_client(
        settings: &Settings,
        registry_client: Arc<dyn RegistryClient>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let resolver = Arc::new(
            TagResolver::new(registry_client.clone())
                .with_diagnostics(diagnostics)
                .with_concurrency(settings.resolver.concurrency),
        );

        let mut catalog = ParameterCatalog::new();
        catalog.register(Arc::new(EcrTagParameterFactory::new(resolver.clone())));

        Self {
            registry_client,
            resolver,
            catalog: Arc::new(catalog),
        }
    }

    /// Create every configured parameter, in configuration order
    pub async fn create_parameters(
        &self,
        settings: &Settings,
    ) -> Result<Vec<Box<dyn ParameterDefinition>>> {
        let mut definitions = Vec::with_capacity(settings.parameters.len());
        for spec in &settings.parameters {
            definitions.push(self.catalog.create(spec).await?);
        }
        Ok(definitions)
    }
}
