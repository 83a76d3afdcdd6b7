pub mod error;
pub mod options;

pub use error::ResolutionError;
pub use options::{format_option, OptionList};

use futures::{stream, StreamExt};
use std::sync::Arc;

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::registry::{ImageRecord, RegistryClient, RegistryError};

/// Only the most recently pushed image of each repository is considered
const LATEST_IMAGE_LIMIT: i32 = 1;

/// Resolves the latest image tag of each repository into selectable options
///
/// Repositories are queried in input order. A repository whose latest image has
/// no tag is skipped with a warning; any registry failure aborts the whole
/// resolution.
///
/// With a concurrency above one, up to that many queries are in flight at once,
/// but results are still consumed in input order. Output order and the error
/// that gets reported therefore do not depend on completion order.
pub struct TagResolver {
    client: Arc<dyn RegistryClient>,
    diagnostics: Arc<dyn DiagnosticSink>,
    concurrency: usize,
}

impl TagResolver {
    /// Create a sequential resolver that logs diagnostics through `tracing`
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self {
            client,
            diagnostics: Arc::new(TracingSink),
            concurrency: 1,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Allow up to `concurrency` registry queries in flight (minimum 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn registry_type(&self) -> &str {
        self.client.registry_type()
    }

    /// Resolve `repository:tag` options for the given repositories
    ///
    /// # Errors
    /// Returns [`ResolutionError::Service`] for the first repository (by input
    /// order) the registry rejected, after reporting it as severe, or
    /// [`ResolutionError::Client`] when the registry client failed.
    pub async fn resolve_tags<S: AsRef<str>>(
        &self,
        repositories: &[S],
    ) -> Result<OptionList, ResolutionError> {
        tracing::debug!(
            "Resolving latest image tags for {} repositories (concurrency {})",
            repositories.len(),
            self.concurrency
        );

        let repositories: Vec<&str> = repositories.iter().map(|r| r.as_ref()).collect();

        // Futures are created up front; none is polled before `buffered` takes it.
        let lookups: Vec<_> = repositories
            .iter()
            .copied()
            .map(|repository| async move {
                let result = self
                    .client
                    .describe_most_recent_images(repository, LATEST_IMAGE_LIMIT)
                    .await;
                (repository, result)
            })
            .collect();
        let mut lookups = stream::iter(lookups).buffered(self.concurrency);

        let mut options = OptionList::new();

        while let Some((repository, result)) = lookups.next().await {
            let images = match result {
                Ok(images) => images,
                Err(err @ RegistryError::Service { .. }) => {
                    self.diagnostics.severe(
                        repository,
                        &format!("Failed to get image tags for {}", repository),
                    );
                    return Err(ResolutionError::Service {
                        repository: repository.to_string(),
                        source: err,
                    });
                }
                Err(err) => return Err(ResolutionError::Client { source: err }),
            };

            match images.first().and_then(ImageRecord::first_tag) {
                Some(tag) => options.push(repository, tag),
                None => self.diagnostics.warn(
                    repository,
                    &format!("Repository {} is empty, no image tags found.", repository),
                ),
            }
        }

        tracing::debug!("Resolved {} image tag option(s)", options.len());
        Ok(options)
    }
}
