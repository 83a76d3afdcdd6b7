pub mod error;
pub mod models;
pub mod providers;

pub use error::{BoxError, RegistryError};
pub use models::ImageRecord;

use async_trait::async_trait;

/// Trait for container registry clients
///
/// The resolver only needs one capability from a registry: describing the most
/// recent images of a repository. Transport, retry and pagination belong to the
/// implementation.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Describe up to `limit` images of a repository, most recent first
    ///
    /// # Arguments
    /// * `repository` - Repository identifier as configured (name or ARN)
    /// * `limit` - Maximum number of image records to return
    ///
    /// # Errors
    /// [`RegistryError::Service`] when the registry rejects the request for this
    /// repository, [`RegistryError::Client`] when the request could not be
    /// completed at all.
    async fn describe_most_recent_images(
        &self,
        repository: &str,
        limit: i32,
    ) -> Result<Vec<ImageRecord>, RegistryError>;

    /// Short identifier of the registry implementation (e.g., "ecr")
    fn registry_type(&self) -> &str;
}
