//! Registry backed by a fixed, in-memory set of repositories.
//!
//! Useful for local development without AWS access and as the registry behind
//! resolver tests. Repositories that are not configured answer like ECR does
//! for an unknown repository: with a service error.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::registry::{models::ImageRecord, RegistryClient, RegistryError};

/// Configured answer for one repository
#[derive(Debug, Clone)]
enum FixedEntry {
    Images(Vec<ImageRecord>),
    ServiceFailure(String),
    ClientFailure(String),
}

/// Settings form of a fixed registry: repository name -> images, most recent first
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixedRegistryConfig {
    #[serde(default)]
    pub repositories: HashMap<String, Vec<ImageRecord>>,
}

/// In-memory registry with fixed contents
#[derive(Debug, Default)]
pub struct FixedRegistry {
    entries: HashMap<String, FixedEntry>,
    queries: Mutex<Vec<(String, i32)>>,
}

impl FixedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: FixedRegistryConfig) -> Self {
        config
            .repositories
            .into_iter()
            .fold(Self::new(), |registry, (name, images)| {
                registry.with_images(name, images)
            })
    }

    /// Add a repository whose images are listed most recent first
    pub fn with_images(mut self, repository: impl Into<String>, images: Vec<ImageRecord>) -> Self {
        self.entries
            .insert(repository.into(), FixedEntry::Images(images));
        self
    }

    /// Add a repository whose latest image carries the given tags
    pub fn with_latest_tags<I, S>(self, repository: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_images(repository, vec![ImageRecord::with_tags(tags)])
    }

    /// Make requests for a repository fail with a service error
    pub fn with_service_failure(
        mut self,
        repository: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.entries
            .insert(repository.into(), FixedEntry::ServiceFailure(message.into()));
        self
    }

    /// Make requests for a repository fail with a client error
    pub fn with_client_failure(
        mut self,
        repository: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.entries
            .insert(repository.into(), FixedEntry::ClientFailure(message.into()));
        self
    }

    /// Repositories queried so far, in call order
    pub fn queried(&self) -> Vec<String> {
        self.queries()
            .into_iter()
            .map(|(repository, _)| repository)
            .collect()
    }

    /// `(repository, limit)` of every query so far, in call order
    pub fn queries(&self) -> Vec<(String, i32)> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    fn record_query(&self, repository: &str, limit: i32) {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((repository.to_string(), limit));
        }
    }
}

#[async_trait]
impl RegistryClient for FixedRegistry {
    async fn describe_most_recent_images(
        &self,
        repository: &str,
        limit: i32,
    ) -> Result<Vec<ImageRecord>, RegistryError> {
        if repository.is_empty() {
            return Err(RegistryError::invalid_request(
                "repository identifier must not be empty",
            ));
        }
        self.record_query(repository, limit);

        match self.entries.get(repository) {
            Some(FixedEntry::Images(images)) => Ok(images
                .iter()
                .take(usize::try_from(limit).unwrap_or(0))
                .cloned()
                .collect()),
            Some(FixedEntry::ServiceFailure(message)) => Err(RegistryError::service(
                repository,
                message.clone(),
                message.clone(),
            )),
            Some(FixedEntry::ClientFailure(message)) => {
                Err(RegistryError::client(message.clone(), message.clone()))
            }
            None => {
                let message = format!("The repository with name '{}' does not exist", repository);
                Err(RegistryError::service(
                    repository,
                    message.clone(),
                    message,
                ))
            }
        }
    }

    fn registry_type(&self) -> &str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_at_most_limit_records() {
        let registry = FixedRegistry::new().with_images(
            "app",
            vec![
                ImageRecord::with_tags(["v3"]),
                ImageRecord::with_tags(["v2"]),
            ],
        );

        let records = registry.describe_most_recent_images("app", 1).await.unwrap();
        assert_eq!(records, vec![ImageRecord::with_tags(["v3"])]);
        assert_eq!(registry.queries(), vec![("app".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_unknown_repository_is_service_error() {
        let registry = FixedRegistry::new();
        let err = registry
            .describe_most_recent_images("missing", 1)
            .await
            .unwrap_err();
        assert!(err.is_service_error());
        assert_eq!(registry.queried(), vec!["missing".to_string()]);
    }

    #[tokio::test]
    async fn test_client_failure() {
        let registry = FixedRegistry::new().with_client_failure("app", "connection refused");
        let err = registry
            .describe_most_recent_images("app", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Client { .. }));
    }

    #[test]
    fn test_from_config() {
        let config: FixedRegistryConfig = serde_json::from_value(serde_json::json!({
            "repositories": {
                "app": [{ "tags": ["abc123"] }],
                "empty": []
            }
        }))
        .unwrap();

        let registry = FixedRegistry::from_config(config);
        assert_eq!(registry.entries.len(), 2);
    }
}
