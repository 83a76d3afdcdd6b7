use thiserror::Error;

/// Boxed error cause carried by registry failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of a single registry call
///
/// The two variants separate failures scoped to one repository from failures
/// of the transport or credential layer underneath the client.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry was reached but rejected the request for this repository
    /// (repository not found, access denied, throttled, ...)
    #[error("Registry rejected request for repository '{repository}': {message}")]
    Service {
        repository: String,
        message: String,
        #[source]
        source: BoxError,
    },

    /// The request never got a registry answer (network, credentials,
    /// malformed request, ...)
    #[error("Registry client error: {message}")]
    Client {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl RegistryError {
    pub fn service(
        repository: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Service {
            repository: repository.into(),
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn client(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Client {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Client error raised before any request was sent
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
            source: None,
        }
    }

    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Service { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_service_error_keeps_cause() {
        let err = RegistryError::service("repoA", "repository not found", "RepositoryNotFoundException");
        assert!(err.is_service_error());
        assert_eq!(
            err.to_string(),
            "Registry rejected request for repository 'repoA': repository not found"
        );
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("RepositoryNotFoundException")
        );
    }

    #[test]
    fn test_invalid_request_has_no_cause() {
        let err = RegistryError::invalid_request("repository identifier must not be empty");
        assert!(!err.is_service_error());
        assert!(err.source().is_none());
    }
}
