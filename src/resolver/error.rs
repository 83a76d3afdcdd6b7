use thiserror::Error;

use crate::registry::RegistryError;

/// Fatal failure of a tag resolution
///
/// No partial option list is produced when one of these is returned. The
/// registry failure that caused it is kept as the error source.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The registry rejected the request for one repository
    #[error("Failed to get image tags for {repository}")]
    Service {
        repository: String,
        #[source]
        source: RegistryError,
    },

    /// The registry client itself failed
    #[error("Failed to query container registry")]
    Client {
        #[source]
        source: RegistryError,
    },
}

impl ResolutionError {
    /// Repository the failure is attributed to, if it is repository specific
    pub fn repository(&self) -> Option<&str> {
        match self {
            Self::Service { repository, .. } => Some(repository),
            Self::Client { .. } => None,
        }
    }

    pub fn cause(&self) -> &RegistryError {
        match self {
            Self::Service { source, .. } | Self::Client { source } => source,
        }
    }
}
