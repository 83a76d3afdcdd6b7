use anyhow::Result;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ecr::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecr::Client as EcrClient;

use crate::registry::{
    models::{sort_most_recent_first, EcrConfig, ImageRecord},
    RegistryClient, RegistryError,
};

/// Extract a readable message from an AWS SDK error
///
/// Service errors carry an error code and message from ECR. Everything else
/// (dispatch failures, timeouts, credential errors) only has the verbose
/// error context, which is truncated.
fn format_sdk_error<E, R>(err: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if err.as_service_error().is_some() {
        match (err.code(), err.message()) {
            (Some(code), Some(message)) => return format!("{}: {}", code, message),
            (None, Some(message)) => return message.to_string(),
            (Some(code), None) => return code.to_string(),
            (None, None) => {}
        }
    }

    let context = DisplayErrorContext(err).to_string();
    if context.len() > 200 {
        let cut = context
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= 200)
            .last()
            .unwrap_or(0);
        format!("{}...", &context[..cut])
    } else {
        context
    }
}

/// Split an SDK error into the service / client kinds the resolver acts on
fn classify_sdk_error<E, R>(repository: &str, err: SdkError<E, R>) -> RegistryError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let message = format_sdk_error(&err);
    if err.as_service_error().is_some() {
        RegistryError::service(repository, message, err)
    } else {
        RegistryError::client(message, err)
    }
}

fn image_record_from_detail(detail: &aws_sdk_ecr::types::ImageDetail) -> ImageRecord {
    ImageRecord {
        tags: detail.image_tags().to_vec(),
        digest: detail.image_digest().map(String::from),
        pushed_at: detail
            .image_pushed_at()
            .and_then(|t| chrono::DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
    }
}

/// AWS ECR registry client
///
/// Credentials come from the default AWS credential chain (environment,
/// profile, instance or task role). The region is fixed by configuration.
pub struct EcrRegistryClient {
    client: EcrClient,
    region: String,
}

impl EcrRegistryClient {
    /// Create a new ECR client from configuration
    pub async fn new(config: EcrConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(endpoint_url) = &config.endpoint_url {
            tracing::debug!("Using ECR endpoint override: {}", endpoint_url);
            loader = loader.endpoint_url(endpoint_url);
        }

        let aws_config = loader.load().await;
        let client = EcrClient::new(&aws_config);

        Ok(Self {
            client,
            region: config.region,
        })
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: EcrClient, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl RegistryClient for EcrRegistryClient {
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

        tracing::debug!(
            "Describing up to {} image(s) of ECR repository {} in {}",
            limit,
            repository,
            self.region
        );

        let response = self
            .client
            .describe_images()
            .repository_name(repository)
            .max_results(limit)
            .send()
            .await
            .map_err(|e| classify_sdk_error(repository, e))?;

        let mut records: Vec<ImageRecord> = response
            .image_details()
            .iter()
            .map(image_record_from_detail)
            .collect();
        sort_most_recent_first(&mut records);

        Ok(records)
    }

    fn registry_type(&self) -> &str {
        "ecr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ecr::primitives::DateTime;
    use aws_sdk_ecr::types::ImageDetail;

    #[test]
    fn test_image_record_from_detail() {
        let detail = ImageDetail::builder()
            .image_tags("v2")
            .image_tags("v1")
            .image_digest("sha256:abc")
            .image_pushed_at(DateTime::from_secs(1_700_000_000))
            .build();

        let record = image_record_from_detail(&detail);
        assert_eq!(record.tags, vec!["v2".to_string(), "v1".to_string()]);
        assert_eq!(record.first_tag(), Some("v2"));
        assert_eq!(record.digest.as_deref(), Some("sha256:abc"));
        assert_eq!(record.pushed_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_untagged_detail_has_no_tags() {
        let detail = ImageDetail::builder().image_digest("sha256:def").build();
        let record = image_record_from_detail(&detail);
        assert!(record.tags.is_empty());
        assert!(record.pushed_at.is_none());
    }

    #[tokio::test]
    async fn test_empty_repository_rejected_without_request() {
        let config = aws_sdk_ecr::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(aws_config::Region::new("us-east-1"))
            .build();
        let client = EcrRegistryClient::from_client(EcrClient::from_conf(config), "us-east-1");

        let err = client.describe_most_recent_images("", 1).await.unwrap_err();
        assert!(matches!(err, RegistryError::Client { source: None, .. }));
    }
}
