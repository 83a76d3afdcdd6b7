use anyhow::{Context, Result};
use std::sync::Arc;

use ecr_tag_parameter::registry::models::EcrConfig;
use ecr_tag_parameter::registry::providers::EcrRegistryClient;
use ecr_tag_parameter::TagResolver;

#[derive(Debug, Clone, clap::Args)]
pub struct ResolveArgs {
    /// Repository names or ARNs, in display order
    #[arg(required = true)]
    pub repositories: Vec<String>,
    /// AWS region of the repositories
    #[arg(long, default_value = "us-east-1")]
    pub region: String,
    /// ECR endpoint override (e.g., http://localhost:4566)
    #[arg(long)]
    pub endpoint_url: Option<String>,
    /// Maximum registry queries in flight
    #[arg(long, default_value = "1")]
    pub concurrency: usize,
    /// Print the options as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Resolve the latest tag of each repository directly against ECR
pub async fn handle_resolve(args: ResolveArgs) -> Result<()> {
    let client = EcrRegistryClient::new(EcrConfig {
        region: args.region.clone(),
        endpoint_url: args.endpoint_url.clone(),
    })
    .await?;

    let resolver = TagResolver::new(Arc::new(client)).with_concurrency(args.concurrency);
    let options = resolver
        .resolve_tags(args.repositories.as_slice())
        .await
        .context("Failed to resolve image tags")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&options)?);
    } else if options.is_empty() {
        println!("No tagged images found.");
    } else {
        for option in options.iter() {
            println!("{}", option);
        }
    }

    Ok(())
}
