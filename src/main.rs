use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::resolve::ResolveArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the latest image tag of each repository against ECR
    #[command(visible_alias = "r")]
    Resolve(ResolveArgs),
    /// Create the configured parameters and show their choices
    #[command(visible_alias = "ls")]
    Parameters {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a choice of a configured parameter into its value
    Select {
        /// Parameter name
        parameter: String,
        /// Selected `repository:tag` choice (defaults to the first choice)
        selection: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the registered parameter types
    Types,
    /// Check configuration for errors and unused options
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for all commands (stderr, stdout carries command output)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve(args) => cli::resolve::handle_resolve(args).await,
        Commands::Parameters { json } => cli::parameters::handle_parameters(json).await,
        Commands::Select {
            parameter,
            selection,
            json,
        } => cli::parameters::handle_select(&parameter, selection.as_deref(), json).await,
        Commands::Types => cli::parameters::handle_types().await,
        Commands::CheckConfig => cli::config::handle_check_config(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_requires_repository() {
        assert!(Cli::try_parse_from(["ecr-tag", "resolve"]).is_err());

        let cli = Cli::try_parse_from(["ecr-tag", "resolve", "repoA", "repoB", "--json"]).unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.repositories, vec!["repoA", "repoB"]);
                assert_eq!(args.region, "us-east-1");
                assert_eq!(args.concurrency, 1);
                assert!(args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_select_without_choice() {
        let cli = Cli::try_parse_from(["ecr-tag", "select", "IMAGE"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Select { ref parameter, selection: None, .. } if parameter == "IMAGE"
        ));
    }
}
