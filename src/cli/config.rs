use anyhow::Result;

use ecr_tag_parameter::settings::{RegistrySettings, Settings};

/// Validate configuration and print a short summary
pub fn handle_check_config() -> Result<()> {
    println!("Checking configuration...");
    match Settings::new() {
        Ok(settings) => {
            let registry = match &settings.registry {
                RegistrySettings::Ecr(ecr) => format!("ecr ({})", ecr.region),
                RegistrySettings::Fixed(fixed) => {
                    format!("fixed ({} repositories)", fixed.repositories.len())
                }
            };
            println!("✓ Configuration is valid");
            println!("  registry:    {}", registry);
            println!("  concurrency: {}", settings.resolver.concurrency);
            println!("  parameters:  {}", settings.parameters.len());
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}
