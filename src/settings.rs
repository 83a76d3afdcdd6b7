use config::{Config, ConfigError};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::sync::OnceLock;

use crate::parameter::ParameterSpec;
use crate::registry::models::EcrConfig;
use crate::registry::providers::fixed::FixedRegistryConfig;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub registry: RegistrySettings,
    #[serde(default)]
    pub resolver: ResolverSettings,
    /// Parameter definitions built at startup
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

/// Registry the parameters resolve tags against
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RegistrySettings {
    /// AWS ECR, credentials from the default AWS credential chain
    Ecr(EcrConfig),
    /// Fixed in-memory repositories, for local development
    Fixed(FixedRegistryConfig),
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self::Ecr(EcrConfig::default())
    }
}

fn default_concurrency() -> usize {
    1
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResolverSettings {
    /// Maximum registry queries in flight during one resolution (default: 1, sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

impl Settings {
    /// Substitute environment variables in a string value
    /// Replaces ${VAR_NAME} or ${VAR_NAME:-default} with environment variable values
    fn substitute_env_vars_in_string(s: &str) -> String {
        static ENV_VAR_PATTERN: OnceLock<regex::Regex> = OnceLock::new();
        let re = ENV_VAR_PATTERN.get_or_init(|| {
            regex::Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("valid env var pattern")
        });

        re.replace_all(s, |caps: &regex::Captures| {
            let default_value = caps.get(2).map(|m| m.as_str());
            env::var(&caps[1]).unwrap_or_else(|_| default_value.unwrap_or("").to_string())
        })
        .to_string()
    }

    /// Convert a config::Value to a serde_json::Value, performing environment variable substitution
    fn config_value_to_json(value: &config::Value) -> serde_json::Value {
        use config::ValueKind;

        match &value.kind {
            ValueKind::Nil => serde_json::Value::Null,
            ValueKind::Boolean(b) => serde_json::Value::Bool(*b),
            ValueKind::I64(i) => serde_json::Value::Number((*i).into()),
            ValueKind::I128(i) => serde_json::Value::Number((*i as i64).into()),
            ValueKind::U64(u) => serde_json::Value::Number((*u).into()),
            ValueKind::U128(u) => serde_json::Value::Number((*u as u64).into()),
            ValueKind::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ValueKind::String(s) => {
                serde_json::Value::String(Self::substitute_env_vars_in_string(s))
            }
            ValueKind::Table(table) => serde_json::Value::Object(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::config_value_to_json(v)))
                    .collect(),
            ),
            ValueKind::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(Self::config_value_to_json).collect())
            }
        }
    }

    /// Try to add a config file with multiple extension attempts (.toml, .yaml, .yml)
    /// Returns Ok(true) if a file was loaded, Ok(false) if no file found (when not required)
    fn try_add_config_file(
        builder: &mut config::ConfigBuilder<config::builder::DefaultState>,
        config_dir: &str,
        name: &str,
        required: bool,
    ) -> Result<bool, ConfigError> {
        for ext in ["toml", "yaml", "yml"] {
            let path = format!("{}/{}.{}", config_dir, name, ext);
            if std::path::Path::new(&path).exists() {
                tracing::info!("Loading config file: {}", path);
                *builder = builder
                    .clone()
                    .add_source(config::File::with_name(&format!("{}/{}", config_dir, name)));
                return Ok(true);
            }
        }

        if required {
            Err(ConfigError::Message(format!(
                "Required config file not found: {}/{}.{{toml,yaml,yml}}",
                config_dir, name
            )))
        } else {
            tracing::debug!(
                "Optional config file not found: {}/{}.{{toml,yaml,yml}}",
                config_dir,
                name
            );
            Ok(false)
        }
    }

    /// Load settings from the config directory
    ///
    /// Files are layered in order `default` (required), `$ECR_TAG_CONFIG_RUN_MODE`
    /// (default "development") and `local`, each as .toml, .yaml or .yml, in
    /// `$ECR_TAG_CONFIG_DIR` (default "config").
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("ECR_TAG_CONFIG_RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = env::var("ECR_TAG_CONFIG_DIR").unwrap_or_else(|_| "config".into());

        Self::load(&config_dir, &run_mode)
    }

    /// Load settings from an explicit config directory and run mode
    pub fn load(config_dir: &str, run_mode: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        Self::try_add_config_file(&mut builder, config_dir, "default", true)?;
        Self::try_add_config_file(&mut builder, config_dir, run_mode, false)?;
        Self::try_add_config_file(&mut builder, config_dir, "local", false)?;

        let config = builder.build()?;

        let root_value = config
            .cache
            .into_table()
            .map_err(|e| ConfigError::Message(format!("Failed to get config table: {}", e)))?;

        let json_value = serde_json::Value::Object(
            root_value
                .iter()
                .map(|(k, v)| (k.clone(), Self::config_value_to_json(v)))
                .collect(),
        );

        let mut unused_fields = Vec::new();
        let settings: Settings = serde_ignored::deserialize(json_value, |path| {
            unused_fields.push(path.to_string());
        })
        .map_err(|e| ConfigError::Message(format!("Failed to deserialize settings: {}", e)))?;

        for field in &unused_fields {
            tracing::warn!("Unknown configuration field: {}", field);
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.concurrency == 0 {
            return Err(ConfigError::Message(
                "resolver.concurrency must be at least 1".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for parameter in &self.parameters {
            if parameter.name.is_empty() {
                return Err(ConfigError::Message(
                    "Parameter name must not be empty".to_string(),
                ));
            }
            if !names.insert(parameter.name.as_str()) {
                return Err(ConfigError::Message(format!(
                    "Duplicate parameter name: {}",
                    parameter.name
                )));
            }
            if let Some(index) = parameter.repositories.iter().position(String::is_empty) {
                return Err(ConfigError::Message(format!(
                    "Parameter {} has an empty repository identifier at position {}",
                    parameter.name, index
                )));
            }
        }

        Ok(())
    }

    /// Look up a configured parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }
}
