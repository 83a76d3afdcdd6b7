use anyhow::{Context, Result};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Table};
use serde::Serialize;

use ecr_tag_parameter::settings::Settings;
use ecr_tag_parameter::state::AppState;
use ecr_tag_parameter::ParameterDefinition;

#[derive(Debug, Serialize)]
struct ParameterSummary<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    parameter_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    choices: &'a [String],
}

impl<'a> From<&'a dyn ParameterDefinition> for ParameterSummary<'a> {
    fn from(definition: &'a dyn ParameterDefinition) -> Self {
        Self {
            name: definition.name(),
            parameter_type: definition.parameter_type(),
            description: definition.description(),
            choices: definition.choices().as_slice(),
        }
    }
}

async fn load() -> Result<(Settings, AppState)> {
    let settings = Settings::new().context("Failed to load configuration")?;
    let state = AppState::new(&settings).await?;
    Ok((settings, state))
}

/// Create every configured parameter and show its choices
pub async fn handle_parameters(json: bool) -> Result<()> {
    let (settings, state) = load().await?;
    let definitions = state.create_parameters(&settings).await?;

    if json {
        let summaries: Vec<ParameterSummary> = definitions
            .iter()
            .map(|d| ParameterSummary::from(d.as_ref()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if definitions.is_empty() {
        println!("No parameters configured.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("NAME").add_attribute(Attribute::Bold),
            Cell::new("TYPE").add_attribute(Attribute::Bold),
            Cell::new("DEFAULT").add_attribute(Attribute::Bold),
            Cell::new("CHOICES").add_attribute(Attribute::Bold),
        ]);

    for definition in &definitions {
        let default = definition
            .default_value()
            .map(|v| v.image_reference())
            .unwrap_or_else(|| "-".to_string());
        let choices = if definition.choices().is_empty() {
            "(none)".to_string()
        } else {
            definition.choices().as_slice().join("\n")
        };

        table.add_row(vec![
            Cell::new(definition.name()),
            Cell::new(definition.parameter_type()),
            Cell::new(default),
            Cell::new(choices),
        ]);
    }

    println!("{}", table);
    Ok(())
}

/// Convert a selection of a configured parameter into its value
///
/// Without a selection the parameter's default (first choice) is used.
pub async fn handle_select(parameter: &str, selection: Option<&str>, json: bool) -> Result<()> {
    let (settings, state) = load().await?;

    let spec = settings
        .parameter(parameter)
        .with_context(|| format!("Parameter '{}' is not configured", parameter))?;
    let definition = state.catalog.create(spec).await?;

    let value = match selection {
        Some(selection) => definition.create_value(selection)?,
        None => definition
            .default_value()
            .with_context(|| format!("Parameter '{}' has no choices", parameter))?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", value);
    }

    Ok(())
}

/// List registered parameter types
pub async fn handle_types() -> Result<()> {
    let (_, state) = load().await?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("TYPE").add_attribute(Attribute::Bold),
            Cell::new("DISPLAY NAME").add_attribute(Attribute::Bold),
        ]);

    for (parameter_type, display_name) in state.catalog.list() {
        table.add_row(vec![Cell::new(parameter_type), Cell::new(display_name)]);
    }

    println!("{}", table);
    Ok(())
}
