//! `loghint config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use loghint_core::config::LoghintConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if the file cannot be loaded or fails validation.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = match LoghintConfig::load(config_path).await {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Shows the effective configuration (file + env overrides + defaults).
/// The `hints` section also carries the resolved input template.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = super::load_config_or_default(config_path).await?;
    let report = ConfigReport::build(config_path.display().to_string(), &config, section)?;
    writer.render(&report)
}

fn to_toml<T: Serialize>(value: &T) -> String {
    toml::to_string_pretty(value).unwrap_or_else(|e| format!("(serialization error: {})", e))
}

/// Configuration display report.
///
/// `config_toml` is only used for text rendering.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Effective input template (hints section only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<serde_json::Value>,
    #[serde(skip)]
    pub config_toml: String,
}

impl ConfigReport {
    /// Build a report for the whole config or a single section.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Command` for an unknown section name.
    pub fn build(
        source: String,
        config: &LoghintConfig,
        section: Option<String>,
    ) -> Result<Self, CliError> {
        let Some(section_name) = section else {
            return Ok(Self {
                source,
                section: None,
                template: None,
                config_toml: to_toml(config),
            });
        };

        let (config_toml, template) = match section_name.as_str() {
            "general" => (to_toml(&config.general), None),
            "hints" => (
                to_toml(&config.hints),
                Some(serde_json::Value::Object(config.hints.template())),
            ),
            _ => {
                return Err(CliError::Command(format!(
                    "unknown section: {} (expected: general, hints)",
                    section_name
                )));
            }
        };

        Ok(Self {
            source,
            section: Some(section_name),
            template,
            config_toml,
        })
    }
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        if let Some(ref template) = self.template {
            writeln!(w)?;
            writeln!(w, "{}", "Effective input template:".bold())?;
            let body = serde_json::to_string_pretty(template).map_err(std::io::Error::other)?;
            writeln!(w, "{body}")?;
        }

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
