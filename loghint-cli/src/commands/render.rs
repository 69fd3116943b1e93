//! `loghint render` command handler

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use loghint_core::event::DiscoveryEvent;
use loghint_hints::{ConfigGenerator, GeneratedConfig};

use crate::cli::RenderArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `render` command.
pub async fn execute(
    args: RenderArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = super::load_config_or_default(config_path).await?;
    let modules_dir = args
        .modules_dir
        .unwrap_or_else(|| PathBuf::from(&config.hints.modules_dir));
    let registry = super::load_registry(&modules_dir).await?;

    let content = read_event(&args.event).await?;
    let event = DiscoveryEvent::from_json(&content)?;

    let generator = ConfigGenerator::from_config(&config.hints, Arc::new(registry));
    let configs = generator.generate(&event);
    info!(
        event = %args.event.display(),
        count = configs.len(),
        "rendered configs"
    );

    let report = RenderReport::new(args.event.display().to_string(), configs);
    writer.render(&report)
}

async fn read_event(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let content = tokio::task::spawn_blocking(|| {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map(|_| buf)
        })
        .await
        .map_err(|e| CliError::Command(format!("stdin reader failed: {e}")))??;
        return Ok(content);
    }
    Ok(tokio::fs::read_to_string(path).await?)
}

/// Rendered configs for one event.
#[derive(Serialize)]
pub struct RenderReport {
    /// Event source (file path or `-`)
    pub source: String,
    /// Number of generated configs
    pub count: usize,
    /// Generated configs in hint-set order
    pub configs: Vec<GeneratedConfig>,
}

impl RenderReport {
    pub fn new(source: String, configs: Vec<GeneratedConfig>) -> Self {
        Self {
            source,
            count: configs.len(),
            configs,
        }
    }
}

impl Render for RenderReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Generated configs for {} ({} total)",
            self.source.bold(),
            self.count.to_string().bold()
        )?;

        if self.configs.is_empty() {
            writeln!(w, "  {}", "no configs (suppressed or unresolved)".yellow())?;
            return Ok(());
        }

        for (index, config) in self.configs.iter().enumerate() {
            writeln!(w)?;
            let label = match config {
                GeneratedConfig::Input(input) => {
                    let input_type = input
                        .get("type")
                        .and_then(|t| t.as_str())
                        .unwrap_or("input");
                    format!("input ({input_type})")
                }
                GeneratedConfig::Module(module) => {
                    let name = module
                        .get("module")
                        .and_then(|m| m.as_str())
                        .unwrap_or("?");
                    format!("module ({name})")
                }
            };
            writeln!(w, "{} {}", format!("#{}", index + 1).cyan(), label.bold())?;
            let body = serde_json::to_string_pretty(config.as_mapping())
                .map_err(std::io::Error::other)?;
            writeln!(w, "{body}")?;
        }

        Ok(())
    }
}
