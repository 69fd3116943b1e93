//! `loghint modules` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use loghint_core::registry::ModuleRegistry;

use crate::cli::{ModulesAction, ModulesArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `modules` command.
pub async fn execute(
    args: ModulesArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ModulesAction::List { modules_dir } => {
            execute_list(modules_dir, config_path, writer).await
        }
    }
}

async fn execute_list(
    modules_dir: Option<PathBuf>,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let dir = match modules_dir {
        Some(dir) => dir,
        None => {
            let config = super::load_config_or_default(config_path).await?;
            PathBuf::from(config.hints.modules_dir)
        }
    };

    let registry = super::load_registry(&dir).await?;
    let report = ModuleListReport::from_registry(dir.display().to_string(), &registry);
    writer.render(&report)
}

#[derive(Serialize)]
pub struct ModuleListReport {
    pub source: String,
    pub total: usize,
    pub modules: Vec<ModuleEntry>,
}

#[derive(Serialize)]
pub struct ModuleEntry {
    pub name: String,
    pub filesets: Vec<FilesetEntry>,
}

#[derive(Serialize)]
pub struct FilesetEntry {
    pub name: String,
    pub enabled_by_default: bool,
}

impl ModuleListReport {
    pub fn from_registry(source: String, registry: &dyn ModuleRegistry) -> Self {
        let modules: Vec<ModuleEntry> = registry
            .modules()
            .into_iter()
            .map(|name| ModuleEntry {
                name: name.to_owned(),
                filesets: registry
                    .filesets(name)
                    .unwrap_or_default()
                    .iter()
                    .map(|fs| FilesetEntry {
                        name: fs.name.clone(),
                        enabled_by_default: fs.default_enabled,
                    })
                    .collect(),
            })
            .collect();

        Self {
            source,
            total: modules.len(),
            modules,
        }
    }
}

impl Render for ModuleListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Modules in {} ({} total)",
            self.source.bold(),
            self.total.to_string().bold()
        )?;
        writeln!(w)?;
        writeln!(w, "{:<20} Filesets", "Module")?;
        writeln!(w, "{}", "-".repeat(60))?;

        for module in &self.modules {
            let filesets = module
                .filesets
                .iter()
                .map(|fs| {
                    if fs.enabled_by_default {
                        fs.name.green().to_string()
                    } else {
                        format!("{} (off)", fs.name).yellow().to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(w, "{:<20} {}", module.name, filesets)?;
        }

        Ok(())
    }
}
