//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// loghint -- generate log input configs from discovery hints.
///
/// Use `loghint <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "loghint", version, about, long_about = None)]
pub struct Cli {
    /// Path to the loghint.toml configuration file.
    #[arg(short, long, default_value = "loghint.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the configs generated for a discovery event.
    Render(RenderArgs),

    /// Inspect module manifests.
    Modules(ModulesArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- render ----

/// Generate configs for one discovery event read from a JSON file.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON file holding the discovery event (use `-` for stdin).
    #[arg(short, long)]
    pub event: PathBuf,

    /// Module manifest directory (overrides `hints.modules_dir`).
    #[arg(long)]
    pub modules_dir: Option<PathBuf>,
}

// ---- modules ----

/// Inspect module manifests.
#[derive(Args, Debug)]
pub struct ModulesArgs {
    #[command(subcommand)]
    pub action: ModulesAction,
}

#[derive(Subcommand, Debug)]
pub enum ModulesAction {
    /// List modules and their filesets.
    List {
        /// Module manifest directory (overrides `hints.modules_dir`).
        #[arg(long)]
        modules_dir: Option<PathBuf>,
    },
}

// ---- config ----

/// Manage loghint configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, hints).
        #[arg(long)]
        section: Option<String>,
    },
}
