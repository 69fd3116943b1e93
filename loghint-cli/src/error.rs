//! CLI-specific error types and exit code mapping

use loghint_core::error::LoghintError;
use loghint_hints::HintsError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// Module manifest loading failed.
    #[error("module registry error: {0}")]
    Registry(String),

    /// JSON (de)serialisation failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from loghint-core.
    #[error("{0}")]
    Core(#[from] LoghintError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                      |
    /// |------|------------------------------|
    /// | 0    | Success                      |
    /// | 1    | General / command error      |
    /// | 2    | Configuration error          |
    /// | 3    | Module registry error        |
    /// | 10   | IO error                     |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(LoghintError::Config(_)) => 2,
            Self::Registry(_) | Self::Core(LoghintError::Registry(_)) => 3,
            Self::Io(_) | Self::Core(LoghintError::Io(_)) => 10,
            Self::Json(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<HintsError> for CliError {
    fn from(e: HintsError) -> Self {
        match e {
            HintsError::ModuleLoad { .. } | HintsError::ModuleValidation { .. } => {
                Self::Registry(e.to_string())
            }
            HintsError::Io(io) => Self::Io(io),
            other => Self::Command(other.to_string()),
        }
    }
}
