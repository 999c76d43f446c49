//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use locbridge::config::ConfigFileError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file error
    Config(ConfigFileError),
    /// `--options` is not valid JSON
    InvalidOptions(serde_json::Error),
    /// Failed to read the fixes file
    FixesRead { path: String, error: std::io::Error },
    /// A line of the fixes file is not a valid callback record
    FixesParse { path: String, error: serde_json::Error },
    /// Failed to install the Ctrl-C handler
    Signal(String),
    /// Failed to build the async runtime
    Runtime(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::InvalidOptions(_) => {
                eprintln!();
                eprintln!("Options must be a JSON object, for example:");
                eprintln!("  --options '{{\"accuracy\": \"HighAccuracy\", \"interval\": 5000}}'");
                eprintln!("Run 'locbridge keys' to list the recognized keys.");
            }
            CliError::FixesParse { .. } => {
                eprintln!();
                eprintln!("Each line must be one JSON callback record, for example:");
                eprintln!("  {{\"locationType\": 1, \"latitude\": 31.2, \"longitude\": 121.5}}");
                eprintln!("  {{\"errorCode\": 12, \"errorInfo\": \"permission denied\"}}");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidOptions(e) => write!(f, "Invalid options JSON: {}", e),
            CliError::FixesRead { path, error } => {
                write!(f, "Failed to read fixes file '{}': {}", path, error)
            }
            CliError::FixesParse { path, error } => {
                write!(f, "Invalid fixes file '{}': {}", path, error)
            }
            CliError::Signal(msg) => write!(f, "Failed to set signal handler: {}", msg),
            CliError::Runtime(msg) => write!(f, "Failed to create async runtime: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::InvalidOptions(e) => Some(e),
            CliError::FixesRead { error, .. } => Some(error),
            CliError::FixesParse { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}
