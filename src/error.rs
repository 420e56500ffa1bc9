// Error types for default gateway resolution

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Command not found: {}", .0.display())]
    CommandNotFound(PathBuf),

    #[error("Failed to execute command: {0}")]
    CommandExecution(String),

    #[error("Command `{command}` exited with status {}: {stderr}", describe_status(.status))]
    CommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Command `{command}` timed out after {timeout:?}")]
    CommandTimeout { command: String, timeout: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Convert error to user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::CommandNotFound(path) => {
                format!("{} is not installed. Install iproute2 or set --ip-path.", path.display())
            }
            AppError::CommandExecution(_) => {
                "Failed to start the routing table command. Check permissions.".to_string()
            }
            AppError::CommandFailed { .. } => {
                "The routing table command reported an error.".to_string()
            }
            AppError::CommandTimeout { .. } => {
                "The routing table command did not finish in time. Try a larger --timeout.".to_string()
            }
            AppError::Io(_) => "File system error. Check permissions.".to_string(),
            AppError::Config(_) => {
                "Configuration error. Check your config file or command-line arguments.".to_string()
            }
            AppError::Serialization(_) => {
                "Data format error. This might be a bug, please report it.".to_string()
            }
        }
    }
}
