//! Error types for the command line front end.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for everything above the packaging engine
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI and configuration errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Packaging engine errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// A configuration value is out of range
    #[error("Invalid configuration in {}: {reason}", path.display())]
    InvalidConfig {
        /// File the value came from
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// `MACAPP_CONFIG` names a file that does not exist
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound {
        /// Path named by the environment
        path: PathBuf,
    },
}

impl BundlerError {
    /// The external command line that failed, if that is what went wrong.
    pub fn failed_command(&self) -> Option<(&str, &str)> {
        match self {
            BundlerError::Bundler(crate::bundler::Error::CommandFailed {
                command, stderr, ..
            }) => Some((command.as_str(), stderr.as_str())),
            _ => None,
        }
    }
}
