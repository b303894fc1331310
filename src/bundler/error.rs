//! Error types for bundling operations.
//!
//! Every failure inside the bundler surfaces as [`Error`]. The [`Context`] and
//! [`ErrorExt`] traits attach human-readable context to fallible results, and
//! [`bail!`](crate::bail) returns early with a formatted [`Error::GenericError`].

use std::{fmt::Display, path::PathBuf};
use thiserror::Error as ThisError;

/// Result type alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while compiling, assembling, or packaging.
#[derive(ThisError, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Free-form error message.
    #[error("{0}")]
    GenericError(String),

    /// Underlying I/O failure.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Filesystem operation failed on a specific path.
    #[error("{context} ({}): {source}", .path.display())]
    Fs {
        /// What was being done.
        context: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Original I/O error.
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully.
    #[error("Command failed: {command}{}", format_stderr(.stderr))]
    CommandFailed {
        /// Full command line, space separated.
        command: String,
        /// Exit code, `None` when terminated by a signal.
        status: Option<i32>,
        /// Captured stderr (empty when output was inherited).
        stderr: String,
    },

    /// An external tool could not be started at all.
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Original I/O error.
        source: std::io::Error,
    },

    /// `hdiutil attach` printed no `/dev/... /Volumes/...` line.
    #[error(
        "Failed to determine mount point from hdiutil output\nAvailable lines:{}",
        .lines.iter().map(|line| format!("\n  {line}")).collect::<String>()
    )]
    MountPointNotFound {
        /// Raw stdout lines, kept for diagnostics.
        lines: Vec<String>,
    },

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Property list parsing failed.
    #[error("Info.plist error: {0}")]
    Plist(#[from] plist::Error),

    /// Directory traversal failed.
    #[error("{0}")]
    Walkdir(#[from] walkdir::Error),

    /// Path prefix stripping failed during tree copy.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Invalid glob pattern in the format configuration.
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\nError: {trimmed}")
    }
}

/// Adds context to `Option` and `Result` values, converting them into [`Error`].
pub trait Context<T> {
    /// Attach a static message.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Attach a lazily built message.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

/// Attaches a path to raw I/O errors.
pub trait ErrorExt<T> {
    /// Wrap an I/O error as [`Error::Fs`] naming the operation and path.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.into(),
            source,
        })
    }
}

/// Return early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
