//! User-facing terminal output.
//!
//! Progress and results go to stdout, problems to stderr. Logging through
//! the `log` facade is separate and controlled by `RUST_LOG`.

use std::io::{self, Write};

/// Prints progress and results for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputManager;

impl OutputManager {
    /// Creates an output manager.
    pub fn new() -> Self {
        Self
    }

    /// A step is starting.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{message}")
    }

    /// A step finished.
    pub fn success(&self, message: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "✅ {message}")
    }

    /// Something degraded but the run continues.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "Warning: {message}")
    }

    /// The run failed.
    pub fn error(&self, message: &str) -> io::Result<()> {
        writeln!(io::stderr().lock(), "{message}")
    }

    /// Detail under the previous line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "  {message}")
    }
}
