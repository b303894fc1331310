//! Build, bundle, and package Swift Package Manager apps for macOS
//!
//! This library provides the packaging steps behind the `macapp` binary:
//! - Debug and release compiles, running, and formatting through `swift`
//! - `.app` bundle assembly with a generated Info.plist
//! - Drag-to-install DMG creation with a laid-out Finder window
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
