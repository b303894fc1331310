//! Packaging engine for Swift Package Manager macOS apps.
//!
//! Compiles the project, assembles a `.app` bundle around the release
//! executable, and wraps it in a drag-to-install DMG.
//!
//! Every external program goes through [`ToolRunner`], so each step can be
//! exercised without a macOS toolchain.

pub mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod toolchain;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{Action, ActionOutcome, Bundler};
pub use error::{Error, Result};
pub use settings::{
    BundleSettings, DmgSettings, FormatSettings, MacOsSettings, PackageSettings, RetryPolicy,
    Settings, SettingsBuilder,
};
pub use utils::process::{SystemRunner, ToolCommand, ToolOutput, ToolRunner};
