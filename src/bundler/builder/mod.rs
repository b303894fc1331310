//! Action orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that dispatches a
//! single [`Action`] to the toolchain and packaging modules.
//!
//! # Example
//!
//! ```no_run
//! use macapp_packager::bundler::{Action, Bundler, PackageSettings, SettingsBuilder};
//!
//! # async fn example() -> macapp_packager::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .project_directory(".")
//!     .package_settings(PackageSettings::default())
//!     .build()?;
//!
//! let bundler = Bundler::new(settings);
//! bundler.execute(Action::PackageDmg).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 tree checksums for assembled bundles
//! - [`orchestrator`] - Main [`Bundler`] struct and [`Action`] dispatch
//! - [`tool_detection`] - External tool availability checking

pub(crate) mod checksum;
mod orchestrator;
pub(crate) mod tool_detection;

pub use orchestrator::{Action, ActionOutcome, Bundler};
