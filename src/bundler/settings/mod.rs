//! Configuration structures for bundling operations.
//!
//! This module provides the static configuration record consumed by every
//! packaging step: package metadata, `.app` and DMG settings, formatter
//! patterns, and a builder for constructing them.

mod builder;
mod bundle;
mod core;
mod macos;
mod package;

// Re-export all public types
pub use builder::{DEFAULT_BUILD_DIR, DEFAULT_DIST_DIR, SettingsBuilder, is_project_subdirectory};
pub use bundle::{BundleSettings, DEFAULT_FORMAT_PATTERNS, FormatSettings};
pub use core::Settings;
pub use macos::{
    BUNDLE_ICON_NAME, DEFAULT_ICON_PATH, DEFAULT_VOLUMES_ROOT, DmgSettings, MacOsSettings, RetryPolicy,
};
pub use package::{DEFAULT_IDENTIFIER, DEFAULT_PRODUCT_NAME, DEFAULT_VERSION, PackageSettings};
