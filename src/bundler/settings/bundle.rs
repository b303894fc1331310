//! Bundle configuration grouping the per-concern settings.

use super::{DmgSettings, MacOsSettings};

/// Glob patterns handed to the source formatter by default.
pub const DEFAULT_FORMAT_PATTERNS: &[&str] = &["*.swift", "ConfigurationUI/*.swift"];

/// Source formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSettings {
    /// Glob patterns, relative to the project directory.
    pub patterns: Vec<String>,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_FORMAT_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

/// Bundle configuration.
///
/// # See Also
///
/// - [`MacOsSettings`] - `.app` bundle configuration
/// - [`DmgSettings`] - installer image configuration
/// - [`FormatSettings`] - source formatter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleSettings {
    /// `.app` bundle settings.
    pub macos: MacOsSettings,

    /// DMG settings.
    pub dmg: DmgSettings,

    /// Formatter settings.
    pub format: FormatSettings,
}
