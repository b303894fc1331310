//! Project configuration from an optional `Bundle.toml`.
//!
//! Every key is optional; anything left out keeps the built-in default.
//! Unknown keys are rejected so typos do not silently fall back.

use crate::bundler::{
    BundleSettings, DmgSettings, FormatSettings, MacOsSettings, PackageSettings, RetryPolicy,
    Settings, SettingsBuilder, settings::is_project_subdirectory,
};
use crate::error::{CliError, Result};
use anyhow::Context as _;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration file looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "Bundle.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "MACAPP_CONFIG";

/// Parsed `Bundle.toml`.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// `[package]`
    pub package: PackageSection,
    /// `[paths]`
    pub paths: PathsSection,
    /// `[dmg]`
    pub dmg: DmgSection,
    /// `[format]`
    pub format: FormatSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSection {
    pub name: Option<String>,
    pub identifier: Option<String>,
    pub version: Option<String>,
    /// `LSUIElement`: run as a menu bar agent without a Dock icon.
    pub ui_element: Option<bool>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PathsSection {
    pub build_dir: Option<PathBuf>,
    pub dist_dir: Option<PathBuf>,
    pub icon: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DmgSection {
    pub volume_name: Option<String>,
    pub window_size: Option<(u32, u32)>,
    pub icon_size: Option<u32>,
    pub convert_attempts: Option<u32>,
    pub convert_retry_delay_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FormatSection {
    pub patterns: Option<Vec<String>>,
}

/// Where the configuration comes from: the explicit override if given,
/// otherwise `Bundle.toml` in `project_dir`.
pub fn config_path(project_dir: &Path, env_override: Option<PathBuf>) -> PathBuf {
    env_override.unwrap_or_else(|| project_dir.join(CONFIG_FILE_NAME))
}

/// Loads the configuration for `project_dir`.
///
/// A missing `Bundle.toml` yields defaults. A missing file named through
/// [`CONFIG_ENV_VAR`] is an error, as is any unreadable or malformed file.
pub fn load_config(
    project_dir: &Path,
    env_override: Option<PathBuf>,
) -> Result<(ProjectConfig, Option<PathBuf>)> {
    let explicit = env_override.is_some();
    let path = config_path(project_dir, env_override);

    if !path.exists() {
        if explicit {
            return Err(CliError::ConfigNotFound { path }.into());
        }
        log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        return Ok((ProjectConfig::default(), None));
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ProjectConfig = toml::from_str(&text)?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok((config, Some(path)))
}

/// Builds [`Settings`] for `project_dir`, honoring `MACAPP_CONFIG`.
pub fn load_settings(project_dir: &Path) -> Result<Settings> {
    let env_override = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
    let (config, source) = load_config(project_dir, env_override)?;
    let source = source.unwrap_or_else(|| project_dir.join(CONFIG_FILE_NAME));
    config.into_settings(project_dir, &source)
}

impl ProjectConfig {
    /// Overlays this configuration on the defaults.
    ///
    /// `source` only labels validation errors.
    pub fn into_settings(self, project_dir: &Path, source: &Path) -> Result<Settings> {
        self.validate(source)?;

        let defaults = PackageSettings::default();
        let package = PackageSettings {
            product_name: self.package.name.unwrap_or(defaults.product_name),
            identifier: self.package.identifier.unwrap_or(defaults.identifier),
            version: self.package.version.unwrap_or(defaults.version),
        };

        let macos_defaults = MacOsSettings::default();
        let macos = MacOsSettings {
            icon: self.paths.icon.unwrap_or(macos_defaults.icon),
            ui_element: self.package.ui_element.unwrap_or(macos_defaults.ui_element),
        };

        let dmg_defaults = DmgSettings::default();
        let dmg = DmgSettings {
            volume_name: self.dmg.volume_name,
            window_size: self.dmg.window_size.unwrap_or(dmg_defaults.window_size),
            icon_size: self.dmg.icon_size.unwrap_or(dmg_defaults.icon_size),
            convert_retry: RetryPolicy {
                max_attempts: self
                    .dmg
                    .convert_attempts
                    .unwrap_or(dmg_defaults.convert_retry.max_attempts),
                delay: self
                    .dmg
                    .convert_retry_delay_secs
                    .map(Duration::from_secs)
                    .unwrap_or(dmg_defaults.convert_retry.delay),
            },
            ..dmg_defaults
        };

        let format = match self.format.patterns {
            Some(patterns) => FormatSettings { patterns },
            None => FormatSettings::default(),
        };

        let mut builder = SettingsBuilder::new()
            .project_directory(project_dir)
            .package_settings(package)
            .bundle_settings(BundleSettings { macos, dmg, format });
        if let Some(dir) = self.paths.build_dir {
            builder = builder.build_directory(dir);
        }
        if let Some(dir) = self.paths.dist_dir {
            builder = builder.dist_directory(dir);
        }
        Ok(builder.build()?)
    }

    fn validate(&self, source: &Path) -> Result<()> {
        let invalid = |reason: &str| -> Result<()> {
            Err(CliError::InvalidConfig {
                path: source.to_path_buf(),
                reason: reason.to_string(),
            }
            .into())
        };

        if self
            .paths
            .build_dir
            .as_deref()
            .is_some_and(|dir| !is_project_subdirectory(dir))
        {
            return invalid("paths.build_dir must be a relative path inside the project");
        }
        if self
            .paths
            .dist_dir
            .as_deref()
            .is_some_and(|dir| !is_project_subdirectory(dir))
        {
            return invalid("paths.dist_dir must be a relative path inside the project");
        }
        if matches!(self.dmg.window_size, Some((0, _)) | Some((_, 0))) {
            return invalid("dmg.window_size must be positive");
        }
        if self.dmg.icon_size == Some(0) {
            return invalid("dmg.icon_size must be positive");
        }
        if self.dmg.convert_attempts == Some(0) {
            return invalid("dmg.convert_attempts must be at least 1");
        }
        if self.dmg.volume_name.as_deref() == Some("") {
            return invalid("dmg.volume_name must not be empty");
        }
        Ok(())
    }
}
