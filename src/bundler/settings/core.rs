//! Core Settings struct and path derivation.

use super::{BundleSettings, PackageSettings, macos::BUNDLE_ICON_NAME};
use std::path::{Path, PathBuf};

/// Main settings for bundler operations.
///
/// Central, read-only configuration record constructed via [`SettingsBuilder`].
/// Every path the packager touches is derived here from the project directory,
/// so one run never reaches outside it (apart from `/Volumes` and `/Applications`).
///
/// # Examples
///
/// ```no_run
/// use macapp_packager::bundler::{SettingsBuilder, PackageSettings};
///
/// # fn example() -> macapp_packager::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_directory(".")
///     .package_settings(PackageSettings::default())
///     .build()?;
/// assert!(settings.app_bundle_path().ends_with("dist/CmdN.app"));
/// # Ok(())
/// # }
/// ```
///
/// [`SettingsBuilder`]: super::SettingsBuilder
#[derive(Clone, Debug)]
pub struct Settings {
    /// Package metadata.
    package: PackageSettings,

    /// Bundle configuration.
    bundle_settings: BundleSettings,

    /// Root of the Swift package.
    project_directory: PathBuf,

    /// Compiler output directory, relative to the project.
    build_directory: PathBuf,

    /// Distribution output directory, relative to the project.
    dist_directory: PathBuf,
}

impl Settings {
    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.package.product_name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the bundle identifier.
    pub fn identifier(&self) -> &str {
        &self.package.identifier
    }

    /// Returns the bundle settings.
    pub fn bundle_settings(&self) -> &BundleSettings {
        &self.bundle_settings
    }

    /// Returns the project directory; external tools run with it as working directory.
    pub fn project_directory(&self) -> &Path {
        &self.project_directory
    }

    /// Returns the compiler output directory (`.build`).
    pub fn build_directory(&self) -> PathBuf {
        self.project_directory.join(&self.build_directory)
    }

    /// Returns the path of the release executable produced by the toolchain.
    pub fn release_binary_path(&self) -> PathBuf {
        self.build_directory()
            .join("release")
            .join(self.product_name())
    }

    /// Returns the distribution directory (`dist`).
    pub fn dist_directory(&self) -> PathBuf {
        self.project_directory.join(&self.dist_directory)
    }

    /// Returns the `.app` directory name.
    pub fn app_bundle_name(&self) -> String {
        format!("{}.app", self.product_name())
    }

    /// Returns the path of the assembled `.app` bundle.
    pub fn app_bundle_path(&self) -> PathBuf {
        self.dist_directory().join(self.app_bundle_name())
    }

    /// Returns the icon source path.
    pub fn icon_path(&self) -> PathBuf {
        self.project_directory.join(&self.bundle_settings.macos.icon)
    }

    /// Returns the icon file name used inside `Contents/Resources`.
    pub fn bundle_icon_name(&self) -> &'static str {
        BUNDLE_ICON_NAME
    }

    /// Returns the DMG volume name.
    pub fn volume_name(&self) -> String {
        self.bundle_settings
            .dmg
            .volume_name
            .clone()
            .unwrap_or_else(|| format!("{} Installer", self.product_name()))
    }

    /// Returns the final compressed DMG path.
    pub fn dmg_path(&self) -> PathBuf {
        self.dist_directory()
            .join(format!("{}.dmg", self.product_name()))
    }

    /// Returns the writable intermediate DMG path.
    pub fn temp_dmg_path(&self) -> PathBuf {
        self.dist_directory()
            .join(format!("tmp_{}.dmg", self.product_name()))
    }

    /// Returns the DMG staging directory.
    pub fn staging_directory(&self) -> PathBuf {
        self.dist_directory().join("staging")
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package: PackageSettings,
        bundle_settings: BundleSettings,
        project_directory: PathBuf,
        build_directory: PathBuf,
        dist_directory: PathBuf,
    ) -> Self {
        Self {
            package,
            bundle_settings,
            project_directory,
            build_directory,
            dist_directory,
        }
    }
}
