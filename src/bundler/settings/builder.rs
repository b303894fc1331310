//! Builder for constructing Settings.

use super::{BundleSettings, PackageSettings, Settings};
use std::path::{Component, Path, PathBuf};

/// Default compiler output directory.
pub const DEFAULT_BUILD_DIR: &str = ".build";

/// Default distribution directory.
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Whether `path` names a directory strictly inside the project.
///
/// Only plain relative components are allowed (`.` is ignored); empty,
/// absolute, and `..`-containing paths are rejected.
pub fn is_project_subdirectory(path: &Path) -> bool {
    let mut normal = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => normal += 1,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    normal > 0
}

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use macapp_packager::bundler::{SettingsBuilder, PackageSettings};
///
/// # fn example() -> macapp_packager::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .project_directory(".")
///     .package_settings(PackageSettings {
///         product_name: "MyApp".into(),
///         identifier: "com.example.myapp".into(),
///         version: "1.0".into(),
///     })
///     .dist_directory("out")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    project_directory: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    bundle_settings: BundleSettings,
    build_directory: Option<PathBuf>,
    dist_directory: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project directory (the Swift package root).
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn project_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.project_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets package metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets bundle configuration.
    ///
    /// Default: [`BundleSettings::default()`]
    pub fn bundle_settings(mut self, settings: BundleSettings) -> Self {
        self.bundle_settings = settings;
        self
    }

    /// Sets the compiler output directory, relative to the project.
    ///
    /// Default: `.build`
    pub fn build_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the distribution directory, relative to the project.
    ///
    /// Default: `dist`
    pub fn dist_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dist_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing:
    /// - `project_directory`
    /// - `package_settings`
    ///
    /// or if the build or dist directory is not a subdirectory of the
    /// project (see [`is_project_subdirectory`]).
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let package = self
            .package_settings
            .context("package_settings is required")?;
        if package.product_name.trim().is_empty() {
            crate::bail!("product name must not be empty");
        }

        let build_directory = self
            .build_directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR));
        let dist_directory = self
            .dist_directory
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        for (what, dir) in [("build", &build_directory), ("dist", &dist_directory)] {
            if !is_project_subdirectory(dir) {
                crate::bail!(
                    "{} directory {:?} must be a relative path inside the project",
                    what,
                    dir
                );
            }
        }

        Ok(Settings::new(
            package,
            self.bundle_settings,
            self.project_directory
                .context("project_directory is required")?,
            build_directory,
            dist_directory,
        ))
    }
}
