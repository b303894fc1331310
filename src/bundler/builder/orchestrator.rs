//! Main bundler orchestration.
//!
//! This module provides the [`Bundler`] orchestrator that runs one
//! [`Action`] against a project described by [`Settings`].

use crate::bundler::{
    Result, Settings,
    platform::macos::{app, dmg},
    settings::is_project_subdirectory,
    toolchain::{self, FormatOutcome},
    utils::{
        fs,
        process::{SystemRunner, ToolRunner},
    },
};
use std::path::{Path, PathBuf};

use super::tool_detection::{PACKAGING_TOOLS, missing_tools};

/// Something the packager can do to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Debug compile.
    Build,
    /// Release compile.
    BuildRelease,
    /// Compile and run with the terminal attached.
    Run,
    /// Format sources in place.
    Format,
    /// Release compile, then assemble the `.app`.
    BundleApp,
    /// Assemble the `.app`, then build the installer DMG.
    PackageDmg,
    /// Remove the build and dist directories.
    Clean,
}

/// What an [`Action`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A debug or release compile finished.
    Built,
    /// The app exited.
    Ran,
    /// Result of the formatting pass.
    Formatted(FormatOutcome),
    /// Path of the assembled `.app`.
    Bundled(PathBuf),
    /// The installer image.
    Packaged(dmg::DmgArtifact),
    /// Build outputs are gone.
    Cleaned,
}

/// Main bundler orchestrator.
///
/// Holds the project settings and the runner every external tool goes
/// through. Production code uses [`SystemRunner`]; tests substitute a
/// recording runner.
#[derive(Debug)]
pub struct Bundler<R = SystemRunner> {
    settings: Settings,
    runner: R,
}

impl Bundler<SystemRunner> {
    /// Creates a bundler that spawns real processes.
    pub fn new(settings: Settings) -> Self {
        Self::with_runner(settings, SystemRunner)
    }
}

impl<R: ToolRunner> Bundler<R> {
    /// Creates a bundler with a custom tool runner.
    pub fn with_runner(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    /// Settings this bundler operates on.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs `action` to completion.
    ///
    /// Essential failures surface as errors; cosmetic failures are logged
    /// and reflected in the returned outcome.
    pub async fn execute(&self, action: Action) -> Result<ActionOutcome> {
        log::debug!("Executing {:?} in {}", action, self.settings.project_directory().display());
        self.preflight(action);

        let settings = &self.settings;
        let runner = &self.runner;
        match action {
            Action::Build => {
                toolchain::build_debug(settings, runner).await?;
                Ok(ActionOutcome::Built)
            }
            Action::BuildRelease => {
                toolchain::build_release(settings, runner).await?;
                Ok(ActionOutcome::Built)
            }
            Action::Run => {
                toolchain::run_app(settings, runner).await?;
                Ok(ActionOutcome::Ran)
            }
            Action::Format => toolchain::format_code(settings, runner)
                .await
                .map(ActionOutcome::Formatted),
            Action::BundleApp => app::bundle_app(settings, runner)
                .await
                .map(ActionOutcome::Bundled),
            Action::PackageDmg => dmg::package_dmg(settings, runner)
                .await
                .map(ActionOutcome::Packaged),
            Action::Clean => {
                self.clean().await?;
                Ok(ActionOutcome::Cleaned)
            }
        }
    }

    /// Removes the build and dist directories.
    ///
    /// Missing directories are fine, so cleaning twice succeeds.
    pub async fn clean(&self) -> Result<()> {
        log::info!("Cleaning build artifacts...");
        let project = self.settings.project_directory();
        remove_inside_project(project, &self.settings.build_directory()).await?;
        remove_inside_project(project, &self.settings.dist_directory()).await?;
        Ok(())
    }

    /// Logs tools the action will need but `PATH` lacks.
    ///
    /// Advisory only: the spawn error is what actually fails the run.
    fn preflight(&self, action: Action) {
        let needed: &[&str] = match action {
            Action::Build | Action::BuildRelease | Action::Run | Action::BundleApp => {
                &PACKAGING_TOOLS[..1]
            }
            Action::PackageDmg => PACKAGING_TOOLS,
            Action::Format | Action::Clean => &[],
        };
        for tool in missing_tools(needed) {
            log::debug!("{} not found in PATH; {:?} will likely fail", tool, action);
        }
    }
}

/// Recursively removes `target`, which must lie strictly inside `project`.
async fn remove_inside_project(project: &Path, target: &Path) -> Result<()> {
    let inside = target
        .strip_prefix(project)
        .is_ok_and(is_project_subdirectory);
    if !inside {
        crate::bail!(
            "Refusing to remove {}: not inside {}",
            target.display(),
            project.display()
        );
    }
    fs::remove_if_exists(target).await
}
