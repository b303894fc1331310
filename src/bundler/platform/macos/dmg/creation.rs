//! Core DMG creation logic using hdiutil.
//!
//! Handles the staging side of the workflow:
//! - Clearing leftovers from an earlier failed run
//! - Staging the .app bundle next to an Applications symlink
//! - Running hdiutil to generate the writable (UDRW) image
//! - Building the uncustomized (UDZO) fallback image command

use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::{
        fs,
        process::{ToolCommand, ToolRunner, run_essential},
    },
};
use std::path::{Path, PathBuf};

/// Target of the drag-to-install symlink.
pub const APPLICATIONS_DIR: &str = "/Applications";

/// Rebuilds the staging directory from the assembled `.app` bundle.
///
/// # Staging Layout
/// ```text
/// dist/staging/
///   {ProductName}.app/
///   Applications -> /Applications
/// ```
///
/// The previous staging directory and temporary image are removed first.
pub async fn prepare_staging(settings: &Settings) -> Result<PathBuf> {
    let staging = settings.staging_directory();

    fs::remove_if_exists(&staging).await?;
    fs::remove_if_exists(&settings.temp_dmg_path()).await?;
    fs::create_dir_all(&staging, false).await?;

    let staged_app = staging.join(settings.app_bundle_name());
    log::debug!("Copying .app to staging: {}", staged_app.display());
    fs::copy_dir(&settings.app_bundle_path(), &staged_app).await?;

    let applications_link = staging.join("Applications");
    fs::remove_if_exists(&applications_link).await?;
    create_applications_link(&applications_link).await?;

    Ok(staging)
}

#[cfg(unix)]
async fn create_applications_link(link: &Path) -> Result<()> {
    fs::symlink(Path::new(APPLICATIONS_DIR), link).await
}

#[cfg(not(unix))]
async fn create_applications_link(link: &Path) -> Result<()> {
    log::warn!(
        "Symlinks unsupported on this host; {} not created",
        link.display()
    );
    Ok(())
}

/// `hdiutil create` over the staging directory in the given image format.
fn hdiutil_create(settings: &Settings, format: &str, output: &Path) -> ToolCommand {
    ToolCommand::new("hdiutil")
        .args(["create", "-volname"])
        .arg(settings.volume_name())
        .arg("-srcfolder")
        .path_arg(&settings.staging_directory())
        .args(["-ov", "-format", format])
        .path_arg(output)
        .captured()
}

/// Command producing the writable image used for customization.
pub fn writable_dmg_command(settings: &Settings) -> ToolCommand {
    hdiutil_create(settings, "UDRW", &settings.temp_dmg_path())
}

/// Command producing a compressed image straight from staging, skipping customization.
pub fn fallback_dmg_command(settings: &Settings) -> ToolCommand {
    hdiutil_create(settings, "UDZO", &settings.dmg_path())
}

/// Creates the writable (UDRW) image from the staging directory.
///
/// # Background
/// Finder window settings live in the volume's `.DS_Store`, which can only be
/// written on a read-write image. The image is converted to UDZO afterwards.
pub async fn create_writable_dmg<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<PathBuf> {
    log::info!("Creating writable DMG...");
    run_essential(runner, &writable_dmg_command(settings)).await?;
    let path = settings.temp_dmg_path();
    log::info!("✓ Created UDRW DMG: {}", path.display());
    Ok(path)
}
