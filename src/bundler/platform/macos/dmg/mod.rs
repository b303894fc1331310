//! macOS DMG disk image creator.
//!
//! Creates a drag-to-install DMG with the native hdiutil tool. The image holds
//! the .app bundle and an Applications symlink, arranged side by side in a
//! fixed-size Finder window.
//!
//! # Architecture
//!
//! - `creation` - Staging and hdiutil image creation
//! - `customization` - Mounting, AppleScript window layout, detaching
//! - `conversion` - UDRW → UDZO with bounded retry and fallback
//! - `layout` - Icon position arithmetic

mod conversion;
mod creation;
mod customization;
pub mod layout;

use crate::bundler::{
    error::Result,
    platform::macos::app,
    settings::Settings,
    utils::{fs, process::ToolRunner},
};
use std::path::PathBuf;

pub use conversion::{ConversionOutcome, convert_command, convert_dmg_to_compressed};
pub use creation::{
    APPLICATIONS_DIR, create_writable_dmg, fallback_dmg_command, prepare_staging,
    writable_dmg_command,
};
pub use customization::{
    AttachedVolume, CustomizationReport, apply_dmg_customizations, attach_dmg, detach_commands,
    detach_dmg, escape_applescript_string, generate_dmg_applescript, parse_attach_output,
};
pub use layout::{IconPosition, InstallerLayout, calculate_icon_positions};

/// Result of a packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmgArtifact {
    /// Final compressed image.
    pub path: PathBuf,
    /// Whether the customized image was converted or the fallback was used.
    pub conversion: ConversionOutcome,
    /// Cosmetic steps that ran.
    pub customization: CustomizationReport,
}

/// Builds the release executable and the `.app`, then packages the DMG.
pub async fn package_dmg<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<DmgArtifact> {
    log::info!("Creating DMG for {}", settings.product_name());
    app::bundle_app(settings, runner).await?;
    build_installer(settings, runner).await
}

/// Packages an already assembled `.app` bundle into the final DMG.
///
/// # Process
/// 1. Stage the .app and an Applications symlink
/// 2. Create a writable UDRW image from staging
/// 3. Mount it, lay out the window, detach
/// 4. Convert to UDZO (retrying, falling back to an uncustomized image)
/// 5. Remove the writable image; staging is kept for inspection
pub async fn build_installer<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<DmgArtifact> {
    prepare_staging(settings).await?;
    let writable = create_writable_dmg(settings, runner).await?;
    let customization = apply_dmg_customizations(settings, runner, &writable).await?;
    let conversion = convert_dmg_to_compressed(settings, runner).await?;

    fs::remove_if_exists(&writable).await?;

    let path = settings.dmg_path();
    log::info!("✓ Created installer DMG: {}", path.display());

    Ok(DmgArtifact {
        path,
        conversion,
        customization,
    })
}
