//! DMG appearance customization using AppleScript.
//!
//! Handles the mounted phase of the workflow:
//! - Mounting the writable DMG and locating its device node
//! - Copying the volume icon
//! - Running AppleScript to set window bounds and icon positions
//! - Detaching, with fallbacks for a busy volume
//!
//! Everything after the mount is cosmetic: failures are logged and the
//! image is still produced.

use super::layout::{IconPosition, InstallerLayout};
use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
    utils::process::{ToolCommand, ToolRunner, run_best_effort, run_essential},
};
use std::path::{Path, PathBuf};

/// A mounted disk image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedVolume {
    /// Device node, e.g. `/dev/disk4s1`.
    pub device: String,
    /// Mount point, e.g. `/Volumes/CmdN Installer`.
    pub mount_point: PathBuf,
}

/// Picks the mounted volume out of `hdiutil attach` output.
///
/// The first line that starts with `/dev/` and mentions `volumes_root`
/// (normally `/Volumes`) wins. Its first field is the device node; the
/// mount point runs from `volumes_root` to the end of the line, since
/// volume names contain spaces.
pub fn parse_attach_output(stdout: &str, volumes_root: &Path) -> Result<AttachedVolume> {
    let root = volumes_root.to_string_lossy();
    let needle = format!("{}/", root.trim_end_matches('/'));
    for line in stdout.lines() {
        if !line.starts_with("/dev/") {
            continue;
        }
        let Some(volumes_at) = line.find(&needle) else {
            continue;
        };
        let Some(device) = line.split_whitespace().next() else {
            continue;
        };
        return Ok(AttachedVolume {
            device: device.to_string(),
            mount_point: PathBuf::from(line[volumes_at..].trim_end()),
        });
    }

    Err(Error::MountPointNotFound {
        lines: stdout.lines().map(str::to_string).collect(),
    })
}

/// Mounts the writable DMG without opening a Finder window.
pub async fn attach_dmg<R: ToolRunner>(
    runner: &R,
    dmg_path: &Path,
    volumes_root: &Path,
) -> Result<AttachedVolume> {
    log::debug!("Mounting DMG for customization...");
    let command = ToolCommand::new("hdiutil")
        .args(["attach", "-readwrite", "-noverify", "-noautoopen"])
        .path_arg(dmg_path)
        .captured();
    let output = run_essential(runner, &command).await?;
    let volume = parse_attach_output(&output.stdout, volumes_root)?;
    log::debug!(
        "DMG mounted at {} ({})",
        volume.mount_point.display(),
        volume.device
    );
    Ok(volume)
}

/// Escape special characters for AppleScript string literals
///
/// Escapes backslashes and double quotes to prevent script injection
/// and syntax errors when names contain special characters.
pub fn escape_applescript_string(s: &str) -> String {
    s.replace('\\', r"\\").replace('"', r#"\""#)
}

/// Builds the Finder script that arranges the installer window.
///
/// The window opens at (100, 100) with the given size; `app` and
/// `applications` are icon centers in window coordinates.
pub fn generate_dmg_applescript(
    volume_name: &str,
    app_name: &str,
    window_size: (u32, u32),
    icon_size: u32,
    app: IconPosition,
    applications: IconPosition,
) -> String {
    let (width, height) = window_size;
    format!(
        r#"
tell application "Finder"
    tell disk "{volume_name}"
        open
        set current view of container window to icon view
        set toolbar visible of container window to false
        set statusbar visible of container window to false
        set bounds of container window to {{100, 100, {right}, {bottom}}}
        set viewOptions to the icon view options of container window
        set arrangement of viewOptions to not arranged
        set icon size of viewOptions to {icon_size}
        set position of item "{app_name}" to {{{app_x}, {app_y}}}
        set position of item "Applications" to {{{apps_x}, {apps_y}}}
        update without registering applications
        delay 2
        close
    end tell
end tell
"#,
        volume_name = escape_applescript_string(volume_name),
        app_name = escape_applescript_string(app_name),
        right = 100 + u64::from(width),
        bottom = 100 + u64::from(height),
        icon_size = icon_size,
        app_x = app.x,
        app_y = app.y,
        apps_x = applications.x,
        apps_y = applications.y,
    )
}

/// Copies the app icon onto the volume as its custom icon.
async fn set_volume_icon(settings: &Settings, volume: &AttachedVolume) {
    let target = volume.mount_point.join(".VolumeIcon.icns");
    // Plain copy: the mount point must already exist, never create it.
    if let Err(e) = tokio::fs::copy(settings.icon_path(), &target).await {
        log::warn!("Could not set volume icon: {}", e);
    }
}

/// Runs the window layout script through `osascript`.
async fn run_dmg_applescript<R: ToolRunner>(
    settings: &Settings,
    runner: &R,
    layout: &InstallerLayout,
) -> bool {
    let dmg = &settings.bundle_settings().dmg;
    let script = generate_dmg_applescript(
        &settings.volume_name(),
        &settings.app_bundle_name(),
        dmg.window_size,
        dmg.icon_size,
        layout.app,
        layout.applications,
    );
    let command = ToolCommand::new("osascript").arg("-e").arg(script).captured();
    run_best_effort(runner, &command, "AppleScript customization")
        .await
        .is_some()
}

/// Commands tried in order to unmount the volume.
pub fn detach_commands(settings: &Settings, volume: &AttachedVolume) -> Vec<ToolCommand> {
    vec![
        ToolCommand::new("hdiutil")
            .args(["detach", volume.device.as_str(), "-force"])
            .captured(),
        ToolCommand::new("hdiutil")
            .arg("detach")
            .path_arg(
                &settings
                    .bundle_settings()
                    .dmg
                    .volumes_root
                    .join(settings.volume_name()),
            )
            .arg("-force")
            .captured(),
        ToolCommand::new("diskutil")
            .args(["eject", volume.device.as_str()])
            .captured(),
    ]
}

/// Unmounts the volume, stopping at the first command that succeeds.
///
/// Returns `false` when every attempt failed; conversion may still work
/// once the system releases the image.
pub async fn detach_dmg<R: ToolRunner>(
    settings: &Settings,
    runner: &R,
    volume: &AttachedVolume,
) -> bool {
    log::debug!("Detaching DMG...");
    for command in detach_commands(settings, volume) {
        if run_best_effort(runner, &command, "DMG detach").await.is_some() {
            return true;
        }
    }
    log::info!("Could not cleanly detach DMG, proceeding anyway...");
    false
}

/// What the customization pass managed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomizationReport {
    /// Icon positions handed to Finder.
    pub layout: InstallerLayout,
    /// Whether the AppleScript ran cleanly.
    pub window_configured: bool,
    /// Whether the volume was detached.
    pub detached: bool,
}

/// Mounts the writable image, arranges its window, and unmounts it.
///
/// # Process
/// 1. Mount DMG in read-write mode (fatal on failure)
/// 2. Copy the volume icon
/// 3. Run AppleScript to lay out the window
/// 4. Wait for Finder to write `.DS_Store`
/// 5. Detach, then let the image settle
pub async fn apply_dmg_customizations<R: ToolRunner>(
    settings: &Settings,
    runner: &R,
    dmg_path: &Path,
) -> Result<CustomizationReport> {
    log::info!("Applying DMG customizations...");
    let dmg = &settings.bundle_settings().dmg;

    let volume = attach_dmg(runner, dmg_path, &dmg.volumes_root).await?;
    set_volume_icon(settings, &volume).await;

    let layout = InstallerLayout::compute(settings);
    log::info!(
        "Positioning icons: App({}, {}), Applications({}, {})",
        layout.app.x,
        layout.app.y,
        layout.applications.x,
        layout.applications.y
    );

    let window_configured = run_dmg_applescript(settings, runner, &layout).await;
    if window_configured {
        log::info!("DMG window configured with AppleScript");
    }

    tokio::time::sleep(dmg.ui_settle).await;
    let detached = detach_dmg(settings, runner, &volume).await;
    tokio::time::sleep(dmg.detach_settle).await;

    Ok(CustomizationReport {
        layout,
        window_configured,
        detached,
    })
}
