//! macOS `.app` bundle assembly.
//!
//! Produces the fixed layout
//!
//! ```text
//! dist/{ProductName}.app/
//!   Contents/
//!     Info.plist
//!     MacOS/{ProductName}
//!     Resources/AppIcon.png
//! ```
//!
//! from the release executable and the configured icon.

pub mod info_plist;

use crate::bundler::{
    builder::checksum::calculate_sha256,
    error::{ErrorExt, Result},
    settings::Settings,
    toolchain,
    utils::{fs, process::ToolRunner},
};
use std::path::PathBuf;

pub use info_plist::{InfoPlist, generate_info_plist, parse_info_plist};

/// Builds the release executable, then assembles the `.app` bundle.
///
/// Returns the bundle path.
pub async fn bundle_app<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<PathBuf> {
    log::info!("Creating app bundle for {}", settings.product_name());
    toolchain::build_release(settings, runner).await?;
    assemble_bundle(settings).await
}

/// Assembles the `.app` bundle from an already compiled release executable.
///
/// Any previous bundle is removed first, so the result depends only on the
/// executable, the icon, and the settings.
pub async fn assemble_bundle(settings: &Settings) -> Result<PathBuf> {
    let bundle = settings.app_bundle_path();
    let contents = bundle.join("Contents");
    let macos_dir = contents.join("MacOS");
    let resources_dir = contents.join("Resources");

    fs::remove_if_exists(&bundle).await?;
    fs::create_dir_all(&macos_dir, false).await?;
    fs::create_dir_all(&resources_dir, false).await?;

    let executable = settings.release_binary_path();
    log::debug!("Copying executable {}", executable.display());
    fs::copy_file(&executable, &macos_dir.join(settings.product_name())).await?;

    let icon = settings.icon_path();
    log::debug!("Copying icon {}", icon.display());
    fs::copy_file(&icon, &resources_dir.join(settings.bundle_icon_name())).await?;

    let plist = info_plist::render_info_plist(
        settings.product_name(),
        settings.identifier(),
        settings.product_name(),
        settings.version_string(),
        settings.bundle_settings().macos.ui_element,
    )?;
    // Refuse to ship a manifest Finder would reject.
    info_plist::parse_info_plist(plist.as_bytes())?;

    let plist_path = contents.join("Info.plist");
    tokio::fs::write(&plist_path, plist.as_bytes())
        .await
        .fs_context("writing Info.plist", &plist_path)?;

    // Refreshes Finder's icon cache; the bundle is complete either way.
    if let Err(e) = fs::touch(&bundle).await {
        log::warn!("Could not touch {}: {}", bundle.display(), e);
    }

    let checksum = calculate_sha256(&bundle).await?;
    log::info!("✓ Bundle {} (sha256 {})", bundle.display(), checksum);

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::testing::project_with_binary;
    use crate::bundler::utils::process::{ToolOutput, testing::RecordingRunner};

    #[tokio::test]
    async fn assembles_fixed_layout() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());

        let bundle = assemble_bundle(&settings).await.unwrap();

        assert_eq!(bundle, dir.path().join("dist/CmdN.app"));
        assert_eq!(
            std::fs::read(bundle.join("Contents/MacOS/CmdN")).unwrap(),
            b"\x7fMACHO-binary"
        );
        assert_eq!(
            std::fs::read(bundle.join("Contents/Resources/AppIcon.png")).unwrap(),
            b"\x89PNG-icon"
        );
        let plist = std::fs::read(bundle.join("Contents/Info.plist")).unwrap();
        let parsed = parse_info_plist(&plist).unwrap();
        assert_eq!(parsed.executable, "CmdN");
        assert_eq!(parsed.identifier, "itsfarseen.cmdn");
        assert_eq!(parsed.version, "1.0");
    }

    #[tokio::test]
    async fn repeated_assembly_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());

        let bundle = assemble_bundle(&settings).await.unwrap();
        let first_sum = calculate_sha256(&bundle).await.unwrap();
        let first_plist = std::fs::read(bundle.join("Contents/Info.plist")).unwrap();

        // Stray files from an older bundle must not survive.
        std::fs::write(bundle.join("Contents/Resources/stale.txt"), b"old").unwrap();

        let bundle = assemble_bundle(&settings).await.unwrap();
        assert_eq!(calculate_sha256(&bundle).await.unwrap(), first_sum);
        assert_eq!(
            std::fs::read(bundle.join("Contents/Info.plist")).unwrap(),
            first_plist
        );
        assert!(!bundle.join("Contents/Resources/stale.txt").exists());
    }

    #[tokio::test]
    async fn missing_executable_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        std::fs::remove_file(dir.path().join(".build/release/CmdN")).unwrap();

        let err = assemble_bundle(&settings).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn bundle_app_compiles_release_first() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        let runner = RecordingRunner::new();

        bundle_app(&settings, &runner).await.unwrap();

        assert_eq!(runner.lines(), vec!["swift build --configuration release"]);
        assert!(settings.app_bundle_path().join("Contents/Info.plist").exists());
    }

    #[tokio::test]
    async fn failed_compile_leaves_no_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        let runner = RecordingRunner::new().queue("swift build", ToolOutput::failed(1, ""));

        assert!(bundle_app(&settings, &runner).await.is_err());
        assert!(!settings.app_bundle_path().exists());
    }
}
