//! DMG format conversion utilities.
//!
//! Converts the customized read-write image (UDRW) into the compressed
//! read-only distribution image (UDZO).
//!
//! `hdiutil convert` regularly fails with "resource busy" while the system
//! still holds the freshly detached image, so conversion runs under a
//! bounded [`RetryPolicy`](crate::bundler::RetryPolicy). When every attempt
//! fails, the image is rebuilt from the staging directory without
//! customization: the installer still works, it just opens with Finder's
//! default window.

use super::creation::fallback_dmg_command;
use crate::bundler::{
    error::Result,
    settings::Settings,
    utils::{
        fs,
        process::{ToolCommand, ToolRunner, run_essential},
    },
};

/// How the final image was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// The customized image was converted.
    Converted {
        /// Attempt that succeeded, starting at 1.
        attempts: u32,
    },
    /// Conversion kept failing; the image was recreated without customization.
    Fallback {
        /// Conversion attempts made before falling back.
        attempts: u32,
    },
}

/// `hdiutil convert <tmp> -format UDZO -imagekey zlib-level=9 -o <dmg>`
pub fn convert_command(settings: &Settings) -> ToolCommand {
    ToolCommand::new("hdiutil")
        .arg("convert")
        .path_arg(&settings.temp_dmg_path())
        .args(["-format", "UDZO", "-imagekey", "zlib-level=9", "-o"])
        .path_arg(&settings.dmg_path())
        .captured()
}

/// Converts the writable image into the final compressed image.
///
/// # Process
/// 1. Remove any previous final image (hdiutil refuses to overwrite)
/// 2. Run `hdiutil convert`, retrying per the configured policy
/// 3. If every attempt failed, run the fallback `hdiutil create` exactly once
///
/// Only a failing fallback is an error.
pub async fn convert_dmg_to_compressed<R: ToolRunner>(
    settings: &Settings,
    runner: &R,
) -> Result<ConversionOutcome> {
    log::info!("Converting DMG to compressed format...");

    fs::remove_if_exists(&settings.dmg_path()).await?;

    let policy = settings.bundle_settings().dmg.convert_retry;
    let max_attempts = policy.attempts();
    let command = convert_command(settings);

    for attempt in 1..=max_attempts {
        match run_essential(runner, &command).await {
            Ok(_) => {
                log::info!("✓ DMG converted to compressed UDZO format");
                return Ok(ConversionOutcome::Converted { attempts: attempt });
            }
            Err(e) if attempt < max_attempts => {
                log::info!(
                    "DMG conversion failed, retrying... (attempt {}/{}): {}",
                    attempt + 1,
                    max_attempts,
                    e
                );
                tokio::time::sleep(policy.delay).await;
            }
            Err(e) => {
                log::info!("DMG conversion failed after {} attempts: {}", max_attempts, e);
            }
        }
    }

    run_essential(runner, &fallback_dmg_command(settings)).await?;
    log::info!("Created fallback DMG without customization");

    Ok(ConversionOutcome::Fallback {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::testing::project_with_binary;
    use crate::bundler::utils::process::{ToolOutput, testing::RecordingRunner};
    use crate::bundler::{BundleSettings, DmgSettings, PackageSettings, RetryPolicy, SettingsBuilder};
    use std::time::Duration;

    const CONVERT: &str = "hdiutil convert";
    const FALLBACK: &str = "hdiutil create";

    #[tokio::test]
    async fn succeeds_on_third_attempt_without_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        let runner = RecordingRunner::new()
            .queue(CONVERT, ToolOutput::failed(1, "hdiutil: convert failed - Resource busy"))
            .queue(CONVERT, ToolOutput::failed(1, "hdiutil: convert failed - Resource busy"));

        let outcome = convert_dmg_to_compressed(&settings, &runner).await.unwrap();

        assert_eq!(outcome, ConversionOutcome::Converted { attempts: 3 });
        assert_eq!(runner.count_starting_with(CONVERT), 3);
        assert_eq!(runner.count_starting_with(FALLBACK), 0);
    }

    #[tokio::test]
    async fn exhausted_retries_fall_back_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        let runner = RecordingRunner::new().respond(|cmd| {
            cmd.to_string()
                .starts_with(CONVERT)
                .then(|| ToolOutput::failed(1, "Resource busy"))
        });

        let outcome = convert_dmg_to_compressed(&settings, &runner).await.unwrap();

        assert_eq!(outcome, ConversionOutcome::Fallback { attempts: 3 });
        assert_eq!(runner.count_starting_with(CONVERT), 3);
        assert_eq!(runner.count_starting_with(FALLBACK), 1);
        assert!(runner.lines().last().unwrap().contains("-format UDZO"));
    }

    #[tokio::test]
    async fn first_attempt_success_runs_once() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        let runner = RecordingRunner::new();

        let outcome = convert_dmg_to_compressed(&settings, &runner).await.unwrap();

        assert_eq!(outcome, ConversionOutcome::Converted { attempts: 1 });
        assert_eq!(
            runner.lines(),
            vec![format!(
                "hdiutil convert {} -format UDZO -imagekey zlib-level=9 -o {}",
                settings.temp_dmg_path().display(),
                settings.dmg_path().display()
            )]
        );
    }

    #[tokio::test]
    async fn failing_fallback_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        let runner = RecordingRunner::new().respond(|_| Some(ToolOutput::failed(1, "no space")));

        assert!(convert_dmg_to_compressed(&settings, &runner).await.is_err());
        assert_eq!(runner.count_starting_with(FALLBACK), 1);
    }

    #[tokio::test]
    async fn honors_configured_attempt_count() {
        let dir = tempfile::tempdir().unwrap();
        let base = project_with_binary(dir.path());
        let settings = SettingsBuilder::new()
            .project_directory(base.project_directory())
            .package_settings(PackageSettings::default())
            .bundle_settings(BundleSettings {
                dmg: DmgSettings {
                    convert_retry: RetryPolicy {
                        max_attempts: 5,
                        delay: Duration::ZERO,
                    },
                    ..DmgSettings::default().without_delays()
                },
                ..Default::default()
            })
            .build()
            .unwrap();
        let runner = RecordingRunner::new().respond(|cmd| {
            cmd.to_string()
                .starts_with(CONVERT)
                .then(|| ToolOutput::failed(1, "busy"))
        });

        let outcome = convert_dmg_to_compressed(&settings, &runner).await.unwrap();
        assert_eq!(outcome, ConversionOutcome::Fallback { attempts: 5 });
        assert_eq!(runner.count_starting_with(CONVERT), 5);
    }

    #[tokio::test]
    async fn stale_final_image_is_removed_first() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        std::fs::create_dir_all(settings.dist_directory()).unwrap();
        std::fs::write(settings.dmg_path(), b"stale").unwrap();

        convert_dmg_to_compressed(&settings, &RecordingRunner::new())
            .await
            .unwrap();
        assert!(!settings.dmg_path().exists());
    }
}
