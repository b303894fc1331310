//! Command line interface for the macOS app packager.
//!
//! Parses the command, loads the project settings, runs the matching
//! [`Action`], and reports the outcome.

mod args;
mod output;

pub use args::{Args, Command};
pub use output::OutputManager;

use crate::bundler::{
    Action, ActionOutcome, Bundler, ToolRunner,
    platform::macos::dmg::ConversionOutcome,
    toolchain::{FormatOutcome, SWIFT_FORMAT_INSTALL_HINT},
};
use crate::error::{BundlerError, Result};
use crate::metadata;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let output = OutputManager::new();

    let project_dir = std::env::current_dir()?;
    let settings = metadata::load_settings(&project_dir)?;
    let bundler = Bundler::new(settings);

    execute(&bundler, args.action(), &output).await
}

/// Runs `action` and prints progress, returning the process exit code.
///
/// A failing external command is reported here and yields exit code 1;
/// any other error is returned to the caller.
pub async fn execute<R: ToolRunner>(
    bundler: &Bundler<R>,
    action: Action,
    output: &OutputManager,
) -> Result<i32> {
    output.progress(starting_message(action))?;

    let outcome = match bundler.execute(action).await {
        Ok(outcome) => outcome,
        Err(e) => {
            let e = BundlerError::from(e);
            if e.failed_command().is_some() {
                output.error(&e.to_string())?;
                return Ok(1);
            }
            return Err(e);
        }
    };

    match outcome {
        ActionOutcome::Built | ActionOutcome::Cleaned => {
            if let Some(done) = finished_message(action) {
                output.success(done)?;
            }
        }
        ActionOutcome::Ran => {}
        ActionOutcome::Formatted(FormatOutcome::FormatterMissing) => {
            output.progress(&format!(
                "swift-format not found. Install with: {SWIFT_FORMAT_INSTALL_HINT}"
            ))?;
        }
        ActionOutcome::Formatted(FormatOutcome::Formatted { formatted, failed }) => {
            if failed > 0 {
                output.warn(&format!("swift-format failed on {failed} file(s)"))?;
            }
            output.success("Code formatted")?;
            output.indent(&format!("{formatted} file(s) formatted"))?;
        }
        ActionOutcome::Bundled(path) => {
            output.success(&format!("App bundle created at {}", path.display()))?;
        }
        ActionOutcome::Packaged(artifact) => {
            let layout = artifact.customization.layout;
            output.indent(&format!(
                "Positioning icons: App({}, {}), Applications({}, {})",
                layout.app.x, layout.app.y, layout.applications.x, layout.applications.y
            ))?;
            if !artifact.customization.window_configured {
                output.warn("AppleScript customization failed")?;
            }
            if !artifact.customization.detached {
                output.warn("Could not cleanly detach DMG, proceeding anyway...")?;
            }
            if let ConversionOutcome::Fallback { attempts } = artifact.conversion {
                output.warn(&format!(
                    "DMG conversion failed after {attempts} attempts; created fallback DMG without customization"
                ))?;
            }
            output.success(&format!("Created installer DMG: {}", artifact.path.display()))?;
        }
    }

    Ok(0)
}

fn starting_message(action: Action) -> &'static str {
    match action {
        Action::Build => "Building in debug mode...",
        Action::BuildRelease => "Building in release mode...",
        Action::Run => "Running the app...",
        Action::Format => "Formatting Swift code...",
        Action::BundleApp => "Creating app bundle...",
        Action::PackageDmg => "Creating installer DMG...",
        Action::Clean => "Cleaning build artifacts...",
    }
}

fn finished_message(action: Action) -> Option<&'static str> {
    match action {
        Action::Build => Some("Debug build complete"),
        Action::BuildRelease => Some("Release build complete"),
        Action::Clean => Some("Clean complete"),
        _ => None,
    }
}
