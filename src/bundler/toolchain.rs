//! Swift toolchain actions: compile, run, and format.

use crate::bundler::{
    builder::tool_detection::HAS_SWIFT_FORMAT,
    error::Result,
    settings::Settings,
    utils::process::{ToolCommand, ToolRunner, run_best_effort, run_essential},
};
use std::path::PathBuf;

/// Install hint printed when `swift-format` is missing.
pub const SWIFT_FORMAT_INSTALL_HINT: &str = "brew install swift-format";

fn swift(settings: &Settings) -> ToolCommand {
    ToolCommand::new("swift").current_dir(settings.project_directory())
}

/// `swift build`
pub fn debug_build_command(settings: &Settings) -> ToolCommand {
    swift(settings).arg("build")
}

/// `swift build --configuration release`
pub fn release_build_command(settings: &Settings) -> ToolCommand {
    swift(settings).args(["build", "--configuration", "release"])
}

/// Compiles in debug mode.
pub async fn build_debug<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<()> {
    log::info!("Building in debug mode...");
    run_essential(runner, &debug_build_command(settings)).await?;
    Ok(())
}

/// Compiles in release mode.
pub async fn build_release<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<()> {
    log::info!("Building in release mode...");
    run_essential(runner, &release_build_command(settings)).await?;
    Ok(())
}

/// Builds and runs the app with the terminal attached.
pub async fn run_app<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<()> {
    log::info!("Running the app...");
    run_essential(runner, &swift(settings).arg("run")).await?;
    Ok(())
}

/// Result of a formatting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// `swift-format` is not installed; nothing was touched.
    FormatterMissing,
    /// The formatter ran over the matched files.
    Formatted {
        /// Files the formatter accepted.
        formatted: usize,
        /// Files the formatter rejected.
        failed: usize,
    },
}

/// Formats sources in place when `swift-format` is on `PATH`.
pub async fn format_code<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<FormatOutcome> {
    format_sources(settings, runner, *HAS_SWIFT_FORMAT).await
}

/// Formats every file matched by the configured patterns.
///
/// Each file is formatted independently and failures never abort the pass.
pub async fn format_sources<R: ToolRunner>(
    settings: &Settings,
    runner: &R,
    formatter_available: bool,
) -> Result<FormatOutcome> {
    if !formatter_available {
        log::debug!("swift-format not found in PATH");
        return Ok(FormatOutcome::FormatterMissing);
    }

    log::info!("Formatting Swift code...");
    let mut formatted = 0;
    let mut failed = 0;

    for file in matched_sources(settings)? {
        let command = ToolCommand::new("swift-format")
            .arg("--in-place")
            .path_arg(&file)
            .current_dir(settings.project_directory());
        match run_best_effort(runner, &command, "swift-format").await {
            Some(_) => formatted += 1,
            None => failed += 1,
        }
    }

    Ok(FormatOutcome::Formatted { formatted, failed })
}

/// Expands the format patterns relative to the project, sorted and deduplicated.
fn matched_sources(settings: &Settings) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in &settings.bundle_settings().format.patterns {
        let root = glob::Pattern::escape(&settings.project_directory().to_string_lossy());
        let mut matched = 0;
        for entry in glob::glob(&format!("{root}/{pattern}"))? {
            match entry {
                Ok(path) if path.is_file() => {
                    files.push(path);
                    matched += 1;
                }
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable path: {}", e),
            }
        }
        if matched == 0 {
            log::debug!("No files match {pattern}");
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::testing::project_with_binary;
    use crate::bundler::utils::process::{ToolOutput, testing::RecordingRunner};

    #[tokio::test]
    async fn builds_use_swift_build() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        let runner = RecordingRunner::new();

        build_debug(&settings, &runner).await.unwrap();
        build_release(&settings, &runner).await.unwrap();
        run_app(&settings, &runner).await.unwrap();

        assert_eq!(
            runner.lines(),
            vec![
                "swift build",
                "swift build --configuration release",
                "swift run"
            ]
        );
        assert!(runner
            .calls()
            .iter()
            .all(|c| c.working_dir() == Some(dir.path())));
    }

    #[tokio::test]
    async fn compile_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        let runner = RecordingRunner::new().queue("swift build", ToolOutput::failed(1, "error: x"));

        let err = build_debug(&settings, &runner).await.unwrap_err();
        assert!(err.to_string().contains("swift build"));
    }

    #[tokio::test]
    async fn missing_formatter_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        let runner = RecordingRunner::new();

        let outcome = format_sources(&settings, &runner, false).await.unwrap();
        assert_eq!(outcome, FormatOutcome::FormatterMissing);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn formats_each_matched_file_and_tolerates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let settings = project_with_binary(dir.path());
        std::fs::write(dir.path().join("App.swift"), "").unwrap();
        std::fs::write(dir.path().join("Menu.swift"), "").unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();
        std::fs::create_dir_all(dir.path().join("ConfigurationUI")).unwrap();
        std::fs::write(dir.path().join("ConfigurationUI/Prefs.swift"), "").unwrap();

        let runner = RecordingRunner::new().respond(|cmd| {
            cmd.to_string()
                .ends_with("Menu.swift")
                .then(|| ToolOutput::failed(1, "parse error"))
        });

        let outcome = format_sources(&settings, &runner, true).await.unwrap();
        assert_eq!(outcome, FormatOutcome::Formatted { formatted: 2, failed: 1 });
        assert_eq!(runner.count_starting_with("swift-format --in-place"), 3);
        assert!(!runner.lines().iter().any(|l| l.ends_with("README.md")));
    }
}
