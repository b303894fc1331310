//! External tool invocation.
//!
//! Every collaborator (`swift`, `swift-format`, `hdiutil`, `osascript`,
//! `diskutil`) is reached through the [`ToolRunner`] trait. [`SystemRunner`]
//! spawns real processes with `tokio::process`; tests substitute a recorder.
//!
//! Two helpers encode the failure tiers: [`run_essential`] turns a non-zero
//! exit into [`Error::CommandFailed`], while [`run_best_effort`] logs and
//! swallows every failure.

use crate::bundler::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// A program invocation: argument vector, working directory, output mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    capture: bool,
}

impl ToolCommand {
    /// Creates a command whose output is streamed to the terminal.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            capture: false,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Appends a path argument (lossy on non-UTF8 paths).
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    /// Runs the program from `dir`.
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Captures stdout/stderr instead of inheriting the terminal.
    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments, excluding the program.
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Whether output is captured.
    pub fn is_captured(&self) -> bool {
        self.capture
    }

    /// Working directory, when set.
    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Outcome of a finished tool invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Whether the tool reported success.
    pub success: bool,
    /// Captured stdout (empty unless captured).
    pub stdout: String,
    /// Captured stderr (empty unless captured).
    pub stderr: String,
}

impl ToolOutput {
    /// A successful outcome with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed outcome with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Executes external tools.
///
/// `Err` means the tool could not be started; a tool that ran and failed
/// returns `Ok` with `success == false`.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    /// Runs `command` to completion.
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// Runs tools as real child processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        log::debug!("Running: {command}");

        let mut cmd = tokio::process::Command::new(command.program());
        cmd.args(command.arguments());
        if let Some(dir) = command.working_dir() {
            cmd.current_dir(dir);
        }

        let spawn_error = |source| Error::Spawn {
            program: command.program().to_string(),
            source,
        };

        if command.is_captured() {
            let output = cmd.output().await.map_err(spawn_error)?;
            Ok(ToolOutput {
                code: output.status.code(),
                success: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        } else {
            let status = cmd
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .map_err(spawn_error)?;
            Ok(ToolOutput {
                code: status.code(),
                success: status.success(),
                ..Default::default()
            })
        }
    }
}

/// Runs a step the packaging cannot continue without.
///
/// Spawn failures and non-zero exits both become errors naming the command.
pub async fn run_essential<R: ToolRunner>(runner: &R, command: &ToolCommand) -> Result<ToolOutput> {
    let output = runner.run(command).await?;
    if !output.success {
        return Err(Error::CommandFailed {
            command: command.to_string(),
            status: output.code,
            stderr: output.stderr,
        });
    }
    Ok(output)
}

/// Runs a cosmetic step; failures are logged and reported as `None`.
///
/// Failures log at info level: callers surface the degraded outcome.
pub async fn run_best_effort<R: ToolRunner>(
    runner: &R,
    command: &ToolCommand,
    what: &str,
) -> Option<ToolOutput> {
    match runner.run(command).await {
        Ok(output) if output.success => Some(output),
        Ok(output) => {
            log::info!(
                "{what} failed (exit code {:?}): {}",
                output.code,
                output.stderr.trim()
            );
            None
        }
        Err(e) => {
            log::info!("{what} could not run: {e}");
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingRunner;
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let cmd = ToolCommand::new("hdiutil").args(["detach", "/dev/disk4", "-force"]);
        assert_eq!(cmd.to_string(), "hdiutil detach /dev/disk4 -force");
    }

    #[tokio::test]
    async fn essential_failure_names_command() {
        let runner = RecordingRunner::new().queue("swift build", ToolOutput::failed(1, "boom"));
        let err = run_essential(&runner, &ToolCommand::new("swift").arg("build"))
            .await
            .unwrap_err();
        match err {
            Error::CommandFailed { command, status, stderr } => {
                assert_eq!(command, "swift build");
                assert_eq!(status, Some(1));
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn best_effort_swallows_failure() {
        let runner = RecordingRunner::new().queue("osascript", ToolOutput::failed(1, "denied"));
        let out = run_best_effort(&runner, &ToolCommand::new("osascript"), "AppleScript").await;
        assert!(out.is_none());
        assert_eq!(runner.calls().len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_captures_output() {
        let out = SystemRunner
            .run(&ToolCommand::new("sh").args(["-c", "echo hi; exit 3"]).captured())
            .await
            .unwrap();
        assert_eq!(out.stdout.trim(), "hi");
        assert_eq!(out.code, Some(3));
        assert!(!out.success);
    }

    #[tokio::test]
    async fn system_runner_reports_missing_program() {
        let err = SystemRunner
            .run(&ToolCommand::new("definitely-not-a-real-tool-xyz").captured())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
