//! External tool detection and availability checking.

use std::path::PathBuf;
use std::sync::LazyLock;

/// Whether `swift-format` is available for the format action.
///
/// Cached result to avoid repeated PATH scans.
pub static HAS_SWIFT_FORMAT: LazyLock<bool> = LazyLock::new(|| find_tool("swift-format").is_some());

/// Tools each action shells out to, used for preflight logging.
pub const PACKAGING_TOOLS: &[&str] = &["swift", "hdiutil", "osascript", "diskutil"];

/// Locates `name` on `PATH`.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => {
            log::debug!("Found {} at: {}", name, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", name, e);
            None
        }
    }
}

/// Returns the subset of `tools` missing from `PATH`.
pub fn missing_tools<'a>(tools: &[&'a str]) -> Vec<&'a str> {
    tools
        .iter()
        .copied()
        .filter(|tool| find_tool(tool).is_none())
        .collect()
}
