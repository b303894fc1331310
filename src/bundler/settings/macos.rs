//! macOS bundle and DMG settings.

use std::path::PathBuf;
use std::time::Duration;

/// Default icon source, relative to the project directory.
pub const DEFAULT_ICON_PATH: &str = "icons/cmdn.png";

/// Directory macOS mounts disk images under.
pub const DEFAULT_VOLUMES_ROOT: &str = "/Volumes";

/// File name the icon receives inside `Contents/Resources`.
pub const BUNDLE_ICON_NAME: &str = "AppIcon.png";

/// macOS application bundle (.app) configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacOsSettings {
    /// Icon image copied into the bundle and onto the installer volume.
    pub icon: PathBuf,

    /// Whether the app runs as an agent without a Dock icon (`LSUIElement`).
    pub ui_element: bool,
}

impl Default for MacOsSettings {
    fn default() -> Self {
        Self {
            icon: PathBuf::from(DEFAULT_ICON_PATH),
            ui_element: true,
        }
    }
}

/// Bounded retry applied to the final `hdiutil convert` step.
///
/// A policy with `max_attempts == 0` behaves like a policy with one attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub max_attempts: u32,

    /// Pause between two consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Attempts actually made, never fewer than one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(3),
        }
    }
}

/// macOS DMG disk image configuration.
///
/// # Configuration
///
/// Add to `Bundle.toml`:
///
/// ```toml
/// [dmg]
/// volume_name = "MyApp Installer"
/// window_size = [400, 250]
/// icon_size = 80
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DmgSettings {
    /// Volume name shown in Finder.
    ///
    /// Default: None (`"{ProductName} Installer"`)
    pub volume_name: Option<String>,

    /// Finder window size (width, height) in pixels.
    pub window_size: (u32, u32),

    /// Icon size in pixels.
    pub icon_size: u32,

    /// Retry policy for the UDRW → UDZO conversion.
    pub convert_retry: RetryPolicy,

    /// Time given to Finder to finish asynchronous window rendering before detaching.
    pub ui_settle: Duration,

    /// Time given to the disk arbitration daemon after detaching.
    pub detach_settle: Duration,

    /// Where `hdiutil attach` mounts volumes.
    pub volumes_root: PathBuf,
}

impl Default for DmgSettings {
    fn default() -> Self {
        Self {
            volume_name: None,
            window_size: (400, 250),
            icon_size: 80,
            convert_retry: RetryPolicy::default(),
            ui_settle: Duration::from_secs(2),
            detach_settle: Duration::from_secs(1),
            volumes_root: PathBuf::from(DEFAULT_VOLUMES_ROOT),
        }
    }
}

impl DmgSettings {
    /// Settings with every pause set to zero, for tests and dry environments.
    pub fn without_delays(mut self) -> Self {
        self.convert_retry.delay = Duration::ZERO;
        self.ui_settle = Duration::ZERO;
        self.detach_settle = Duration::ZERO;
        self
    }
}
