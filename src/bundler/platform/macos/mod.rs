//! macOS `.app` bundles and DMG installers.

pub mod app;
pub mod dmg;
