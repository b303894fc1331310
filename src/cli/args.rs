//! Command line argument parsing.

use crate::bundler::Action;
use clap::{Parser, ValueEnum};

/// Build, bundle, and package a Swift macOS app
#[derive(Parser, Debug)]
#[command(
    name = "macapp",
    version,
    about = "Build, bundle, and package a Swift macOS app",
    long_about = "Builds a Swift Package Manager app, wraps it in a .app bundle, and packages
it as a drag-to-install DMG.

Run from the package root. Settings come from an optional Bundle.toml there,
or from the file named by MACAPP_CONFIG.

Usage:
  macapp                 debug build
  macapp bundle-app      dist/<Name>.app
  macapp package-dmg     dist/<Name>.dmg"
)]
pub struct Args {
    /// What to do
    #[arg(value_enum, default_value_t = Command::Build)]
    pub command: Command,
}

/// Commands accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Compile in debug mode
    Build,
    /// Compile in release mode
    BuildRelease,
    /// Compile and run the app
    Run,
    /// Format sources with swift-format
    Format,
    /// Release build wrapped in a .app bundle
    BundleApp,
    /// .app bundle packaged as an installer DMG
    PackageDmg,
    /// Remove build outputs
    Clean,
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        match command {
            Command::Build => Action::Build,
            Command::BuildRelease => Action::BuildRelease,
            Command::Run => Action::Run,
            Command::Format => Action::Format,
            Command::BundleApp => Action::BundleApp,
            Command::PackageDmg => Action::PackageDmg,
            Command::Clean => Action::Clean,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The action to run.
    pub fn action(&self) -> Action {
        self.command.into()
    }
}
