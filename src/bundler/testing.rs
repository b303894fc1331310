//! Fixtures shared by the bundler's unit tests.

use crate::bundler::{BundleSettings, DmgSettings, PackageSettings, Settings, SettingsBuilder};
use std::path::Path;

/// Lays out a compiled project under `root` and returns settings for it.
///
/// Creates `.build/release/CmdN` and `icons/cmdn.png`; every pause is zero.
pub fn project_with_binary(root: &Path) -> Settings {
    project_with_dmg(root, DmgSettings::default().without_delays())
}

/// Like [`project_with_binary`], with volumes mounted under `volumes_root`.
pub fn project_mounting_under(root: &Path, volumes_root: &Path) -> Settings {
    project_with_dmg(
        root,
        DmgSettings {
            volumes_root: volumes_root.to_path_buf(),
            ..DmgSettings::default().without_delays()
        },
    )
}

fn project_with_dmg(root: &Path, dmg: DmgSettings) -> Settings {
    std::fs::create_dir_all(root.join(".build/release")).unwrap();
    std::fs::write(root.join(".build/release/CmdN"), b"\x7fMACHO-binary").unwrap();
    std::fs::create_dir_all(root.join("icons")).unwrap();
    std::fs::write(root.join("icons/cmdn.png"), b"\x89PNG-icon").unwrap();

    SettingsBuilder::new()
        .project_directory(root)
        .package_settings(PackageSettings::default())
        .bundle_settings(BundleSettings {
            dmg,
            ..Default::default()
        })
        .build()
        .unwrap()
}
