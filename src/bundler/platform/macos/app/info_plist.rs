//! Info.plist generation and verification.
//!
//! The manifest is rendered from a fixed Handlebars template so the output is
//! byte-stable across runs, then read back with the `plist` crate to make sure
//! Finder will accept it.

use crate::bundler::error::Result;
use handlebars::Handlebars;
use serde::Deserialize;
use std::collections::BTreeMap;

const INFO_PLIST_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleExecutable</key>
	<string>{{executable}}</string>
	<key>CFBundleIdentifier</key>
	<string>{{identifier}}</string>
	<key>CFBundleName</key>
	<string>{{name}}</string>
	<key>CFBundleVersion</key>
	<string>{{version}}</string>
	<key>CFBundleShortVersionString</key>
	<string>{{version}}</string>
	<key>LSUIElement</key>
	<{{ui_element}}/>
	<key>CFBundleIconFile</key>
	<string>AppIcon</string>
</dict>
</plist>"#;

/// Typed view of the generated manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InfoPlist {
    #[serde(rename = "CFBundleExecutable")]
    pub executable: String,
    #[serde(rename = "CFBundleIdentifier")]
    pub identifier: String,
    #[serde(rename = "CFBundleName")]
    pub name: String,
    #[serde(rename = "CFBundleVersion")]
    pub version: String,
    #[serde(rename = "CFBundleShortVersionString")]
    pub short_version: String,
    #[serde(rename = "LSUIElement")]
    pub ui_element: bool,
    #[serde(rename = "CFBundleIconFile")]
    pub icon_file: String,
}

/// Renders the manifest for an agent-style (`LSUIElement`) app.
pub fn generate_info_plist(
    executable_name: &str,
    bundle_id: &str,
    app_name: &str,
    version: &str,
) -> Result<String> {
    render_info_plist(executable_name, bundle_id, app_name, version, true)
}

/// Renders the manifest with an explicit `LSUIElement` value.
pub fn render_info_plist(
    executable_name: &str,
    bundle_id: &str,
    app_name: &str,
    version: &str,
    ui_element: bool,
) -> Result<String> {
    // The default escape function emits entities the plist parser accepts.
    let handlebars = Handlebars::new();

    let mut data = BTreeMap::new();
    data.insert("executable", executable_name.to_string());
    data.insert("identifier", bundle_id.to_string());
    data.insert("name", app_name.to_string());
    data.insert("version", version.to_string());
    data.insert("ui_element", ui_element.to_string());

    Ok(handlebars.render_template(INFO_PLIST_TEMPLATE, &data)?)
}

/// Parses a manifest back into its typed form.
pub fn parse_info_plist(bytes: &[u8]) -> Result<InfoPlist> {
    Ok(plist::from_bytes(bytes)?)
}
