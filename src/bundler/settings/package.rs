//! Package metadata and configuration.

/// Default product (and executable target) name.
pub const DEFAULT_PRODUCT_NAME: &str = "CmdN";

/// Default reverse-DNS bundle identifier.
pub const DEFAULT_IDENTIFIER: &str = "itsfarseen.cmdn";

/// Default application version.
pub const DEFAULT_VERSION: &str = "1.0";

/// Package metadata shared by the bundle manifest and the installer.
///
/// # Examples
///
/// ```no_run
/// use macapp_packager::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     product_name: "MyApp".into(),
///     identifier: "com.example.myapp".into(),
///     version: "2.1".into(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSettings {
    /// Product name.
    ///
    /// Used as the Swift target name, the executable name inside the bundle,
    /// the `.app` directory name, and `CFBundleName`.
    pub product_name: String,

    /// Bundle identifier in reverse domain notation (`CFBundleIdentifier`).
    pub identifier: String,

    /// Version string, written to both `CFBundleVersion` and
    /// `CFBundleShortVersionString`.
    pub version: String,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            product_name: DEFAULT_PRODUCT_NAME.into(),
            identifier: DEFAULT_IDENTIFIER.into(),
            version: DEFAULT_VERSION.into(),
        }
    }
}
