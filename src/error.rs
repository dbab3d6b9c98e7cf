//! Error types for wilf
//!
//! Error hierarchy:
//! - VersionError: Specifier parsing and version evaluation failures
//! - ManifestError: Issues with Pipfile reading and parsing
//! - RegistryError: Issues with package registry communication
//! - ConfigError: Issues with the configuration file and CLI options

use std::path::PathBuf;
use thiserror::Error;

/// Any error raised while checking a Pipfile
#[derive(Error, Debug)]
pub enum AppError {
    /// Version engine errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Pipfile errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Registry lookup errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration and option errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised by the version requirement engine
///
/// All of them are local and non-retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// The token cannot be normalized into an ordered version
    #[error("invalid version: {version}")]
    InvalidVersion { version: String },

    /// An operator is not followed by any version
    #[error("missing version: {spec}")]
    MissingVersion { spec: String },

    /// A wildcard operand is used with an operator other than `==`/`!=`,
    /// or the wildcard pattern cannot be compiled
    #[error("invalid version matching: {spec}")]
    InvalidVersionMatching { spec: String },

    /// Severity classification was requested for a requirement without constraints
    #[error("missing requirement")]
    MissingRequirement,
}

/// Errors raised while reading a Pipfile
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The Pipfile does not exist
    #[error("Pipfile not found: {path}")]
    NotFound { path: PathBuf },

    /// The Pipfile exists but cannot be read
    #[error("cannot read Pipfile {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("cannot parse Pipfile {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// A dependency entry has an unsupported shape
    #[error("invalid entry for '{package}': {message}")]
    InvalidEntry { package: String, message: String },

    /// A dependency table has no `version` field and is not a local/VCS install
    #[error("field 'version' not found in specification: {package}")]
    MissingVersionField { package: String },

    /// Invalid version specifier
    #[error("invalid version specifier for '{package}': {source}")]
    InvalidSpecifier {
        package: String,
        #[source]
        source: VersionError,
    },
}

/// Errors raised by registry lookups
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry does not know the package
    #[error("{registry} does not know package '{package}'")]
    PackageNotFound { package: String, registry: String },

    /// Transport failure or unexpected HTTP status
    #[error("lookup of '{package}' on {registry} failed: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("{registry} is rate limiting requests")]
    RateLimitExceeded { registry: String },

    /// The registry answered with an unexpected document
    #[error("unexpected {registry} answer for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("{registry} timed out looking up '{package}'")]
    Timeout { package: String, registry: String },

    /// Authentication error
    #[error("{registry} rejected the credentials: {message}")]
    AuthenticationError { registry: String, message: String },

    /// More than one package answers to the same name
    #[error("{registry} indicates more than one project named '{package}'")]
    AmbiguousPackage { package: String, registry: String },
}

/// Errors raised by the configuration file and command line options
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("fails to load configuration '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("fails to parse configuration '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    /// Unknown update level
    #[error("invalid update level '{value}': expected 'patch', 'minor' or 'major'")]
    InvalidUpdateLevel { value: String },

    /// Unknown reporter
    #[error("invalid reporter '{value}': expected 'monochrome-table', 'colorized-table', 'junit[:path]' or 'json[:path]'")]
    InvalidReporter { value: String },

    /// Invalid output path for a reporter
    #[error("cannot write report to '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },
}

impl VersionError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        VersionError::InvalidVersion {
            version: version.into(),
        }
    }

    /// Creates a new MissingVersion error
    pub fn missing_version(spec: impl Into<String>) -> Self {
        VersionError::MissingVersion { spec: spec.into() }
    }

    /// Creates a new InvalidVersionMatching error
    pub fn invalid_matching(spec: impl Into<String>) -> Self {
        VersionError::InvalidVersionMatching { spec: spec.into() }
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidSpecifier error
    pub fn invalid_specifier(package: impl Into<String>, source: VersionError) -> Self {
        ManifestError::InvalidSpecifier {
            package: package.into(),
            source,
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Returns true if this error means the package does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::PackageNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_error_messages() {
        assert_eq!(
            VersionError::invalid_version("v1.x").to_string(),
            "invalid version: v1.x"
        );
        assert_eq!(
            VersionError::missing_version(">=").to_string(),
            "missing version: >="
        );
        assert_eq!(
            VersionError::invalid_matching(">=1.2.*").to_string(),
            "invalid version matching: >=1.2.*"
        );
        assert_eq!(
            VersionError::MissingRequirement.to_string(),
            "missing requirement"
        );
    }

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/Pipfile");
        let msg = format!("{}", err);
        assert!(msg.contains("Pipfile not found"));
        assert!(msg.contains("Pipfile"));
    }

    #[test]
    fn test_manifest_error_toml_parse() {
        let err = ManifestError::toml_parse_error("/path/to/Pipfile", "invalid key");
        let msg = format!("{}", err);
        assert!(msg.contains("cannot parse Pipfile"));
        assert!(msg.contains("invalid key"));
    }

    #[test]
    fn test_manifest_error_invalid_specifier() {
        let err =
            ManifestError::invalid_specifier("numpy", VersionError::invalid_matching(">=1.*"));
        let msg = format!("{}", err);
        assert!(msg.contains("numpy"));
        assert!(msg.contains("invalid version matching: >=1.*"));
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("nonexistent-package", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("does not know package 'nonexistent-package'"));
        assert!(msg.contains("PyPI"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("requests", "PyPI", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("lookup of 'requests' on PyPI failed"));
        assert!(msg.contains("connection refused"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_registry_error_rate_limit() {
        let err = RegistryError::rate_limit_exceeded("PyPI");
        assert!(err.to_string().contains("rate limiting"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("numpy", "GitLab");
        let msg = format!("{}", err);
        assert!(msg.contains("timed out"));
        assert!(msg.contains("numpy"));
    }

    #[test]
    fn test_config_error_invalid_update_level() {
        let err = ConfigError::InvalidUpdateLevel {
            value: "huge".to_string(),
        };
        assert!(err.to_string().contains("invalid update level 'huge'"));
    }

    #[test]
    fn test_app_error_from_version_error() {
        let app_err: AppError = VersionError::MissingRequirement.into();
        assert_eq!(app_err.to_string(), "missing requirement");
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let registry_err = RegistryError::package_not_found("pkg", "PyPI");
        let app_err: AppError = registry_err.into();
        assert!(app_err.to_string().contains("package 'pkg'"));
    }
}
