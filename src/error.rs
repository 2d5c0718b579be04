use thiserror::Error;

/// Unified error type for pkg-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Working tree has uncommitted changes; commit or stash them first")]
    DirtyRepository,

    #[error("No version given and {0} has no version to derive one from")]
    MissingVersion(String),

    #[error("Version {candidate} is not greater than the current version {previous}")]
    VersionOrder {
        previous: semver::Version,
        candidate: semver::Version,
    },

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Command `{command}` failed: {detail}")]
    ExternalCommand { command: String, detail: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest parsing error: {0}")]
    Manifest(#[from] toml_edit::TomlError),

    #[error("Version parsing error: {0}")]
    Version(#[from] semver::Error),

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Could not open browser: {0}")]
    Browser(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in pkg-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a missing-configuration error with context
    pub fn missing(what: impl Into<String>) -> Self {
        ReleaseError::MissingConfiguration(what.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Create an external command error
    pub fn command(command: impl Into<String>, detail: impl Into<String>) -> Self {
        ReleaseError::ExternalCommand {
            command: command.into(),
            detail: detail.into(),
        }
    }
}
