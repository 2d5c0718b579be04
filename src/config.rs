use crate::error::{ReleaseError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Represents the complete configuration for pkg-release.
///
/// Contains git remote settings, release workflow settings and the
/// registration issue templates.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub issue: IssueConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_primary_branch() -> String {
    "master".to_string()
}

/// Remote and branch names used when pushing and merging.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_primary_branch")]
    pub primary_branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            primary_branch: default_primary_branch(),
        }
    }
}

fn default_release_branch() -> String {
    "release".to_string()
}

fn default_dev_marker() -> String {
    "DEV".to_string()
}

fn default_manifest() -> String {
    "Project.toml".to_string()
}

fn default_readme() -> String {
    "README.md".to_string()
}

/// Settings for the bump/start/finish workflows.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// Default release branch name
    #[serde(default = "default_release_branch")]
    pub branch: String,

    /// Prerelease identifier appended to development versions
    #[serde(default = "default_dev_marker")]
    pub dev_marker: String,

    /// Manifest file name, relative to the project directory
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// README file carrying the commits-since badge
    #[serde(default = "default_readme")]
    pub readme: String,

    /// Commit the whole working tree instead of just the manifest and README
    #[serde(default)]
    pub commit_all: bool,

    /// Push the release tag along with the primary branch on finish
    #[serde(default)]
    pub push_tag_on_finish: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            branch: default_release_branch(),
            dev_marker: default_dev_marker(),
            manifest: default_manifest(),
            readme: default_readme(),
            commit_all: false,
            push_tag_on_finish: false,
        }
    }
}

fn default_issue_title() -> String {
    "Register {tag}".to_string()
}

fn default_issue_body() -> String {
    "@JuliaRegistrator register(branch={branch})".to_string()
}

/// Templates for the tracking issue that triggers the registration bot.
///
/// `{version}`, `{tag}` and `{branch}` are substituted before filing.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IssueConfig {
    /// Host override; defaults to the host of the remote URL
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default = "default_issue_title")]
    pub title: String,

    #[serde(default = "default_issue_body")]
    pub body: String,

    #[serde(default)]
    pub labels: Vec<String>,
}

impl Default for IssueConfig {
    fn default() -> Self {
        IssueConfig {
            host: None,
            title: default_issue_title(),
            body: default_issue_body(),
            labels: Vec::new(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `pkgrelease.toml` in current directory
/// 3. `.pkgrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./pkgrelease.toml").exists() {
        fs::read_to_string("./pkgrelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".pkgrelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses configuration text, filling every missing key with its default.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| ReleaseError::config(e.to_string()))
}
