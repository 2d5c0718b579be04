use semver::Version;
use std::fmt;

/// A version tag as used for git tags and badge URLs (e.g. "v1.2.3")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub name: String,
}

impl VersionTag {
    /// Tag for a version: the version string prefixed with `v`
    pub fn for_version(version: &Version) -> Self {
        VersionTag {
            name: format!("v{}", version),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Text template with `{version}`, `{tag}` and `{branch}` placeholders
#[derive(Debug, Clone)]
pub struct ReleaseTemplate {
    pub pattern: String,
}

impl ReleaseTemplate {
    pub fn new(pattern: impl Into<String>) -> Self {
        ReleaseTemplate {
            pattern: pattern.into(),
        }
    }

    /// Example: pattern="Register {tag}", version=1.2.3 -> "Register v1.2.3"
    pub fn format(&self, version: &Version, branch: &str) -> String {
        self.pattern
            .replace("{version}", &version.to_string())
            .replace("{tag}", VersionTag::for_version(version).as_str())
            .replace("{branch}", branch)
    }
}
