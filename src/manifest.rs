use crate::error::{ReleaseError, Result};
use semver::Version;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{value, DocumentMut, Item, Value};

/// Key of the compatibility table the registration bot requires
pub const COMPAT_KEY: &str = "compat";

/// A project manifest held as a toml_edit document, so that keys other than
/// `version`, comments and formatting survive a round-trip
#[derive(Debug, Clone)]
pub struct Manifest {
    doc: DocumentMut,
    path: PathBuf,
}

impl Display for Manifest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.path.display()),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

impl Manifest {
    /// Resolve the manifest path for a `--project` argument, which may name
    /// either the manifest itself or the directory holding it.
    pub fn locate(project: &Path, file_name: &str) -> PathBuf {
        if project.is_file() {
            project.to_path_buf()
        } else {
            project.join(file_name)
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ReleaseError::missing(format!(
                "manifest file '{}' not found",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let doc = content.parse::<DocumentMut>()?;
        Ok(Manifest {
            doc,
            path: path.to_path_buf(),
        })
    }

    /// Directory containing the manifest
    pub fn project_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.doc.get("name").and_then(Item::as_str)
    }

    /// The `version` key, or `None` when the manifest has none yet
    pub fn version(&self) -> Result<Option<Version>> {
        match self.doc.get("version") {
            None => Ok(None),
            Some(item) => {
                let raw = item.as_str().ok_or_else(|| {
                    ReleaseError::config(format!(
                        "'version' in {} is not a string",
                        self.path.display()
                    ))
                })?;
                Ok(Some(Version::parse(raw)?))
            }
        }
    }

    /// The `version` key, failing when it is absent
    pub fn require_version(&self) -> Result<Version> {
        self.version()?.ok_or_else(|| {
            ReleaseError::missing(format!("'version' key in {}", self.path.display()))
        })
    }

    /// Set `version`, keeping the surrounding whitespace and comments of an
    /// existing entry.
    pub fn set_version(&mut self, version: &Version) {
        let rendered = version.to_string();
        match self.doc.get_mut("version").and_then(Item::as_value_mut) {
            Some(existing) => {
                let decor = existing.decor().clone();
                *existing = Value::from(rendered);
                *existing.decor_mut() = decor;
            }
            None => {
                self.doc["version"] = value(rendered);
            }
        }
    }

    pub fn has_compat(&self) -> bool {
        self.doc
            .get(COMPAT_KEY)
            .map(Item::is_table_like)
            .unwrap_or(false)
    }

    /// Fail unless the compatibility table is declared
    pub fn require_compat(&self) -> Result<()> {
        if self.has_compat() {
            Ok(())
        } else {
            Err(ReleaseError::missing(format!(
                "[{}] table in {}",
                COMPAT_KEY,
                self.path.display()
            )))
        }
    }

    pub fn render(&self) -> String {
        self.doc.to_string()
    }
}
