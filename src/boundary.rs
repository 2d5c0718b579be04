use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while running a release workflow.
/// These are reported to the user and execution continues.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// A precondition failed under dry-run and was treated as satisfied
    PreconditionSkipped { reason: String },
    /// No README next to the manifest, so no badge to update
    ReadmeMissing { path: PathBuf },
    /// README exists but contains no commits-since badge
    BadgeNotFound { path: PathBuf },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::PreconditionSkipped { reason } => {
                write!(f, "{} (continuing because of --dry-run)", reason)
            }
            ReleaseWarning::ReadmeMissing { path } => {
                write!(f, "No README at '{}'; badge left alone", path.display())
            }
            ReleaseWarning::BadgeNotFound { path } => {
                write!(
                    f,
                    "No commits-since badge found in '{}'; file left unchanged",
                    path.display()
                )
            }
        }
    }
}
