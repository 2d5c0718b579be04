//! Next-version policy for the development -> release -> development cycle.

use crate::error::{ReleaseError, Result};
use semver::{Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;

/// Which kind of version a bump should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpMode {
    /// Routine bump to the next working version
    #[default]
    Prerelease,
    /// Bump to a final release
    Release,
}

impl fmt::Display for BumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpMode::Prerelease => write!(f, "prerelease"),
            BumpMode::Release => write!(f, "release"),
        }
    }
}

/// Compute the version a bump should move to.
///
/// An explicit version wins. Otherwise the previous version is promoted or
/// advanced according to `mode`:
///
/// | previous    | Prerelease    | Release |
/// |-------------|---------------|---------|
/// | `1.2.3`     | `1.2.4-DEV`   | `1.2.4` |
/// | `1.2.4-DEV` | `1.2.4`       | `1.2.4` |
///
/// The result must be strictly greater than `previous` when one exists.
/// Build metadata does not take part in the comparison.
pub fn compute_next_version(
    previous: Option<&Version>,
    explicit: Option<Version>,
    mode: BumpMode,
    dev_marker: &str,
) -> Result<Version> {
    let candidate = match (explicit, previous) {
        (Some(explicit), _) => explicit,
        (None, None) => return Err(ReleaseError::MissingVersion("the manifest".to_string())),
        (None, Some(previous)) => derive(previous, mode, dev_marker)?,
    };

    if let Some(previous) = previous {
        if candidate.cmp_precedence(previous) != Ordering::Greater {
            return Err(ReleaseError::VersionOrder {
                previous: previous.clone(),
                candidate,
            });
        }
    }

    Ok(candidate)
}

fn derive(previous: &Version, mode: BumpMode, dev_marker: &str) -> Result<Version> {
    let mut next = Version::new(previous.major, previous.minor, previous.patch);
    if !previous.pre.is_empty() {
        // finalize the in-progress prerelease in both modes
        return Ok(next);
    }

    next.patch += 1;
    if mode == BumpMode::Prerelease {
        next.pre = Prerelease::new(dev_marker)?;
    }
    Ok(next)
}

/// Whether the version is a final release (no prerelease identifiers).
pub fn is_release(version: &Version) -> bool {
    version.pre.is_empty()
}
