//! Domain logic - pure release rules independent of git and the filesystem

pub mod badge;
pub mod tag;
pub mod version;

pub use badge::{find_badge, rewrite_badge, BadgeChange, BadgeMatch};
pub use tag::{ReleaseTemplate, VersionTag};
pub use version::{compute_next_version, is_release, BumpMode};
