//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the repository the
//! release workflows act on, allowing for a real implementation and a mock
//! implementation for testing.
//!
//! # Overview
//!
//! Read-only queries (working tree state, remote URL) go through `git2`.
//! Mutating operations (add, commit, tag, checkout, merge, branch, push) are
//! plain `git` invocations described by a [CommandLine], so that dry-run mode
//! can log exactly what would have been executed.
//!
//! - [repository::Git2Repository]: A real implementation using `git2` and the `git` binary
//! - [mock::MockRepository]: A mock implementation recording commands for tests

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::fmt;
use std::path::Path;

/// An external command as an argv vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandLine {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A `git` invocation
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandLine::new("git", args)
    }

    /// `git add <paths>`
    pub fn add(paths: &[&Path]) -> Self {
        let mut args = vec!["add".to_string(), "--".to_string()];
        args.extend(paths.iter().map(|p| p.display().to_string()));
        CommandLine::git(args)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Outcome of an executed command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Repository state source and command execution primitive
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// `git2::Error` and launch failures to the matching
/// [crate::error::ReleaseError] variants.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository)
/// - [MockRepository](mock::MockRepository)
pub trait Repository {
    /// Whether the working tree and index have no uncommitted changes
    ///
    /// Untracked files do not make a tree dirty.
    fn is_working_tree_clean(&self) -> Result<bool>;

    /// URL of the named remote
    ///
    /// # Example
    /// ```rust
    /// # use pkg_release::git::{MockRepository, Repository};
    /// let repo = MockRepository::new().with_remote_url("git@github.com:U/P.jl.git");
    /// assert_eq!(repo.current_remote_url("origin").unwrap(), "git@github.com:U/P.jl.git");
    /// ```
    fn current_remote_url(&self, remote: &str) -> Result<String>;

    /// Run a command synchronously in the repository work dir
    ///
    /// A non-zero exit is reported through [CommandOutput::status], not as
    /// an error; only a failure to launch is an `Err`.
    fn execute(&self, command: &CommandLine) -> Result<CommandOutput>;
}
