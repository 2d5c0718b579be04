use crate::error::{ReleaseError, Result};
use crate::git::{CommandLine, CommandOutput, Repository};
use std::cell::RefCell;

/// Mock repository for testing without actual git operations
///
/// Every executed command is recorded; commands whose first argument is
/// listed with [MockRepository::failing_on] exit with status 1.
pub struct MockRepository {
    clean: bool,
    remote_url: Option<String>,
    failing: Vec<String>,
    executed: RefCell<Vec<CommandLine>>,
}

impl MockRepository {
    /// Create a clean mock repository without remotes
    pub fn new() -> Self {
        MockRepository {
            clean: true,
            remote_url: None,
            failing: Vec::new(),
            executed: RefCell::new(Vec::new()),
        }
    }

    /// Mark the working tree as having uncommitted changes
    pub fn dirty(mut self) -> Self {
        self.clean = false;
        self
    }

    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// Make every `git <subcommand>` invocation fail
    pub fn failing_on(mut self, subcommand: impl Into<String>) -> Self {
        self.failing.push(subcommand.into());
        self
    }

    /// Commands executed so far, in order
    pub fn executed(&self) -> Vec<CommandLine> {
        self.executed.borrow().clone()
    }

    /// Executed commands rendered as strings
    pub fn executed_lines(&self) -> Vec<String> {
        self.executed
            .borrow()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn is_working_tree_clean(&self) -> Result<bool> {
        Ok(self.clean)
    }

    fn current_remote_url(&self, remote: &str) -> Result<String> {
        self.remote_url
            .clone()
            .ok_or_else(|| ReleaseError::remote(format!("Cannot find remote '{}'", remote)))
    }

    fn execute(&self, command: &CommandLine) -> Result<CommandOutput> {
        self.executed.borrow_mut().push(command.clone());

        let fails = command
            .args
            .first()
            .map(|sub| self.failing.iter().any(|f| f == sub))
            .unwrap_or(false);

        Ok(CommandOutput {
            status: Some(if fails { 1 } else { 0 }),
            stdout: String::new(),
            stderr: if fails {
                format!("mock failure for {}", command)
            } else {
                String::new()
            },
        })
    }
}
