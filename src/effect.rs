//! Perform / dry-run switch for every side-effecting step.
//!
//! The mode is chosen once per invocation and passed to each primitive.
//! Under [`EffectMode::DryRun`] commands are logged instead of executed,
//! writes are logged instead of performed, and failed preconditions become
//! warnings.

use crate::boundary::ReleaseWarning;
use crate::error::{ReleaseError, Result};
use crate::git::{CommandLine, CommandOutput, Repository};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffectMode {
    #[default]
    Perform,
    DryRun,
}

impl EffectMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            EffectMode::DryRun
        } else {
            EffectMode::Perform
        }
    }

    pub fn is_dry_run(self) -> bool {
        self == EffectMode::DryRun
    }

    /// Execute `command`, failing on launch errors and non-zero exits.
    ///
    /// Returns `None` under dry-run, where nothing is executed.
    pub fn run<R: Repository + ?Sized>(
        self,
        repo: &R,
        command: &CommandLine,
    ) -> Result<Option<CommandOutput>> {
        match self {
            EffectMode::Perform => {
                log::info!("Running: {}", command);
                let output = repo.execute(command)?;
                if !output.success() {
                    let detail = match output.status {
                        Some(code) => format!("exit status {}", code),
                        None => "terminated by signal".to_string(),
                    };
                    let stderr = output.stderr.trim();
                    let detail = if stderr.is_empty() {
                        detail
                    } else {
                        format!("{}: {}", detail, stderr)
                    };
                    return Err(ReleaseError::command(command.to_string(), detail));
                }
                Ok(Some(output))
            }
            EffectMode::DryRun => {
                log::info!("[dry-run] Would run: {}", command);
                Ok(None)
            }
        }
    }

    /// Halt with `error` unless `condition` holds.
    ///
    /// Under dry-run the error is logged as a warning and execution goes on.
    pub fn require(self, condition: bool, error: ReleaseError) -> Result<Option<ReleaseWarning>> {
        if condition {
            return Ok(None);
        }
        match self {
            EffectMode::Perform => Err(error),
            EffectMode::DryRun => {
                let warning = ReleaseWarning::PreconditionSkipped {
                    reason: error.to_string(),
                };
                log::warn!("{}", warning);
                Ok(Some(warning))
            }
        }
    }

    /// Write `content` to `path`.
    pub fn persist(self, path: &Path, content: &str) -> Result<()> {
        match self {
            EffectMode::Perform => {
                log::info!("Writing {}", path.display());
                fs::write(path, content)?;
                Ok(())
            }
            EffectMode::DryRun => {
                log::info!(
                    "[dry-run] Would write {} bytes to {}",
                    content.len(),
                    path.display()
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    #[test]
    fn test_from_dry_run() {
        assert_eq!(EffectMode::from_dry_run(true), EffectMode::DryRun);
        assert_eq!(EffectMode::from_dry_run(false), EffectMode::Perform);
        assert!(EffectMode::DryRun.is_dry_run());
    }

    #[test]
    fn test_run_perform_executes() {
        let repo = MockRepository::new();
        let cmd = CommandLine::git(["tag", "v1.0.0"]);
        let output = EffectMode::Perform.run(&repo, &cmd).unwrap();
        assert!(output.unwrap().success());
        assert_eq!(repo.executed(), vec![cmd]);
    }

    #[test]
    fn test_run_perform_surfaces_failure() {
        let repo = MockRepository::new().failing_on("push");
        let cmd = CommandLine::git(["push", "origin", "master"]);
        let err = EffectMode::Perform.run(&repo, &cmd).unwrap_err();
        match err {
            ReleaseError::ExternalCommand { command, detail } => {
                assert_eq!(command, "git push origin master");
                assert!(detail.contains("exit status 1"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_run_dry_run_never_executes() {
        let repo = MockRepository::new().failing_on("push");
        let cmd = CommandLine::git(["push", "origin", "master"]);
        assert!(EffectMode::DryRun.run(&repo, &cmd).unwrap().is_none());
        assert!(repo.executed().is_empty());
    }

    #[test]
    fn test_require_perform_fails() {
        let result = EffectMode::Perform.require(false, ReleaseError::DirtyRepository);
        assert!(matches!(result, Err(ReleaseError::DirtyRepository)));
        assert!(EffectMode::Perform
            .require(true, ReleaseError::DirtyRepository)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_require_dry_run_warns() {
        let warning = EffectMode::DryRun
            .require(false, ReleaseError::DirtyRepository)
            .unwrap()
            .unwrap();
        assert!(warning.to_string().contains("uncommitted changes"));
    }

    #[test]
    fn test_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Project.toml");

        EffectMode::DryRun.persist(&path, "version = \"1.0.0\"\n").unwrap();
        assert!(!path.exists());

        EffectMode::Perform.persist(&path, "version = \"1.0.0\"\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"1.0.0\"\n");
    }
}
