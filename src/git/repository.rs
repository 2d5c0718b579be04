use crate::error::{ReleaseError, Result};
use crate::git::{CommandLine, CommandOutput};
use git2::{Repository as Git2Repo, StatusOptions};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Wrapper around git2::Repository with our trait interface
///
/// Commands run in the directory the repository was opened from, so paths
/// handed to them may be relative to the project directory.
pub struct Git2Repository {
    repo: Git2Repo,
    dir: PathBuf,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref())?;
        if repo.is_bare() {
            return Err(ReleaseError::config(
                "Repository is bare; a working tree is required",
            ));
        }

        Ok(Git2Repository {
            repo,
            dir: path.as_ref().to_path_buf(),
        })
    }

    /// Create from existing git2::Repository, running commands in its work dir
    pub fn from_git2(repo: Git2Repo) -> Self {
        let dir = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Git2Repository { repo, dir }
    }
}

impl super::Repository for Git2Repository {
    fn is_working_tree_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn current_remote_url(&self, remote: &str) -> Result<String> {
        let found = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", remote, e)))?;

        found
            .url()
            .map(str::to_string)
            .ok_or_else(|| ReleaseError::remote(format!("Remote '{}' has no valid URL", remote)))
    }

    fn execute(&self, command: &CommandLine) -> Result<CommandOutput> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&self.dir)
            .output()
            .map_err(|e| ReleaseError::command(command.to_string(), e.to_string()))?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use std::fs;

    fn init_repo() -> (tempfile::TempDir, Git2Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        (dir, Git2Repository::from_git2(repo))
    }

    fn commit_all(repo: &Git2Repo, message: &str) {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        let parents: Vec<git2::Commit> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
    }

    #[test]
    fn test_fresh_repository_is_clean() {
        let (_dir, repo) = init_repo();
        assert!(repo.is_working_tree_clean().unwrap());
    }

    #[test]
    fn test_untracked_file_keeps_tree_clean() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("scratch.txt"), "notes").unwrap();
        assert!(repo.is_working_tree_clean().unwrap());
    }

    #[test]
    fn test_modified_tracked_file_is_dirty() {
        let (dir, repo) = init_repo();
        fs::write(dir.path().join("Project.toml"), "version = \"1.0.0\"\n").unwrap();
        commit_all(&repo.repo, "initial");
        assert!(repo.is_working_tree_clean().unwrap());

        fs::write(dir.path().join("Project.toml"), "version = \"1.0.1\"\n").unwrap();
        assert!(!repo.is_working_tree_clean().unwrap());
    }

    #[test]
    fn test_remote_url() {
        let (_dir, repo) = init_repo();
        repo.repo
            .remote("origin", "https://github.com/U/P.jl.git")
            .unwrap();
        assert_eq!(
            repo.current_remote_url("origin").unwrap(),
            "https://github.com/U/P.jl.git"
        );
        assert!(matches!(
            repo.current_remote_url("upstream"),
            Err(ReleaseError::Remote(_))
        ));
    }

    #[test]
    fn test_execute_missing_program_is_command_error() {
        let (_dir, repo) = init_repo();
        let result = repo.execute(&CommandLine::new("pkg-release-no-such-program", ["x"]));
        assert!(matches!(result, Err(ReleaseError::ExternalCommand { .. })));
    }
}
