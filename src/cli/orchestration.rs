//! Release workflow orchestration
//!
//! Sequences the version policy, the badge rewriter and the repository
//! collaborators into the three workflows the CLI exposes:
//!
//! - [Releaser::bump]: compute and persist the next version, optionally commit and tag
//! - [Releaser::start_release]: branch, bump to a release, push, file the registration issue
//! - [Releaser::finish_release]: merge the release branch back and push
//!
//! Every side effect goes through the [EffectMode] the releaser was built
//! with. Workflows stop at the first error; completed steps are not undone.

use std::fs;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::boundary::ReleaseWarning;
use crate::config::Config;
use crate::domain::{
    compute_next_version, is_release, rewrite_badge, BadgeChange, BumpMode, ReleaseTemplate,
    VersionTag,
};
use crate::effect::EffectMode;
use crate::error::{ReleaseError, Result};
use crate::git::{CommandLine, Repository};
use crate::issue::{file_issue, parse_remote_url, Browser, IssueRequest};
use crate::manifest::Manifest;

/// Arguments for the bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BumpArgs {
    /// Project directory or manifest path
    pub project: PathBuf,

    /// Explicit target version
    pub version: Option<Version>,

    pub mode: BumpMode,

    /// Commit the manifest (and README) after bumping
    pub commit: bool,

    /// Tag the current HEAD with the new version
    pub tag: bool,
}

/// Arguments for the start-release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct StartArgs {
    pub project: PathBuf,

    /// Explicit release version
    pub version: Option<Version>,

    /// Release branch name; the configured default when `None`
    pub release_branch: Option<String>,

    /// Release the manifest's current version as-is
    pub no_bump: bool,
}

/// Arguments for the finish-release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct FinishArgs {
    pub project: PathBuf,

    pub release_branch: Option<String>,

    /// Push the release tag along with the primary branch
    pub push_tag: bool,

    /// Bump the primary branch to the next development version before pushing
    pub next_dev: bool,
}

/// Result of a bump
#[derive(Debug, Clone, PartialEq)]
pub struct BumpResult {
    pub manifest: PathBuf,
    pub previous: Option<Version>,
    pub version: Version,
    pub tag: VersionTag,
    pub badge: Option<BadgeChange>,
    pub committed: bool,
    pub tagged: bool,
    pub warnings: Vec<ReleaseWarning>,
}

/// Result of starting a release
#[derive(Debug, Clone, PartialEq)]
pub struct StartResult {
    pub branch: String,
    pub version: Version,
    /// `None` when started with `no_bump`
    pub bump: Option<BumpResult>,
    pub issue_url: String,
    pub warnings: Vec<ReleaseWarning>,
}

/// Result of finishing a release
#[derive(Debug, Clone, PartialEq)]
pub struct FinishResult {
    pub branch: String,
    pub primary: String,
    pub pushed_tag: Option<VersionTag>,
    pub next_dev: Option<BumpResult>,
    pub warnings: Vec<ReleaseWarning>,
}

/// Runs release workflows against a repository and a browser
pub struct Releaser<'a, R: Repository + ?Sized, B: Browser + ?Sized> {
    repo: &'a R,
    browser: &'a B,
    config: &'a Config,
    mode: EffectMode,
}

impl<'a, R: Repository + ?Sized, B: Browser + ?Sized> Releaser<'a, R, B> {
    pub fn new(repo: &'a R, browser: &'a B, config: &'a Config, mode: EffectMode) -> Self {
        Releaser {
            repo,
            browser,
            config,
            mode,
        }
    }

    /// Bump the manifest version
    ///
    /// When the new version is a release, the README badge is pointed at its
    /// tag. Only the manifest and the README are committed unless
    /// `release.commit_all` is set.
    pub fn bump(&self, args: &BumpArgs) -> Result<BumpResult> {
        let manifest_path = Manifest::locate(&args.project, &self.config.release.manifest);
        let mut manifest = Manifest::load(&manifest_path)?;
        let previous = manifest.version()?;

        let version = compute_next_version(
            previous.as_ref(),
            args.version.clone(),
            args.mode,
            &self.config.release.dev_marker,
        )
        .map_err(|e| match e {
            ReleaseError::MissingVersion(_) => {
                ReleaseError::MissingVersion(manifest_path.display().to_string())
            }
            other => other,
        })?;

        match &previous {
            Some(previous) => log::info!(
                "Bumping {} from {} to {} ({} mode)",
                manifest,
                previous,
                version,
                args.mode
            ),
            None => log::info!("Setting {} version to {}", manifest, version),
        }

        manifest.set_version(&version);
        let tag = VersionTag::for_version(&version);
        let project_dir = manifest.project_dir().to_path_buf();
        let mut warnings = Vec::new();
        let mut changed = vec![manifest_path.clone()];

        let badge = if is_release(&version) {
            self.rewrite_readme_badge(&project_dir, &tag, &mut warnings)?
        } else {
            None
        };

        self.mode.persist(&manifest_path, &manifest.render())?;
        let badge = match badge {
            Some((readme_path, text, change)) => {
                self.mode.persist(&readme_path, &text)?;
                changed.push(readme_path);
                Some(change)
            }
            None => None,
        };

        if args.commit {
            let paths: Vec<&Path> = changed
                .iter()
                .map(|p| p.strip_prefix(&project_dir).unwrap_or(p.as_path()))
                .collect();
            self.commit(&paths, &format!("Bump version to {}", version))?;
        }

        if args.tag {
            self.run(CommandLine::git(["tag", tag.as_str()]))?;
        }

        Ok(BumpResult {
            manifest: manifest_path,
            previous,
            version,
            tag,
            badge,
            committed: args.commit,
            tagged: args.tag,
            warnings,
        })
    }

    /// Open a release branch and request registration of the release
    pub fn start_release(&self, args: &StartArgs) -> Result<StartResult> {
        let branch = self.release_branch(args.release_branch.as_deref());
        let mut warnings = Vec::new();

        self.run(CommandLine::git(["checkout", "-b", branch.as_str()]))?;
        self.require_clean(&mut warnings)?;

        let bump = if args.no_bump {
            None
        } else {
            Some(self.bump(&BumpArgs {
                project: args.project.clone(),
                version: args.version.clone(),
                mode: BumpMode::Release,
                commit: true,
                tag: true,
            })?)
        };

        // fatal in every mode
        let manifest_path = Manifest::locate(&args.project, &self.config.release.manifest);
        let manifest = Manifest::load(&manifest_path)?;
        manifest.require_compat()?;

        let version = match &bump {
            Some(bump) => {
                warnings.extend(bump.warnings.iter().cloned());
                bump.version.clone()
            }
            None => {
                // the release tag is otherwise created by the bump
                let version = manifest.require_version()?;
                let tag = VersionTag::for_version(&version);
                self.run(CommandLine::git(["tag", tag.as_str()]))?;
                version
            }
        };

        let remote = self.config.git.remote.as_str();
        self.run(CommandLine::git(["push", "-u", remote, branch.as_str()]))?;

        let issue_url = self.issue_url(&version, &branch)?;
        file_issue(self.mode, self.browser, &issue_url)?;

        Ok(StartResult {
            branch,
            version,
            bump,
            issue_url,
            warnings,
        })
    }

    /// Merge the release branch into the primary branch and push it
    pub fn finish_release(&self, args: &FinishArgs) -> Result<FinishResult> {
        let branch = self.release_branch(args.release_branch.as_deref());
        let primary = self.config.git.primary_branch.clone();
        let remote = self.config.git.remote.as_str();
        let mut warnings = Vec::new();

        self.require_clean(&mut warnings)?;
        self.run(CommandLine::git(["checkout", primary.as_str()]))?;
        self.run(CommandLine::git(["merge", "--no-edit", branch.as_str()]))?;
        self.run(CommandLine::git(["branch", "-d", branch.as_str()]))?;

        let push_tag = args.push_tag || self.config.release.push_tag_on_finish;
        let release_tag = if push_tag {
            let manifest_path = Manifest::locate(&args.project, &self.config.release.manifest);
            let version = Manifest::load(&manifest_path)?.require_version()?;
            Some(VersionTag::for_version(&version))
        } else {
            None
        };

        let next_dev = if args.next_dev {
            let bump = self.bump(&BumpArgs {
                project: args.project.clone(),
                version: None,
                mode: BumpMode::Prerelease,
                commit: true,
                tag: false,
            })?;
            warnings.extend(bump.warnings.iter().cloned());
            Some(bump)
        } else {
            None
        };

        self.run(CommandLine::git(["push", remote, primary.as_str()]))?;
        if let Some(tag) = &release_tag {
            self.run(CommandLine::git(["push", remote, tag.as_str()]))?;
        }

        Ok(FinishResult {
            branch,
            primary,
            pushed_tag: release_tag,
            next_dev,
            warnings,
        })
    }

    fn run(&self, command: CommandLine) -> Result<()> {
        self.mode.run(self.repo, &command)?;
        Ok(())
    }

    fn require_clean(&self, warnings: &mut Vec<ReleaseWarning>) -> Result<()> {
        let clean = self.repo.is_working_tree_clean()?;
        if let Some(warning) = self.mode.require(clean, ReleaseError::DirtyRepository)? {
            warnings.push(warning);
        }
        Ok(())
    }

    fn release_branch(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_string)
            .unwrap_or_else(|| self.config.release.branch.clone())
    }

    fn commit(&self, paths: &[&Path], message: &str) -> Result<()> {
        if self.config.release.commit_all {
            self.run(CommandLine::git(["add", "--all"]))?;
            self.run(CommandLine::git(["commit", "-m", message]))
        } else {
            self.run(CommandLine::add(paths))?;
            let mut args = vec!["commit".to_string(), "-m".to_string(), message.to_string()];
            args.push("--".to_string());
            args.extend(paths.iter().map(|p| p.display().to_string()));
            self.run(CommandLine::git(args))
        }
    }

    /// Read the README and point its badge at `tag`.
    ///
    /// Returns the README path, rewritten text and change record, or `None`
    /// (with a warning) when there is nothing to rewrite.
    fn rewrite_readme_badge(
        &self,
        project_dir: &Path,
        tag: &VersionTag,
        warnings: &mut Vec<ReleaseWarning>,
    ) -> Result<Option<(PathBuf, String, BadgeChange)>> {
        let readme_path = project_dir.join(&self.config.release.readme);
        if !readme_path.is_file() {
            let warning = ReleaseWarning::ReadmeMissing { path: readme_path };
            log::warn!("{}", warning);
            warnings.push(warning);
            return Ok(None);
        }

        let text = fs::read_to_string(&readme_path)?;
        match rewrite_badge(&text, tag.as_str()) {
            (rewritten, Some(change)) => {
                log::info!("Badge {}", change);
                Ok(Some((readme_path, rewritten, change)))
            }
            (_, None) => {
                let warning = ReleaseWarning::BadgeNotFound { path: readme_path };
                log::warn!("{}", warning);
                warnings.push(warning);
                Ok(None)
            }
        }
    }

    fn issue_url(&self, version: &Version, branch: &str) -> Result<String> {
        let url = self.repo.current_remote_url(&self.config.git.remote)?;
        let mut location = parse_remote_url(&url)?;
        if let Some(host) = &self.config.issue.host {
            location.host = host.clone();
        }

        let request = IssueRequest {
            title: ReleaseTemplate::new(self.config.issue.title.as_str()).format(version, branch),
            body: ReleaseTemplate::new(self.config.issue.body.as_str()).format(version, branch),
            labels: self.config.issue.labels.clone(),
        };
        Ok(request.url(&location))
    }
}
