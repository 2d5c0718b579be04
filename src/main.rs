use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use semver::Version;

use pkg_release::boundary::ReleaseWarning;
use pkg_release::cli::{BumpArgs, BumpResult, FinishArgs, Releaser, StartArgs};
use pkg_release::config::{self, Config};
use pkg_release::domain::BumpMode;
use pkg_release::git::Git2Repository;
use pkg_release::issue::SystemBrowser;
use pkg_release::ui;
use pkg_release::EffectMode;

#[derive(clap::Parser)]
#[command(
    name = "pkg-release",
    version,
    about = "Bump, branch, tag and register package releases"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Bump the version in the project manifest
    BumpVersion {
        #[arg(value_name = "VERSION", help = "Explicit version to set")]
        target: Option<Version>,

        #[arg(long, default_value = ".", help = "Project directory or manifest path")]
        project: PathBuf,

        #[arg(long, help = "Commit the bumped files")]
        commit: bool,

        #[arg(long, help = "Tag HEAD with the new version")]
        tag: bool,

        #[arg(long, help = "Bump to a release instead of a development version")]
        release: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Create a release branch, bump to a release and request registration
    StartRelease {
        #[arg(value_name = "VERSION", help = "Explicit release version")]
        target: Option<Version>,

        #[arg(long, help = "Release branch name")]
        release_branch: Option<String>,

        #[arg(long, default_value = ".", help = "Project directory or manifest path")]
        project: PathBuf,

        #[arg(long, help = "Release the current manifest version without bumping")]
        no_bump: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Merge the release branch back into the primary branch
    FinishRelease {
        #[arg(long, help = "Release branch name")]
        release_branch: Option<String>,

        #[arg(long, default_value = ".", help = "Project directory or manifest path")]
        project: PathBuf,

        #[arg(long, help = "Also push the release tag")]
        push_tag: bool,

        #[arg(long, help = "Bump to the next development version after merging")]
        next_dev: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    match args.command {
        Commands::BumpVersion {
            target,
            project,
            commit,
            tag,
            release,
            dry_run,
        } => {
            let mode = EffectMode::from_dry_run(dry_run);
            let repo = open_repository(&project, &config)?;
            let releaser = Releaser::new(&repo, &SystemBrowser, &config, mode);
            let result = releaser.bump(&BumpArgs {
                project,
                version: target,
                mode: if release {
                    BumpMode::Release
                } else {
                    BumpMode::Prerelease
                },
                commit,
                tag,
            })?;

            display_warnings(&result.warnings);
            display_bump(&result);
            finish_output(mode);
        }
        Commands::StartRelease {
            target,
            release_branch,
            project,
            no_bump,
            dry_run,
        } => {
            let mode = EffectMode::from_dry_run(dry_run);
            let repo = open_repository(&project, &config)?;
            ui::display_status(&format!("Starting release in {}", project.display()));
            let releaser = Releaser::new(&repo, &SystemBrowser, &config, mode);
            let result = releaser.start_release(&StartArgs {
                project,
                version: target,
                release_branch,
                no_bump,
            })?;

            display_warnings(&result.warnings);
            if let Some(bump) = &result.bump {
                display_bump(bump);
            }
            ui::display_success(&format!(
                "Release {} prepared on branch '{}'",
                result.version, result.branch
            ));
            ui::display_issue_url(&result.issue_url);
            finish_output(mode);
        }
        Commands::FinishRelease {
            release_branch,
            project,
            push_tag,
            next_dev,
            dry_run,
        } => {
            let mode = EffectMode::from_dry_run(dry_run);
            let repo = open_repository(&project, &config)?;
            ui::display_status(&format!(
                "Merging release branch into '{}'",
                config.git.primary_branch
            ));
            let releaser = Releaser::new(&repo, &SystemBrowser, &config, mode);
            let result = releaser.finish_release(&FinishArgs {
                project,
                release_branch,
                push_tag,
                next_dev,
            })?;

            display_warnings(&result.warnings);
            if let Some(bump) = &result.next_dev {
                display_bump(bump);
            }
            ui::display_success(&format!(
                "Merged '{}' into '{}' and pushed",
                result.branch, result.primary
            ));
            if let Some(tag) = &result.pushed_tag {
                ui::display_success(&format!("Pushed tag {}", tag));
            }
            finish_output(mode);
        }
    }

    Ok(())
}

/// Open the repository containing the project, running commands from the
/// project directory.
fn open_repository(project: &Path, config: &Config) -> Result<Git2Repository> {
    let dir = if project.is_dir() {
        project.to_path_buf()
    } else {
        match project.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    };

    Git2Repository::open(&dir).with_context(|| {
        format!(
            "No git repository found for project '{}' ({} expected inside one)",
            project.display(),
            config.release.manifest
        )
    })
}

fn display_bump(result: &BumpResult) {
    ui::display_version_change(result.previous.as_ref(), &result.version);
    if let Some(change) = &result.badge {
        ui::display_badge_change(change);
    }
    if result.committed {
        ui::display_success(&format!("Committed {}", result.manifest.display()));
    }
    if result.tagged {
        ui::display_success(&format!("Created tag {}", result.tag));
    }
}

fn display_warnings(warnings: &[ReleaseWarning]) {
    for warning in warnings {
        ui::display_warning(warning);
    }
}

fn finish_output(mode: EffectMode) {
    if mode.is_dry_run() {
        ui::display_dry_run_notice();
    }
}
