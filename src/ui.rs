//! Formatting functions for terminal output.
//!
//! Detailed step logging goes through `log`; this module prints the short
//! summaries a user reads after each workflow.

use console::style;
use semver::Version;

use crate::boundary::ReleaseWarning;
use crate::domain::BadgeChange;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal warning.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the version change (or initial version).
pub fn display_version_change(old: Option<&Version>, new: &Version) {
    match old {
        Some(old) => {
            println!("\n{}", style("Version Change:").bold());
            println!("  From: {}", style(old).red());
            println!("  To:   {}", style(new).green());
        }
        None => {
            println!("\n{}", style("Initial Version:").bold());
            println!("  New version: {}", style(new).green());
        }
    }
}

/// Display a badge rewrite.
pub fn display_badge_change(change: &BadgeChange) {
    println!("\n{}", style("Badge Update:").bold());
    println!("  {}", style(&change.template).dim());
    println!(
        "  {}: {} -> {}",
        style("{tag}").cyan(),
        style(&change.from).red(),
        style(&change.to).green()
    );
}

/// Display the issue form URL, for when the browser does not come up.
pub fn display_issue_url(url: &str) {
    println!(
        "\n{} If no browser window opened, file the issue at:\n  {}",
        style("→").yellow(),
        style(url).cyan()
    );
}

/// Remind the user that nothing was changed.
pub fn display_dry_run_notice() {
    println!(
        "\n{} Dry run: no files were written and no commands were executed",
        style("→").yellow()
    );
}
