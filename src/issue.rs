//! Tracking issue filing through the hosting service's "new issue" form.
//!
//! The issue is not created through an API: a prefilled form URL is built
//! and handed to the user's browser.

use crate::effect::EffectMode;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::fmt::Write as _;
use std::sync::OnceLock;

/// Host and `owner/repo` path of a git remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLocation {
    pub host: String,
    pub slug: String,
}

fn remote_regex() -> &'static Regex {
    static REMOTE: OnceLock<Regex> = OnceLock::new();
    REMOTE.get_or_init(|| {
        Regex::new(
            r"^(?:[A-Za-z][A-Za-z0-9+.-]*://)?(?:[^@/]+@)?([^/:]+)(?::\d+)?[:/](.+?)(?:\.git)?/?$",
        )
        .expect("remote pattern is valid")
    })
}

/// Parse https, ssh and scp-style remote URLs.
///
/// # Example
/// ```rust
/// # use pkg_release::issue::parse_remote_url;
/// let remote = parse_remote_url("git@github.com:U/P.jl.git").unwrap();
/// assert_eq!(remote.host, "github.com");
/// assert_eq!(remote.slug, "U/P.jl");
/// ```
pub fn parse_remote_url(url: &str) -> Result<RemoteLocation> {
    let caps = remote_regex()
        .captures(url.trim())
        .ok_or_else(|| ReleaseError::remote(format!("Cannot parse remote URL '{}'", url)))?;

    let host = caps[1].to_string();
    let slug = caps[2].to_string();
    if !slug.contains('/') {
        return Err(ReleaseError::remote(format!(
            "Remote URL '{}' does not name an owner/repository",
            url
        )));
    }
    Ok(RemoteLocation { host, slug })
}

/// Contents of the tracking issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRequest {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

impl IssueRequest {
    /// `https://<host>/<owner>/<repo>/issues/new?title=..&body=..[&labels=..]`
    pub fn url(&self, remote: &RemoteLocation) -> String {
        let mut url = format!(
            "https://{}/{}/issues/new?title={}&body={}",
            remote.host,
            remote.slug,
            form_encode(&self.title),
            form_encode(&self.body)
        );
        if !self.labels.is_empty() {
            let _ = write!(url, "&labels={}", form_encode(&self.labels.join(",")));
        }
        url
    }
}

/// application/x-www-form-urlencoded encoding of one value
pub fn form_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}

/// Opens URLs with the system's default handler
pub trait Browser {
    fn open(&self, url: &str) -> Result<()>;
}

pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        open::that(url).map_err(|e| ReleaseError::Browser(e.to_string()))
    }
}

/// Hand the issue form URL to the browser, or log it under dry-run.
pub fn file_issue<B: Browser + ?Sized>(mode: EffectMode, browser: &B, url: &str) -> Result<()> {
    match mode {
        EffectMode::Perform => {
            log::info!("Opening {}", url);
            browser.open(url)
        }
        EffectMode::DryRun => {
            log::info!("[dry-run] Would open {}", url);
            Ok(())
        }
    }
}
