//! Commits-since badge detection and rewriting.
//!
//! A README carries at most one badge of the form
//! `https://img.shields.io/github/commits-since/<owner>/<repo>/<tag>.svg`.
//! Rewriting splices a new tag into the tag span and leaves every other
//! byte of the text untouched.

use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

/// Placeholder shown in place of the tag when describing the badge template
pub const TAG_PLACEHOLDER: &str = "{tag}";

fn badge_regex() -> &'static Regex {
    static BADGE: OnceLock<Regex> = OnceLock::new();
    BADGE.get_or_init(|| {
        Regex::new(r"(https://img\.shields\.io/github/commits-since/[^/\s]+/[^/\s]+/)(v[0-9.]+)(\.svg)")
            .expect("badge pattern is valid")
    })
}

/// One badge occurrence, as three byte spans over the text it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeMatch<'t> {
    text: &'t str,
    pub prefix: Range<usize>,
    pub tag: Range<usize>,
    pub suffix: Range<usize>,
}

/// Record of a badge rewrite, for display only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeChange {
    /// Badge URL with the tag replaced by [`TAG_PLACEHOLDER`]
    pub template: String,
    pub from: String,
    pub to: String,
}

impl fmt::Display for BadgeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.template, self.from, self.to)
    }
}

/// Locate the first commits-since badge in `text`.
pub fn find_badge(text: &str) -> Option<BadgeMatch<'_>> {
    let caps = badge_regex().captures(text)?;
    let prefix = caps.get(1)?.range();
    let tag = caps.get(2)?.range();
    let suffix = caps.get(3)?.range();
    Some(BadgeMatch {
        text,
        prefix,
        tag,
        suffix,
    })
}

impl<'t> BadgeMatch<'t> {
    pub fn prefix_str(&self) -> &'t str {
        &self.text[self.prefix.clone()]
    }

    pub fn tag_str(&self) -> &'t str {
        &self.text[self.tag.clone()]
    }

    pub fn suffix_str(&self) -> &'t str {
        &self.text[self.suffix.clone()]
    }

    /// Replace the tag span with `new_tag`, keeping everything else verbatim.
    pub fn rewrite(&self, new_tag: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + new_tag.len());
        out.push_str(&self.text[..self.tag.start]);
        out.push_str(new_tag);
        out.push_str(&self.text[self.tag.end..]);
        out
    }

    /// Describe the change between this match and `rewritten`, the output of
    /// [`BadgeMatch::rewrite`].
    pub fn describe_change(&self, rewritten: &str) -> BadgeChange {
        let tail = self.text.len() - self.tag.end;
        let to = rewritten
            .get(self.tag.start..rewritten.len().saturating_sub(tail))
            .unwrap_or_default();
        BadgeChange {
            template: format!(
                "{}{}{}",
                self.prefix_str(),
                TAG_PLACEHOLDER,
                self.suffix_str()
            ),
            from: self.tag_str().to_string(),
            to: to.to_string(),
        }
    }
}

/// Point the badge in `text` at `new_tag`.
///
/// Returns the original text and `None` when no badge is present.
pub fn rewrite_badge(text: &str, new_tag: &str) -> (String, Option<BadgeChange>) {
    match find_badge(text) {
        Some(found) => {
            let rewritten = found.rewrite(new_tag);
            let change = found.describe_change(&rewritten);
            (rewritten, Some(change))
        }
        None => (text.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BADGE: &str = "https://img.shields.io/github/commits-since/U/P.jl/v1.2.3.svg";

    #[test]
    fn test_find_badge_spans() {
        let found = find_badge(BADGE).unwrap();
        assert_eq!(
            found.prefix_str(),
            "https://img.shields.io/github/commits-since/U/P.jl/"
        );
        assert_eq!(found.tag_str(), "v1.2.3");
        assert_eq!(found.suffix_str(), ".svg");
        assert_eq!(found.prefix.end, found.tag.start);
        assert_eq!(found.tag.end, found.suffix.start);
    }

    #[test]
    fn test_rewrite_bare_badge() {
        let found = find_badge(BADGE).unwrap();
        assert_eq!(
            found.rewrite("v2.0.0"),
            "https://img.shields.io/github/commits-since/U/P.jl/v2.0.0.svg"
        );
    }

    #[test]
    fn test_rewrite_preserves_surrounding_text() {
        let text = format!(
            "# P.jl\n\n[![commits]({})](https://github.com/U/P.jl/compare/v1.2.3...master)\n",
            BADGE
        );
        let (rewritten, change) = rewrite_badge(&text, "v1.3.0");
        assert_eq!(
            rewritten,
            "# P.jl\n\n[![commits](https://img.shields.io/github/commits-since/U/P.jl/v1.3.0.svg)](https://github.com/U/P.jl/compare/v1.2.3...master)\n"
        );
        assert!(change.is_some());
    }

    #[test]
    fn test_rewrite_then_find_sees_new_tag() {
        let (rewritten, _) = rewrite_badge("prefix https://img.shields.io/github/commits-since/a/b/v1.2.3.svg suffix", "v9.9.9");
        let found = find_badge(&rewritten).unwrap();
        assert_eq!(found.tag_str(), "v9.9.9");
        assert!(rewritten.starts_with("prefix "));
        assert!(rewritten.ends_with(".svg suffix"));
    }

    #[test]
    fn test_only_first_occurrence_is_rewritten() {
        let text = format!("{} {}", BADGE, BADGE);
        let (rewritten, _) = rewrite_badge(&text, "v2.0.0");
        assert_eq!(
            rewritten,
            format!(
                "https://img.shields.io/github/commits-since/U/P.jl/v2.0.0.svg {}",
                BADGE
            )
        );
    }

    #[test]
    fn test_no_badge_passes_text_through() {
        let text = "# Project\n\nNo badges here, just https://img.shields.io/badge/x.svg\n";
        assert!(find_badge(text).is_none());
        let (rewritten, change) = rewrite_badge(text, "v2.0.0");
        assert_eq!(rewritten, text);
        assert!(change.is_none());
    }

    #[test]
    fn test_prerelease_tag_is_not_a_badge() {
        let text = "https://img.shields.io/github/commits-since/U/P.jl/v1.2.4-DEV.svg";
        assert!(find_badge(text).is_none());
    }

    #[test]
    fn test_describe_change() {
        let found = find_badge(BADGE).unwrap();
        let rewritten = found.rewrite("v1.10.0");
        let change = found.describe_change(&rewritten);
        assert_eq!(
            change.template,
            "https://img.shields.io/github/commits-since/U/P.jl/{tag}.svg"
        );
        assert_eq!(change.from, "v1.2.3");
        assert_eq!(change.to, "v1.10.0");
        assert!(change.to_string().contains("v1.2.3 -> v1.10.0"));
    }

    #[test]
    fn test_rewrite_to_same_tag_is_identity() {
        let (rewritten, change) = rewrite_badge(BADGE, "v1.2.3");
        assert_eq!(rewritten, BADGE);
        let change = change.unwrap();
        assert_eq!(change.from, change.to);
    }
}
