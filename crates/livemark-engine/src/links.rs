//! # Wiki Link Recognizer
//!
//! Finds `[[target#heading|display]]` references in raw buffer text. The
//! scan is independent of the node tree: a wiki link is recognised wherever
//! it appears, including inside constructs the markdown parser treats as
//! plain text.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::span::Span;

/// `[[` target (no `]`, `|`, `#`), optional `#heading`, optional `|display`, `]]`.
pub const WIKI_LINK_PATTERN: &str = r"\[\[([^\]|#]+)(?:#([^|\]]+))?(?:\|([^\]]+))?\]\]";

fn wiki_link_regex() -> &'static Regex {
    static WIKI_LINK_REGEX: OnceLock<Regex> = OnceLock::new();
    WIKI_LINK_REGEX.get_or_init(|| Regex::new(WIKI_LINK_PATTERN).expect("Invalid wiki link regex"))
}

/// One recognised wiki link occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WikiLinkMatch {
    /// Note name, trimmed.
    pub target: String,
    /// Heading anchor after `#`, trimmed. `None` when absent or blank.
    pub heading: Option<String>,
    /// Text after `|`, trimmed. `None` when absent or blank.
    pub display_text: Option<String>,
    /// Full raw span including both bracket pairs.
    pub span: Span,
}

impl WikiLinkMatch {
    /// The raw source text of the link, brackets included.
    pub fn raw<'a>(&self, text: &'a str) -> &'a str {
        self.span.slice(text)
    }

    /// Text a widget shows for this link.
    pub fn label(&self) -> &str {
        self.display_text.as_deref().unwrap_or(&self.target)
    }
}

/// How much of the buffer is scanned for wiki links on each rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "kebab-case")]
pub enum LinkScanScope {
    /// Scan the whole buffer.
    #[default]
    Document,
    /// Scan only the visible region widened by `margin` bytes, snapped to
    /// whole lines. Links outside that window get no decoration.
    Viewport {
        #[serde(default = "default_margin")]
        margin: usize,
    },
}

fn default_margin() -> usize {
    LinkScanScope::DEFAULT_MARGIN
}

impl LinkScanScope {
    pub const DEFAULT_MARGIN: usize = 2048;

    /// The byte window to scan for the given visible region.
    pub fn window(self, text: &str, visible: Span) -> Span {
        match self {
            LinkScanScope::Document => Span::new(0, text.len()),
            LinkScanScope::Viewport { margin } => {
                let visible = visible.clamp_to(text.len());
                let mut start = visible.start.saturating_sub(margin);
                let mut end = visible.end.saturating_add(margin).min(text.len());
                while !text.is_char_boundary(start) {
                    start -= 1;
                }
                while !text.is_char_boundary(end) {
                    end += 1;
                }
                let start = text[..start].rfind('\n').map_or(0, |i| i + 1);
                let end = text[end..].find('\n').map_or(text.len(), |i| end + i);
                Span::new(start, end)
            }
        }
    }
}

/// All wiki links in `text`, left to right, non-overlapping.
pub fn find_wiki_links(text: &str) -> Vec<WikiLinkMatch> {
    find_in(text, 0)
}

/// Wiki links inside the window `scope` selects for `visible`.
pub fn scan(text: &str, scope: LinkScanScope, visible: Span) -> Vec<WikiLinkMatch> {
    let window = scope.window(text, visible);
    find_in(window.slice(text), window.start)
}

fn find_in(haystack: &str, base: usize) -> Vec<WikiLinkMatch> {
    wiki_link_regex()
        .captures_iter(haystack)
        .filter_map(|cap| {
            let full = cap.get(0)?;
            let target = cap.get(1)?.as_str().trim();
            if target.is_empty() {
                return None;
            }
            let trimmed = |i: usize| {
                cap.get(i)
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            Some(WikiLinkMatch {
                target: target.to_string(),
                heading: trimmed(2),
                display_text: trimmed(3),
                span: Span::new(base + full.start(), base + full.end()),
            })
        })
        .collect()
}

/// Outgoing link summary of a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLinks {
    pub links: Vec<WikiLinkMatch>,
    /// Distinct targets, sorted.
    pub referenced_notes: Vec<String>,
}

pub fn parse_links(text: &str) -> ParsedLinks {
    let links = find_wiki_links(text);
    let referenced_notes = links
        .iter()
        .map(|l| l.target.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    ParsedLinks {
        links,
        referenced_notes,
    }
}
