//! # Decoration Rules
//!
//! Turns a node tree, the recognised wiki links, the caret and the [`Mode`]
//! into unordered [`CandidateEdit`]s. Nothing here is stateful: the same
//! input always yields the same candidates.
//!
//! ## Modules
//!
//! - **`edit`**: candidate edit types, style classes and priorities
//! - **`locality`**: caret proximity checks for edit mode
//! - **`rules`**: the per-node-kind rule table

pub mod edit;
pub mod locality;
pub mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use edit::{CandidateEdit, EditKind, StyleClass};
pub use rules::RuleEngine;

use crate::links::{self, LinkScanScope};
use crate::span::Span;
use crate::tree::Node;

/// Edit reveals raw syntax near the caret; Preview never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Edit,
    Preview,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Edit => Mode::Preview,
            Mode::Preview => Mode::Edit,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Edit => f.write_str("edit"),
            Mode::Preview => f.write_str("preview"),
        }
    }
}

/// Everything one rebuild reads.
#[derive(Debug, Clone, Copy)]
pub struct RebuildInput<'a> {
    pub text: &'a str,
    pub tree: &'a Node,
    pub caret: usize,
    pub mode: Mode,
    /// Region the host is showing. Nodes outside it get no candidates.
    pub visible: Span,
    pub link_scan: LinkScanScope,
}

impl<'a> RebuildInput<'a> {
    /// Input covering the whole buffer with a document-wide link scan.
    pub fn whole(text: &'a str, tree: &'a Node, caret: usize, mode: Mode) -> Self {
        Self {
            text,
            tree,
            caret,
            mode,
            visible: Span::new(0, text.len()),
            link_scan: LinkScanScope::Document,
        }
    }
}

/// All candidates for one rebuild: node rules first, then wiki links.
pub fn candidates(input: &RebuildInput<'_>) -> Vec<CandidateEdit> {
    let caret = input.caret.min(input.text.len());
    let engine = RuleEngine::new(input.text, caret, input.mode, input.visible);
    let mut out = engine.node_candidates(input.tree);
    let found = links::scan(input.text, input.link_scan, input.visible);
    out.extend(engine.link_candidates(&found));
    out
}
