//! # Node Tree
//!
//! The typed, spanned document structure the decoration rules walk.
//!
//! ## Modules
//!
//! - **`cursor`**: byte cursor used to locate marker runs inside a node
//! - **`kinds`**: marker types that own their syntax delimiters
//! - **`provider`**: `NodeTreeProvider` trait and the pulldown-cmark backed
//!   `MarkdownTreeProvider`
//!
//! The tree is produced by an external parser and is read-only to the
//! engine. Marker children (`HeaderMark`, `EmphasisMark`, `CodeMark`,
//! `ListMark`, `QuoteMark`, `LinkMark`) are first-class nodes so the rules
//! never need to guess delimiter widths.

pub mod cursor;
pub mod kinds;
pub mod provider;

pub use provider::{MarkdownTreeProvider, NodeTreeProvider};

use crate::span::Span;

/// Closed set of node kinds the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Document,
    Paragraph,
    /// ATX heading (`# ...`).
    Heading { level: u8 },
    /// Setext heading (text underlined with `===` or `---`).
    SetextHeading { level: u8 },
    /// A run of `#` (leading or closing), or a setext underline.
    HeaderMark,
    Strong,
    Emphasis,
    /// `*`, `**`, `_` or `__` delimiter run.
    EmphasisMark,
    InlineCode,
    CodeBlock { fenced: bool },
    /// Backtick run of an inline code span, or a fence run of a code block.
    CodeMark,
    /// Info string after an opening fence.
    CodeInfo,
    List { ordered: bool },
    ListItem,
    /// Bullet or ordinal plus delimiter.
    ListMark,
    Blockquote,
    /// A single `>`.
    QuoteMark,
    HorizontalRule,
    Link,
    /// `[`, `](`, `)`, `<` or `>` of a standard link.
    LinkMark,
    Url,
    /// Anything the engine has no rule for (HTML, images, tables, ...).
    Other,
}

/// A typed, spanned element of the parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    /// Children ordered by start offset.
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, span: Span, mut children: Vec<Node>) -> Self {
        children.sort_by_key(|c| c.span.start);
        Self {
            kind,
            span,
            children,
        }
    }

    /// Direct children of the given kind, in source order.
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// First direct child of the given kind.
    pub fn first_child(&self, kind: NodeKind) -> Option<&Node> {
        self.children_of(kind).next()
    }

    /// Pre-order traversal. `visit` returns `false` to skip a node's subtree.
    pub fn walk(&self, visit: &mut impl FnMut(&Node) -> bool) {
        if visit(self) {
            for child in &self.children {
                child.walk(visit);
            }
        }
    }
}
