use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::span::Span;

use super::kinds::{
    AtxHeading, BlockQuote, CodeFence, CodeSpan, Delimited, LinkSyntax, ListMarker, SetextHeading,
};
use super::{Node, NodeKind};

/// Produces the typed node tree for a buffer.
///
/// The engine never parses markdown itself; hosts with their own syntax tree
/// implement this trait and hand it to `LivePreview::with_provider`.
pub trait NodeTreeProvider {
    /// Parses `text` into a `Document` node spanning the whole buffer.
    fn parse(&self, text: &str) -> Node;
}

/// `NodeTreeProvider` backed by `pulldown-cmark` offset events.
///
/// Delimiter positions are not reported by the parser, so marker children
/// are located in the source text by the types in [`super::kinds`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownTreeProvider;

impl MarkdownTreeProvider {
    pub fn new() -> Self {
        Self
    }
}

struct Frame {
    kind: NodeKind,
    span: Span,
    children: Vec<Node>,
}

impl NodeTreeProvider for MarkdownTreeProvider {
    fn parse(&self, text: &str) -> Node {
        let mut stack = vec![Frame {
            kind: NodeKind::Document,
            span: Span::new(0, text.len()),
            children: vec![],
        }];

        for (event, range) in Parser::new_ext(text, Options::empty()).into_offset_iter() {
            let span = trim_line_end(text, Span::from(range));
            match event {
                Event::Start(tag) => {
                    let kind = kind_of(&tag, text, span);
                    stack.push(Frame {
                        kind,
                        span,
                        children: vec![],
                    });
                }
                Event::End(_) => {
                    if stack.len() < 2 {
                        continue;
                    }
                    let Some(frame) = stack.pop() else { continue };
                    let depth = stack
                        .iter()
                        .filter(|f| f.kind == NodeKind::Blockquote)
                        .count();
                    let node = finish(text, frame, depth);
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
                Event::Code(_) => {
                    let node = Node::with_children(
                        NodeKind::InlineCode,
                        span,
                        CodeSpan::marks(text, span),
                    );
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(node);
                    }
                }
                Event::Rule => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::new(NodeKind::HorizontalRule, span));
                    }
                }
                _ => {}
            }
        }

        // Unbalanced streams should not happen, but fold any leftovers so no
        // content is dropped.
        while stack.len() > 1 {
            let Some(frame) = stack.pop() else { break };
            let node = finish(text, frame, 0);
            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
            }
        }
        match stack.pop() {
            Some(root) => Node::with_children(root.kind, root.span, root.children),
            None => Node::new(NodeKind::Document, Span::new(0, text.len())),
        }
    }
}

fn kind_of(tag: &Tag<'_>, text: &str, span: Span) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, .. } => {
            let level = *level as u8;
            if AtxHeading::opens(text, span) {
                NodeKind::Heading { level }
            } else {
                NodeKind::SetextHeading { level }
            }
        }
        Tag::BlockQuote(_) => NodeKind::Blockquote,
        Tag::CodeBlock(CodeBlockKind::Fenced(_)) => NodeKind::CodeBlock { fenced: true },
        Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::CodeBlock { fenced: false },
        Tag::List(start) => NodeKind::List {
            ordered: start.is_some(),
        },
        Tag::Item => NodeKind::ListItem,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Link { .. } => NodeKind::Link,
        _ => NodeKind::Other,
    }
}

/// Attaches synthesised marker children and builds the node.
fn finish(text: &str, frame: Frame, quote_depth: usize) -> Node {
    let Frame {
        kind,
        span,
        mut children,
    } = frame;
    match kind {
        NodeKind::Heading { .. } => children.extend(AtxHeading::marks(text, span)),
        NodeKind::SetextHeading { .. } => {
            children.extend(SetextHeading::underline(text, span));
        }
        NodeKind::Strong => {
            children.extend(Delimited::marks(text, span, Delimited::STRONG_WIDTH));
        }
        NodeKind::Emphasis => {
            children.extend(Delimited::marks(text, span, Delimited::EMPHASIS_WIDTH));
        }
        NodeKind::CodeBlock { fenced: true } => children.extend(CodeFence::marks(text, span)),
        NodeKind::ListItem => children.extend(ListMarker::mark(text, span)),
        NodeKind::Blockquote => children.extend(BlockQuote::marks(text, span, quote_depth)),
        NodeKind::Link => children.extend(LinkSyntax::marks(text, span)),
        _ => {}
    }
    Node::with_children(kind, span, children)
}

/// Block ranges from the parser include the line terminator; node spans don't.
fn trim_line_end(text: &str, span: Span) -> Span {
    let body = span.slice(text);
    let trimmed = body.trim_end_matches(['\n', '\r']);
    if body.is_empty() {
        return span;
    }
    Span::new(span.start, span.start + trimmed.len())
}
