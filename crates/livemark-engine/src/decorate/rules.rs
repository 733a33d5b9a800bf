use log::debug;

use crate::links::WikiLinkMatch;
use crate::span::Span;
use crate::tree::{Node, NodeKind};
use crate::widget::{LinkWidget, WidgetSpec};

use super::Mode;
use super::edit::{CandidateEdit, StyleClass};
use super::locality::{same_line, touches, within_inclusive};

/// Per-node-kind decoration rules for one rebuild.
pub struct RuleEngine<'a> {
    text: &'a str,
    caret: usize,
    mode: Mode,
    visible: Span,
}

impl<'a> RuleEngine<'a> {
    pub fn new(text: &'a str, caret: usize, mode: Mode, visible: Span) -> Self {
        Self {
            text,
            caret,
            mode,
            visible,
        }
    }

    fn preview(&self) -> bool {
        self.mode == Mode::Preview
    }

    fn in_view(&self, span: Span) -> bool {
        span.start <= self.visible.end && self.visible.start <= span.end
    }

    /// Candidates for every node intersecting the visible region.
    pub fn node_candidates(&self, root: &Node) -> Vec<CandidateEdit> {
        let mut out = Vec::new();
        root.walk(&mut |node| {
            if node.kind != NodeKind::Document && !self.in_view(node.span) {
                return false;
            }
            self.apply(node, &mut out);
            true
        });
        out
    }

    /// One widget candidate per link, unless the caret reveals it in edit mode.
    pub fn link_candidates(&self, links: &[WikiLinkMatch]) -> Vec<CandidateEdit> {
        links
            .iter()
            .filter_map(|link| {
                let widget = LinkWidget::from(link);
                let spec = match self.mode {
                    Mode::Edit if within_inclusive(link.span, self.caret) => return None,
                    Mode::Edit => WidgetSpec::EditLink(widget),
                    Mode::Preview => WidgetSpec::PreviewLink(widget),
                };
                Some(CandidateEdit::widget(link.span, spec))
            })
            .collect()
    }

    fn apply(&self, node: &Node, out: &mut Vec<CandidateEdit>) {
        match node.kind {
            NodeKind::Heading { level } => self.atx_heading(node, level, out),
            NodeKind::SetextHeading { level } => self.setext_heading(node, level, out),
            NodeKind::Strong => self.delimited(node, StyleClass::Strong, out),
            NodeKind::Emphasis => self.delimited(node, StyleClass::Emphasis, out),
            NodeKind::InlineCode => self.inline_code(node, out),
            NodeKind::CodeBlock { .. } => {
                if self.preview() {
                    self.conceal_and_style(node, NodeKind::CodeMark, StyleClass::CodeBlock, out);
                }
            }
            NodeKind::ListItem => {
                if self.preview() {
                    self.conceal_and_style(node, NodeKind::ListMark, StyleClass::ListItem, out);
                }
            }
            NodeKind::Blockquote => {
                if self.preview() {
                    self.conceal_and_style(node, NodeKind::QuoteMark, StyleClass::Blockquote, out);
                }
            }
            NodeKind::HorizontalRule => {
                if self.preview() {
                    out.push(CandidateEdit::widget(node.span, WidgetSpec::HorizontalRule));
                }
            }
            NodeKind::Link => {
                if self.preview() {
                    out.push(CandidateEdit::style(node.span, StyleClass::Link));
                }
            }
            NodeKind::Document
            | NodeKind::Paragraph
            | NodeKind::List { .. }
            | NodeKind::Other
            | NodeKind::HeaderMark
            | NodeKind::EmphasisMark
            | NodeKind::CodeMark
            | NodeKind::CodeInfo
            | NodeKind::ListMark
            | NodeKind::QuoteMark
            | NodeKind::LinkMark
            | NodeKind::Url => {}
        }
    }

    fn fallback(&self, node: &Node, class: StyleClass, out: &mut Vec<CandidateEdit>) {
        debug!(
            "{:?} at {} is missing marker children; styling whole node",
            node.kind, node.span
        );
        out.push(CandidateEdit::style(node.span, class));
    }

    fn atx_heading(&self, node: &Node, level: u8, out: &mut Vec<CandidateEdit>) {
        let class = StyleClass::Heading(level);
        let mut marks = node.children_of(NodeKind::HeaderMark);
        let Some(lead) = marks.next() else {
            return self.fallback(node, class, out);
        };
        let bytes = self.text.as_bytes();

        let mut hide_end = lead.span.end;
        if hide_end < node.span.end && bytes.get(hide_end) == Some(&b' ') {
            hide_end += 1;
        }
        let closing = marks.last().map(|close| {
            let mut start = close.span.start;
            while start > hide_end && matches!(bytes.get(start - 1), Some(b' ' | b'\t')) {
                start -= 1;
            }
            Span::new(start, close.span.end)
        });
        let content_end = closing.map_or(node.span.end, |c| c.start);

        let reveal = self.mode == Mode::Edit && same_line(self.text, lead.span.start, self.caret);
        if !reveal {
            out.push(CandidateEdit::hide(Span::new(lead.span.start, hide_end)));
            out.extend(closing.map(CandidateEdit::hide));
        }
        out.push(CandidateEdit::style(
            Span::new(hide_end, content_end),
            class,
        ));
    }

    fn setext_heading(&self, node: &Node, level: u8, out: &mut Vec<CandidateEdit>) {
        let class = StyleClass::Heading(level);
        let Some(underline) = node.children_of(NodeKind::HeaderMark).last() else {
            return self.fallback(node, class, out);
        };
        let before = Span::new(node.span.start, underline.span.start).slice(self.text);
        let content_end = node.span.start + before.trim_end().len();
        out.push(CandidateEdit::style(
            Span::new(node.span.start, content_end),
            class,
        ));
        if self.preview() {
            out.push(CandidateEdit::hide(underline.span));
        }
    }

    /// Strong and emphasis: delimiters hide unless the caret touches the node.
    fn delimited(&self, node: &Node, class: StyleClass, out: &mut Vec<CandidateEdit>) {
        if !self.preview() && touches(self.text, node.span, self.caret) {
            return;
        }
        let marks: Vec<_> = node.children_of(NodeKind::EmphasisMark).collect();
        let [open, close] = marks.as_slice() else {
            return self.fallback(node, class, out);
        };
        out.push(CandidateEdit::hide(open.span));
        out.push(CandidateEdit::hide(close.span));
        out.push(CandidateEdit::style(
            Span::new(open.span.end, close.span.start),
            class,
        ));
    }

    fn inline_code(&self, node: &Node, out: &mut Vec<CandidateEdit>) {
        let class = StyleClass::InlineCode;
        if !self.preview() && touches(self.text, node.span, self.caret) {
            out.push(CandidateEdit::style(node.span, class));
            return;
        }
        self.conceal_and_style(node, NodeKind::CodeMark, class, out);
    }

    /// Hides every `marker` child and styles the whole node.
    fn conceal_and_style(
        &self,
        node: &Node,
        marker: NodeKind,
        class: StyleClass,
        out: &mut Vec<CandidateEdit>,
    ) {
        let before = out.len();
        out.extend(node.children_of(marker).map(|m| CandidateEdit::hide(m.span)));
        let indented_block = node.kind == (NodeKind::CodeBlock { fenced: false });
        if out.len() == before && !indented_block {
            return self.fallback(node, class, out);
        }
        out.push(CandidateEdit::style(node.span, class));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorate::edit::EditKind;
    use crate::tree::{MarkdownTreeProvider, NodeTreeProvider};
    use pretty_assertions::assert_eq;

    fn run(text: &str, caret: usize, mode: Mode) -> Vec<String> {
        let tree = MarkdownTreeProvider::new().parse(text);
        let engine = RuleEngine::new(text, caret, mode, Span::new(0, text.len()));
        engine
            .node_candidates(&tree)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn heading_hides_marker_and_space() {
        assert_eq!(
            run("# Title\n\nbody", 10, Mode::Edit),
            vec!["hide 0..2", "style 2..7 cm-h1"]
        );
    }

    #[test]
    fn heading_on_caret_line_keeps_marker() {
        assert_eq!(run("## Title", 5, Mode::Edit), vec!["style 3..8 cm-h2"]);
    }

    #[test]
    fn heading_closing_sequence_is_hidden() {
        assert_eq!(
            run("# Title ##", 10, Mode::Preview),
            vec!["hide 0..2", "hide 7..10", "style 2..7 cm-h1"]
        );
    }

    #[test]
    fn setext_heading_starting_with_hash_keeps_its_text() {
        let text = "#foo\n===";
        assert_eq!(run(text, 0, Mode::Preview), vec!["style 0..4 cm-h1", "hide 5..8"]);
        assert_eq!(run(text, 8, Mode::Edit), vec!["style 0..4 cm-h1"]);
    }

    #[test]
    fn setext_heading_hides_underline_in_preview_only() {
        let text = "Title\n===";
        assert_eq!(run(text, 0, Mode::Edit), vec!["style 0..5 cm-h1"]);
        assert_eq!(
            run(text, 0, Mode::Preview),
            vec!["style 0..5 cm-h1", "hide 6..9"]
        );
    }

    #[test]
    fn strong_touch_rule() {
        assert!(run("**bold**", 4, Mode::Edit).is_empty());
        assert!(run("**bold**", 8, Mode::Edit).is_empty());
        assert!(run("**b** x", 6, Mode::Edit).is_empty());
        assert_eq!(
            run("**b** x", 7, Mode::Edit),
            vec!["hide 0..2", "hide 3..5", "style 2..3 cm-strong"]
        );
        assert_eq!(
            run("**bold**", 0, Mode::Edit),
            vec!["hide 0..2", "hide 6..8", "style 2..6 cm-strong"]
        );
        assert_eq!(
            run("**bold**", 4, Mode::Preview),
            vec!["hide 0..2", "hide 6..8", "style 2..6 cm-strong"]
        );
    }

    #[test]
    fn emphasis_uses_single_marks() {
        assert_eq!(
            run("x *it* y", 0, Mode::Edit),
            vec!["hide 2..3", "hide 5..6", "style 3..5 cm-emphasis"]
        );
    }

    #[test]
    fn inline_code_styles_while_caret_inside() {
        assert_eq!(run("`c`", 2, Mode::Edit), vec!["style 0..3 cm-inline-code"]);
        assert_eq!(
            run("`c`", 0, Mode::Edit),
            vec!["hide 0..1", "hide 2..3", "style 0..3 cm-inline-code"]
        );
    }

    #[test]
    fn block_rules_are_preview_only() {
        let text = "- item\n\n> quote\n\n---\n\n```\ncode\n```";
        let edit = run(text, 0, Mode::Edit);
        assert!(edit.is_empty(), "{edit:?}");
        let preview = run(text, 0, Mode::Preview);
        assert_eq!(
            preview,
            vec![
                "hide 0..1",
                "style 0..6 cm-list-item",
                "hide 8..9",
                "style 8..15 cm-blockquote",
                "widget 17..20 hr",
                "hide 22..25",
                "hide 31..34",
                "style 22..34 cm-code-block",
            ]
        );
    }

    #[test]
    fn indented_code_block_is_styled_without_hides() {
        let text = "para\n\n    code\n";
        let out = run(text, 0, Mode::Preview);
        assert_eq!(out.len(), 1, "{out:?}");
        assert!(out[0].starts_with("style ") && out[0].ends_with("..14 cm-code-block"));
    }

    #[test]
    fn standard_link_is_styled_not_hidden() {
        assert_eq!(run("[a](b)", 0, Mode::Preview), vec!["style 0..6 cm-md-link"]);
        assert!(run("[a](b)", 0, Mode::Edit).is_empty());
    }

    #[test]
    fn missing_markers_fall_back_to_whole_node() {
        let strong = Node::new(NodeKind::Strong, Span::new(0, 4));
        let root = Node::with_children(NodeKind::Document, Span::new(0, 4), vec![strong]);
        let engine = RuleEngine::new("abcd", 0, Mode::Preview, Span::new(0, 4));
        let out = engine.node_candidates(&root);
        assert_eq!(out, vec![CandidateEdit::style(Span::new(0, 4), StyleClass::Strong)]);
    }

    #[test]
    fn nodes_outside_viewport_are_skipped() {
        let text = "**a**\n\n**b**";
        let tree = MarkdownTreeProvider::new().parse(text);
        let engine = RuleEngine::new(text, 0, Mode::Preview, Span::new(8, 9));
        let out = engine.node_candidates(&tree);
        assert!(out.iter().all(|c| c.span.start >= 7));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn edit_link_suppressed_when_caret_inside_inclusive() {
        let text = "ab [[Note]] cd";
        let links = crate::links::find_wiki_links(text);
        for caret in [3, 7, 11] {
            let engine = RuleEngine::new(text, caret, Mode::Edit, Span::new(0, text.len()));
            assert!(engine.link_candidates(&links).is_empty(), "caret {caret}");
        }
        for caret in [0, 2, 12, 14] {
            let engine = RuleEngine::new(text, caret, Mode::Edit, Span::new(0, text.len()));
            let out = engine.link_candidates(&links);
            assert!(
                matches!(&out[0].kind, EditKind::ReplaceWidget(WidgetSpec::EditLink(_))),
                "caret {caret}"
            );
        }
    }

    #[test]
    fn preview_link_ignores_caret() {
        let text = "[[Note]]";
        let links = crate::links::find_wiki_links(text);
        let engine = RuleEngine::new(text, 4, Mode::Preview, Span::new(0, text.len()));
        let out = engine.link_candidates(&links);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].span, Span::new(0, 8));
    }
}
