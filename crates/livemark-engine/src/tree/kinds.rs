//! # Marker Kinds
//!
//! Block and inline syntax types that own their delimiter constants and
//! know how to locate their marker runs in source text.
//!
//! All delimiter knowledge lives here. The provider asks these types for
//! marker children; it never hardcodes `#`, `>` or a fence string itself.
//! Every locator returns nothing for shapes it does not recognise, which is
//! what lets the decoration rules fall back to whole-node styling.

use crate::span::Span;

use super::{Node, NodeKind, cursor::Cursor};

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// ATX heading markers.
pub struct AtxHeading;

impl AtxHeading {
    pub const MARK: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// True when `span` is a single line opening with a `#` run of one to
    /// six bytes followed by a blank or the line end.
    pub fn opens(text: &str, span: Span) -> bool {
        !span.slice(text).trim_end().contains('\n') && Self::open_run(text, span).is_some()
    }

    fn open_run(text: &str, span: Span) -> Option<Span> {
        let mut cur = Cursor::over(text, span);
        cur.skip_blanks();
        let open = cur.eat_while(|b| b == Self::MARK);
        if open.is_empty() || open.len() > Self::MAX_LEVEL {
            return None;
        }
        match cur.peek() {
            None | Some(b'\n' | b'\r') => Some(open),
            Some(b) if is_blank(b) => Some(open),
            Some(_) => None,
        }
    }

    /// Leading `#` run plus the optional closing sequence.
    pub fn marks(text: &str, span: Span) -> Vec<Node> {
        let Some(open) = Self::open_run(text, span) else {
            return vec![];
        };
        let mut marks = vec![Node::new(NodeKind::HeaderMark, open)];

        let line = span.slice(text);
        let content_end = span.start + line.trim_end().len();
        let bytes = text.as_bytes();
        let mut close_start = content_end;
        while close_start > open.end && bytes[close_start - 1] == Self::MARK {
            close_start -= 1;
        }
        if close_start < content_end && close_start > open.end && is_blank(bytes[close_start - 1])
        {
            marks.push(Node::new(
                NodeKind::HeaderMark,
                Span::new(close_start, content_end),
            ));
        }
        marks
    }
}

/// Setext heading underline (`===` / `---`).
pub struct SetextHeading;

impl SetextHeading {
    pub fn underline(text: &str, span: Span) -> Option<Node> {
        let body = span.slice(text);
        let nl = body.trim_end().rfind('\n')?;
        let mut cur = Cursor::over(text, Span::new(span.start + nl + 1, span.end));
        cur.skip_blanks();
        let ch = cur.peek().filter(|b| *b == b'=' || *b == b'-')?;
        let run = cur.eat_while(|b| b == ch);
        cur.skip_blanks();
        (cur.eof() || cur.peek() == Some(b'\n') || cur.peek() == Some(b'\r'))
            .then(|| Node::new(NodeKind::HeaderMark, run))
    }
}

/// `*`/`_` delimited emphasis and strong emphasis.
pub struct Delimited;

impl Delimited {
    pub const STAR: u8 = b'*';
    pub const UNDERSCORE: u8 = b'_';
    pub const EMPHASIS_WIDTH: usize = 1;
    pub const STRONG_WIDTH: usize = 2;

    /// Opening and closing delimiter runs of exactly `width` bytes.
    pub fn marks(text: &str, span: Span, width: usize) -> Vec<Node> {
        let body = span.slice(text).as_bytes();
        if body.len() < width * 2 {
            return vec![];
        }
        let ch = body[0];
        if ch != Self::STAR && ch != Self::UNDERSCORE {
            return vec![];
        }
        let open_ok = body[..width].iter().all(|b| *b == ch);
        let close_ok = body[body.len() - width..].iter().all(|b| *b == ch);
        if !(open_ok && close_ok) {
            return vec![];
        }
        vec![
            Node::new(
                NodeKind::EmphasisMark,
                Span::new(span.start, span.start + width),
            ),
            Node::new(NodeKind::EmphasisMark, Span::new(span.end - width, span.end)),
        ]
    }
}

/// Inline code spans.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    pub fn marks(text: &str, span: Span) -> Vec<Node> {
        let body = span.slice(text).as_bytes();
        let open = body.iter().take_while(|b| **b == Self::TICK).count();
        let close = body.iter().rev().take_while(|b| **b == Self::TICK).count();
        if open == 0 || open != close || body.len() < open * 2 {
            return vec![];
        }
        vec![
            Node::new(NodeKind::CodeMark, Span::new(span.start, span.start + open)),
            Node::new(NodeKind::CodeMark, Span::new(span.end - close, span.end)),
        ]
    }
}

/// Fenced code blocks.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: u8 = b'`';
    pub const TILDE: u8 = b'~';
    pub const MIN_RUN: usize = 3;

    /// Opening fence, info string and closing fence (when the block is closed).
    pub fn marks(text: &str, span: Span) -> Vec<Node> {
        let mut cur = Cursor::over(text, span);
        cur.skip_blanks();
        let Some(ch) = cur.peek().filter(|b| *b == Self::BACKTICK || *b == Self::TILDE) else {
            return vec![];
        };
        let open = cur.eat_while(|b| b == ch);
        if open.len() < Self::MIN_RUN {
            return vec![];
        }
        let mut marks = vec![Node::new(NodeKind::CodeMark, open)];

        cur.skip_blanks();
        let info = cur.eat_while(|b| b != b'\n');
        let info_text = info.slice(text).trim_end();
        if !info_text.is_empty() {
            marks.push(Node::new(
                NodeKind::CodeInfo,
                Span::new(info.start, info.start + info_text.len()),
            ));
        }
        if cur.eof() {
            return marks;
        }

        let body = span.slice(text);
        let last_line_start = body.trim_end().rfind('\n').map(|i| span.start + i + 1);
        if let Some(start) = last_line_start.filter(|s| *s > open.end) {
            let mut last = Cursor::over(text, Span::new(start, span.end));
            last.eat_while(|b| is_blank(b) || b == BlockQuote::PREFIX);
            let close = last.eat_while(|b| b == ch);
            last.eat_while(|b| b.is_ascii_whitespace());
            if close.len() >= open.len() && last.eof() {
                marks.push(Node::new(NodeKind::CodeMark, close));
            }
        }
        marks
    }
}

/// List item bullets and ordinals.
pub struct ListMarker;

impl ListMarker {
    pub const BULLETS: [u8; 3] = [b'-', b'*', b'+'];
    pub const DELIMITERS: [u8; 2] = [b'.', b')'];
    pub const MAX_ORDINAL_DIGITS: usize = 9;

    pub fn mark(text: &str, span: Span) -> Option<Node> {
        let mut cur = Cursor::over(text, span);
        cur.skip_blanks();
        let start = cur.pos();
        match cur.peek()? {
            b if Self::BULLETS.contains(&b) => {
                cur.bump();
            }
            b if b.is_ascii_digit() => {
                let digits = cur.eat_while(|b| b.is_ascii_digit());
                if digits.len() > Self::MAX_ORDINAL_DIGITS {
                    return None;
                }
                cur.bump().filter(|b| Self::DELIMITERS.contains(b))?;
            }
            _ => return None,
        }
        Some(Node::new(NodeKind::ListMark, Span::new(start, cur.pos())))
    }
}

/// Blockquote prefixes.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: u8 = b'>';

    /// One `QuoteMark` per line, taken at nesting `depth` (0 for an outermost quote).
    ///
    /// Lazy continuation lines carry no prefix and get no mark.
    pub fn marks(text: &str, span: Span, depth: usize) -> Vec<Node> {
        let mut marks = vec![];
        let line_start = text
            .get(..span.start)
            .and_then(|before| before.rfind('\n'))
            .map_or(0, |i| i + 1);

        // First line: the quote may sit behind a list bullet, so fall back to
        // scanning from the node start when the prefix walk fails.
        let first = Self::prefix_at(text, Span::new(line_start, span.end), depth)
            .filter(|m| m.start >= span.start)
            .or_else(|| Self::prefix_at(text, span, 0));
        marks.extend(first.map(|m| Node::new(NodeKind::QuoteMark, m)));

        let mut cur = Cursor::over(text, span);
        cur.next_line();
        while !cur.eof() {
            let line = Span::new(cur.pos(), span.end);
            if let Some(m) = Self::prefix_at(text, line, depth) {
                marks.push(Node::new(NodeKind::QuoteMark, m));
            }
            cur.next_line();
        }
        marks
    }

    /// Skips `depth` outer prefixes and returns the span of the next `>`.
    fn prefix_at(text: &str, line: Span, depth: usize) -> Option<Span> {
        let mut cur = Cursor::over(text, line);
        for _ in 0..depth {
            cur.skip_blanks();
            cur.bump().filter(|b| *b == Self::PREFIX)?;
        }
        cur.skip_blanks();
        let mark = cur.eat_while(|b| b == Self::PREFIX);
        (!mark.is_empty()).then(|| Span::new(mark.start, mark.start + 1))
    }
}

/// Standard links: `[text](url)` and `<url>` autolinks.
pub struct LinkSyntax;

impl LinkSyntax {
    pub const OPEN: u8 = b'[';
    pub const MIDDLE: &'static str = "](";
    pub const CLOSE: u8 = b')';

    pub fn marks(text: &str, span: Span) -> Vec<Node> {
        let body = span.slice(text);
        let bytes = body.as_bytes();
        if bytes.len() >= 2 && bytes[0] == b'<' && bytes[bytes.len() - 1] == b'>' {
            return vec![
                Node::new(NodeKind::LinkMark, Span::new(span.start, span.start + 1)),
                Node::new(NodeKind::Url, Span::new(span.start + 1, span.end - 1)),
                Node::new(NodeKind::LinkMark, Span::new(span.end - 1, span.end)),
            ];
        }
        if bytes.first() != Some(&Self::OPEN) || bytes.last() != Some(&Self::CLOSE) {
            return vec![];
        }
        let Some(mid) = body.rfind(Self::MIDDLE) else {
            return vec![];
        };
        let url_start = span.start + mid + Self::MIDDLE.len();
        let dest = &body[mid + Self::MIDDLE.len()..body.len() - 1];
        let dest_len = dest
            .trim_start()
            .split_whitespace()
            .next()
            .map_or(0, |d| d.len() + (dest.len() - dest.trim_start().len()));
        vec![
            Node::new(NodeKind::LinkMark, Span::new(span.start, span.start + 1)),
            Node::new(
                NodeKind::LinkMark,
                Span::new(span.start + mid, url_start),
            ),
            Node::new(NodeKind::Url, Span::new(url_start, url_start + dest_len)),
            Node::new(NodeKind::LinkMark, Span::new(span.end - 1, span.end)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn spans(nodes: &[Node]) -> Vec<(NodeKind, usize, usize)> {
        nodes
            .iter()
            .map(|n| (n.kind, n.span.start, n.span.end))
            .collect()
    }

    #[test]
    fn atx_leading_mark() {
        let text = "## Title";
        let marks = AtxHeading::marks(text, Span::new(0, 8));
        assert_eq!(spans(&marks), vec![(NodeKind::HeaderMark, 0, 2)]);
    }

    #[test]
    fn atx_closing_sequence() {
        let text = "# Title ##";
        let marks = AtxHeading::marks(text, Span::new(0, 10));
        assert_eq!(
            spans(&marks),
            vec![(NodeKind::HeaderMark, 0, 1), (NodeKind::HeaderMark, 8, 10)]
        );
    }

    #[test]
    fn atx_hash_inside_word_is_content() {
        let text = "# C#";
        let marks = AtxHeading::marks(text, Span::new(0, 4));
        assert_eq!(spans(&marks), vec![(NodeKind::HeaderMark, 0, 1)]);
    }

    #[test]
    fn atx_without_hash_has_no_marks() {
        assert!(AtxHeading::marks("Title", Span::new(0, 5)).is_empty());
    }

    #[test]
    fn hash_glued_to_text_is_not_a_mark() {
        assert!(AtxHeading::marks("#todo", Span::new(0, 5)).is_empty());
        assert!(!AtxHeading::opens("#todo", Span::new(0, 5)));
    }

    #[test]
    fn atx_opens_single_line_only() {
        assert!(AtxHeading::opens("# a\n", Span::new(0, 4)));
        assert!(AtxHeading::opens("#", Span::new(0, 1)));
        assert!(!AtxHeading::opens("# a\n===", Span::new(0, 7)));
        assert!(!AtxHeading::opens("####### seven", Span::new(0, 13)));
    }

    #[test]
    fn setext_underline() {
        let text = "Title\n=====";
        let mark = SetextHeading::underline(text, Span::new(0, 11)).unwrap();
        assert_eq!(mark.span, Span::new(6, 11));
    }

    #[test]
    fn strong_marks() {
        let marks = Delimited::marks("**bold**", Span::new(0, 8), Delimited::STRONG_WIDTH);
        assert_eq!(
            spans(&marks),
            vec![(NodeKind::EmphasisMark, 0, 2), (NodeKind::EmphasisMark, 6, 8)]
        );
    }

    #[test]
    fn mismatched_delimiters_have_no_marks() {
        assert!(Delimited::marks("*x_", Span::new(0, 3), 1).is_empty());
        assert!(Delimited::marks("x", Span::new(0, 1), 1).is_empty());
    }

    #[test]
    fn code_span_marks() {
        let marks = CodeSpan::marks("a ``x`` b", Span::new(2, 7));
        assert_eq!(
            spans(&marks),
            vec![(NodeKind::CodeMark, 2, 4), (NodeKind::CodeMark, 5, 7)]
        );
    }

    #[test]
    fn closed_fence_marks() {
        let text = "```rust\nfn main() {}\n```";
        let marks = CodeFence::marks(text, Span::new(0, text.len()));
        assert_eq!(
            spans(&marks),
            vec![
                (NodeKind::CodeMark, 0, 3),
                (NodeKind::CodeInfo, 3, 7),
                (NodeKind::CodeMark, 21, 24),
            ]
        );
    }

    #[test]
    fn unclosed_fence_only_marks_opening() {
        let text = "~~~\ncode";
        let marks = CodeFence::marks(text, Span::new(0, text.len()));
        assert_eq!(spans(&marks), vec![(NodeKind::CodeMark, 0, 3)]);
    }

    #[test]
    fn list_markers() {
        assert_eq!(
            ListMarker::mark("- item", Span::new(0, 6)).map(|n| n.span),
            Some(Span::new(0, 1))
        );
        assert_eq!(
            ListMarker::mark("12) item", Span::new(0, 8)).map(|n| n.span),
            Some(Span::new(0, 3))
        );
        assert!(ListMarker::mark("item", Span::new(0, 4)).is_none());
    }

    #[test]
    fn quote_marks_per_line() {
        let text = "> a\n> b\nlazy";
        let marks = BlockQuote::marks(text, Span::new(0, text.len()), 0);
        assert_eq!(
            spans(&marks),
            vec![(NodeKind::QuoteMark, 0, 1), (NodeKind::QuoteMark, 4, 5)]
        );
    }

    #[test]
    fn nested_quote_marks_skip_outer_prefix() {
        let text = "> > a\n> > b";
        let marks = BlockQuote::marks(text, Span::new(2, text.len()), 1);
        assert_eq!(
            spans(&marks),
            vec![(NodeKind::QuoteMark, 2, 3), (NodeKind::QuoteMark, 8, 9)]
        );
    }

    #[test]
    fn quote_behind_list_bullet() {
        let text = "- > a\n  > b";
        let marks = BlockQuote::marks(text, Span::new(2, text.len()), 0);
        assert_eq!(
            spans(&marks),
            vec![(NodeKind::QuoteMark, 2, 3), (NodeKind::QuoteMark, 8, 9)]
        );
    }

    #[test]
    fn inline_link_marks() {
        let text = "[here](https://example.com)";
        let marks = LinkSyntax::marks(text, Span::new(0, text.len()));
        assert_eq!(
            spans(&marks),
            vec![
                (NodeKind::LinkMark, 0, 1),
                (NodeKind::LinkMark, 5, 7),
                (NodeKind::Url, 7, 26),
                (NodeKind::LinkMark, 26, 27),
            ]
        );
    }
}
