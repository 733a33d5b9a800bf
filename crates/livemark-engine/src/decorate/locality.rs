//! Caret locality checks used by edit-mode rules.

use crate::span::Span;

/// Caret touches an inline node: strictly after its start, at most one
/// character past its end.
///
/// A caret sitting right before the opening delimiter does not reveal the
/// syntax. Inside the node, or up to one character after the closing
/// delimiter, it does.
pub fn touches(text: &str, span: Span, caret: usize) -> bool {
    let next = text
        .get(span.end..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8);
    span.start < caret && caret <= span.end + next
}

/// Caret lies in `[start, end]`, both ends inclusive. Wiki link widgets are
/// suppressed while this holds.
pub fn within_inclusive(span: Span, caret: usize) -> bool {
    span.start <= caret && caret <= span.end
}

/// Line containing `offset`, without its terminator.
pub fn line_of(text: &str, offset: usize) -> Span {
    let bytes = text.as_bytes();
    let offset = offset.min(bytes.len());
    let start = bytes[..offset]
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i + 1);
    let end = bytes[offset..]
        .iter()
        .position(|b| *b == b'\n')
        .map_or(bytes.len(), |i| offset + i);
    Span::new(start, end)
}

/// True when `caret` is on the same line as `offset`.
pub fn same_line(text: &str, offset: usize, caret: usize) -> bool {
    let line = line_of(text, offset);
    line.start <= caret && caret <= line.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(4, true)]
    #[case(8, true)]
    #[case(9, true)]
    #[case(10, false)]
    fn touch_rule(#[case] caret: usize, #[case] expected: bool) {
        assert_eq!(touches("**bold** x", Span::new(0, 8), caret), expected);
    }

    #[test]
    fn touch_rule_steps_over_one_multibyte_char() {
        let text = "*a*éx";
        assert!(touches(text, Span::new(0, 3), 5));
        assert!(!touches(text, Span::new(0, 3), 6));
        assert!(touches("*a*", Span::new(0, 3), 3));
    }

    #[rstest]
    #[case(2, false)]
    #[case(3, true)]
    #[case(8, true)]
    #[case(9, false)]
    fn inclusive_rule(#[case] caret: usize, #[case] expected: bool) {
        assert_eq!(within_inclusive(Span::new(3, 8), caret), expected);
    }

    #[test]
    fn lines() {
        let text = "# A\nbody\n";
        assert_eq!(line_of(text, 0), Span::new(0, 3));
        assert_eq!(line_of(text, 5), Span::new(4, 8));
        assert_eq!(line_of(text, 9), Span::new(9, 9));
        assert!(same_line(text, 0, 3));
        assert!(!same_line(text, 0, 4));
    }
}
