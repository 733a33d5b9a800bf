//! Caret movement over source text. Columns count chars, not display cells.

pub fn prev_char(text: &str, caret: usize) -> usize {
    text[..caret]
        .chars()
        .next_back()
        .map_or(0, |c| caret - c.len_utf8())
}

pub fn next_char(text: &str, caret: usize) -> usize {
    text[caret..]
        .chars()
        .next()
        .map_or(caret, |c| caret + c.len_utf8())
}

pub fn line_start(text: &str, caret: usize) -> usize {
    text[..caret].rfind('\n').map_or(0, |i| i + 1)
}

pub fn line_end(text: &str, caret: usize) -> usize {
    text[caret..].find('\n').map_or(text.len(), |i| caret + i)
}

pub fn line_up(text: &str, caret: usize) -> usize {
    let start = line_start(text, caret);
    if start == 0 {
        return 0;
    }
    let column = text[start..caret].chars().count();
    column_in(text, line_start(text, start - 1), column)
}

pub fn line_down(text: &str, caret: usize) -> usize {
    let end = line_end(text, caret);
    if end == text.len() {
        return end;
    }
    let column = text[line_start(text, caret)..caret].chars().count();
    column_in(text, end + 1, column)
}

fn column_in(text: &str, start: usize, column: usize) -> usize {
    let end = line_end(text, start);
    text[start..end]
        .char_indices()
        .nth(column)
        .map_or(end, |(i, _)| start + i)
}

/// Start of the first ATX heading line whose title matches `heading`,
/// ignoring ASCII case.
pub fn heading_line(text: &str, heading: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed.starts_with('#') {
            let title = trimmed
                .trim_start_matches('#')
                .trim()
                .trim_end_matches('#')
                .trim_end();
            if title.eq_ignore_ascii_case(heading.trim()) {
                return Some(offset);
            }
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEXT: &str = "first line\nab\nlast";

    #[rstest]
    #[case::start_stays(0, 0)]
    #[case::multibyte(3, 1)]
    #[case::ascii(4, 3)]
    fn test_prev_char(#[case] caret: usize, #[case] expected: usize) {
        assert_eq!(prev_char("aé b", caret), expected);
    }

    #[test]
    fn test_next_char() {
        assert_eq!(next_char("aé", 1), 3);
        assert_eq!(next_char("aé", 3), 3);
    }

    #[rstest]
    #[case::keeps_column(1, 12)]
    #[case::middle_line(12, 15)]
    #[case::clamps_to_short_line(9, 13)]
    #[case::last_line_goes_to_end(16, 18)]
    fn test_line_down(#[case] caret: usize, #[case] expected: usize) {
        assert_eq!(line_down(TEXT, caret), expected);
    }

    #[rstest]
    #[case::first_line_goes_to_start(4, 0)]
    #[case::keeps_column(12, 1)]
    #[case::clamps_to_short_line(18, 13)]
    fn test_line_up(#[case] caret: usize, #[case] expected: usize) {
        assert_eq!(line_up(TEXT, caret), expected);
    }

    #[test]
    fn test_heading_line() {
        let text = "intro\n# One\n\n## Two ##\n";
        assert_eq!(heading_line(text, "one"), Some(6));
        assert_eq!(heading_line(text, "Two"), Some(13));
        assert_eq!(heading_line(text, "Three"), None);
    }
}
