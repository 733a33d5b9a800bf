//! Terminal rendering of a decorated buffer, with a map from screen cells
//! back to byte offsets for mouse hit-testing.

use livemark_engine::layout::{Segment, segments};
use livemark_engine::{Decorations, StyleClass, WidgetSpec};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const RULE_WIDTH: usize = 24;

pub fn class_style(class: StyleClass) -> Style {
    match class {
        StyleClass::Heading(1) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        StyleClass::Heading(_) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        StyleClass::Strong => Style::default().add_modifier(Modifier::BOLD),
        StyleClass::Emphasis => Style::default().add_modifier(Modifier::ITALIC),
        StyleClass::InlineCode | StyleClass::CodeBlock => Style::default().fg(Color::Yellow),
        StyleClass::ListItem => Style::default(),
        StyleClass::Blockquote => Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
        StyleClass::Link => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
    }
}

fn widget_style(spec: &WidgetSpec) -> Style {
    match spec {
        WidgetSpec::EditLink(_) | WidgetSpec::PreviewLink(_) => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::UNDERLINED),
        WidgetSpec::HorizontalRule => Style::default().fg(Color::DarkGray),
    }
}

fn caret_style(style: Style) -> Style {
    style.add_modifier(Modifier::REVERSED)
}

/// One screen row: the byte offset under each column and the offset the row
/// ends at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<usize>,
    pub end: usize,
}

impl Row {
    /// Clicks past the last cell land on the row end.
    pub fn offset_at(&self, column: usize) -> usize {
        self.cells.get(column).copied().unwrap_or(self.end)
    }
}

#[derive(Debug, Default)]
pub struct View {
    pub lines: Vec<Line<'static>>,
    pub rows: Vec<Row>,
}

impl View {
    pub fn build(text: &str, decorations: &Decorations, caret: usize) -> Self {
        let mut builder = Builder::default();
        for segment in segments(text, decorations) {
            match segment {
                Segment::Text { span, classes } => {
                    let base = classes
                        .iter()
                        .fold(Style::default(), |style, class| style.patch(class_style(*class)));
                    for (i, ch) in span.slice(text).char_indices() {
                        let offset = span.start + i;
                        let style = if offset == caret {
                            caret_style(base)
                        } else {
                            base
                        };
                        if ch == '\n' {
                            if offset == caret {
                                builder.push(' ', offset, style);
                            }
                            builder.break_line(offset);
                        } else {
                            builder.push(ch, offset, style);
                        }
                    }
                }
                Segment::Widget { span, widget } => {
                    let mut style = widget_style(widget.spec());
                    if span.start <= caret && caret < span.end {
                        style = caret_style(style);
                    }
                    let label = match widget.spec() {
                        WidgetSpec::HorizontalRule => "─".repeat(RULE_WIDTH),
                        _ => widget.element().text.clone(),
                    };
                    for ch in label.chars() {
                        builder.push(ch, span.start, style);
                    }
                }
            }
        }
        if caret == text.len() {
            builder.push(' ', caret, caret_style(Style::default()));
        }
        builder.finish(text.len())
    }

    /// Byte range covered by `height` rows starting at `first`.
    pub fn visible(&self, first: usize, height: usize) -> Option<livemark_engine::Span> {
        let last = (first + height).min(self.rows.len());
        let rows = self.rows.get(first..last)?;
        let start = rows
            .iter()
            .map(|row| row.cells.first().copied().unwrap_or(row.end))
            .min()?;
        let end = rows.iter().map(|row| row.end).max()?;
        Some(livemark_engine::Span::new(start.min(end), end))
    }

    /// Row the caret is drawn on, or the row after it when it sits in hidden text.
    pub fn caret_row(&self, caret: usize) -> usize {
        self.rows
            .iter()
            .position(|row| row.end >= caret)
            .unwrap_or(self.rows.len().saturating_sub(1))
    }
}

#[derive(Default)]
struct Builder {
    lines: Vec<Line<'static>>,
    rows: Vec<Row>,
    spans: Vec<Span<'static>>,
    run: String,
    style: Style,
    row: Row,
}

impl Builder {
    fn push(&mut self, ch: char, offset: usize, style: Style) {
        if style != self.style {
            self.flush();
            self.style = style;
        }
        self.run.push(ch);
        self.row.cells.push(offset);
    }

    fn flush(&mut self) {
        if !self.run.is_empty() {
            self.spans
                .push(Span::styled(std::mem::take(&mut self.run), self.style));
        }
    }

    fn break_line(&mut self, end: usize) {
        self.flush();
        self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        self.row.end = end;
        self.rows.push(std::mem::take(&mut self.row));
    }

    fn finish(mut self, end: usize) -> View {
        self.break_line(end);
        View {
            lines: self.lines,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livemark_engine::{Change, LivePreview, Mode, PreviewSettings};
    use pretty_assertions::assert_eq;

    fn view(text: &str, caret: usize, mode: Mode) -> View {
        let mut preview = LivePreview::new(
            text,
            PreviewSettings {
                mode,
                ..PreviewSettings::default()
            },
        );
        preview.apply([Change::Selection(caret)]);
        View::build(preview.text(), preview.decorations(), preview.caret())
    }

    fn plain(view: &View) -> Vec<String> {
        view.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_hidden_markers_are_not_drawn() {
        let text = "# Title\n\n**bold**";
        let v = view(text, 12, Mode::Edit);
        assert_eq!(plain(&v), vec!["Title", "", "**bold**"]);
    }

    #[test]
    fn test_link_label_replaces_source() {
        let v = view("see [[Note|shown]] here", 0, Mode::Preview);
        assert_eq!(plain(&v), vec!["see shown here"]);
        let row = &v.rows[0];
        assert_eq!(row.offset_at(4), 4, "label maps to the link start");
        assert_eq!(row.offset_at(9), 18);
    }

    #[test]
    fn test_caret_at_line_end_draws_a_cell() {
        let v = view("ab\ncd", 2, Mode::Edit);
        assert_eq!(plain(&v), vec!["ab ", "cd"]);
        assert_eq!(v.rows[0].cells, vec![0, 1, 2]);
        assert_eq!(v.rows[1].end, 5);
    }

    #[test]
    fn test_click_past_row_end_lands_on_row_end() {
        let v = view("ab\ncd\n", 0, Mode::Edit);
        assert_eq!(v.rows[0].offset_at(40), 2);
        assert_eq!(v.rows[1].offset_at(0), 3);
    }

    #[test]
    fn test_visible_range_and_caret_row() {
        let v = view("one\ntwo\nthree", 0, Mode::Edit);
        assert_eq!(v.visible(1, 1), Some(livemark_engine::Span::new(4, 7)));
        assert_eq!(v.visible(1, 10), Some(livemark_engine::Span::new(4, 13)));
        assert_eq!(v.visible(9, 1), None);
        assert_eq!(v.caret_row(5), 1);
        assert_eq!(v.caret_row(13), 2);
    }

    #[test]
    fn test_horizontal_rule_widget() {
        let v = view("a\n\n---\n", 0, Mode::Preview);
        assert_eq!(plain(&v)[2], "─".repeat(RULE_WIDTH));
    }
}
