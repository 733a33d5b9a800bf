//! Flattens a buffer and its decorations into display runs, for hosts that
//! have no decoration API of their own (the terminal viewer).

use std::rc::Rc;

use crate::decorate::StyleClass;
use crate::span::Span;
use crate::widget::{Decorations, Rendered, Widget};

/// One display run, in buffer order.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Visible source text with the styles active over it, outermost first.
    Text { span: Span, classes: Vec<StyleClass> },
    /// A widget drawn in place of `span`.
    Widget { span: Span, widget: Rc<Widget> },
}

pub fn segments(text: &str, decorations: &Decorations) -> Vec<Segment> {
    let len = text.len();
    let mut styles: Vec<(Span, StyleClass)> = Vec::new();
    let mut concealed: Vec<(Span, Option<Rc<Widget>>)> = Vec::new();
    for d in decorations.iter() {
        let span = d.span.clamp_to(len);
        match &d.rendered {
            Rendered::Style(class) => styles.push((span, *class)),
            Rendered::Hide => concealed.push((span, None)),
            Rendered::Widget(w) => concealed.push((span, Some(w.clone()))),
        }
    }
    styles.sort_by(|a, b| a.0.start.cmp(&b.0.start).then(b.0.end.cmp(&a.0.end)));
    concealed.sort_by_key(|(span, _)| span.start);

    let mut cuts: Vec<usize> = vec![0, len];
    for (span, _) in &styles {
        cuts.extend([span.start, span.end]);
    }
    for (span, _) in &concealed {
        cuts.extend([span.start, span.end]);
    }
    cuts.sort_unstable();
    cuts.dedup();

    let mut out: Vec<Segment> = Vec::new();
    let mut hidden = concealed.iter().peekable();
    for pair in cuts.windows(2) {
        let run = Span::new(pair[0], pair[1]);
        if run.is_empty() {
            continue;
        }
        while hidden.peek().is_some_and(|(span, _)| span.end <= run.start) {
            hidden.next();
        }
        if let Some((span, widget)) = hidden.peek() {
            if span.contains(run) {
                if let (Some(w), true) = (widget, span.start == run.start) {
                    out.push(Segment::Widget {
                        span: *span,
                        widget: w.clone(),
                    });
                }
                continue;
            }
        }
        let classes: Vec<StyleClass> = styles
            .iter()
            .filter(|(span, _)| span.contains(run))
            .map(|(_, class)| *class)
            .collect();
        match out.last_mut() {
            Some(Segment::Text {
                span,
                classes: prev,
            }) if span.end == run.start && *prev == classes => span.end = run.end,
            _ => out.push(Segment::Text { span: run, classes }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorate::Mode;
    use crate::preview::{LivePreview, PreviewSettings};
    use pretty_assertions::assert_eq;

    fn describe(text: &str, mode: Mode, caret: usize) -> Vec<String> {
        let mut preview = LivePreview::new(
            text,
            PreviewSettings {
                mode,
                ..PreviewSettings::default()
            },
        );
        preview.apply([crate::preview::Change::Selection(caret)]);
        segments(text, preview.decorations())
            .iter()
            .map(|s| match s {
                Segment::Text { span, classes } => {
                    let names: Vec<_> = classes.iter().map(|c| c.class_name()).collect();
                    format!("{:?} [{}]", span.slice(text), names.join(" "))
                }
                Segment::Widget { widget, .. } => format!("<{}>", widget.element().text),
            })
            .collect()
    }

    #[test]
    fn hidden_markers_disappear() {
        assert_eq!(
            describe("# Title\nx **b** y", Mode::Preview, 0),
            vec![
                "\"Title\" [cm-h1]",
                "\"\\nx \" []",
                "\"b\" [cm-strong]",
                "\" y\" []",
            ]
        );
    }

    #[test]
    fn widgets_replace_their_span() {
        assert_eq!(
            describe("see [[Note|here]].", Mode::Preview, 0),
            vec!["\"see \" []", "<here>", "\".\" []"]
        );
    }

    #[test]
    fn nested_styles_stack_outermost_first() {
        assert_eq!(
            describe("> **a**", Mode::Preview, 0),
            vec!["\" \" [cm-blockquote]", "\"a\" [cm-blockquote cm-strong]"]
        );
    }

    #[test]
    fn undecorated_text_is_one_run() {
        assert_eq!(describe("plain", Mode::Edit, 0), vec!["\"plain\" []"]);
    }
}
