//! # Overlap Resolver
//!
//! Assembles unordered candidates into a [`DecorationSet`] that never holds
//! two concealing edits over the same bytes and never holds two edits that
//! partially cross.
//!
//! ## Algorithm
//!
//! 1. Empty spans are dropped.
//! 2. Concealing edits (hide, widget) are taken by priority, then position,
//!    then generation order; one that overlaps an already accepted concealing
//!    edit is rejected.
//! 3. Styles are taken outermost first. A style is rejected when it crosses
//!    an accepted style or overlaps a concealing edit it does not contain.
//! 4. The survivors are stable-sorted by `(start, priority)`, so concealing
//!    edits on a shared start come after (and win over) styles.

pub mod invariants;

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use log::trace;

use crate::decorate::{CandidateEdit, EditKind};
use crate::span::Span;

/// The resolved, ordered decorations of one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
    edits: Vec<CandidateEdit>,
}

impl DecorationSet {
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateEdit> {
        self.edits.iter()
    }

    pub fn as_slice(&self) -> &[CandidateEdit] {
        &self.edits
    }

    /// Spans removed from view by hide edits.
    pub fn hidden(&self) -> impl Iterator<Item = Span> + '_ {
        self.edits
            .iter()
            .filter(|e| e.kind == EditKind::Hide)
            .map(|e| e.span)
    }

    /// One line per edit with the source text it covers, for snapshots and `--dump`.
    pub fn dump(&self, text: &str) -> String {
        let mut out = String::new();
        for edit in &self.edits {
            let _ = writeln!(out, "{edit} {:?}", edit.span.slice(text));
        }
        out
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a CandidateEdit;
    type IntoIter = std::slice::Iter<'a, CandidateEdit>;

    fn into_iter(self) -> Self::IntoIter {
        self.edits.iter()
    }
}

impl fmt::Display for DecorationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for edit in &self.edits {
            writeln!(f, "{edit}")?;
        }
        Ok(())
    }
}

/// Resolves candidates into a non-overlapping set.
pub fn resolve(candidates: Vec<CandidateEdit>) -> DecorationSet {
    let (mut concealing, mut styles): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .enumerate()
        .filter(|(_, c)| !c.span.is_empty())
        .partition(|(_, c)| c.kind.conceals());

    concealing.sort_by(|(ia, a), (ib, b)| {
        b.priority
            .cmp(&a.priority)
            .then(a.span.start.cmp(&b.span.start))
            .then(ia.cmp(ib))
    });
    let mut concealed: BTreeMap<usize, usize> = BTreeMap::new();
    let mut accepted = Vec::with_capacity(concealing.len() + styles.len());
    for (i, edit) in concealing {
        let clash = concealed
            .range(..edit.span.end)
            .next_back()
            .is_some_and(|(_, &end)| end > edit.span.start);
        if clash {
            trace!("rejecting {edit}: overlaps a concealing edit");
            continue;
        }
        concealed.insert(edit.span.start, edit.span.end);
        accepted.push((i, edit));
    }

    styles.sort_by(|(ia, a), (ib, b)| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(b.span.end.cmp(&a.span.end))
            .then(ia.cmp(ib))
    });
    let mut open: Vec<usize> = Vec::new();
    for (i, edit) in styles {
        let Span { start, end } = edit.span;
        while open.last().is_some_and(|&top| top <= start) {
            open.pop();
        }
        if open.last().is_some_and(|&top| end > top) {
            trace!("rejecting {edit}: crosses an enclosing style");
            continue;
        }
        let left = concealed
            .range(..start)
            .next_back()
            .is_some_and(|(_, &e)| e > start);
        let right = concealed
            .range(start..end)
            .next_back()
            .is_some_and(|(_, &e)| e > end);
        if left || right {
            trace!("rejecting {edit}: partially covers a concealing edit");
            continue;
        }
        open.push(end);
        accepted.push((i, edit));
    }

    accepted.sort_by(|(ia, a), (ib, b)| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(a.priority.cmp(&b.priority))
            .then(ia.cmp(ib))
    });
    DecorationSet {
        edits: accepted.into_iter().map(|(_, e)| e).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorate::StyleClass;
    use crate::widget::WidgetSpec;
    use pretty_assertions::assert_eq;

    fn hide(a: usize, b: usize) -> CandidateEdit {
        CandidateEdit::hide(Span::new(a, b))
    }

    fn style(a: usize, b: usize) -> CandidateEdit {
        CandidateEdit::style(Span::new(a, b), StyleClass::Strong)
    }

    fn lines(set: &DecorationSet) -> Vec<String> {
        set.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn orders_by_start_then_priority() {
        let set = resolve(vec![style(0, 8), hide(6, 8), hide(0, 2)]);
        assert_eq!(
            lines(&set),
            vec!["style 0..8 cm-strong", "hide 0..2", "hide 6..8"]
        );
        invariants::check(&set);
    }

    #[test]
    fn drops_empty_spans() {
        let set = resolve(vec![hide(3, 3), style(5, 5)]);
        assert!(set.is_empty());
    }

    #[test]
    fn overlapping_concealers_keep_first_by_priority() {
        let widget = CandidateEdit::widget(Span::new(2, 9), WidgetSpec::HorizontalRule);
        let low = hide(0, 4).with_priority(5);
        let set = resolve(vec![low, widget.clone()]);
        assert_eq!(set.as_slice(), &[widget]);
    }

    #[test]
    fn equal_priority_concealers_keep_leftmost() {
        let set = resolve(vec![hide(3, 6), hide(0, 4)]);
        assert_eq!(lines(&set), vec!["hide 0..4"]);
    }

    #[test]
    fn crossing_styles_are_rejected() {
        let set = resolve(vec![style(0, 5), style(3, 9), style(1, 4)]);
        assert_eq!(
            lines(&set),
            vec!["style 0..5 cm-strong", "style 1..4 cm-strong"]
        );
    }

    #[test]
    fn style_inside_a_hide_is_rejected() {
        let set = resolve(vec![hide(0, 10), style(2, 4)]);
        assert_eq!(lines(&set), vec!["hide 0..10"]);
    }

    #[test]
    fn style_crossing_a_hide_is_rejected() {
        let set = resolve(vec![hide(4, 8), style(0, 6), style(6, 12)]);
        assert_eq!(lines(&set), vec!["hide 4..8"]);
    }

    #[test]
    fn style_equal_to_a_hide_is_kept_before_it() {
        let set = resolve(vec![hide(2, 4), style(2, 4)]);
        assert_eq!(lines(&set), vec!["style 2..4 cm-strong", "hide 2..4"]);
        invariants::check(&set);
    }

    #[test]
    fn dump_quotes_source() {
        let set = resolve(vec![hide(0, 2), style(2, 7)]);
        assert_eq!(
            set.dump("# Title"),
            "hide 0..2 \"# \"\nstyle 2..7 cm-strong \"Title\"\n"
        );
    }
}
