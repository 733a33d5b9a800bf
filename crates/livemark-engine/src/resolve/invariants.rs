use super::DecorationSet;

/// Validates resolver output invariants.
///
/// Asserts that:
/// - Every edit has a non-empty span
/// - Edits are ordered by `(start, priority)`
/// - No two concealing edits overlap
/// - Overlapping edits are nested, and the outer one is a style
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(set: &DecorationSet) {
    let edits = set.as_slice();
    for e in edits {
        assert!(!e.span.is_empty(), "empty span in decoration set: {e}");
    }
    for pair in edits.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            (a.span.start, a.priority) <= (b.span.start, b.priority),
            "decorations out of order: {a} before {b}"
        );
    }
    for (i, a) in edits.iter().enumerate() {
        for b in &edits[i + 1..] {
            if !a.span.overlaps(b.span) {
                continue;
            }
            assert!(
                !(a.kind.conceals() && b.kind.conceals()),
                "concealing edits overlap: {a} and {b}"
            );
            assert!(!a.span.crosses(b.span), "edits cross: {a} and {b}");
            let pair = match (a.kind.conceals(), b.kind.conceals()) {
                (true, _) => Some((a, b)),
                (_, true) => Some((b, a)),
                _ => None,
            };
            if let Some((concealer, style)) = pair {
                assert!(
                    style.span.contains(concealer.span),
                    "concealing edit {concealer} is not inside style {style}"
                );
            }
        }
    }
}
