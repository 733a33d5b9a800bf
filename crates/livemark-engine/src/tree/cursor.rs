use crate::span::Span;

/// A byte cursor used to locate syntax markers inside a node's source text.
///
/// Operates over a string slice while tracking the absolute byte position
/// in the buffer (via `base` offset), so every span it hands out can be
/// used directly as a decoration span.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    pub s: &'a str,
    /// Offset of `s` in the buffer (added to local index for absolute positions).
    pub base: usize,
    /// Current local index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor over `text[span]`. Out-of-range spans yield an empty cursor.
    pub fn over(text: &'a str, span: Span) -> Self {
        Self {
            s: span.slice(text),
            base: span.start,
            i: 0,
        }
    }

    /// Returns the current absolute byte position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    /// Returns true if at end of string.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Consumes bytes while `pred` holds and returns the absolute span consumed.
    pub fn eat_while(&mut self, mut pred: impl FnMut(u8) -> bool) -> Span {
        let start = self.pos();
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.i += 1;
        }
        Span::new(start, self.pos())
    }

    /// Skips spaces and tabs.
    pub fn skip_blanks(&mut self) {
        self.eat_while(|b| b == b' ' || b == b'\t');
    }

    /// Moves to the start of the next line, or to the end if there is none.
    pub fn next_line(&mut self) {
        self.eat_while(|b| b != b'\n');
        self.bump();
    }
}
