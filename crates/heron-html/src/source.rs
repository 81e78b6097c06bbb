//! Input stream for the tokenizer.
//!
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)

use heron_common::Position;

/// Sequential, lookahead-capable reader over the parser input.
///
/// "Before the tokenization stage, the input stream must be preprocessed by
/// normalizing newlines." CRLF pairs and lone CRs become a single LF at
/// construction, so every later stage only ever sees LF.
#[derive(Debug, Clone)]
pub struct CharacterSource {
    chars: Vec<char>,
    pos: usize,
    /// Index of the first character of every line.
    line_starts: Vec<usize>,
}

impl CharacterSource {
    /// Normalize `input` and position the reader at its start.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut chars = Vec::with_capacity(input.len());
        let mut line_starts = vec![0];
        let mut iter = input.chars().peekable();
        while let Some(c) = iter.next() {
            // "replace every U+000D CR U+000A LF code point pair with a single
            // U+000A LF code point, then replace every remaining U+000D CR code
            // point with a U+000A LF code point."
            let c = if c == '\r' {
                if iter.peek() == Some(&'\n') {
                    let _ = iter.next();
                }
                '\n'
            } else {
                c
            };
            chars.push(c);
            if c == '\n' {
                line_starts.push(chars.len());
            }
        }
        Self {
            chars,
            pos: 0,
            line_starts,
        }
    }

    /// Consume the next character, or `None` at end of input.
    pub fn consume(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        Some(c)
    }

    /// Step back one character so it is returned by the next `consume`.
    ///
    /// A no-op at the start of the input.
    pub const fn unconsume(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// The character `k` places after the next one (`peek(0)` is the next
    /// character to be consumed).
    #[must_use]
    pub fn peek(&self, k: usize) -> Option<char> {
        self.chars.get(self.pos + k).copied()
    }

    /// Whether the next characters spell `expected`.
    ///
    /// With `case_insensitive` the comparison is "ASCII case-insensitive".
    #[must_use]
    pub fn starts_with(&self, expected: &str, case_insensitive: bool) -> bool {
        let mut offset = 0;
        for want in expected.chars() {
            match self.peek(offset) {
                Some(got) if got == want => {}
                Some(got) if case_insensitive && got.eq_ignore_ascii_case(&want) => {}
                _ => return false,
            }
            offset += 1;
        }
        true
    }

    /// Consume `n` characters (fewer at end of input).
    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.chars.len());
    }

    /// Whether every character has been consumed.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Location of the most recently consumed character (or the start of the
    /// input when nothing has been consumed yet).
    #[must_use]
    pub fn position(&self) -> Position {
        let index = self.pos.saturating_sub(1);
        let line = match self.line_starts.binary_search(&index) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = index - self.line_starts[line] + 1;
        Position::new(line + 1, column)
    }

    /// Current line, 1-based.
    #[must_use]
    pub fn line(&self) -> usize {
        self.position().line
    }

    /// Current column, 1-based.
    #[must_use]
    pub fn column(&self) -> usize {
        self.position().column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_crlf_and_lone_cr() {
        let mut source = CharacterSource::new("a\r\nb\rc");
        let consumed: String = std::iter::from_fn(|| source.consume()).collect();
        assert_eq!(consumed, "a\nb\nc");
    }

    #[test]
    fn tracks_line_and_column() {
        let mut source = CharacterSource::new("ab\ncd");
        assert_eq!(source.position(), Position::new(1, 1));
        let _ = source.consume();
        let _ = source.consume();
        assert_eq!(source.position(), Position::new(1, 2));
        let _ = source.consume(); // the LF itself ends line 1
        assert_eq!(source.position(), Position::new(1, 3));
        let _ = source.consume();
        assert_eq!(source.position(), Position::new(2, 1));
        source.unconsume();
        assert_eq!(source.position(), Position::new(1, 3));
    }

    #[test]
    fn peek_and_starts_with() {
        let source = CharacterSource::new("DocType html");
        assert_eq!(source.peek(0), Some('D'));
        assert_eq!(source.peek(20), None);
        assert!(source.starts_with("doctype", true));
        assert!(!source.starts_with("doctype", false));
    }
}
