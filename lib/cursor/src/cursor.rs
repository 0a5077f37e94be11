use std::{
    fmt::{Debug, Formatter},
    str::Chars,
};

mod source_range;
pub use source_range::*;

#[derive(Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    line: Line,
}

impl<'a> Debug for Cursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // The whole source is usually too verbose, so only print it on `{:#?}`
        if f.alternate() {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("offset", &self.offset())
                .field("source", &self.source)
                .finish()
        } else {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("offset", &self.offset())
                .finish()
        }
    }
}

/// Cursors are equal when they point at the same position of the same buffer.
impl<'a> PartialEq for Cursor<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.source, other.source) && self.offset() == other.offset()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
pub struct Line(pub usize);

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, chars: source.chars(), line: Line(1) }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// Byte offset of the next character into the source.
    pub fn offset(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }

    pub fn is_at_end(&self) -> bool {
        self.chars.as_str().is_empty()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    pub fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    pub fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.next();
        }
    }

    pub fn slice_until(&self, end: &Cursor<'a>) -> &'a str {
        debug_assert!(std::ptr::eq(self.source, end.source));
        &self.source[self.offset()..end.offset()]
    }

    /// The span between `self` and `end`, attributed to the line `self` is on.
    pub fn range_to(&self, end: &Cursor<'a>) -> SourceRange<'a> {
        debug_assert!(std::ptr::eq(self.source, end.source));
        SourceRange::new(self.source, self.offset(), end.offset(), self.line)
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line.0 += 1;
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn slice_until() {
        let mut cursor: Cursor = "ab\ncd\n\n".into();

        cursor.next(); // 'a'

        let start = cursor.clone();

        cursor.next(); // 'b'
        cursor.next(); // '\n'
        cursor.next(); // 'c'

        assert_eq!(start.slice_until(&cursor), "b\nc");

        let range = start.range_to(&cursor);
        assert_eq!(range.lexeme(), "b\nc");
        assert_eq!(range.line(), Line(1));
    }

    #[test]
    fn lines_and_offsets() {
        let mut cursor = Cursor::new("ab\ncd\n\n");

        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
        assert_eq!(cursor.next(), Some('a'));
        assert_eq!((cursor.line(), cursor.offset()), (Line(1), 1));

        assert_eq!(cursor.next(), Some('b'));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!((cursor.line(), cursor.offset()), (Line(2), 3));

        cursor.next(); // 'c'
        cursor.next(); // 'd'

        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!((cursor.line(), cursor.offset()), (Line(4), 7));

        assert!(cursor.is_at_end());
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.line(), Line(4));

        cursor = "".into();
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!(cursor.line(), Line(1));
    }

    #[test]
    fn advance_helpers() {
        let mut cursor = Cursor::new("==123abc");

        assert!(cursor.advance_if('='));
        assert!(!cursor.advance_if('!'));
        assert!(cursor.advance_if('='));

        let start = cursor.clone();
        cursor.advance_while(|c| c.is_ascii_digit());
        assert_eq!(start.slice_until(&cursor), "123");
        assert_eq!(cursor.peek(), Some('a'));
    }

    #[test]
    fn equality_is_position_in_the_same_buffer() {
        let source = "1 + 2";
        let copy = source.to_string();

        let mut cursor = Cursor::new(source);
        assert_eq!(cursor, Cursor::new(source));
        assert_ne!(cursor, Cursor::new(&copy));

        cursor.next();
        assert_ne!(cursor, Cursor::new(source));
        let mut other = Cursor::new(source);
        other.next();
        assert_eq!(cursor, other);
    }

    #[test]
    fn slicing_a_long_buffer() {
        let source = "1 + ".repeat(200_000);
        let mut cursor = Cursor::new(&source);
        let mut lexemes = 0;

        while !cursor.is_at_end() {
            let start = cursor.clone();
            cursor.advance_while(|c| c != ' ');
            assert!(!start.range_to(&cursor).lexeme().is_empty());
            lexemes += 1;
            cursor.advance_if(' ');
        }

        assert_eq!(lexemes, 400_000);
    }

    #[test]
    fn multibyte_offsets() {
        let mut cursor = Cursor::new("é+");
        cursor.next();
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.peek(), Some('+'));
    }
}
