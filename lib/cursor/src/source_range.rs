use crate::Line;

/// A span of a borrowed source buffer, tagged with the line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRange<'a> {
    source: &'a str,
    start: usize,
    end: usize,
    line: Line,
}

impl<'a> From<&'a str> for SourceRange<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source, 0, source.len(), Line(1))
    }
}

impl<'a> SourceRange<'a> {
    pub fn new(source: &'a str, start: usize, end: usize, line: Line) -> Self {
        assert!(start <= end && end <= source.len());
        Self { source, start, end, line }
    }

    pub fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.end]
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn line(&self) -> Line {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_source() {
        let range: SourceRange = "45.67".into();
        assert_eq!(range.lexeme(), "45.67");
        assert_eq!((range.start(), range.end()), (0, 5));
        assert_eq!(range.line(), Line(1));
    }
}
