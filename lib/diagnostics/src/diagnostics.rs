use std::fmt::Display;

use cursor::Line;
use itertools::Itertools;

/// A single line-tagged error report.
///
/// `at` is an optional short location phrase such as `end` or `'<lexeme>'`.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{}: {message}", .at.as_ref().map(|at| format!(" at {at}")).unwrap_or_default())]
pub struct Diagnostic {
    pub line: Line,
    pub at: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: Line, message: impl ToString) -> Self {
        Self { line, at: None, message: message.to_string() }
    }

    pub fn at(self, at: impl ToString) -> Self {
        Self { at: Some(at.to_string()), ..self }
    }
}

/// Collects every diagnostic of one scan/parse/evaluate run.
///
/// A fresh sink is created per run and owned by the caller, so there is no
/// failure flag to reset between independent inputs.
#[derive(thiserror::Error, Debug, Default, PartialEq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: impl Into<Diagnostic>) {
        let diagnostic = diagnostic.into();
        log::debug!("Reporting diagnostic: {}", diagnostic);
        self.0.push(diagnostic);
    }

    pub fn had_error(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_with_and_without_location() {
        assert_eq!(
            Diagnostic::new(Line(3), "Unterminated string.").to_string(),
            "[line 3] Error: Unterminated string."
        );
        assert_eq!(
            Diagnostic::new(Line(1), "Expected literal.").at("end").to_string(),
            "[line 1] Error at end: Expected literal."
        );
        assert_eq!(
            Diagnostic::new(Line(2), "Missing left expression.").at("'*'").to_string(),
            "[line 2] Error at '*': Missing left expression."
        );
    }

    #[test]
    fn sink_latches_on_first_report() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.had_error());

        diagnostics.report(Diagnostic::new(Line(1), "first"));
        diagnostics.report(Diagnostic::new(Line(2), "second"));

        assert!(diagnostics.had_error());
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.to_string(), "[line 1] Error: first\n[line 2] Error: second");
    }
}
