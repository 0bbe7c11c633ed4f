//! The diagnostic record.

use std::fmt;

use rip_ir::{DiagnosticEvent, LineCol, Span};

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A warning or error anchored at a source position.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Side-channel event this diagnostic is dispatched under.
    pub event: DiagnosticEvent,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub pos: LineCol,
    /// Additional context lines.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new(event: DiagnosticEvent, severity: Severity) -> Self {
        Diagnostic {
            event,
            severity,
            message: String::new(),
            span: Span::DUMMY,
            pos: LineCol::default(),
            notes: Vec::new(),
        }
    }

    /// Create an error diagnostic.
    #[cold]
    pub fn error(event: DiagnosticEvent) -> Self {
        Self::new(event, Severity::Error)
    }

    /// Create a warning diagnostic.
    #[cold]
    pub fn warning(event: DiagnosticEvent) -> Self {
        Self::new(event, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn at(mut self, span: Span, pos: LineCol) -> Self {
        self.span = span;
        self.pos = pos;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.pos, self.severity, self.message)?;
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let diag = Diagnostic::error(DiagnosticEvent::CompileError)
            .with_message("trailing `_' in number")
            .at(Span::new(3, 5), LineCol::new(1, 3))
            .with_note("remove the underscore");
        assert!(diag.is_error());
        assert_eq!(diag.span, Span::new(3, 5));
        assert_eq!(
            diag.to_string(),
            "1:3: error: trailing `_' in number\n  note: remove the underscore"
        );
    }

    #[test]
    fn warnings_are_not_errors() {
        let diag = Diagnostic::warning(DiagnosticEvent::Warning).with_message("shadowing");
        assert!(!diag.is_error());
        assert_eq!(diag.severity.to_string(), "warning");
    }
}
