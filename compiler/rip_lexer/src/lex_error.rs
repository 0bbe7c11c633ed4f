//! Lexical error values.
//!
//! Errors follow the WHERE+WHAT+WHY+HOW shape:
//! - WHERE: `span`/`pos` locating the error in source
//! - WHAT: `kind` describing what went wrong
//! - WHY: `context` explaining what the lexer was doing
//! - HOW: `suggestions` providing actionable fixes
//!
//! A `LexError` never crosses the token boundary as a `Result`. The lexer
//! turns it into a [`Diagnostic`] on the spot, forwards it to the sink's
//! side channel, and keeps scanning.

#[cfg(test)]
mod tests;

use rip_diagnostic::Diagnostic;
use rip_ir::{DiagnosticEvent, LineCol, Span};

/// A lexer error with full context for diagnostic rendering.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    /// WHERE the error occurred.
    pub span: Span,
    pub pos: LineCol,
    /// WHAT went wrong.
    pub kind: LexErrorKind,
    /// WHY we were checking.
    pub context: LexErrorContext,
    /// HOW to fix.
    pub suggestions: Vec<LexSuggestion>,
}

/// What kind of lexer error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    // === Numeric Errors ===
    /// `0x`, `0b`, `0o`, `0d` with no digits.
    NumericWithoutDigits,
    /// `1_`, `0x1__2`.
    TrailingUnderscore { ch: char },
    InvalidOctalDigit,
    InvalidBinaryDigit,
    /// `.5` with no leading digit.
    NoLeadingDigit,
    /// `1.2.3`
    FractionAfterNumeric,

    // === Escape Errors ===
    InvalidHexEscape,
    InvalidEscape,
    InvalidUnicodeEscape,
    UnterminatedUnicodeEscape,
    CodepointTooLarge,
    /// Surrogate half.
    InvalidCodepoint,
    /// `?\u{41 42}`
    MultipleCodepoints,
    /// UTF-8 escapes mixed with bytes of another encoding in one literal.
    MixedEncoding { inner: &'static str, outer: &'static str },

    // === Literal Errors ===
    UnterminatedString,
    UnterminatedRegexp,
    UnterminatedList,
    /// `%` with its delimiter at end of file.
    UnterminatedQuotedString,
    UnknownPercentType,
    UnknownRegexpOptions { options: String },
    UnterminatedHeredocIdentifier,
    HeredocNotTerminated { id: String },
    EmbdocMeetsEof,
    IncompleteCharSyntax,

    // === Name Errors ===
    DollarWithoutIdentifier,
    InvalidGlobalName { ch: char },
    AtWithoutIdentifier { class_var: bool },
    InvalidInstanceName { ch: char, class_var: bool },
    InvalidChar { byte: u8 },

    // === Encoding Errors ===
    UnknownEncoding { name: String },
    NotAsciiCompatible { name: String },
}

impl LexErrorKind {
    /// The user-facing message.
    pub fn message(&self) -> String {
        match self {
            LexErrorKind::NumericWithoutDigits => "numeric literal without digits".into(),
            LexErrorKind::TrailingUnderscore { ch } => format!("trailing `{ch}' in number"),
            LexErrorKind::InvalidOctalDigit => "Invalid octal digit".into(),
            LexErrorKind::InvalidBinaryDigit => "Invalid binary digit".into(),
            LexErrorKind::NoLeadingDigit => {
                "no .<digit> floating literal anymore; put 0 before dot".into()
            }
            LexErrorKind::FractionAfterNumeric => {
                "unexpected fraction part after numeric literal".into()
            }
            LexErrorKind::InvalidHexEscape => "invalid hex escape".into(),
            LexErrorKind::InvalidEscape => "Invalid escape character syntax".into(),
            LexErrorKind::InvalidUnicodeEscape => "invalid Unicode escape".into(),
            LexErrorKind::UnterminatedUnicodeEscape => "unterminated Unicode escape".into(),
            LexErrorKind::CodepointTooLarge => "invalid Unicode codepoint (too large)".into(),
            LexErrorKind::InvalidCodepoint => "invalid Unicode codepoint".into(),
            LexErrorKind::MultipleCodepoints => {
                "Multiple codepoints at single character literal".into()
            }
            LexErrorKind::MixedEncoding { inner, outer } => {
                format!("{inner} mixed within {outer} source")
            }
            LexErrorKind::UnterminatedString => "unterminated string meets end of file".into(),
            LexErrorKind::UnterminatedRegexp => "unterminated regexp meets end of file".into(),
            LexErrorKind::UnterminatedList => "unterminated list meets end of file".into(),
            LexErrorKind::UnterminatedQuotedString => {
                "unterminated quoted string meets end of file".into()
            }
            LexErrorKind::UnknownPercentType => "unknown type of %string".into(),
            LexErrorKind::UnknownRegexpOptions { options } => {
                let s = if options.chars().count() > 1 { "s" } else { "" };
                format!("unknown regexp option{s} - {options}")
            }
            LexErrorKind::UnterminatedHeredocIdentifier => {
                "unterminated here document identifier".into()
            }
            LexErrorKind::HeredocNotTerminated { id } => {
                format!("can't find string \"{id}\" anywhere before EOF")
            }
            LexErrorKind::EmbdocMeetsEof => "embedded document meets end of file".into(),
            LexErrorKind::IncompleteCharSyntax => "incomplete character syntax".into(),
            LexErrorKind::DollarWithoutIdentifier => {
                "`$' without identifiers is not allowed as a global variable name".into()
            }
            LexErrorKind::InvalidGlobalName { ch } => {
                format!("`${ch}' is not allowed as a global variable name")
            }
            LexErrorKind::AtWithoutIdentifier { class_var: false } => {
                "`@' without identifiers is not allowed as an instance variable name".into()
            }
            LexErrorKind::AtWithoutIdentifier { class_var: true } => {
                "`@@' without identifiers is not allowed as a class variable name".into()
            }
            LexErrorKind::InvalidInstanceName {
                ch,
                class_var: false,
            } => format!("`@{ch}' is not allowed as an instance variable name"),
            LexErrorKind::InvalidInstanceName { ch, class_var: true } => {
                format!("`@@{ch}' is not allowed as a class variable name")
            }
            LexErrorKind::InvalidChar { byte } => {
                format!("Invalid char `\\x{byte:02X}' in expression")
            }
            LexErrorKind::UnknownEncoding { name } => format!("unknown encoding name: {name}"),
            LexErrorKind::NotAsciiCompatible { name } => {
                format!("{name} is not ASCII compatible")
            }
        }
    }

    /// True for the encoding family of errors.
    pub fn is_encoding_error(&self) -> bool {
        matches!(
            self,
            LexErrorKind::UnknownEncoding { .. }
                | LexErrorKind::NotAsciiCompatible { .. }
                | LexErrorKind::MixedEncoding { .. }
        )
    }
}

/// Lexing context at the point of error.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LexErrorContext {
    /// Top-level scanning (not inside any literal).
    #[default]
    TopLevel,
    /// Inside a quoted literal that began at `start`.
    InsideLiteral { start: u32 },
    /// Inside the body of the heredoc terminated by `id`.
    InsideHeredoc { id: String },
    NumberLiteral,
    MagicComment,
}

/// Suggestion for fixing a lexical error.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexSuggestion {
    pub message: String,
    /// Priority (lower = more likely relevant).
    pub priority: u8,
}

impl LexSuggestion {
    pub fn text(message: impl Into<String>, priority: u8) -> Self {
        LexSuggestion {
            message: message.into(),
            priority,
        }
    }
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span, pos: LineCol) -> Self {
        LexError {
            span,
            pos,
            kind,
            context: LexErrorContext::TopLevel,
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: LexErrorContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: LexSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// Attach the stock suggestion for this kind, if there is one.
    #[must_use]
    pub fn with_default_suggestion(self) -> Self {
        let hint = match &self.kind {
            LexErrorKind::TrailingUnderscore { .. } => "remove the trailing `_`",
            LexErrorKind::NoLeadingDigit => "write `0.5` instead of `.5`",
            LexErrorKind::InvalidBinaryDigit => "binary literals use only `0` and `1`",
            LexErrorKind::InvalidOctalDigit => "octal literals use only digits `0`-`7`",
            LexErrorKind::HeredocNotTerminated { .. } => {
                "put the terminator alone on its own line"
            }
            LexErrorKind::UnknownPercentType => {
                "known forms are %q %Q %w %W %i %I %r %s %x"
            }
            _ => return self,
        };
        self.with_suggestion(LexSuggestion::text(hint, 0))
    }

    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Convert into the `compile_error` diagnostic the sink receives.
    pub fn into_diagnostic(self) -> Diagnostic {
        let mut diag = Diagnostic::error(DiagnosticEvent::CompileError)
            .with_message(self.kind.message())
            .at(self.span, self.pos);
        let mut suggestions = self.suggestions;
        suggestions.sort_by_key(|s| s.priority);
        for suggestion in suggestions {
            diag = diag.with_note(suggestion.message);
        }
        diag
    }
}
