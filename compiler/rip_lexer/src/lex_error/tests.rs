use pretty_assertions::assert_eq;
use rip_ir::{DiagnosticEvent, LineCol, Span};

use super::*;

fn err(kind: LexErrorKind) -> LexError {
    LexError::new(kind, Span::new(3, 5), LineCol::new(1, 3))
}

#[test]
fn messages_match_ruby_wording() {
    assert_eq!(
        err(LexErrorKind::TrailingUnderscore { ch: '_' }).message(),
        "trailing `_' in number"
    );
    assert_eq!(
        err(LexErrorKind::InvalidChar { byte: 0x01 }).message(),
        "Invalid char `\\x01' in expression"
    );
    assert_eq!(
        err(LexErrorKind::HeredocNotTerminated { id: "EOS".into() }).message(),
        "can't find string \"EOS\" anywhere before EOF"
    );
    assert_eq!(
        err(LexErrorKind::UnknownRegexpOptions {
            options: "qz".into()
        })
        .message(),
        "unknown regexp options - qz"
    );
    assert_eq!(
        err(LexErrorKind::UnknownRegexpOptions {
            options: "q".into()
        })
        .message(),
        "unknown regexp option - q"
    );
}

#[test]
fn into_diagnostic_is_compile_error() {
    let diag = err(LexErrorKind::NoLeadingDigit)
        .with_default_suggestion()
        .into_diagnostic();
    assert_eq!(diag.event, DiagnosticEvent::CompileError);
    assert!(diag.is_error());
    assert_eq!(diag.span, Span::new(3, 5));
    assert_eq!(diag.pos, LineCol::new(1, 3));
    assert_eq!(diag.notes, vec!["write `0.5` instead of `.5`".to_string()]);
}

#[test]
fn suggestions_sorted_by_priority() {
    let diag = err(LexErrorKind::InvalidEscape)
        .with_suggestion(LexSuggestion::text("second", 2))
        .with_suggestion(LexSuggestion::text("first", 0))
        .into_diagnostic();
    assert_eq!(diag.notes, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn encoding_family() {
    assert!(err(LexErrorKind::UnknownEncoding { name: "x".into() }).kind.is_encoding_error());
    assert!(!err(LexErrorKind::InvalidEscape).kind.is_encoding_error());
}
