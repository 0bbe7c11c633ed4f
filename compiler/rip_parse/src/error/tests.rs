use super::*;
use rip_ir::{LexState, LineCol, Span};

fn token(kind: TokenKind, text: &str) -> Token {
    Token {
        kind,
        value: Default::default(),
        text: text.to_owned(),
        span: Span::new(0, text.len() as u32),
        pos: LineCol::new(1, 0),
        state: LexState::BEG,
        node: NodeHandle::NONE,
    }
}

#[test]
fn found_names() {
    assert_eq!(found(&token(TokenKind::EndOfInput, "")), "end-of-input");
    assert_eq!(found(&token(TokenKind::KwEnd, "end")), "`end'");
    assert_eq!(found(&token(TokenKind::RParen, ")")), "')'");
    assert_eq!(
        found(&token(TokenKind::Integer, "1")),
        "integer literal `1'"
    );
}

#[test]
fn found_names_layout_and_identifiers() {
    assert_eq!(found(&token(TokenKind::Newline, "\n")), "'\\n'");
    assert_eq!(
        found(&token(TokenKind::Identifier, "foo")),
        "local variable or method `foo'"
    );
}
