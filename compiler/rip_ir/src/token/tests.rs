use super::*;

#[test]
fn bracket_variants_share_scanner_events() {
    for kind in [TokenKind::ParenCall, TokenKind::LParen, TokenKind::LParenArg] {
        assert_eq!(kind.scanner_event(), Some(ScannerEvent::Lparen));
    }
    for kind in [TokenKind::LBraceBlock, TokenKind::LBrace, TokenKind::LBraceArg] {
        assert_eq!(kind.scanner_event(), Some(ScannerEvent::Lbrace));
    }
    assert_eq!(TokenKind::LamBeg.scanner_event(), Some(ScannerEvent::Tlambeg));
}

#[test]
fn every_do_flavor_is_a_keyword() {
    for kind in [
        TokenKind::KwDo,
        TokenKind::KwDoCond,
        TokenKind::KwDoBlock,
        TokenKind::KwDoLambda,
        TokenKind::ModIf,
    ] {
        assert!(kind.is_keyword(), "{kind}");
    }
    assert!(!TokenKind::Identifier.is_keyword());
}

#[test]
fn end_of_input_dispatches_nothing() {
    assert_eq!(TokenKind::EndOfInput.scanner_event(), None);
    assert_eq!(TokenKind::EndOfInput.describe(), "end-of-input");
}

#[test]
fn cooked_prefers_bytes() {
    let token = Token {
        kind: TokenKind::StringContent,
        value: TokenValue::Bytes(b"a\tb".to_vec()),
        text: "a\\tb".to_string(),
        span: Span::new(1, 5),
        pos: LineCol::new(1, 1),
        state: LexState::empty(),
        node: NodeHandle::NONE,
    };
    assert_eq!(token.cooked(), "a\tb");
    assert!(token.is(TokenKind::StringContent));
}
