//! End-to-end scanning behavior through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use rip_ir::trace::TokenRecorder;
use rip_ir::{DiagnosticEvent, TokenKind, TokenValue};
use rip_lexer::{dedent_string, tokenize, tokenize_with, Lexer, LexerOptions};
use rip_lexer_core::StrSource;

fn kinds_and_text(src: &str) -> Vec<(TokenKind, String)> {
    tokenize(src)
        .tokens
        .into_iter()
        .map(|t| (t.kind, t.text))
        .collect()
}

// -- Numeric literals --

#[test]
fn hex_with_separator() {
    let out = tokenize("0x1_F");
    assert!(!out.errored);
    assert_eq!(out.tokens.len(), 1);
    assert_eq!(out.tokens[0].kind, TokenKind::Integer);
    assert_eq!(out.tokens[0].text, "0x1_F");
}

#[test]
fn float_rational_imaginary() {
    assert_eq!(tokenize("1_000.5e-3").tokens[0].kind, TokenKind::Float);
    assert_eq!(tokenize("1r").tokens[0].kind, TokenKind::Rational);
    assert_eq!(tokenize("1i").tokens[0].kind, TokenKind::Imaginary);
}

#[test]
fn digit_out_of_range_for_base() {
    let out = tokenize("0b1012");
    assert!(out.errored);
    assert_eq!(out.diagnostics[0].event, DiagnosticEvent::CompileError);
    assert_eq!(out.diagnostics[0].message, "Invalid binary digit");
}

#[test]
fn trailing_exponent_at_end_of_input_keeps_the_source() {
    for src in ["x=3e", "1e", "1.0e", "p 2E", "y = 5e+"] {
        let mut recorder = TokenRecorder::new();
        tokenize_with(src, &mut recorder, LexerOptions::default());
        assert_eq!(recorder.source_text(), src, "{:?}", recorder.pairs());
    }
}

#[test]
fn lookahead_at_end_of_input_keeps_the_source() {
    for src in ["x = 1 +", "foo.", "a &", "b ==", "c <"] {
        let mut recorder = TokenRecorder::new();
        tokenize_with(src, &mut recorder, LexerOptions::default());
        assert_eq!(recorder.source_text(), src, "{:?}", recorder.pairs());
    }
}

// -- Literals --

#[test]
fn squiggly_heredoc_dedent() {
    let out = tokenize("<<~END\n  a\n    b\nEND\n");
    let width = out
        .tokens
        .iter()
        .find_map(|t| match (t.kind, &t.value) {
            (TokenKind::StringEnd, TokenValue::Dedent(w)) => Some(*w),
            _ => None,
        })
        .expect("heredoc end carries the dedent width");
    assert_eq!(width, 2);

    let mut body = Vec::new();
    for token in out.tokens.iter().filter(|t| t.kind == TokenKind::StringContent) {
        let mut piece = token.cooked().as_bytes().to_vec();
        dedent_string(&mut piece, width);
        body.extend(piece);
    }
    assert_eq!(body, b"a\n  b\n");
}

#[test]
fn delimiter_nesting() {
    assert_eq!(
        kinds_and_text("%(a(b)c)"),
        vec![
            (TokenKind::StringBeg, "%(".to_owned()),
            (TokenKind::StringContent, "a(b)c".to_owned()),
            (TokenKind::StringEnd, ")".to_owned()),
        ]
    );
    let rest = kinds_and_text("%(a)c)");
    assert_eq!(rest[1], (TokenKind::StringContent, "a".to_owned()));
    assert_eq!(rest[2].0, TokenKind::StringEnd);
    assert_eq!(rest[3], (TokenKind::Identifier, "c".to_owned()));
    assert_eq!(rest[4], (TokenKind::RParen, ")".to_owned()));
}

// -- Disambiguation --

#[test]
fn ambiguous_operator_on_bare_identifier() {
    let out = tokenize("foo -1");
    assert_eq!(out.tokens[1].kind, TokenKind::UMinusNum);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].event, DiagnosticEvent::OperatorAmbiguous);
    assert!(!out.errored);
}

#[test]
fn ambiguous_first_argument_is_reported_as_operator_ambiguous() {
    for (src, op) in [("foo -1", '-'), ("foo +1", '+'), ("foo /x/", '/')] {
        let out = tokenize(src);
        assert_eq!(out.diagnostics.len(), 1, "{src:?}: {:?}", out.diagnostics);
        let diag = &out.diagnostics[0];
        assert_eq!(diag.event.name(), "operator_ambiguous");
        assert_eq!(
            diag.message,
            format!("ambiguous first argument; put parentheses or a space even after `{op}' operator")
        );
    }
}

#[test]
fn binary_minus_on_known_local() {
    let out = tokenize("x = 0\nx - 1");
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    assert_eq!(out.tokens[5].kind, TokenKind::Minus);
}

#[test]
fn keyword_after_dot() {
    let out = tokenize("foo.end");
    assert_eq!(out.tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokenize("end").tokens[0].kind, TokenKind::KwEnd);
}

// -- Interpolation --

#[test]
fn checkpoint_symmetry() {
    let mut recorder = TokenRecorder::new();
    let mut lexer = Lexer::new(
        StrSource::new("\"a#{1+1}b\""),
        &mut recorder,
        LexerOptions::default(),
    );
    let mut kinds = Vec::new();
    let mut saved = None;
    let mut expected = None;
    // State of the string scan before `#{` is reached.
    let mut previous = lexer.checkpoint();
    let mut restored = 0;
    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::EndOfInput => break,
            TokenKind::EmbexprBeg => {
                expected = Some(previous.clone());
                saved = Some(lexer.checkpoint());
                lexer.enter_interpolation();
            }
            TokenKind::EmbexprEnd => {
                let expected = expected.take().expect("balanced interpolation");
                assert_ne!(lexer.checkpoint(), expected);
                lexer.restore(saved.take().expect("balanced interpolation"));
                assert_eq!(lexer.checkpoint(), expected);
                assert!(lexer.checkpoint().in_literal());
                restored += 1;
            }
            _ => {}
        }
        previous = lexer.checkpoint();
        kinds.push(token.kind);
    }
    drop(lexer);
    assert_eq!(restored, 1);

    assert_eq!(
        kinds,
        vec![
            TokenKind::StringBeg,
            TokenKind::StringContent,
            TokenKind::EmbexprBeg,
            TokenKind::Integer,
            TokenKind::Plus,
            TokenKind::Integer,
            TokenKind::EmbexprEnd,
            TokenKind::StringContent,
            TokenKind::StringEnd,
        ]
    );
    let names: Vec<&str> = recorder.pairs().into_iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec![
            "tstring_beg",
            "tstring_content",
            "embexpr_beg",
            "int",
            "op",
            "int",
            "embexpr_end",
            "tstring_content",
            "tstring_end",
        ]
    );
}

// -- Events --

#[test]
fn layout_events_cover_the_source() {
    let src = "# top\n=begin\ndoc\n=end\nfoo(1,\n  2) # tail\n\n__END__\nraw\n";
    let mut recorder = TokenRecorder::new();
    let out = tokenize_with(src, &mut recorder, LexerOptions::default());
    assert!(!out.errored);
    assert_eq!(recorder.source_text(), src);
    let names: Vec<&str> = recorder.pairs().into_iter().map(|(name, _)| name).collect();
    for expected in ["comment", "embdoc_beg", "embdoc", "embdoc_end", "ignored_nl", "sp", "__end__"] {
        assert!(names.contains(&expected), "missing {expected} in {names:?}");
    }
}

#[test]
fn crlf_reads_as_newline() {
    let src = "a\r\nb\r\n";
    let mut recorder = TokenRecorder::new();
    let out = tokenize_with(src, &mut recorder, LexerOptions::default());
    let kinds: Vec<TokenKind> = out.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::Newline,
        ]
    );
    assert_eq!(recorder.source_text(), src);
}
