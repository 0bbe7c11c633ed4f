use super::*;

use pretty_assertions::assert_eq;
use rip_ir::trace::TokenRecorder;

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).tokens.iter().map(|t| t.kind).collect()
}

// === Interpolation ===

#[test]
fn interpolation_resumes_the_string() {
    let out = tokenize(r#""a#{x + 1}b""#);
    let pairs: Vec<(TokenKind, &str)> =
        out.tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
    assert_eq!(
        pairs,
        vec![
            (TokenKind::StringBeg, "\""),
            (TokenKind::StringContent, "a"),
            (TokenKind::EmbexprBeg, "#{"),
            (TokenKind::Identifier, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Integer, "1"),
            (TokenKind::EmbexprEnd, "}"),
            (TokenKind::StringContent, "b"),
            (TokenKind::StringEnd, "\""),
        ]
    );
    assert!(!out.errored);
}

#[test]
fn braces_inside_interpolation_do_not_close_it() {
    assert_eq!(
        kinds(r##""#{ {a: 1} }""##),
        vec![
            TokenKind::StringBeg,
            TokenKind::EmbexprBeg,
            TokenKind::LBrace,
            TokenKind::Label,
            TokenKind::Integer,
            TokenKind::RBrace,
            TokenKind::EmbexprEnd,
            TokenKind::StringEnd,
        ]
    );
}

#[test]
fn nested_interpolation() {
    assert_eq!(
        kinds(r##""#{"#{x}"}""##),
        vec![
            TokenKind::StringBeg,
            TokenKind::EmbexprBeg,
            TokenKind::StringBeg,
            TokenKind::EmbexprBeg,
            TokenKind::Identifier,
            TokenKind::EmbexprEnd,
            TokenKind::StringEnd,
            TokenKind::EmbexprEnd,
            TokenKind::StringEnd,
        ]
    );
}

#[test]
fn embedded_variable() {
    assert_eq!(
        kinds(r#""x#@y z""#),
        vec![
            TokenKind::StringBeg,
            TokenKind::StringContent,
            TokenKind::EmbVar,
            TokenKind::Ivar,
            TokenKind::StringContent,
            TokenKind::StringEnd,
        ]
    );
}

#[test]
fn interpolation_round_trips_through_the_recorder() {
    let src = "puts \"a#{b}c\", <<~EOS\n  x#{y}\n  z\nEOS\n";
    let mut recorder = TokenRecorder::new();
    let out = tokenize_with(src, &mut recorder, LexerOptions::default());
    assert!(!out.errored, "{:?}", out.diagnostics);
    assert_eq!(recorder.source_text(), src);
}

/// Tokenize `src`, which must scan cleanly, and check it reaches its
/// `heredoc_end` and reproduces the source.
fn assert_heredoc_closes(src: &str) -> Vec<TokenKind> {
    let mut recorder = TokenRecorder::new();
    let out = tokenize_with(src, &mut recorder, LexerOptions::default());
    assert!(!out.errored, "{src:?}: {:?}", out.diagnostics);
    assert!(
        recorder.pairs().iter().any(|(event, _)| *event == "heredoc_end"),
        "{src:?}: {:?}",
        recorder.pairs()
    );
    assert_eq!(recorder.source_text(), src);
    out.tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn plain_heredoc_with_interpolation_finds_terminator() {
    let kinds = assert_heredoc_closes("<<A\n#{b}\nA\n");
    assert_eq!(
        kinds,
        vec![
            TokenKind::StringBeg,
            TokenKind::EmbexprBeg,
            TokenKind::Identifier,
            TokenKind::EmbexprEnd,
            TokenKind::StringContent,
            TokenKind::StringEnd,
            TokenKind::Newline,
        ]
    );
}

#[test]
fn heredoc_argument_resumes_after_interpolated_body() {
    let kinds = assert_heredoc_closes("x(<<A, 1)\na #{b}\nA\n");
    let tail: Vec<TokenKind> = kinds
        .iter()
        .copied()
        .skip_while(|k| *k != TokenKind::StringEnd)
        .collect();
    assert_eq!(
        tail,
        vec![
            TokenKind::StringEnd,
            TokenKind::Comma,
            TokenKind::Integer,
            TokenKind::RParen,
            TokenKind::Newline,
        ]
    );
}

#[test]
fn heredoc_interpolation_variants_close() {
    assert_heredoc_closes("<<\"A\"\n#@v\nA\n");
    assert_heredoc_closes("<<A.strip\na #{b} c\nA\n");
    assert_heredoc_closes("<<~A\n#{b}\nA\n");
    assert_heredoc_closes("<<-A\n  x #{y}\n  z\n  A\n");
}

// === Grammar hand-offs ===

#[test]
fn assignment_declares_local() {
    let out = tokenize("x = 1\nx -1\n");
    let minus = out.tokens.iter().filter(|t| t.kind == TokenKind::Minus).count();
    assert_eq!(minus, 1);
    assert_eq!(out.tokens[4].kind, TokenKind::Identifier);
    assert_eq!(out.tokens[5].kind, TokenKind::Minus);
}

#[test]
fn attribute_assignment_does_not_declare_local() {
    let out = tokenize("a.b = 1\nb -1\n");
    assert!(out.tokens.iter().any(|t| t.kind == TokenKind::UMinusNum));
}

#[test]
fn lambda_body_brace() {
    assert_eq!(
        kinds("->(x) { x }"),
        vec![
            TokenKind::Lambda,
            TokenKind::ParenCall,
            TokenKind::Identifier,
            TokenKind::RParen,
            TokenKind::LamBeg,
            TokenKind::Identifier,
            TokenKind::RBrace,
        ]
    );
    let do_form = kinds("-> do end");
    assert_eq!(do_form[1], TokenKind::KwDoLambda);
}

#[test]
fn loop_condition_do() {
    let out = kinds("while x do end");
    assert_eq!(out[2], TokenKind::KwDoCond);
    let out = kinds("foo do end");
    assert_eq!(out[1], TokenKind::KwDo);
}

#[test]
fn command_argument_do_block() {
    let out = kinds("foo bar do end");
    assert_eq!(out[2], TokenKind::KwDoBlock);
}

// === Results ===

#[test]
fn errors_are_collected() {
    let out = tokenize("x = 0x\n");
    assert!(out.errored);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].message, "numeric literal without digits");
}

#[test]
fn iteration_stops_at_end_of_input() {
    let mut sink = NoopSink;
    let mut stream = TokenStream::new(StrSource::new("a"), &mut sink, LexerOptions::default());
    assert_eq!(stream.next().map(|t| t.kind), Some(TokenKind::Identifier));
    assert!(stream.next().is_none());
    assert!(stream.next().is_none());
}
