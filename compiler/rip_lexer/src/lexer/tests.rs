use super::*;

use pretty_assertions::assert_eq;
use rip_ir::trace::TokenRecorder;
use rip_lexer_core::StrSource;

struct Lexed {
    tokens: Vec<Token>,
    recorder: TokenRecorder,
    messages: Vec<String>,
    magic: MagicSettings,
    encoding: SourceEncoding,
}

impl Lexed {
    fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }

    /// `(kind, text)` for every token except layout.
    fn pairs(&self) -> Vec<(TokenKind, &str)> {
        self.tokens
            .iter()
            .map(|t| (t.kind, t.text.as_str()))
            .collect()
    }

    fn first(&self, kind: TokenKind) -> &Token {
        match self.tokens.iter().find(|t| t.kind == kind) {
            Some(t) => t,
            None => panic!("no {kind:?} token in {:?}", self.kinds()),
        }
    }
}

fn lex_with(src: &str, setup: impl FnOnce(&mut Lexer<'_, StrSource<'_>>)) -> Lexed {
    let mut recorder = TokenRecorder::new();
    let (tokens, messages, magic, encoding) = {
        let mut lexer = Lexer::new(StrSource::new(src), &mut recorder, LexerOptions::default());
        setup(&mut lexer);
        let mut tokens = Vec::new();
        for _ in 0..10_000 {
            let token = lexer.next_token();
            if token.kind == TokenKind::EndOfInput {
                break;
            }
            tokens.push(token);
        }
        let messages = lexer
            .diagnostics()
            .iter()
            .map(|d| d.message.clone())
            .collect();
        (tokens, messages, lexer.magic().clone(), lexer.encoding())
    };
    Lexed {
        tokens,
        recorder,
        messages,
        magic,
        encoding,
    }
}

fn lex(src: &str) -> Lexed {
    lex_with(src, |_| {})
}

fn bytes(token: &Token) -> &[u8] {
    match &token.value {
        TokenValue::Bytes(b) => b,
        other => panic!("expected cooked bytes, got {other:?}"),
    }
}

// === Operators and spacing ===

#[test]
fn command_argument_minus_is_unary_and_ambiguous() {
    let out = lex("foo -1");
    assert_eq!(
        out.pairs(),
        vec![
            (TokenKind::Identifier, "foo"),
            (TokenKind::UMinusNum, "-"),
            (TokenKind::Integer, "1"),
        ]
    );
    assert_eq!(
        out.messages,
        vec!["ambiguous first argument; put parentheses or a space even after `-' operator"]
    );
}

#[test]
fn local_variable_minus_is_binary() {
    let out = lex_with("x - 1", |lexer| lexer.locals_mut().declare("x"));
    assert_eq!(
        out.kinds(),
        vec![TokenKind::Identifier, TokenKind::Minus, TokenKind::Integer]
    );
    assert!(out.messages.is_empty(), "{:?}", out.messages);
    assert_eq!(out.tokens[0].state, LexState::END | LexState::LABEL);
}

#[test]
fn local_variable_unspaced_operand_warns_balanced() {
    let out = lex_with("x -1", |lexer| lexer.locals_mut().declare("x"));
    assert_eq!(out.tokens[1].kind, TokenKind::Minus);
    assert_eq!(
        out.messages,
        vec!["`-' after local variable or literal is interpreted as binary operator even though it seems like unary operator"]
    );
}

#[test]
fn compound_operators() {
    let out = lex("a <=> b == c != d && e || f ** g");
    let ops: Vec<TokenKind> = out
        .kinds()
        .into_iter()
        .filter(|k| !matches!(k, TokenKind::Identifier))
        .collect();
    assert_eq!(
        ops,
        vec![
            TokenKind::Cmp,
            TokenKind::Eq,
            TokenKind::Neq,
            TokenKind::AndOp,
            TokenKind::OrOp,
            TokenKind::Pow,
        ]
    );
}

#[test]
fn op_assign_keeps_whole_operator_text() {
    let out = lex("a &&= b; c ||= d; e <<= 1; f **= 2");
    let texts: Vec<&str> = out
        .pairs()
        .into_iter()
        .filter(|(k, _)| *k == TokenKind::OpAsgn)
        .map(|(_, t)| t)
        .collect();
    assert_eq!(texts, vec!["&&=", "||=", "<<=", "**="]);
}

#[test]
fn ranges_and_dots() {
    let out = lex("1..2");
    assert_eq!(
        out.kinds(),
        vec![TokenKind::Integer, TokenKind::Dot2, TokenKind::Integer]
    );
    let out = lex("(..5)");
    assert_eq!(out.tokens[1].kind, TokenKind::BDot2);
    let out = lex("a&.b");
    assert_eq!(out.tokens[1].kind, TokenKind::AndDot);
}

#[test]
fn brackets_depend_on_spacing() {
    assert_eq!(lex("foo[1]").tokens[1].kind, TokenKind::LBrackIndex);
    assert_eq!(lex("foo [1]").tokens[1].kind, TokenKind::LBrack);
    assert_eq!(lex("[1]").tokens[0].kind, TokenKind::LBrack);
    assert_eq!(lex("foo(1)").tokens[1].kind, TokenKind::ParenCall);
    assert_eq!(lex("foo (1)").tokens[1].kind, TokenKind::LParenArg);
    assert_eq!(lex("(1)").tokens[0].kind, TokenKind::LParen);
}

#[test]
fn block_argument_ampersand() {
    let out = lex("foo(&:sym)");
    assert_eq!(out.tokens[2].kind, TokenKind::Amper);
    assert!(out.messages.is_empty());
}

#[test]
fn double_colon_forms() {
    assert_eq!(lex("::Foo").tokens[0].kind, TokenKind::Colon3);
    assert_eq!(lex("Foo::Bar").tokens[1].kind, TokenKind::Colon2);
}

#[test]
fn invalid_char_is_reported_and_skipped() {
    let out = lex("a \x01 b");
    assert_eq!(
        out.kinds(),
        vec![TokenKind::Identifier, TokenKind::Identifier]
    );
    assert_eq!(out.messages, vec!["Invalid char `\\x01' in expression"]);
}

// === Identifiers and keywords ===

#[test]
fn keyword_after_dot_is_identifier() {
    let out = lex("foo.end");
    assert_eq!(
        out.kinds(),
        vec![TokenKind::Identifier, TokenKind::Period, TokenKind::Identifier]
    );
    assert_eq!(out.tokens[2].state, LexState::ARG);
    assert_eq!(lex("end").tokens[0].kind, TokenKind::KwEnd);
}

#[test]
fn keyword_as_method_name_keeps_keyword_kind() {
    let out = lex("def end");
    assert_eq!(out.tokens[1].kind, TokenKind::KwEnd);
    assert_eq!(out.tokens[1].state, LexState::ENDFN);
}

#[test]
fn modifier_forms() {
    let out = lex("x if y");
    assert_eq!(out.tokens[1].kind, TokenKind::ModIf);
    assert_eq!(out.tokens[1].state, LexState::BEG | LexState::LABEL);
    assert_eq!(lex("if y").tokens[0].kind, TokenKind::KwIf);
    assert_eq!(lex("a rescue b").tokens[1].kind, TokenKind::ModRescue);
}

#[test]
fn identifier_shapes() {
    let out = lex("Foo bar? baz! qux");
    assert_eq!(
        out.kinds(),
        vec![
            TokenKind::Constant,
            TokenKind::Fid,
            TokenKind::Fid,
            TokenKind::Identifier,
        ]
    );
    assert_eq!(lex("def foo=(v)").tokens[1].text, "foo=");
}

#[test]
fn labels_in_hash() {
    let out = lex("{a: 1}");
    assert_eq!(
        out.pairs(),
        vec![
            (TokenKind::LBrace, "{"),
            (TokenKind::Label, "a:"),
            (TokenKind::Integer, "1"),
            (TokenKind::RBrace, "}"),
        ]
    );
    let out = lex("{\"a\": 1}");
    assert_eq!(out.tokens[3].kind, TokenKind::LabelEnd);
    assert_eq!(out.tokens[3].text, "\":");
}

#[test]
fn variables() {
    let out = lex("$stdout $1 $& $-w @a @@b");
    assert_eq!(
        out.pairs(),
        vec![
            (TokenKind::Gvar, "$stdout"),
            (TokenKind::NthRef, "$1"),
            (TokenKind::BackRef, "$&"),
            (TokenKind::Gvar, "$-w"),
            (TokenKind::Ivar, "@a"),
            (TokenKind::Cvar, "@@b"),
        ]
    );
}

#[test]
fn invalid_instance_variable_name() {
    let out = lex("@1");
    assert_eq!(
        out.messages,
        vec!["`@1' is not allowed as an instance variable name"]
    );
}

// === Numbers ===

#[test]
fn numeric_literals() {
    let out = lex("0x1F 1_000 1.5e3 3r 2i 0b101 0o17 017");
    let kinds = out.kinds();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Integer,
            TokenKind::Integer,
            TokenKind::Float,
            TokenKind::Rational,
            TokenKind::Imaginary,
            TokenKind::Integer,
            TokenKind::Integer,
            TokenKind::Integer,
        ]
    );
    assert_eq!(bytes(&out.tokens[0]), b"1F");
    assert_eq!(bytes(&out.tokens[1]), b"1000");
    assert_eq!(out.tokens[2].text, "1.5e3");
    assert!(out.messages.is_empty(), "{:?}", out.messages);
}

#[test]
fn trailing_underscore_is_an_error() {
    let out = lex("1__2");
    assert_eq!(out.tokens[0].kind, TokenKind::Integer);
    assert_eq!(out.messages, vec!["trailing `_' in number"]);
}

#[test]
fn prefix_without_digits() {
    let out = lex("0x");
    assert_eq!(out.messages, vec!["numeric literal without digits"]);
}

#[test]
fn leading_dot_float_is_rejected() {
    let out = lex("x = .5");
    assert_eq!(
        out.messages,
        vec!["no .<digit> floating literal anymore; put 0 before dot"]
    );
}

#[test]
fn suffix_followed_by_letters_is_not_a_suffix() {
    let out = lex("3if");
    assert_eq!(out.tokens[0].kind, TokenKind::Integer);
    assert_eq!(out.tokens[0].text, "3");
    assert_eq!(out.tokens[1].kind, TokenKind::ModIf);
}

// === Strings ===

#[test]
fn double_quoted_escapes_are_cooked() {
    let out = lex(r#""a\nbé""#);
    assert_eq!(
        out.kinds(),
        vec![
            TokenKind::StringBeg,
            TokenKind::StringContent,
            TokenKind::StringEnd,
        ]
    );
    let content = out.first(TokenKind::StringContent);
    assert_eq!(content.text, r"a\nbé");
    assert_eq!(bytes(content), "a\nbé".as_bytes());
}

#[test]
fn single_quoted_only_unescapes_quote_and_backslash() {
    let out = lex(r"'a\'b\\c\n'");
    assert_eq!(bytes(out.first(TokenKind::StringContent)), br"a'b\c\n");
}

#[test]
fn unterminated_string() {
    let out = lex("\"abc");
    assert_eq!(out.messages, vec!["unterminated string meets end of file"]);
    assert_eq!(out.tokens.last().map(|t| t.kind), Some(TokenKind::StringEnd));
}

#[test]
fn percent_literal_nests_parens() {
    let out = lex("%(a(b)c)");
    assert_eq!(
        out.pairs(),
        vec![
            (TokenKind::StringBeg, "%("),
            (TokenKind::StringContent, "a(b)c"),
            (TokenKind::StringEnd, ")"),
        ]
    );
}

#[test]
fn percent_literal_ends_at_first_unbalanced_close() {
    let out = lex("%(a)c)");
    assert_eq!(
        out.pairs(),
        vec![
            (TokenKind::StringBeg, "%("),
            (TokenKind::StringContent, "a"),
            (TokenKind::StringEnd, ")"),
            (TokenKind::Identifier, "c"),
            (TokenKind::RParen, ")"),
        ]
    );
}

#[test]
fn word_list() {
    let out = lex("%w(a b)");
    let pairs: Vec<(TokenKind, &str)> = out
        .pairs()
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .collect();
    assert_eq!(
        pairs,
        vec![
            (TokenKind::QWordsBeg, "%w("),
            (TokenKind::StringContent, "a"),
            (TokenKind::WordSep, " "),
            (TokenKind::StringContent, "b"),
            (TokenKind::StringEnd, ")"),
        ]
    );
}

#[test]
fn unknown_percent_type_stops_scanning() {
    let out = lex("%z(a) b");
    assert!(out.tokens.is_empty());
    assert_eq!(out.messages, vec!["unknown type of %string"]);
}

#[test]
fn regexp_with_options() {
    let out = lex("/a+/i");
    assert_eq!(
        out.pairs(),
        vec![
            (TokenKind::RegexpBeg, "/"),
            (TokenKind::StringContent, "a+"),
            (TokenKind::RegexpEnd, "/i"),
        ]
    );
    let out = lex("/a/q");
    assert_eq!(out.messages, vec!["unknown regexp option - q"]);
}

#[test]
fn symbols() {
    let out = lex(":foo");
    assert_eq!(out.kinds(), vec![TokenKind::SymBeg, TokenKind::Identifier]);
    let out = lex(":\"bar\"");
    assert_eq!(
        out.kinds(),
        vec![
            TokenKind::SymBeg,
            TokenKind::StringContent,
            TokenKind::StringEnd,
        ]
    );

    // A value before the colon makes it a plain `:`.
    let out = lex(":foo :bar");
    assert_eq!(out.tokens[2].kind, TokenKind::Colon);
}

// === Character literals ===

#[test]
fn character_literals() {
    let out = lex("?a");
    assert_eq!(out.tokens[0].kind, TokenKind::Char);
    assert_eq!(bytes(&out.tokens[0]), b"a");
    let out = lex(r"?\n");
    assert_eq!(bytes(&out.tokens[0]), b"\n");
}

#[test]
fn question_followed_by_space_is_ternary() {
    let out = lex("? x");
    assert_eq!(out.tokens[0].kind, TokenKind::Question);
    assert_eq!(out.messages, vec!["invalid character syntax; use ?\\s"]);
}

#[test]
fn ternary_after_value() {
    let out = lex_with("x ? 1 : 2", |lexer| lexer.locals_mut().declare("x"));
    assert_eq!(
        out.kinds(),
        vec![
            TokenKind::Identifier,
            TokenKind::Question,
            TokenKind::Integer,
            TokenKind::Colon,
            TokenKind::Integer,
        ]
    );
}

// === Heredocs ===

#[test]
fn squiggly_heredoc_reports_dedent_width() {
    let src = "x = <<~EOS\n  a\n    b\nEOS\n";
    let out = lex(src);
    let contents: Vec<&str> = out
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::StringContent)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(contents, vec!["  a\n", "    b\n"]);
    assert_eq!(out.first(TokenKind::StringEnd).value, TokenValue::Dedent(2));
    assert_eq!(out.tokens.last().map(|t| t.kind), Some(TokenKind::Newline));
    assert_eq!(out.recorder.source_text(), src);
}

#[test]
fn heredoc_resumes_introducing_line() {
    let src = "foo(<<A, 1)\nbody\nA\nbar\n";
    let out = lex(src);
    let kinds = out.kinds();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::ParenCall,
            TokenKind::StringBeg,
            TokenKind::StringContent,
            TokenKind::StringEnd,
            TokenKind::Comma,
            TokenKind::Integer,
            TokenKind::RParen,
            TokenKind::Newline,
            TokenKind::Identifier,
            TokenKind::Newline,
        ]
    );
    assert_eq!(out.first(TokenKind::StringContent).text, "body\n");
    assert_eq!(out.recorder.source_text(), src);
    let events: Vec<&str> = out.recorder.pairs().into_iter().map(|(e, _)| e).collect();
    assert!(events.contains(&"heredoc_beg"));
    assert!(events.contains(&"heredoc_end"));
}

#[test]
fn raw_heredoc_keeps_escapes() {
    let out = lex("<<-'EOS'\na\\n\n  EOS\n");
    assert_eq!(bytes(out.first(TokenKind::StringContent)), b"a\\n\n");
}

#[test]
fn unterminated_heredoc() {
    let out = lex("<<EOS\nabc\n");
    assert_eq!(
        out.messages,
        vec!["can't find string \"EOS\" anywhere before EOF"]
    );
}

#[test]
fn dedent_string_counts_columns() {
    let mut piece = b"    b\n".to_vec();
    assert_eq!(dedent_string(&mut piece, 2), 2);
    assert_eq!(piece, b"  b\n");

    let mut tabbed = b"\tb".to_vec();
    assert_eq!(dedent_string(&mut tabbed, 4), 0);
    assert_eq!(dedent_string(&mut tabbed, 8), 1);
    assert_eq!(tabbed, b"b");
}

// === Comments and layout ===

#[test]
fn frozen_string_literal_magic_comment() {
    let out = lex("# frozen_string_literal: true\nx\n");
    assert_eq!(out.magic.frozen_string_literal, Some(true));
    assert!(out.messages.is_empty());
}

#[test]
fn magic_comment_after_tokens_is_ignored() {
    let out = lex("x\n# frozen_string_literal: true\n");
    assert_eq!(out.magic.frozen_string_literal, None);
    assert_eq!(
        out.messages,
        vec!["`frozen_string_literal' is ignored after any tokens"]
    );
}

#[test]
fn emacs_and_vim_coding_comments() {
    assert_eq!(
        lex("# -*- coding: us-ascii -*-\nx\n").encoding,
        SourceEncoding::UsAscii
    );
    assert_eq!(
        lex("# vim: set fileencoding=euc-jp :\nx\n").encoding,
        SourceEncoding::EucJp
    );
    let out = lex("# encoding: klingon\n");
    assert_eq!(out.messages, vec!["unknown encoding name: klingon"]);
}

#[test]
fn embedded_document() {
    let out = lex("=begin\nfoo\n=end\nx\n");
    assert_eq!(
        out.recorder.pairs()[..3],
        [
            ("embdoc_beg", "=begin\n"),
            ("embdoc", "foo\n"),
            ("embdoc_end", "=end\n"),
        ]
    );
    assert_eq!(out.tokens[0].kind, TokenKind::Identifier);
}

#[test]
fn end_marker_carries_rest_of_input() {
    let src = "x\n__END__\ndata\n";
    let out = lex(src);
    assert_eq!(out.kinds(), vec![TokenKind::Identifier, TokenKind::Newline]);
    assert_eq!(out.recorder.source_text(), src);
    assert!(out
        .recorder
        .pairs()
        .contains(&("__end__", "__END__\ndata\n")));
}

#[test]
fn newline_before_leading_dot_is_ignored() {
    let out = lex("a\n  .b\n");
    assert_eq!(
        out.kinds(),
        vec![
            TokenKind::Identifier,
            TokenKind::Period,
            TokenKind::Identifier,
            TokenKind::Newline,
        ]
    );
}

#[test]
fn comment_newline_is_part_of_comment() {
    let src = "x # note\ny\n";
    let out = lex(src);
    assert_eq!(out.recorder.source_text(), src);
    assert!(out.recorder.pairs().contains(&("comment", "# note\n")));
}
