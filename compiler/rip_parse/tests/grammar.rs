//! Public API of the parser, and properties over generated programs.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rip_diagnostic::Severity;
use rip_ir::trace::TraceBuilder;
use rip_ir::{DiagnosticEvent, NoopSink};
use rip_lexer_core::{ReaderSource, SourceEncoding, StrSource};
use rip_parse::{parse, parse_with, ParseOptions};

// -- Entry points --

#[test]
fn parse_renders_program() {
    let mut trace = TraceBuilder::new();
    let outcome = parse("x = 1\n", &mut trace);
    assert!(outcome.is_clean());
    assert_eq!(
        trace.sexp(outcome.root.unwrap()),
        r#"[:program, [:stmts_add, [:stmts_new], [:assign, [:var_field, [:@ident, "x", [1, 0]]], [:@int, "1", [1, 4]]]]]"#
    );
}

#[test]
fn reader_source_matches_string_source() {
    let src = "def greet(name)\n  puts \"hi #{name}\"\nend\ngreet 'bob'\n";
    let mut from_str = TraceBuilder::new();
    let a = parse_with(StrSource::new(src), &mut from_str, ParseOptions::default());
    let mut from_reader = TraceBuilder::new();
    let b = parse_with(
        ReaderSource::new(src.as_bytes()),
        &mut from_reader,
        ParseOptions::default(),
    );
    assert!(a.is_clean() && b.is_clean());
    assert_eq!(
        from_str.sexp(a.root.unwrap()),
        from_reader.sexp(b.root.unwrap())
    );
}

#[test]
fn noop_sink_still_reports_errors() {
    let outcome = parse("foo(", &mut NoopSink);
    assert!(outcome.root.is_none());
    assert!(outcome.errored);
    assert_eq!(
        outcome.messages(),
        vec!["syntax error, unexpected end-of-input"]
    );
}

#[test]
fn empty_source_is_an_empty_program() {
    let mut trace = TraceBuilder::new();
    let outcome = parse("", &mut trace);
    assert!(outcome.is_clean());
    assert_eq!(
        trace.sexp(outcome.root.unwrap()),
        "[:program, [:stmts_add, [:stmts_new], [:void_stmt]]]"
    );
}

// -- Options and outcome --

#[test]
fn with_filename_reaches_lexer_options() {
    let options = ParseOptions::default().with_filename("lib/app.rb");
    assert_eq!(options.lexer.filename, "lib/app.rb");
}

#[test]
fn quiet_parse_drops_verbose_warnings() {
    let src = "a = 1\n[1].each { |a| a }\n";
    let loud = parse(src, &mut NoopSink);
    assert!(loud
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Warning));

    let options = ParseOptions::default().with_verbose_warnings(false);
    let quiet = parse_with(StrSource::new(src), &mut NoopSink, options);
    assert!(quiet.is_clean());
    assert!(quiet.diagnostics.is_empty());
}

#[test]
fn magic_comments_surface_in_outcome() {
    let outcome = parse(
        "# -*- coding: us-ascii -*-\n# frozen_string_literal: true\nx = 'a'\n",
        &mut NoopSink,
    );
    assert!(outcome.is_clean());
    assert_eq!(outcome.encoding, SourceEncoding::UsAscii);
    assert_eq!(outcome.magic.frozen_string_literal, Some(true));
}

#[test]
fn lexical_error_keeps_the_tree() {
    let mut trace = TraceBuilder::new();
    let outcome = parse("x = 0b12\n", &mut trace);
    assert!(outcome.root.is_some());
    assert!(outcome.errored);
    assert!(!outcome.is_clean());
}

#[test]
fn diagnostics_are_dispatched_to_the_sink() {
    let mut trace = TraceBuilder::new();
    let outcome = parse("class foo; end\n", &mut trace);
    assert!(outcome.errored);
    let recorded: Vec<&str> = trace.diagnostics().iter().map(|d| d.event.name()).collect();
    assert!(recorded.contains(&"class_name_error"), "{recorded:?}");
}

// -- Strategies --

fn identifier() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_][a-z0-9_]{0,6}[?!]?")
        .expect("valid regex")
        .prop_filter("not a keyword", |s| {
            rip_lexer::lookup_keyword(s.as_bytes()).is_none()
        })
        .prop_filter("not a numbered parameter", |s| {
            !(s.starts_with('_') && s[1..].starts_with(|c: char| c.is_ascii_digit()))
        })
}

fn bare_identifier() -> impl Strategy<Value = String> {
    identifier()
        .prop_map(|s| s.trim_end_matches(['?', '!']).to_owned())
        .prop_filter("not a keyword", |s| {
            rip_lexer::lookup_keyword(s.as_bytes()).is_none()
        })
}

fn operand() -> impl Strategy<Value = String> {
    prop_oneof![
        identifier(),
        prop::string::string_regex("[A-Z][a-zA-Z0-9]{0,6}").expect("valid regex"),
        (0u32..100_000).prop_map(|n| n.to_string()),
        (0u32..1000, 0u32..1000).prop_map(|(a, b)| format!("{a}.{b}")),
        prop::string::string_regex("[a-z ]{0,8}")
            .expect("valid regex")
            .prop_map(|s| format!("\"{s}\"")),
        bare_identifier().prop_map(|s| format!(":{s}")),
        bare_identifier().prop_map(|s| format!("@{s}")),
        bare_identifier().prop_map(|s| format!("\"a#{{{s}}}b\"")),
        Just("[1, 2]".to_owned()),
        Just("{a: 1}".to_owned()),
        Just("%w(x y)".to_owned()),
        Just("foo(1)".to_owned()),
        Just("a.b&.c".to_owned()),
        Just("(1 + 2)".to_owned()),
        Just("-> { 1 }".to_owned()),
        Just("[1].map { |v| v * 2 }".to_owned()),
    ]
}

fn operator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        " + ", " - ", " * ", " / ", " ** ", " && ", " || ", " << ", " < ", " >= ", " % ", " | ",
        " & ",
    ])
}

fn expression() -> impl Strategy<Value = String> {
    (operand(), prop::collection::vec((operator(), operand()), 0..4)).prop_map(|(first, rest)| {
        let mut out = first;
        for (op, operand) in rest {
            out.push_str(op);
            out.push_str(&operand);
        }
        out
    })
}

fn statement() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => expression(),
        1 => (bare_identifier(), expression()).prop_map(|(name, value)| format!("{name} = {value}")),
        1 => (expression(), expression()).prop_map(|(cond, body)| format!("if {cond}\n  {body}\nend")),
        1 => (expression(), expression()).prop_map(|(value, cond)| format!("{value} unless {cond}")),
        1 => (bare_identifier(), expression()).prop_map(|(name, body)| format!("def {name}(a, b = 1)\n  {body}\nend")),
    ]
}

fn layout() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["\n", "; ", "\n\n", " # note\n", "\r\n", "\n  "])
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec((statement(), layout()), 1..8).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(stmt, sep)| format!("{stmt}{sep}"))
            .collect()
    })
}

fn token_soup() -> impl Strategy<Value = String> {
    let pieces = prop::sample::select(vec![
        "foo", "Bar", "1", " ", "\n", "(", ")", "[", "]", "{", "}", "|", ",", ".", "=", "+", "-",
        "*", "**", "&", "->", "=>", "?", ":", "::", ";", "a:", ":sym", "\"s\"", "do", "end", "if",
        "unless", "while", "def", "class", "module", "case", "when", "in", "begin", "rescue",
        "return", "yield", "not", "and",
    ]);
    prop::collection::vec(pieces, 0..40).prop_map(|parts| parts.concat())
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Well-formed programs parse without errors.
    #[test]
    fn prop_fragments_parse_cleanly(src in program()) {
        let outcome = parse(&src, &mut NoopSink);
        prop_assert!(outcome.is_clean(), "{src:?}: {:?}", outcome.messages());
    }

    /// Scanner events of a full parse reproduce the source.
    #[test]
    fn prop_trace_covers_source(src in program()) {
        let mut trace = TraceBuilder::new();
        parse(&src, &mut trace);
        prop_assert_eq!(trace.scanned_text(), src);
    }

    /// Every parse ends with either a tree or a reported error.
    #[test]
    fn prop_soup_terminates(src in token_soup()) {
        let mut trace = TraceBuilder::new();
        let outcome = parse(&src, &mut trace);
        prop_assert!(outcome.root.is_some() || outcome.errored);
    }

    /// A syntax error is reported at most once.
    #[test]
    fn prop_single_parse_error(src in token_soup()) {
        let outcome = parse(&src, &mut NoopSink);
        let parse_errors = outcome
            .diagnostics
            .iter()
            .filter(|d| d.event == DiagnosticEvent::ParseError)
            .count();
        prop_assert!(parse_errors <= 1);
    }
}
