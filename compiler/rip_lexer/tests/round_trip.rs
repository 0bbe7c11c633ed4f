//! Property tests: the scanner events of a run reproduce the source.
//!
//! Sources are generated as soups of well-formed Ruby fragments joined by
//! layout, so every byte is scannable and no fragment halts the lexer.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use rip_ir::trace::TokenRecorder;
use rip_ir::TokenKind;
use rip_lexer::{tokenize, tokenize_with, LexerOptions};

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

fn operand() -> impl Strategy<Value = String> {
    prop_oneof![
        identifier(),
        prop::string::string_regex("[A-Z][a-zA-Z0-9]{0,6}").expect("valid regex"),
        (0u32..100_000).prop_map(|n| n.to_string()),
        (0u32..1000, 0u32..1000).prop_map(|(a, b)| format!("{a}.{b}")),
        (0u32..0xffff).prop_map(|n| format!("0x{n:x}")),
        prop::string::string_regex("[a-z ]{0,8}")
            .expect("valid regex")
            .prop_map(|s| format!("\"{s}\"")),
        prop::string::string_regex("[a-z ]{0,8}")
            .expect("valid regex")
            .prop_map(|s| format!("'{s}'")),
        identifier().prop_map(|s| format!(":{}", s.trim_end_matches(['?', '!']))),
        identifier().prop_map(|s| format!("@{}", s.trim_end_matches(['?', '!']))),
        identifier().prop_map(|s| format!("\"a#{{{s}}}b\"")),
        Just("[1, 2]".to_owned()),
        Just("{a: 1}".to_owned()),
        Just("%w(x y)".to_owned()),
        Just("foo(1)".to_owned()),
        Just("a.b&.c".to_owned()),
        Just("?z".to_owned()),
    ]
}

fn operator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        " + ", " - ", " * ", " / ", " ** ", " == ", " != ", " <=> ", " && ", " || ", " .. ",
        " << ", " < ", " >= ", " % ", " =~ ",
    ])
}

fn statement() -> impl Strategy<Value = String> {
    (operand(), prop::collection::vec((operator(), operand()), 0..4)).prop_map(|(first, rest)| {
        let mut out = first;
        for (op, operand) in rest {
            out.push_str(op);
            out.push_str(&operand);
        }
        out
    })
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

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Concatenated scanner-event text is the input.
    #[test]
    fn prop_round_trip(src in program()) {
        let mut recorder = TokenRecorder::new();
        tokenize_with(&src, &mut recorder, LexerOptions::default());
        prop_assert_eq!(recorder.source_text(), src);
    }

    /// Event offsets never go backwards once sorted, and never overlap.
    #[test]
    fn prop_events_tile_the_source(src in program()) {
        let mut recorder = TokenRecorder::new();
        tokenize_with(&src, &mut recorder, LexerOptions::default());
        let mut next = 0;
        for entry in recorder.entries() {
            prop_assert_eq!(entry.at.offset, next);
            next += entry.text.len() as u32;
        }
    }

    /// Well-formed fragments scan without errors.
    #[test]
    fn prop_fragments_are_clean(src in program()) {
        let out = tokenize(&src);
        prop_assert!(!out.errored, "{:?}", out.diagnostics);
    }

    /// Arbitrary input terminates without panicking.
    #[test]
    fn prop_never_panics(src in "[ -~\n\t]{0,64}") {
        let out = tokenize(&src);
        prop_assert!(out.tokens.iter().all(|t| t.kind != TokenKind::EndOfInput));
    }
}
