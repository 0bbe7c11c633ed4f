use pretty_assertions::assert_eq;

use super::*;
use crate::{LexState, ParserEvent};

fn pos(line: u32, column: u32, offset: u32) -> EventPos {
    EventPos {
        line,
        column,
        offset,
        state: LexState::BEG,
    }
}

fn text(s: &str) -> Arg {
    Arg::Text(s.to_owned())
}

#[test]
fn trace_builder_renders_nested_sexp() {
    let mut trace = TraceBuilder::new();
    let one = trace.dispatch(ScannerEvent::Int.into(), &[text("1")], pos(1, 0, 0));
    let two = trace.dispatch(ScannerEvent::Int.into(), &[text("2")], pos(1, 4, 4));
    let bin = trace.dispatch(
        ParserEvent::Binary.into(),
        &[Arg::node(one), Arg::sym("+"), Arg::node(two)],
        pos(1, 0, 0),
    );
    assert_eq!(
        trace.sexp(bin),
        r#"[:binary, [:@int, "1", [1, 0]], :+, [:@int, "2", [1, 4]]]"#
    );
    assert_eq!(trace.parser_event_names(), vec!["binary"]);
}

#[test]
fn trace_builder_renders_lists_and_nil() {
    let mut trace = TraceBuilder::new();
    let new = trace.dispatch(ParserEvent::StmtsNew.into(), &[], pos(1, 0, 0));
    let root = trace.dispatch(
        ParserEvent::Aryptn.into(),
        &[Arg::Nil, Arg::List(vec![Arg::node(new)]), Arg::Nil, Arg::List(vec![])],
        pos(1, 0, 0),
    );
    assert_eq!(trace.sexp(root), "[:aryptn, nil, [[:stmts_new]], nil, []]");
    assert_eq!(trace.sexp(NodeHandle::NONE), "nil");
}

#[test]
fn scanned_text_follows_source_offsets() {
    let mut trace = TraceBuilder::new();
    trace.dispatch(ScannerEvent::Ident.into(), &[text("b")], pos(1, 2, 2));
    trace.dispatch(ScannerEvent::Ident.into(), &[text("a")], pos(1, 0, 0));
    trace.dispatch(ScannerEvent::Sp.into(), &[text(" ")], pos(1, 1, 1));
    assert_eq!(trace.scanned_text(), "a b");
}

#[test]
fn recorder_ignores_parser_events() {
    let mut rec = TokenRecorder::new();
    let handle = rec.dispatch(ParserEvent::VoidStmt.into(), &[], pos(1, 0, 0));
    assert!(handle.is_none());
    rec.dispatch(ScannerEvent::Comment.into(), &[text("# hi\n")], pos(1, 0, 0));
    assert_eq!(rec.pairs(), vec![("comment", "# hi\n")]);
}

#[test]
fn recorder_keeps_diagnostics() {
    let mut rec = TokenRecorder::new();
    rec.diagnostic(DiagnosticEvent::Warn, "careful", pos(2, 1, 9));
    assert_eq!(rec.diagnostics().len(), 1);
    assert_eq!(rec.diagnostics()[0].event, DiagnosticEvent::Warn);
    assert_eq!(rec.diagnostics()[0].at.line_col(), crate::LineCol::new(2, 1));
}
