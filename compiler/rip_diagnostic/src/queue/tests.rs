use pretty_assertions::assert_eq;
use rip_ir::{DiagnosticEvent, LineCol, Span};

use super::*;

fn error_at(line: u32, column: u32, message: &str) -> Diagnostic {
    Diagnostic::error(DiagnosticEvent::CompileError)
        .with_message(message)
        .at(Span::DUMMY, LineCol::new(line, column))
}

fn warning_at(line: u32, message: &str) -> Diagnostic {
    Diagnostic::warning(DiagnosticEvent::Warn)
        .with_message(message)
        .at(Span::DUMMY, LineCol::new(line, 0))
}

#[test]
fn warnings_do_not_set_errored() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.push(warning_at(1, "w")));
    assert!(!queue.errored());
    assert!(queue.has_errors().is_none());
}

#[test]
fn errored_is_sticky_across_flush() {
    let mut queue = DiagnosticQueue::new();
    queue.push(error_at(1, 0, "bad"));
    assert!(queue.errored());
    let drained = queue.flush();
    assert_eq!(drained.len(), 1);
    assert!(queue.is_empty());
    assert!(queue.errored());
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn duplicates_are_dropped_but_still_error() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.push(error_at(2, 0, "same")));
    assert!(!queue.push(error_at(2, 4, "same")));
    assert!(queue.push(error_at(3, 0, "same")));
    assert_eq!(queue.len(), 2);
}

#[test]
fn unlimited_config_keeps_duplicates() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.push(error_at(2, 0, "same"));
    queue.push(error_at(2, 0, "same"));
    assert_eq!(queue.len(), 2);
}

#[test]
fn error_limit_filters_but_flag_stays() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 1,
        deduplicate: false,
    });
    assert!(queue.push(error_at(1, 0, "first")));
    assert!(queue.limit_reached());
    assert!(!queue.push(error_at(2, 0, "second")));
    assert!(queue.push(warning_at(3, "warnings still flow")));
    assert_eq!(queue.error_count(), 1);
    assert!(queue.errored());
}

#[test]
fn flush_sorts_by_position() {
    let mut queue = DiagnosticQueue::new();
    queue.push(error_at(5, 0, "late"));
    queue.push(error_at(1, 3, "early"));
    queue.push(warning_at(1, "earliest"));
    let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["earliest", "early", "late"]);
}

#[test]
fn emit_error_returns_proof() {
    let mut queue = DiagnosticQueue::new();
    let proof = queue.emit_error(error_at(1, 0, "boom"));
    assert_eq!(queue.has_errors(), Some(proof));
}

#[test]
fn proof_is_a_std_error() {
    let mut queue = DiagnosticQueue::new();
    let proof = queue.emit_error(error_at(2, 4, "boom"));
    assert_eq!(proof.to_string(), "error already reported");
    let boxed: Box<dyn std::error::Error> = Box::new(proof);
    assert_eq!(boxed.to_string(), "error already reported");
}
