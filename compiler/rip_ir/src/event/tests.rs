use super::*;
use rustc_hash::FxHashSet;

#[test]
fn scanner_events_are_unary() {
    for ev in ScannerEvent::ALL {
        assert_eq!(ev.arity(), 1, "{}", ev.name());
    }
}

#[test]
fn event_names_are_unique_across_families() {
    let mut seen = FxHashSet::default();
    for ev in ScannerEvent::ALL {
        assert!(seen.insert(ev.name()), "duplicate name {}", ev.name());
    }
    for ev in ParserEvent::ALL {
        assert!(seen.insert(ev.name()), "duplicate name {}", ev.name());
    }
}

#[test]
fn names_round_trip_through_lookup() {
    for ev in ScannerEvent::ALL {
        assert_eq!(ScannerEvent::from_name(ev.name()), Some(*ev));
    }
    for ev in ParserEvent::ALL {
        assert_eq!(ParserEvent::from_name(ev.name()), Some(*ev));
    }
    assert_eq!(ParserEvent::from_name("no_such_event"), None);
}

#[test]
fn representative_arities() {
    assert_eq!(ParserEvent::Program.arity(), 1);
    assert_eq!(ParserEvent::Binary.arity(), 3);
    assert_eq!(ParserEvent::Params.arity(), 7);
    assert_eq!(ParserEvent::Defs.arity(), 5);
    assert_eq!(ParserEvent::Bodystmt.arity(), 4);
    assert_eq!(ParserEvent::StmtsNew.arity(), 0);
    assert_eq!(ParserEvent::HeredocDedent.arity(), 2);
}

#[test]
fn event_wrapper_delegates() {
    let ev: Event = ParserEvent::Binary.into();
    assert_eq!(ev.name(), "binary");
    assert_eq!(ev.arity(), 3);
    assert!(!ev.is_scanner());
    let ev: Event = ScannerEvent::End.into();
    assert_eq!(ev.to_string(), "__end__");
    assert!(ev.is_scanner());
}

#[test]
fn diagnostic_event_error_classes() {
    assert!(DiagnosticEvent::CompileError.is_error());
    assert!(DiagnosticEvent::ParseError.is_error());
    assert!(!DiagnosticEvent::Warn.is_error());
    assert!(!DiagnosticEvent::OperatorAmbiguous.is_error());
    assert_eq!(DiagnosticEvent::OperatorAmbiguous.name(), "operator_ambiguous");
}
