//! Parser tests.
//!
//! - `parser`: statements, expressions, calls, literals, control flow,
//!   definitions, and syntax errors
//! - `patterns`: `case`/`in` patterns

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod patterns;

use std::sync::Once;

use rip_ir::trace::TraceBuilder;
use rip_ir::NodeHandle;

use crate::{parse, parse_with, ParseOptions, ParseOutcome};
use rip_lexer_core::StrSource;

static TRACING_INIT: Once = Once::new();

/// Route parser logs to the test output when `RUST_LOG` is set, e.g.
/// `RUST_LOG=rip_parse=debug`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_test_writer().with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// A finished parse with its recorded trace.
pub(super) struct Traced {
    pub(super) trace: TraceBuilder,
    pub(super) outcome: ParseOutcome,
}

impl Traced {
    /// Rendered tree of the whole program.
    pub(super) fn sexp(&self) -> String {
        self.trace.sexp(self.outcome.root.unwrap_or(NodeHandle::NONE))
    }

    pub(super) fn events(&self) -> Vec<&'static str> {
        self.trace.parser_event_names()
    }

    pub(super) fn has_event(&self, name: &str) -> bool {
        self.events().contains(&name)
    }

    pub(super) fn messages(&self) -> Vec<&str> {
        self.outcome.messages()
    }
}

pub(super) fn trace(src: &str) -> Traced {
    init_tracing();
    let mut trace = TraceBuilder::new();
    let outcome = parse(src, &mut trace);
    Traced { trace, outcome }
}

pub(super) fn trace_quiet(src: &str) -> Traced {
    init_tracing();
    let mut trace = TraceBuilder::new();
    let options = ParseOptions::default().with_verbose_warnings(false);
    let outcome = parse_with(StrSource::new(src), &mut trace, options);
    Traced { trace, outcome }
}

/// Parse `src`, which must be free of errors, and render the program.
pub(super) fn sexp(src: &str) -> String {
    let traced = trace(src);
    assert!(
        traced.outcome.is_clean(),
        "{src:?} did not parse cleanly: {:?}",
        traced.messages()
    );
    traced.sexp()
}

/// The program wrapper around a single statement.
pub(super) fn program(stmt: &str) -> String {
    format!("[:program, [:stmts_add, [:stmts_new], {stmt}]]")
}
