//! Diagnostics for the Ruby event-trace front end.
//!
//! Every warning and error the lexer or grammar driver reports becomes a
//! [`Diagnostic`] tagged with the [`DiagnosticEvent`](rip_ir::DiagnosticEvent)
//! it is dispatched under. The [`DiagnosticQueue`] collects them and owns the
//! sticky "errored" flag: once any error is recorded the flag stays set for
//! the rest of the parse, even though scanning continues.
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is proof that an error was recorded. The grammar
//! driver threads it through `Result` so a failed production cannot be
//! mistaken for one that silently produced nothing.

mod diagnostic;
mod guarantee;
pub mod queue;

pub use diagnostic::{Diagnostic, Severity};
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
