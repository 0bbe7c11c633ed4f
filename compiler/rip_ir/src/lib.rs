//! Shared data model for the Ruby event-trace front end.
//!
//! Everything the lexer, the grammar driver, and external consumers agree on
//! lives here:
//!
//! - [`Span`] and [`LineCol`] source locations
//! - [`LexState`], the carried-forward "what may follow" bitmask
//! - [`TokenKind`] / [`Token`], the lexer's output
//! - the event vocabulary ([`ScannerEvent`], [`ParserEvent`], [`DiagnosticEvent`])
//!   with its fixed name/arity table
//! - the [`Dispatch`] contract and two reference sinks in [`trace`]
//!
//! The event table is the stable wire format: names and arities must not
//! change without a corresponding change in every consumer.

mod dispatch;
mod event;
mod lex_state;
mod span;
mod token;
pub mod trace;

pub use dispatch::{Arg, Dispatch, EventPos, NodeHandle, NoopSink};
pub use event::{DiagnosticEvent, Event, ParserEvent, ScannerEvent};
pub use lex_state::LexState;
pub use span::{LineCol, Span};
pub use token::{Token, TokenKind, TokenValue};
