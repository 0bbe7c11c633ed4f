//! Recursive descent grammar driver for Ruby.
//!
//! The parser never builds a tree. It pulls tokens from a [`Lexer`] one at a
//! time, and every time a production completes it calls the sink through
//! [`Lexer::dispatch`] with the production's event and the handles of its
//! parts. What the handles mean is up to the sink: a
//! [`TraceBuilder`](rip_ir::trace::TraceBuilder) records an s-expression, a
//! [`NoopSink`](rip_ir::NoopSink) just validates.
//!
//! Ruby cannot be tokenized ahead of parsing, so the driver keeps exactly one
//! token of lookahead and makes its hand-offs to the lexer before the next
//! token is scanned:
//!
//! - local variables are declared while the `=` is the lookahead, so the
//!   right-hand side already sees them
//! - `#{...}` is bracketed by [`Lexer::checkpoint`]/[`Lexer::restore`]
//! - `while`/`until`/`for` headers push the condition bit so their `do` is
//!   told apart from a block's
//! - command arguments push the command-argument bit so a trailing `do`
//!   binds to the command
//!
//! The first syntax error is reported as a `parse_error` diagnostic and ends
//! the parse; see [`ParseOutcome`].

mod cursor;
mod error;
mod grammar;
mod operand;
mod outcome;
mod stack;

#[cfg(test)]
mod tests;

pub use outcome::{ParseOptions, ParseOutcome};

use rip_diagnostic::ErrorGuaranteed;
use rip_ir::{Dispatch, Token};
use rip_lexer::Lexer;
use rip_lexer_core::{SourceReader, StrSource};
use tracing::debug;

/// Result of a production: the error is already reported.
pub(crate) type PResult<T> = Result<T, ErrorGuaranteed>;

/// Grammar driver over one source unit.
pub struct Parser<'a, R> {
    lexer: Lexer<'a, R>,
    /// The lookahead token.
    current: Token,
    /// A primary parsed ahead of the expression chain (a string literal
    /// that turned out not to be a label), consumed by the next primary.
    pending: Option<operand::Operand>,
}

impl<'a, R: SourceReader> Parser<'a, R> {
    pub fn new(reader: R, sink: &'a mut dyn Dispatch, options: ParseOptions) -> Self {
        let mut lexer = Lexer::new(reader, sink, options.lexer);
        let current = lexer.next_token();
        Parser {
            lexer,
            current,
            pending: None,
        }
    }

    /// Parse the whole program.
    pub fn parse(mut self) -> ParseOutcome {
        let root = match self.parse_program() {
            Ok(root) => Some(root),
            Err(_) => {
                debug!(line = self.current.pos.line, "parse stopped at syntax error");
                None
            }
        };
        ParseOutcome::from_lexer(root, &mut self.lexer)
    }

    pub fn lexer(&self) -> &Lexer<'a, R> {
        &self.lexer
    }
}

/// Parse `src` with default options.
pub fn parse(src: &str, sink: &mut dyn Dispatch) -> ParseOutcome {
    parse_with(StrSource::new(src), sink, ParseOptions::default())
}

/// Parse everything `reader` supplies.
pub fn parse_with<R: SourceReader>(
    reader: R,
    sink: &mut dyn Dispatch,
    options: ParseOptions,
) -> ParseOutcome {
    Parser::new(reader, sink, options).parse()
}
