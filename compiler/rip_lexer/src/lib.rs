//! Context-sensitive Ruby lexer.
//!
//! Ruby cannot be tokenized by a regular grammar: whether `-`, `*`, `/`,
//! `?`, `[`, `(` or `{` is an operator, a literal opener, or an argument
//! prefix depends on whitespace and on the grammatical role of the previous
//! token. [`Lexer`] resolves that with a small carried-forward
//! [`LexerState`] and reports every consumed byte to a
//! [`Dispatch`](rip_ir::Dispatch) sink as a scanner event.
//!
//! A grammar driver talks back to the lexer through a narrow surface:
//! [`Lexer::checkpoint`]/[`Lexer::restore`] around `#{...}`, the
//! condition/command-argument bit stacks, the lambda marker, and the
//! [`LocalScopes`] that decide whether `x -1` is a subtraction.
//! [`TokenStream`] plays that role without a grammar.

mod checkpoint;
mod keywords;
mod lex_error;
mod lexer;
mod locals;
mod options;
mod state;
mod str_term;
mod token_stream;

pub use checkpoint::Checkpoint;
pub use keywords::{lookup as lookup_keyword, Keyword, KEYWORDS};
pub use lex_error::{LexError, LexErrorContext, LexErrorKind, LexSuggestion};
pub use lexer::{dedent_string, Lexer, MagicSettings, ShareableConstantValue};
pub use locals::LocalScopes;
pub use options::LexerOptions;
pub use state::{BitStack, LexerState};
pub use str_term::{HeredocTerm, QuoteTerm, StrFunc, StrTerm};
pub use token_stream::{begins_argument, tokenize, tokenize_with, TokenStream, Tokenized};
