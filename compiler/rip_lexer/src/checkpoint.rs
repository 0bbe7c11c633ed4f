//! Re-entry bracketing for interpolation.
//!
//! The grammar driver scans `#{...}` by recursively parsing statements
//! with the same lexer. Before recursing it takes a [`Checkpoint`] and
//! resets the lexer to expression-start state; after consuming the closing
//! `}` it restores the checkpoint, and scanning resumes inside the literal.

use rip_ir::LexState;
use tracing::debug;

use crate::state::{BitStack, LexerState};
use crate::str_term::StrTerm;

/// Snapshot of the state an interpolation must not disturb.
#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    pub(crate) str_term: Option<StrTerm>,
    pub(crate) lex_state: LexState,
    pub(crate) paren_nest: i32,
    pub(crate) brace_nest: i32,
    pub(crate) cond: BitStack,
    pub(crate) cmdarg: BitStack,
    pub(crate) in_kwarg: bool,
    pub(crate) heredoc_indent: i32,
    pub(crate) heredoc_line_indent: i32,
}

impl Checkpoint {
    pub(crate) fn capture(st: &LexerState) -> Self {
        Checkpoint {
            str_term: st.str_term.clone(),
            lex_state: st.lex_state,
            paren_nest: st.paren_nest,
            brace_nest: st.brace_nest,
            cond: st.cond,
            cmdarg: st.cmdarg,
            in_kwarg: st.in_kwarg,
            heredoc_indent: st.heredoc_indent,
            heredoc_line_indent: st.heredoc_line_indent,
        }
    }

    pub(crate) fn apply(self, st: &mut LexerState) {
        st.str_term = self.str_term;
        st.lex_state = self.lex_state;
        st.paren_nest = self.paren_nest;
        st.brace_nest = self.brace_nest;
        st.cond = self.cond;
        st.cmdarg = self.cmdarg;
        st.in_kwarg = self.in_kwarg;
        st.heredoc_indent = self.heredoc_indent;
        st.heredoc_line_indent = self.heredoc_line_indent;
    }

    pub fn lex_state(&self) -> LexState {
        self.lex_state
    }

    /// True if a literal was active when the checkpoint was taken.
    pub fn in_literal(&self) -> bool {
        self.str_term.is_some()
    }
}

impl LexerState {
    /// Reset for scanning the statements of a `#{...}`.
    pub(crate) fn enter_interpolation(&mut self) {
        debug!(paren_nest = self.paren_nest, "enter interpolation");
        self.str_term = None;
        self.lex_state = LexState::BEG;
        self.brace_nest = 0;
        self.cond.push(false);
        self.cmdarg.push(false);
        self.heredoc_indent = 0;
        self.in_kwarg = false;
        self.command_start = true;
    }

    /// Reset for scanning the single variable after `#@` or `#$`.
    pub(crate) fn enter_embedded_var(&mut self) {
        self.str_term = None;
        self.lex_state = LexState::BEG;
    }
}
