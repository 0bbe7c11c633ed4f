//! The carried-forward scanner state.
//!
//! [`LexerState`] is everything that survives from one token to the next:
//! the [`LexState`] mask, the nesting counters, the two bit stacks, the
//! squiggly-heredoc indentation trackers, and the active literal
//! terminator. The predicates here mirror the questions every
//! disambiguation rule asks ("is this a value position?", "did whitespace
//! separate an argument?").

#[cfg(test)]
mod tests;

use rip_ir::LexState;

use crate::str_term::StrTerm;

/// A stack of booleans packed into one word.
///
/// Depth beyond 64 drops the oldest entries; only the top few matter for
/// disambiguation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitStack(u64);

impl BitStack {
    #[inline]
    pub const fn new() -> Self {
        BitStack(0)
    }

    #[inline]
    pub fn push(&mut self, bit: bool) {
        self.0 = (self.0 << 1) | u64::from(bit);
    }

    #[inline]
    pub fn pop(&mut self) {
        self.0 >>= 1;
    }

    /// Value on top of the stack.
    #[inline]
    pub const fn top(self) -> bool {
        self.0 & 1 != 0
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }
}

/// Sentinel for "no squiggly heredoc line measured yet".
pub(crate) const INDENT_UNSET: i32 = i32::MAX;

/// Scanner state owned by one lexer.
#[derive(Clone, Debug, PartialEq)]
pub struct LexerState {
    pub lex_state: LexState,
    /// Unmatched `(`, `[`, `{` depth.
    pub paren_nest: i32,
    /// Unmatched `{` depth inside the current interpolation.
    pub brace_nest: i32,
    /// `paren_nest` at which a `->` lambda's body brace is expected, or -1.
    pub lpar_beg: i32,
    /// Top is set while scanning a `while`/`until`/`for` condition.
    pub cond: BitStack,
    /// Top is set while scanning command arguments.
    pub cmdarg: BitStack,
    pub command_start: bool,
    /// Set while a pattern or unparenthesized keyword parameters are
    /// scanned: a newline right after a label then ends them.
    pub in_kwarg: bool,
    /// Minimum indentation seen in a squiggly heredoc, 0 outside one.
    pub heredoc_indent: i32,
    /// Indentation counted so far on the current heredoc line; -1 once a
    /// non-blank byte was seen.
    pub heredoc_line_indent: i32,
    pub str_term: Option<StrTerm>,
}

impl LexerState {
    pub fn new(command_start: bool) -> Self {
        LexerState {
            lex_state: LexState::BEG,
            paren_nest: 0,
            brace_nest: 0,
            lpar_beg: -1,
            cond: BitStack::new(),
            cmdarg: BitStack::new(),
            command_start,
            in_kwarg: false,
            heredoc_indent: 0,
            heredoc_line_indent: 0,
            str_term: None,
        }
    }

    #[inline]
    pub fn set(&mut self, state: LexState) {
        self.lex_state = state;
    }

    #[inline]
    pub const fn is(&self, mask: LexState) -> bool {
        self.lex_state.is(mask)
    }

    #[inline]
    pub const fn has_all(&self, mask: LexState) -> bool {
        self.lex_state.has_all(mask)
    }

    /// Value-start position: an operand may begin here.
    #[inline]
    pub const fn is_beg(&self) -> bool {
        self.is(LexState::BEG_ANY) || self.has_all(LexState::ARG.union(LexState::LABELED))
    }

    #[inline]
    pub const fn is_end(&self) -> bool {
        self.is(LexState::END_ANY)
    }

    #[inline]
    pub const fn is_arg(&self) -> bool {
        self.is(LexState::ARG_ANY)
    }

    /// Directly after `def`, `.`, `::`, or another method-name position.
    #[inline]
    pub const fn is_after_operator(&self) -> bool {
        self.is(LexState::FNAME.union(LexState::DOT))
    }

    /// An argument that was separated from the method name by whitespace
    /// and is not itself followed by whitespace (`foo -1`, `foo *a`).
    #[inline]
    pub fn is_spcarg(&self, space_seen: bool, next: Option<u8>) -> bool {
        self.is_arg() && space_seen && !next.is_some_and(is_space)
    }

    pub fn is_label_possible(&self, cmd_state: bool) -> bool {
        (self.is(LexState::LABEL.union(LexState::ENDFN)) && !cmd_state) || self.is_arg()
    }

    #[inline]
    pub fn lambda_beginning(&self) -> bool {
        self.lpar_beg == self.paren_nest
    }

    #[inline]
    pub fn cond_p(&self) -> bool {
        self.cond.top()
    }

    #[inline]
    pub fn cmdarg_p(&self) -> bool {
        self.cmdarg.top()
    }

    /// Push a fresh nesting level: one more open bracket.
    pub(crate) fn open_nest(&mut self) {
        self.paren_nest += 1;
        self.cond.push(false);
        self.cmdarg.push(false);
    }

    pub(crate) fn close_nest(&mut self) {
        self.paren_nest -= 1;
        self.cond.pop();
        self.cmdarg.pop();
    }

    #[inline]
    pub fn in_squiggly_heredoc(&self) -> bool {
        self.heredoc_indent > 0
    }
}

/// Whitespace as the scanner sees it (space, `\t`, `\n`, `\v`, `\f`, `\r`).
#[inline]
pub(crate) fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// A byte that may continue an identifier. Non-ASCII bytes count, so
/// multibyte identifiers scan as one run.
#[inline]
pub(crate) fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || !b.is_ascii()
}
