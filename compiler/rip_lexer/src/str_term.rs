//! Active literal terminators.
//!
//! At most one [`StrTerm`] is active at a time. While it is, every scan
//! step goes to the quote or heredoc scanner instead of the main dispatch.

use bitflags::bitflags;
use rip_lexer_core::LineBuffer;

bitflags! {
    /// How a literal's body is scanned.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct StrFunc: u16 {
        /// Keep backslashes in the cooked value (regexp).
        const ESCAPE = 0x01;
        /// Process escapes and interpolation.
        const EXPAND = 0x02;
        const REGEXP = 0x04;
        /// Whitespace-separated word list.
        const QWORDS = 0x08;
        const SYMBOL = 0x10;
        /// Heredoc whose terminator may be indented.
        const INDENT = 0x20;
        /// A closing quote followed by `:` makes a label.
        const LABEL = 0x40;
        /// A word list that has not yet emitted its leading separator.
        const LIST = 0x4000;
        /// The terminator was already seen; the next step closes the literal.
        const TERM = 0x8000;
    }
}

impl StrFunc {
    pub const SQUOTE: StrFunc = StrFunc::empty();
    pub const DQUOTE: StrFunc = StrFunc::EXPAND;
    pub const XQUOTE: StrFunc = StrFunc::EXPAND;
    pub const REGEXP_LIT: StrFunc = StrFunc::REGEXP.union(StrFunc::ESCAPE).union(StrFunc::EXPAND);
    pub const SWORD: StrFunc = StrFunc::QWORDS.union(StrFunc::LIST);
    pub const DWORD: StrFunc = StrFunc::QWORDS.union(StrFunc::EXPAND).union(StrFunc::LIST);
    pub const SSYM: StrFunc = StrFunc::SYMBOL;
    pub const DSYM: StrFunc = StrFunc::SYMBOL.union(StrFunc::EXPAND);
}

/// A quoted literal: `'`, `"`, `` ` ``, `/`, `:"`, or a `%` form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteTerm {
    pub func: StrFunc,
    /// Closing delimiter.
    pub term: u8,
    /// Opening delimiter when it differs from `term` (`(` for `%(...)`), else 0.
    pub paren: u8,
    /// Depth of unmatched `paren` occurrences inside the body.
    pub nest: u32,
}

impl QuoteTerm {
    pub fn new(func: StrFunc, term: u8, paren: u8) -> Self {
        QuoteTerm {
            func,
            term,
            paren,
            nest: 0,
        }
    }
}

/// A heredoc body in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeredocTerm {
    /// The terminator word.
    pub id: Vec<u8>,
    pub func: StrFunc,
    /// `<<~`: strip common indentation.
    pub squiggly: bool,
    /// The line that introduced the heredoc, positioned right after the
    /// identifier. Scanning resumes here once the body is consumed.
    pub resume: LineBuffer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrTerm {
    Quote(QuoteTerm),
    Heredoc(HeredocTerm),
}

impl StrTerm {
    pub fn func(&self) -> StrFunc {
        match self {
            StrTerm::Quote(q) => q.func,
            StrTerm::Heredoc(h) => h.func,
        }
    }
}
