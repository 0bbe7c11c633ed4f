//! Reserved words.
//!
//! Each keyword carries the token it produces in statement position, the
//! token it produces in modifier position (the same token for keywords with
//! no modifier form), and the lexer state it leaves behind. The lookup uses
//! the word's length as a first-pass filter (keywords range from 2-12
//! bytes), then matches against the keywords of that length.

#[cfg(test)]
mod tests;

use rip_ir::{LexState, TokenKind};

/// One reserved word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Keyword {
    pub name: &'static str,
    /// Token in statement position.
    pub id: TokenKind,
    /// Token in modifier position.
    pub modifier: TokenKind,
    /// State after the keyword.
    pub state: LexState,
}

impl Keyword {
    #[inline]
    pub fn has_modifier_form(&self) -> bool {
        self.id != self.modifier
    }
}

const fn kw(name: &'static str, id: TokenKind, state: LexState) -> Keyword {
    Keyword {
        name,
        id,
        modifier: id,
        state,
    }
}

const fn kw_mod(name: &'static str, id: TokenKind, modifier: TokenKind, state: LexState) -> Keyword {
    Keyword {
        name,
        id,
        modifier,
        state,
    }
}

const FNAME_FITEM: LexState = LexState::FNAME.union(LexState::FITEM);

/// The full keyword table, in alphabetical order.
pub const KEYWORDS: [Keyword; 41] = [
    kw("__ENCODING__", TokenKind::KwEncoding, LexState::END),
    kw("__LINE__", TokenKind::KwLine, LexState::END),
    kw("__FILE__", TokenKind::KwFile, LexState::END),
    kw("BEGIN", TokenKind::KwPreExe, LexState::END),
    kw("END", TokenKind::KwPostExe, LexState::END),
    kw("alias", TokenKind::KwAlias, FNAME_FITEM),
    kw("and", TokenKind::KwAnd, LexState::VALUE),
    kw("begin", TokenKind::KwBegin, LexState::BEG),
    kw("break", TokenKind::KwBreak, LexState::MID),
    kw("case", TokenKind::KwCase, LexState::VALUE),
    kw("class", TokenKind::KwClass, LexState::CLASS),
    kw("def", TokenKind::KwDef, LexState::FNAME),
    kw("defined?", TokenKind::KwDefined, LexState::ARG),
    kw("do", TokenKind::KwDo, LexState::BEG),
    kw("else", TokenKind::KwElse, LexState::BEG),
    kw("elsif", TokenKind::KwElsif, LexState::VALUE),
    kw("end", TokenKind::KwEnd, LexState::END),
    kw("ensure", TokenKind::KwEnsure, LexState::BEG),
    kw("false", TokenKind::KwFalse, LexState::END),
    kw("for", TokenKind::KwFor, LexState::VALUE),
    kw_mod("if", TokenKind::KwIf, TokenKind::ModIf, LexState::VALUE),
    kw("in", TokenKind::KwIn, LexState::VALUE),
    kw("module", TokenKind::KwModule, LexState::VALUE),
    kw("next", TokenKind::KwNext, LexState::MID),
    kw("nil", TokenKind::KwNil, LexState::END),
    kw("not", TokenKind::KwNot, LexState::ARG),
    kw("or", TokenKind::KwOr, LexState::VALUE),
    kw("redo", TokenKind::KwRedo, LexState::END),
    kw_mod("rescue", TokenKind::KwRescue, TokenKind::ModRescue, LexState::MID),
    kw("retry", TokenKind::KwRetry, LexState::END),
    kw("return", TokenKind::KwReturn, LexState::MID),
    kw("self", TokenKind::KwSelf, LexState::END),
    kw("super", TokenKind::KwSuper, LexState::ARG),
    kw("then", TokenKind::KwThen, LexState::BEG),
    kw("true", TokenKind::KwTrue, LexState::END),
    kw("undef", TokenKind::KwUndef, FNAME_FITEM),
    kw_mod("unless", TokenKind::KwUnless, TokenKind::ModUnless, LexState::VALUE),
    kw_mod("until", TokenKind::KwUntil, TokenKind::ModUntil, LexState::VALUE),
    kw("when", TokenKind::KwWhen, LexState::VALUE),
    kw_mod("while", TokenKind::KwWhile, TokenKind::ModWhile, LexState::VALUE),
    kw("yield", TokenKind::KwYield, LexState::ARG),
];

fn entry(name: &str) -> Option<&'static Keyword> {
    KEYWORDS.iter().find(|k| k.name == name)
}

/// Look up a reserved word.
#[inline]
pub fn lookup(text: &[u8]) -> Option<&'static Keyword> {
    let len = text.len();
    if !(2..=12).contains(&len) {
        return None;
    }
    let first = text[0];
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }
    let text = std::str::from_utf8(text).ok()?;

    let hit = match len {
        2 => matches!(text, "do" | "if" | "in" | "or"),
        3 => matches!(text, "END" | "and" | "def" | "end" | "for" | "nil" | "not"),
        4 => matches!(text, "case" | "else" | "next" | "redo" | "self" | "then" | "true" | "when"),
        5 => matches!(
            text,
            "BEGIN" | "alias" | "begin" | "break" | "class" | "elsif" | "false" | "retry"
                | "super" | "undef" | "until" | "while" | "yield"
        ),
        6 => matches!(text, "ensure" | "module" | "rescue" | "return" | "unless"),
        8 => matches!(text, "__LINE__" | "__FILE__" | "defined?"),
        12 => text == "__ENCODING__",
        _ => false,
    };
    if hit {
        entry(text)
    } else {
        None
    }
}
