//! Identifiers, keywords, labels, and `$`/`@` variables.

use rip_ir::{LexState, TokenKind};
use rip_lexer_core::SourceReader;

use super::scan::ScanCtx;
use super::Lexer;
use crate::keywords;
use crate::lex_error::LexErrorKind;
use crate::state::{is_ident_char, is_space};

/// Largest `$n` that still names a match group.
const NTH_REF_MAX: u64 = (i32::MAX >> 1) as u64;

impl<R: SourceReader> Lexer<'_, R> {
    /// Consume the rest of an identifier run.
    fn scan_ident_run(&mut self) {
        while self.peek().is_some_and(is_ident_char) {
            self.line.bump();
        }
    }

    /// Text of the token scanned so far on the current line.
    fn token_text(&self) -> &[u8] {
        self.line.slice(self.ptok, self.line.pos())
    }

    /// A label suffix follows: `:` but not `::`.
    fn label_suffix_follows(&self) -> bool {
        self.peek_is(b':') && self.peek_at(1) != Some(b':')
    }

    pub(super) fn parse_ident(&mut self, ctx: ScanCtx) -> TokenKind {
        self.scan_ident_run();
        let mut kind = TokenKind::Constant;
        match self.peek() {
            Some(b'!' | b'?') if self.peek_at(1) != Some(b'=') => {
                self.line.bump();
                kind = TokenKind::Fid;
            }
            Some(b'=')
                if self.st.is(LexState::FNAME)
                    && self.peek_at(1) != Some(b'~')
                    && self.peek_at(1) != Some(b'>')
                    && (self.peek_at(1) != Some(b'=') || self.peek_at(2) == Some(b'>')) =>
            {
                self.line.bump();
                kind = TokenKind::Identifier;
            }
            _ => {}
        }

        if self.st.is_label_possible(ctx.cmd_state) && self.label_suffix_follows() {
            self.line.bump();
            self.st.set(LexState::ARG | LexState::LABELED);
            return TokenKind::Label;
        }

        let text = self.token_text();
        if text.is_ascii() && !self.st.is(LexState::DOT) {
            if let Some(kw) = keywords::lookup(text) {
                return self.keyword(kw);
            }
        }

        let text = self.token_text();
        let first = text.first().copied().unwrap_or(b'_');
        if kind == TokenKind::Constant && !first.is_ascii_uppercase() {
            kind = TokenKind::Identifier;
        }
        let name = String::from_utf8_lossy(text).into_owned();

        if self.st.is(LexState::BEG_ANY | LexState::ARG_ANY | LexState::DOT) {
            self.st.set(if ctx.cmd_state {
                LexState::CMDARG
            } else {
                LexState::ARG
            });
        } else if self.st.lex_state == LexState::FNAME {
            self.st.set(LexState::ENDFN);
        } else {
            self.st.set(LexState::END);
        }

        if kind == TokenKind::Identifier
            && !ctx.last_state.is(LexState::DOT | LexState::FNAME)
            && (self.locals.is_local(&name) || is_numbered_param(&name))
        {
            self.st.set(LexState::END | LexState::LABEL);
        }
        kind
    }

    fn keyword(&mut self, kw: &'static keywords::Keyword) -> TokenKind {
        let state = self.st.lex_state;
        if state.is(LexState::FNAME) {
            self.st.set(LexState::ENDFN);
            return kw.id;
        }
        self.st.set(kw.state);
        if self.st.is(LexState::BEG) {
            self.st.command_start = true;
        }
        if kw.id == TokenKind::KwDo {
            if self.st.lambda_beginning() {
                self.st.lpar_beg = -1;
                return TokenKind::KwDoLambda;
            }
            if self.st.cond_p() {
                return TokenKind::KwDoCond;
            }
            if self.st.cmdarg_p() && !state.is(LexState::CMDARG) {
                return TokenKind::KwDoBlock;
            }
            return TokenKind::KwDo;
        }
        if state.is(LexState::BEG | LexState::LABELED | LexState::CLASS) {
            return kw.id;
        }
        if kw.has_modifier_form() {
            self.st.set(LexState::BEG | LexState::LABEL);
        }
        kw.modifier
    }

    /// `$` variables: named globals, specials, back references, `$1`.
    pub(super) fn parse_gvar(&mut self, ctx: ScanCtx) -> TokenKind {
        self.st.set(LexState::END);
        let c = self.nextc();
        match c {
            Some(b'_') => {
                if self.peek().is_some_and(is_ident_char) {
                    self.scan_ident_run();
                }
                TokenKind::Gvar
            }
            Some(
                b'~' | b'*' | b'$' | b'?' | b'!' | b'@' | b'/' | b'\\' | b';' | b',' | b'.'
                | b'=' | b':' | b'<' | b'>' | b'"',
            ) => TokenKind::Gvar,
            Some(b'-') => {
                if self.peek().is_some_and(is_ident_char) {
                    self.line.bump();
                }
                TokenKind::Gvar
            }
            Some(b'&' | b'`' | b'\'' | b'+') => {
                if ctx.last_state.is(LexState::FNAME) {
                    TokenKind::Gvar
                } else {
                    TokenKind::BackRef
                }
            }
            Some(b'1'..=b'9') => {
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.line.bump();
                }
                if ctx.last_state.is(LexState::FNAME) {
                    return TokenKind::Gvar;
                }
                self.check_nth_ref();
                TokenKind::NthRef
            }
            Some(b'0') => {
                self.scan_ident_run();
                TokenKind::Gvar
            }
            Some(c) if is_ident_char(c) => {
                self.scan_ident_run();
                TokenKind::Gvar
            }
            other => {
                match other {
                    None => self.compile_error(LexErrorKind::DollarWithoutIdentifier),
                    Some(c) if is_space(c) => {
                        self.pushback(other);
                        self.compile_error(LexErrorKind::DollarWithoutIdentifier);
                    }
                    Some(c) => {
                        self.pushback(other);
                        self.compile_error(LexErrorKind::InvalidGlobalName { ch: char::from(c) });
                    }
                }
                TokenKind::Gvar
            }
        }
    }

    fn check_nth_ref(&mut self) {
        let digits = String::from_utf8_lossy(&self.token_text()[1..]).into_owned();
        let too_big = digits.parse::<u64>().map_or(true, |n| n > NTH_REF_MAX);
        if too_big {
            self.warn(format!(
                "`${digits}' is too big for a number variable, always nil"
            ));
        }
    }

    /// `@ivar` and `@@cvar`.
    pub(super) fn parse_atmark(&mut self, ctx: ScanCtx) -> TokenKind {
        let mut kind = TokenKind::Ivar;
        let mut c = self.nextc();
        if c == Some(b'@') {
            kind = TokenKind::Cvar;
            c = self.nextc();
        }
        let class_var = kind == TokenKind::Cvar;
        self.st.set(if ctx.last_state.is(LexState::FNAME) {
            LexState::ENDFN
        } else {
            LexState::END
        });
        match c {
            Some(c) if c.is_ascii_digit() => {
                self.pushback(Some(c));
                self.compile_error(LexErrorKind::InvalidInstanceName {
                    ch: char::from(c),
                    class_var,
                });
                return kind;
            }
            Some(c) if is_ident_char(c) => {}
            other => {
                self.pushback(other);
                match other {
                    Some(c) if !is_space(c) => {
                        self.compile_error(LexErrorKind::InvalidInstanceName {
                            ch: char::from(c),
                            class_var,
                        });
                    }
                    _ => self.compile_error(LexErrorKind::AtWithoutIdentifier { class_var }),
                }
                return kind;
            }
        }
        self.scan_ident_run();
        kind
    }
}

/// `_1` through `_9`.
fn is_numbered_param(name: &str) -> bool {
    let b = name.as_bytes();
    b.len() == 2 && b[0] == b'_' && (b'1'..=b'9').contains(&b[1])
}
