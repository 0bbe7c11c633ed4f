//! Quoted literals.
//!
//! A literal is scanned in steps. The opening token (`StringBeg`,
//! `RegexpBeg`, `%w(` ...) installs a [`QuoteTerm`]; each following call
//! returns one piece of the body (`StringContent`, `WordSep`, `EmbexprBeg`,
//! `EmbVar`) until the closing token (`StringEnd`, `RegexpEnd`,
//! `LabelEnd`) removes it again.
//!
//! Escapes are cooked into the token value; the token text is always the
//! exact source bytes.

use rip_ir::{LexState, TokenKind};
use rip_lexer_core::SourceReader;

use super::escape::{escaped_control_code, EscapeFlags, LiteralEncoding};
use super::scan::ScanCtx;
use super::Lexer;
use crate::lex_error::LexErrorKind;
use crate::state::{is_ident_char, is_space};
use crate::str_term::{QuoteTerm, StrFunc, StrTerm};

/// Punctuation that may follow `$` as a special global.
fn is_global_name_punct(c: u8) -> bool {
    b"~*$?!@/\\;,.=:<>\"&`'+0".contains(&c)
}

/// Regexp metacharacters that keep their backslash even when they are
/// also the literal's terminator.
fn simple_re_meta(c: u8) -> bool {
    matches!(
        c,
        b'$' | b'*' | b'+' | b'.' | b'?' | b'^' | b'|' | b')' | b']' | b'}' | b'>'
    )
}

/// Closing delimiter for a bracketing opener.
fn closing_paren(open: u8) -> Option<u8> {
    match open {
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'{' => Some(b'}'),
        b'<' => Some(b'>'),
        _ => None,
    }
}

impl<R: SourceReader> Lexer<'_, R> {
    /// One step of a quoted literal. The flag is true when the literal is
    /// finished and its terminator must not be reinstalled.
    pub(super) fn parse_string(&mut self, quote: &mut QuoteTerm) -> (TokenKind, bool) {
        let func = quote.func;
        if func.contains(StrFunc::TERM) {
            if func.contains(StrFunc::QWORDS) {
                self.nextc();
            }
            self.st.set(LexState::END);
            let kind = if func.contains(StrFunc::REGEXP) {
                TokenKind::RegexpEnd
            } else {
                TokenKind::StringEnd
            };
            return (kind, true);
        }

        let mut c = self.nextc();
        let mut space = false;
        if func.contains(StrFunc::QWORDS) && c.is_some_and(is_space) {
            while c.is_some_and(is_space) {
                c = self.nextc();
            }
            space = true;
        }
        if func.contains(StrFunc::LIST) {
            quote.func.remove(StrFunc::LIST);
            space = true;
        }
        if c == Some(quote.term) && quote.nest == 0 {
            if func.contains(StrFunc::QWORDS) {
                quote.func.insert(StrFunc::TERM);
                self.pushback(c);
                return (TokenKind::WordSep, false);
            }
            return (self.string_term(func), true);
        }
        if space {
            self.pushback(c);
            return (TokenKind::WordSep, false);
        }

        self.newtok();
        if func.contains(StrFunc::EXPAND) && c == Some(b'#') {
            if let Some(kind) = self.peek_variable_name() {
                return (kind, false);
            }
            self.tokadd(b'#');
            c = self.nextc();
        }
        self.pushback(c);

        let mut enc: LiteralEncoding = None;
        let paren = quote.paren;
        let term = quote.term;
        if self
            .tokadd_string(func, term, paren, Some(&mut quote.nest), &mut enc)
            .is_none()
        {
            if func.contains(StrFunc::QWORDS) {
                self.compile_error(LexErrorKind::UnterminatedList);
                return (TokenKind::StringEnd, true);
            }
            if func.contains(StrFunc::REGEXP) {
                self.compile_error(LexErrorKind::UnterminatedRegexp);
            } else {
                self.compile_error(LexErrorKind::UnterminatedString);
            }
            quote.func.insert(StrFunc::TERM);
        }
        self.set_value_from_tok();
        (TokenKind::StringContent, false)
    }

    /// The closing delimiter was just consumed.
    fn string_term(&mut self, func: StrFunc) -> TokenKind {
        if func.contains(StrFunc::REGEXP) {
            self.regexp_options();
            self.st.set(LexState::END);
            return TokenKind::RegexpEnd;
        }
        if func.contains(StrFunc::LABEL) && self.peek_is(b':') && self.peek_at(1) != Some(b':') {
            self.nextc();
            self.st.set(LexState::BEG | LexState::LABEL);
            return TokenKind::LabelEnd;
        }
        self.st.set(LexState::END);
        TokenKind::StringEnd
    }

    /// Flags after a closing `/`. Unknown letters are consumed and reported.
    fn regexp_options(&mut self) {
        let mut unknown = String::new();
        loop {
            let c = self.nextc();
            match c {
                Some(b'i' | b'm' | b'x' | b'o' | b'u' | b'n' | b'e' | b's') => {}
                Some(b) if b.is_ascii_alphabetic() => unknown.push(char::from(b)),
                _ => {
                    self.pushback(c);
                    break;
                }
            }
        }
        if !unknown.is_empty() {
            self.compile_error(LexErrorKind::UnknownRegexpOptions { options: unknown });
        }
    }

    /// After `#` in an interpolating literal: `#{` opens an interpolation,
    /// `#@ivar`, `#@@cvar` and `#$gvar` embed a variable.
    pub(super) fn peek_variable_name(&mut self) -> Option<TokenKind> {
        let end = self.line.line_end();
        let mut at = self.line.pos();
        if at + 1 >= end {
            return None;
        }
        let bytes = self.line.bytes();
        let first = bytes[at];
        at += 1;
        let mut c = bytes[at];
        match first {
            b'$' => {
                if c == b'-' {
                    at += 1;
                    if at >= end {
                        return None;
                    }
                    c = bytes[at];
                } else if is_global_name_punct(c) || c.is_ascii_digit() {
                    return Some(TokenKind::EmbVar);
                }
            }
            b'@' => {
                if c == b'@' {
                    at += 1;
                    if at >= end {
                        return None;
                    }
                    c = bytes[at];
                }
            }
            b'{' => {
                self.line.bump();
                self.st.command_start = true;
                return Some(TokenKind::EmbexprBeg);
            }
            _ => return None,
        }
        if !c.is_ascii() || c == b'_' || c.is_ascii_alphabetic() {
            return Some(TokenKind::EmbVar);
        }
        None
    }

    /// Scan literal body bytes into the cooked value up to (not including)
    /// the terminator, an interpolation start, or a word separator.
    /// Returns the last byte looked at, or `None` at end of input.
    pub(super) fn tokadd_string(
        &mut self,
        func: StrFunc,
        term: u8,
        paren: u8,
        mut nest: Option<&mut u32>,
        enc: &mut LiteralEncoding,
    ) -> Option<u8> {
        loop {
            let mut c = self.nextc()?;
            if self.st.in_squiggly_heredoc() {
                self.update_heredoc_indent(c);
            }
            if paren != 0 && c == paren {
                if let Some(n) = nest.as_deref_mut() {
                    *n += 1;
                }
            } else if c == term {
                match nest.as_deref_mut() {
                    Some(n) if *n > 0 => *n -= 1,
                    _ => {
                        self.pushback(Some(c));
                        return Some(c);
                    }
                }
            } else if func.contains(StrFunc::EXPAND)
                && c == b'#'
                && matches!(self.peek(), Some(b'$' | b'@' | b'{'))
            {
                self.pushback(Some(c));
                return Some(c);
            } else if c == b'\\' {
                let Some(esc) = self.nextc() else {
                    return None;
                };
                c = esc;
                match c {
                    b'\n' if func.contains(StrFunc::QWORDS) => {}
                    b'\n' => {
                        if func.contains(StrFunc::EXPAND) {
                            if !func.contains(StrFunc::INDENT) || self.st.heredoc_indent < 0 {
                                continue;
                            }
                            if c == term {
                                return Some(b'\\');
                            }
                        }
                        self.tokadd(b'\\');
                    }
                    b'\\' => {
                        if func.contains(StrFunc::ESCAPE) {
                            self.tokadd(c);
                        }
                    }
                    b'u' => {
                        if !func.contains(StrFunc::EXPAND) {
                            self.tokadd(b'\\');
                        } else {
                            self.tokadd_utf8(enc, Some(term), func.contains(StrFunc::REGEXP));
                            continue;
                        }
                    }
                    _ if !c.is_ascii() => {
                        if !func.contains(StrFunc::EXPAND) {
                            self.tokadd(b'\\');
                        }
                        self.tokadd_mbchar(c, enc);
                        continue;
                    }
                    _ if func.contains(StrFunc::REGEXP) => {
                        if matches!(c, b'c' | b'C' | b'M') {
                            self.pushback(Some(c));
                            let byte = self.read_escape(EscapeFlags::empty(), enc);
                            let hex = format!("\\x{byte:02X}");
                            self.tokbuf.extend_from_slice(hex.as_bytes());
                            continue;
                        }
                        if c == term && !simple_re_meta(c) {
                            self.tokadd(c);
                            continue;
                        }
                        self.pushback(Some(c));
                        if !self.tokadd_regexp_escape() {
                            return None;
                        }
                        continue;
                    }
                    _ if func.contains(StrFunc::EXPAND) => {
                        self.pushback(Some(c));
                        if func.contains(StrFunc::ESCAPE) {
                            self.tokadd(b'\\');
                        }
                        c = self.read_escape(EscapeFlags::empty(), enc);
                    }
                    _ if func.contains(StrFunc::QWORDS) && is_space(c) => {}
                    _ if c != term && !(paren != 0 && c == paren) => {
                        self.tokadd(b'\\');
                        self.pushback(Some(c));
                        continue;
                    }
                    _ => {}
                }
            } else if !c.is_ascii() {
                self.tokadd_mbchar(c, enc);
                continue;
            } else if func.contains(StrFunc::QWORDS) && is_space(c) {
                self.pushback(Some(c));
                return Some(c);
            }
            self.tokadd(c);
        }
    }

    /// Copy a regexp escape verbatim, backslash included. Returns false on
    /// a malformed escape at end of input.
    fn tokadd_regexp_escape(&mut self) -> bool {
        let start = self.line.pos().saturating_sub(1);
        let c = self.nextc();
        match c {
            Some(b'\n') => {}
            Some(b'0'..=b'7') => {
                self.pushback(c);
                let mut len = 0;
                while len < 3 && matches!(self.peek(), Some(b'0'..=b'7')) {
                    self.line.bump();
                    len += 1;
                }
                let text = self.line.slice(start, self.line.pos()).to_vec();
                self.tokbuf.extend_from_slice(&text);
            }
            Some(b'x') => {
                let mut len = 0;
                while len < 2 && self.peek().is_some_and(|b| b.is_ascii_hexdigit()) {
                    self.line.bump();
                    len += 1;
                }
                if len == 0 {
                    self.compile_error(LexErrorKind::InvalidHexEscape);
                    return false;
                }
                let text = self.line.slice(start, self.line.pos()).to_vec();
                self.tokbuf.extend_from_slice(&text);
            }
            None => {
                self.compile_error(LexErrorKind::InvalidEscape);
                return false;
            }
            Some(other) => {
                self.tokadd(b'\\');
                self.tokadd(other);
            }
        }
        true
    }

    /// `%` at the start of an operand opens a percent literal; elsewhere it
    /// is modulo or `%=`.
    pub(super) fn parse_percent(&mut self, ctx: ScanCtx) -> TokenKind {
        let c = self.nextc();
        if self.st.is_beg() {
            return self.percent_literal(c);
        }
        if c == Some(b'=') {
            self.st.set(LexState::BEG);
            return TokenKind::OpAsgn;
        }
        if self.st.is_spcarg(ctx.space_seen, c) || (self.st.is(LexState::FITEM) && c == Some(b's'))
        {
            return self.percent_literal(c);
        }
        self.st.set(if self.st.is_after_operator() {
            LexState::ARG
        } else {
            LexState::BEG
        });
        self.pushback(c);
        self.warn_balanced(TokenKind::Percent, "%", "string literal", c, ctx)
    }

    /// `%` followed by `c`: the type letter, or the delimiter of `%(...)`.
    fn percent_literal(&mut self, c: Option<u8>) -> TokenKind {
        let (kind_letter, term) = match c {
            Some(b) if b.is_ascii_alphanumeric() => {
                let term = self.nextc();
                if term.is_some_and(|t| t.is_ascii_alphanumeric() || !t.is_ascii()) {
                    self.pushback(term);
                    return self.unknown_percent();
                }
                (b, term)
            }
            Some(b) if !b.is_ascii() => {
                self.pushback(c);
                return self.unknown_percent();
            }
            other => (b'Q', other),
        };
        let Some(open) = term else {
            self.compile_error(LexErrorKind::UnterminatedQuotedString);
            return self.halt();
        };
        let (term, paren) = match closing_paren(open) {
            Some(close) => (close, open),
            None => (open, 0),
        };
        let (func, kind) = match kind_letter {
            b'Q' => (StrFunc::DQUOTE, TokenKind::StringBeg),
            b'q' => (StrFunc::SQUOTE, TokenKind::StringBeg),
            b'W' => (StrFunc::DWORD, TokenKind::WordsBeg),
            b'w' => (StrFunc::SWORD, TokenKind::QWordsBeg),
            b'I' => (StrFunc::DWORD, TokenKind::SymbolsBeg),
            b'i' => (StrFunc::SWORD, TokenKind::QSymbolsBeg),
            b'x' => (StrFunc::XQUOTE, TokenKind::XStringBeg),
            b'r' => (StrFunc::REGEXP_LIT, TokenKind::RegexpBeg),
            b's' => {
                self.st.set(LexState::FNAME | LexState::FITEM);
                (StrFunc::SSYM, TokenKind::SymBeg)
            }
            _ => return self.unknown_percent(),
        };
        self.st.str_term = Some(StrTerm::Quote(QuoteTerm::new(func, term, paren)));
        kind
    }

    fn unknown_percent(&mut self) -> TokenKind {
        if let Some(c) = self.peek() {
            let len = self.encoding.char_len(c);
            self.line.advance(len.min(self.line.rest().len()));
        }
        self.compile_error(LexErrorKind::UnknownPercentType);
        self.halt()
    }

    /// `?` is a character literal (`?a`, `?\n`) or the ternary operator.
    pub(super) fn parse_qmark(&mut self, ctx: ScanCtx) -> TokenKind {
        if self.st.is_end() {
            self.st.set(LexState::VALUE);
            return TokenKind::Question;
        }
        let Some(c) = self.nextc() else {
            self.compile_error(LexErrorKind::IncompleteCharSyntax);
            return self.halt();
        };
        if is_space(c) {
            if !self.st.is_arg() {
                if let Some(code) = escaped_control_code(c) {
                    self.warn_space_char(code, "?");
                }
            }
            return self.ternary(c);
        }
        self.newtok();
        let mut enc: LiteralEncoding = None;
        if !c.is_ascii() {
            self.tokadd_mbchar(c, &mut enc);
        } else if (c.is_ascii_alphanumeric() || c == b'_') && self.peek().is_some_and(is_ident_char)
        {
            if ctx.space_seen {
                let start = self.line.pos() - 1;
                let mut end = self.line.pos();
                while self.line.bytes().get(end).copied().is_some_and(is_ident_char) {
                    end += 1;
                }
                let word = String::from_utf8_lossy(self.line.slice(start, end)).into_owned();
                self.warn(format!(
                    "`?' just followed by `{word}' is interpreted as a conditional operator, put a space after `?'"
                ));
            }
            return self.ternary(c);
        } else if c == b'\\' {
            if self.peek_is(b'u') {
                self.line.bump();
                enc = Some(rip_lexer_core::SourceEncoding::Utf8);
                self.tokadd_utf8(&mut enc, None, false);
            } else if let Some(next) = self.peek().filter(|b| !b.is_ascii()) {
                self.line.bump();
                self.tokadd_mbchar(next, &mut enc);
            } else {
                let byte = self.read_escape(EscapeFlags::empty(), &mut enc);
                self.tokadd(byte);
            }
        } else {
            self.tokadd(c);
        }
        self.set_value_from_tok();
        self.st.set(LexState::END);
        TokenKind::Char
    }

    fn ternary(&mut self, c: u8) -> TokenKind {
        self.pushback(Some(c));
        self.st.set(LexState::VALUE);
        TokenKind::Question
    }
}
