//! Heredocs.
//!
//! `<<ID`, `<<-ID` and `<<~ID` install a [`HeredocTerm`] holding a copy
//! of the introducing line. The body is read from the following lines;
//! once the terminator line has been consumed, the saved line is put back
//! and scanning continues right after the identifier.
//!
//! A squiggly (`<<~`) body is returned one line per content token while the
//! smallest indentation is measured. The width is carried on the closing
//! `StringEnd` so the grammar driver can strip it with [`dedent_string`].

use rip_ir::{LexState, ScannerEvent, TokenKind, TokenValue};
use rip_lexer_core::SourceReader;
use tracing::debug;

use super::escape::LiteralEncoding;
use super::Lexer;
use crate::lex_error::LexErrorKind;
use crate::state::{is_ident_char, INDENT_UNSET};
use crate::str_term::{HeredocTerm, StrFunc, StrTerm};

const TAB_WIDTH: i32 = 8;

/// Remove up to `width` columns of leading blanks from `piece`. Tabs
/// advance to the next multiple of 8 and are not split. Returns the number
/// of bytes removed.
pub fn dedent_string(piece: &mut Vec<u8>, width: u32) -> usize {
    let width = i64::from(width);
    let tab = i64::from(TAB_WIDTH);
    let mut col = 0i64;
    let mut i = 0;
    while i < piece.len() && col < width {
        match piece[i] {
            b' ' => col += 1,
            b'\t' => {
                let n = tab * (col / tab + 1);
                if n > width {
                    break;
                }
                col = n;
            }
            _ => break,
        }
        i += 1;
    }
    piece.drain(..i);
    i
}

impl<R: SourceReader> Lexer<'_, R> {
    /// After `<<`: read the heredoc identifier. `None` leaves the cursor
    /// untouched (plain `<<`).
    pub(super) fn heredoc_identifier(&mut self) -> Option<TokenKind> {
        let start = self.line.pos();
        let mut func = StrFunc::empty();
        let mut squiggly = false;
        let mut c = self.line.bump();
        match c {
            Some(b'-') => {
                func = StrFunc::INDENT;
                c = self.line.bump();
            }
            Some(b'~') => {
                func = StrFunc::INDENT;
                squiggly = true;
                c = self.line.bump();
            }
            _ => {}
        }

        let mut kind = TokenKind::StringBeg;
        let id = match c {
            Some(quote @ (b'\'' | b'"' | b'`')) => {
                func |= match quote {
                    b'\'' => StrFunc::SQUOTE,
                    b'"' => StrFunc::DQUOTE,
                    _ => {
                        kind = TokenKind::XStringBeg;
                        StrFunc::XQUOTE
                    }
                };
                let id_start = self.line.pos();
                loop {
                    match self.line.peek() {
                        Some(b) if b == quote => break,
                        None | Some(b'\r' | b'\n') => {
                            self.compile_error(LexErrorKind::UnterminatedHeredocIdentifier);
                            return Some(self.halt());
                        }
                        Some(_) => {
                            self.line.bump();
                        }
                    }
                }
                let id = self.line.slice(id_start, self.line.pos()).to_vec();
                self.line.bump();
                id
            }
            Some(b) if is_ident_char(b) => {
                func |= StrFunc::DQUOTE;
                let id_start = self.line.pos() - 1;
                while self.line.peek().is_some_and(is_ident_char) {
                    self.line.bump();
                }
                self.line.slice(id_start, self.line.pos()).to_vec()
            }
            _ => {
                self.line.set_pos(start);
                return None;
            }
        };

        debug!(id = %String::from_utf8_lossy(&id), squiggly, "heredoc start");
        self.dispatch_scan(ScannerEvent::HeredocBeg);
        let resume = self.line.clone();
        self.line.goto_eol();
        self.ptok = self.line.pos();
        self.st.heredoc_indent = if squiggly { INDENT_UNSET } else { 0 };
        self.st.heredoc_line_indent = 0;
        self.st.str_term = Some(StrTerm::Heredoc(HeredocTerm {
            id,
            func,
            squiggly,
            resume,
        }));
        Some(kind)
    }

    /// The current line, from its start, is `word` alone. With `indent`,
    /// leading blanks are allowed.
    pub(super) fn whole_match(&self, word: &[u8], indent: bool) -> bool {
        let bytes = self.line.bytes();
        let mut at = self.line.line_start();
        if indent {
            at = self.line.skip_blank(at);
        }
        if !self.line.matches_at(at, word) {
            return false;
        }
        match &bytes[at + word.len()..] {
            [] | [b'\n'] | [b'\r', b'\n'] => true,
            _ => false,
        }
    }

    /// Track the indentation of a squiggly heredoc line. Returns true while
    /// `c` is still leading whitespace.
    pub(super) fn update_heredoc_indent(&mut self, c: u8) -> bool {
        let st = &mut self.st;
        if st.heredoc_line_indent == -1 {
            if c == b'\n' {
                st.heredoc_line_indent = 0;
            }
            return false;
        }
        match c {
            b' ' => {
                st.heredoc_line_indent += 1;
                true
            }
            b'\t' => {
                let w = st.heredoc_line_indent / TAB_WIDTH + 1;
                st.heredoc_line_indent = w * TAB_WIDTH;
                true
            }
            b'\n' => false,
            _ => {
                if st.heredoc_indent > st.heredoc_line_indent {
                    st.heredoc_indent = st.heredoc_line_indent;
                }
                st.heredoc_line_indent = -1;
                false
            }
        }
    }

    /// One step of a heredoc body.
    pub(super) fn here_document(&mut self, here: &mut HeredocTerm) -> (TokenKind, bool) {
        if self.line.at_eol() && !self.refill() {
            return self.heredoc_unterminated(here);
        }
        let indent = here.func.contains(StrFunc::INDENT);
        if self.line.pos() == self.line.line_start() {
            if self.st.heredoc_line_indent == -1 {
                self.st.heredoc_line_indent = 0;
            } else if self.whole_match(&here.id, indent) {
                return self.heredoc_finish(here);
            }
        }

        self.newtok();
        if here.func.contains(StrFunc::EXPAND) {
            self.heredoc_expanded(here)
        } else {
            self.heredoc_raw(here)
        }
    }

    /// Body of a `<<'ID'` heredoc: lines are copied as-is.
    fn heredoc_raw(&mut self, here: &mut HeredocTerm) -> (TokenKind, bool) {
        let indent = here.func.contains(StrFunc::INDENT);
        loop {
            let start = self.line.pos();
            let end = self.line.content_end().max(start);
            if self.st.in_squiggly_heredoc() {
                let mut i = start;
                while i < end && self.update_heredoc_indent(self.line.bytes()[i]) {
                    i += 1;
                }
                self.st.heredoc_line_indent = 0;
            }
            let content = self.line.slice(start, end).to_vec();
            self.tokbuf.extend_from_slice(&content);
            if end < self.line.line_end() {
                self.tokadd(b'\n');
            }
            self.line.goto_eol();
            if self.st.in_squiggly_heredoc() {
                break;
            }
            if !self.refill() {
                return self.heredoc_unterminated(here);
            }
            if self.whole_match(&here.id, indent) {
                break;
            }
        }
        self.set_value_from_tok();
        (TokenKind::StringContent, false)
    }

    /// Body of a `<<ID` or `<<"ID"` heredoc: escapes and interpolation.
    fn heredoc_expanded(&mut self, here: &mut HeredocTerm) -> (TokenKind, bool) {
        let indent = here.func.contains(StrFunc::INDENT);
        let mut c = self.nextc();
        if c == Some(b'#') {
            let embedded = self.peek_variable_name();
            if self.st.heredoc_line_indent != -1 {
                if self.st.heredoc_indent > self.st.heredoc_line_indent {
                    self.st.heredoc_indent = self.st.heredoc_line_indent;
                }
                self.st.heredoc_line_indent = -1;
            }
            if let Some(kind) = embedded {
                return (kind, false);
            }
            self.tokadd(b'#');
            c = self.nextc();
        }
        let mut enc: LiteralEncoding = None;
        loop {
            self.pushback(c);
            match self.tokadd_string(here.func, b'\n', 0, None, &mut enc) {
                None => return self.heredoc_unterminated(here),
                Some(b'\n') => {}
                Some(last) => {
                    if last == b'\\' {
                        self.st.heredoc_line_indent = -1;
                    }
                    self.set_value_from_tok();
                    return (TokenKind::StringContent, false);
                }
            }
            if let Some(nl) = self.nextc() {
                self.tokadd(nl);
            }
            if self.st.in_squiggly_heredoc() {
                self.line.goto_eol();
                break;
            }
            if !self.refill() {
                return self.heredoc_unterminated(here);
            }
            if self.whole_match(&here.id, indent) {
                // An interpolation earlier in the body must not hide the
                // terminator from the next step.
                self.st.heredoc_line_indent = 0;
                break;
            }
            c = self.nextc();
        }
        self.set_value_from_tok();
        (TokenKind::StringContent, false)
    }

    /// The terminator line: dispatch it and resume the introducing line.
    fn heredoc_finish(&mut self, here: &mut HeredocTerm) -> (TokenKind, bool) {
        self.line.goto_eol();
        self.dispatch_scan(ScannerEvent::HeredocEnd);
        if here.squiggly {
            let width = match self.st.heredoc_indent {
                INDENT_UNSET => 0,
                w => u32::try_from(w).unwrap_or(0),
            };
            self.value = TokenValue::Dedent(width);
        }
        self.resume_heredoc_line(here);
        (TokenKind::StringEnd, true)
    }

    fn heredoc_unterminated(&mut self, here: &mut HeredocTerm) -> (TokenKind, bool) {
        self.compile_error(LexErrorKind::HeredocNotTerminated {
            id: String::from_utf8_lossy(&here.id).into_owned(),
        });
        self.token_flush();
        self.resume_heredoc_line(here);
        (TokenKind::StringEnd, true)
    }

    fn resume_heredoc_line(&mut self, here: &mut HeredocTerm) {
        self.line = std::mem::take(&mut here.resume);
        self.ptok = self.line.pos();
        self.st.heredoc_indent = 0;
        self.st.heredoc_line_indent = 0;
        self.st.set(LexState::END);
    }
}
