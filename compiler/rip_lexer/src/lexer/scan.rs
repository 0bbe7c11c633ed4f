//! Main dispatch: pick a rule from the first byte of the next token.

use rip_ir::{LexState, ScannerEvent, TokenKind};
use rip_lexer_core::SourceReader;

use super::Lexer;
use crate::lex_error::{LexErrorContext, LexErrorKind};
use crate::state::is_ident_char;
use crate::str_term::StrTerm;

/// Per-call flags shared by the dispatch rules.
#[derive(Copy, Clone, Debug)]
pub(super) struct ScanCtx {
    /// Whitespace separated this token from the previous one.
    pub space_seen: bool,
    /// The token starts a command (statement start).
    pub cmd_state: bool,
    /// State before this token.
    pub last_state: LexState,
}

impl<R: SourceReader> Lexer<'_, R> {
    /// Continue the active literal.
    pub(super) fn scan_literal(&mut self, term: StrTerm) -> TokenKind {
        match term {
            StrTerm::Quote(mut quote) => {
                self.context = LexErrorContext::InsideLiteral {
                    start: self.token_anchor().2,
                };
                let (kind, done) = self.parse_string(&mut quote);
                if !done {
                    self.st.str_term = Some(StrTerm::Quote(quote));
                }
                kind
            }
            StrTerm::Heredoc(mut here) => {
                self.context = LexErrorContext::InsideHeredoc {
                    id: String::from_utf8_lossy(&here.id).into_owned(),
                };
                let (kind, done) = self.here_document(&mut here);
                if !done {
                    self.st.str_term = Some(StrTerm::Heredoc(here));
                }
                kind
            }
        }
    }

    /// Scan one token outside any literal.
    pub(super) fn scan_token(&mut self) -> TokenKind {
        let cmd_state = self.st.command_start;
        self.st.command_start = false;
        let token_seen = self.token_seen;
        self.token_seen = true;
        let mut space_seen = false;
        let mut fallthru = false;

        loop {
            let ctx = ScanCtx {
                space_seen,
                cmd_state,
                last_state: self.st.lex_state,
            };
            let Some(c) = self.nextc() else {
                return TokenKind::EndOfInput;
            };
            match c {
                0 | 0x04 | 0x1a => return self.halt(),

                b' ' | b'\t' | 0x0c | 0x0b | b'\r' => {
                    if c == b'\r' && !self.cr_seen {
                        self.cr_seen = true;
                        self.warn("encountered \\r in middle of line, treated as a mere space");
                    }
                    space_seen = true;
                    loop {
                        match self.nextc() {
                            Some(b' ' | b'\t' | 0x0c | 0x0b | b'\r') => {}
                            other => {
                                self.pushback(other);
                                break;
                            }
                        }
                    }
                    self.dispatch_scan(ScannerEvent::Sp);
                }

                b'#' => {
                    self.token_seen = token_seen;
                    self.comment();
                    fallthru = true;
                    if let Some(kind) = self.newline(&mut fallthru, token_seen) {
                        return kind;
                    }
                }

                b'\n' => {
                    if let Some(kind) = self.newline(&mut fallthru, token_seen) {
                        return kind;
                    }
                }

                b'*' => return self.op_star(ctx),
                b'!' => return self.op_bang(),
                b'=' => {
                    if self.line.was_bol() && self.embdoc() {
                        continue;
                    }
                    return self.op_eq();
                }
                b'<' => return self.op_lt(ctx),
                b'>' => return self.op_gt(),
                b'"' | b'\'' => return self.quote_start(c, ctx),
                b'`' => return self.op_backtick(ctx),
                b'?' => return self.parse_qmark(ctx),
                b'&' => return self.op_amp(ctx),
                b'|' => return self.op_pipe(ctx),
                b'+' => return self.op_plus(ctx),
                b'-' => return self.op_minus(ctx),
                b'.' => {
                    if let Some(kind) = self.op_dot(ctx) {
                        return kind;
                    }
                }
                b'0'..=b'9' => return self.parse_numeric(c),
                b')' => {
                    self.st.close_nest();
                    self.st.set(LexState::ENDFN);
                    return TokenKind::RParen;
                }
                b']' => {
                    self.st.close_nest();
                    self.st.set(LexState::END);
                    return TokenKind::RBrack;
                }
                b'}' => return self.op_rbrace(),
                b':' => return self.op_colon(ctx),
                b'/' => return self.op_slash(ctx),
                b'^' => return self.op_caret(),
                b';' => {
                    self.st.set(LexState::BEG);
                    self.st.command_start = true;
                    return TokenKind::Semicolon;
                }
                b',' => {
                    self.st.set(LexState::BEG | LexState::LABEL);
                    return TokenKind::Comma;
                }
                b'~' => return self.op_tilde(),
                b'(' => return self.op_lparen(ctx),
                b'[' => return self.op_lbrack(ctx),
                b'{' => return self.op_lbrace(),
                b'\\' => {
                    let next = self.nextc();
                    if next == Some(b'\n') {
                        space_seen = true;
                        self.dispatch_scan(ScannerEvent::Sp);
                        continue;
                    }
                    self.pushback(next);
                    return TokenKind::Backslash;
                }
                b'%' => return self.parse_percent(ctx),
                b'$' => return self.parse_gvar(ctx),
                b'@' => return self.parse_atmark(ctx),
                b'_' => {
                    if self.line.was_bol() && self.whole_match(b"__END__", false) {
                        self.end_of_program();
                        return TokenKind::EndOfInput;
                    }
                    return self.parse_ident(ctx);
                }
                _ => {
                    if !is_ident_char(c) {
                        self.compile_error(LexErrorKind::InvalidChar { byte: c });
                        self.token_flush();
                        continue;
                    }
                    return self.parse_ident(ctx);
                }
            }
        }
    }

    /// Newline handling. Returns `None` when the newline was ignored and
    /// scanning should continue with the next token.
    fn newline(&mut self, fallthru: &mut bool, token_seen: bool) -> Option<TokenKind> {
        self.token_seen = token_seen;
        let ignorable = self
            .st
            .is(LexState::BEG | LexState::CLASS | LexState::FNAME | LexState::DOT)
            && !self.st.is(LexState::LABELED);
        let after_label = self.st.has_all(LexState::ARG | LexState::LABELED);
        let ends_kwarg = after_label && self.st.in_kwarg;
        if !ends_kwarg && (ignorable || after_label || self.next_line_continues_chain()) {
            if !*fallthru {
                self.dispatch_scan(ScannerEvent::IgnoredNl);
            }
            *fallthru = false;
            return None;
        }
        self.st.command_start = true;
        self.st.set(LexState::BEG);
        Some(TokenKind::Newline)
    }

    /// True if the next line that is not a comment starts with `.` (but
    /// not `..`) or `&.`, continuing a method chain.
    fn next_line_continues_chain(&mut self) -> bool {
        if !self.line.at_eol() {
            return false;
        }
        let mut n = 0;
        loop {
            let line = match self.feed.peek(n) {
                Ok(Some(line)) => line,
                Ok(None) | Err(_) => return false,
            };
            let bytes = line.bytes();
            let i = line.skip_blank(0);
            match bytes.get(i) {
                Some(b'#') => n += 1,
                Some(b'.') => return bytes.get(i + 1) != Some(&b'.'),
                Some(b'&') => return bytes.get(i + 1) == Some(&b'.'),
                _ => return false,
            }
        }
    }
}
