//! The tokenizer.
//!
//! [`Lexer`] pulls physical lines from a [`SourceReader`], keeps the
//! context-sensitive [`LexerState`], and produces one [`Token`] per call to
//! [`next_token`](Lexer::next_token). Every byte it consumes is reported to
//! the [`Dispatch`] sink exactly once: as the scanner event of a returned
//! token, or as one of the events that never reach the grammar (`sp`,
//! `comment`, `ignored_nl`, `embdoc*`, `heredoc_beg`/`heredoc_end`,
//! `__end__`).
//!
//! # Layout
//!
//! - `scan`: the main dispatch over the first byte of a token
//! - `operators`: the state-sensitive punctuation rules
//! - `ident`: identifiers, keywords, labels, `$`/`@` variables
//! - `number`: numeric literals
//! - `quote`: quoted literals, `%` literals, interpolation hand-off
//! - `escape`: backslash escapes and `\u`
//! - `heredoc`: heredoc identifiers and bodies
//! - `comments`: comments, magic comments, `=begin`/`=end`, `__END__`
//!
//! Text that belongs to a token still open when its line runs out is moved
//! into a [`DelayedContent`] before the next line replaces the buffer, and
//! is dispatched as one event anchored where it began.

mod comments;
mod escape;
mod heredoc;
mod ident;
mod number;
mod operators;
mod quote;
mod scan;

#[cfg(test)]
mod tests;

pub use comments::{MagicSettings, ShareableConstantValue};
pub use heredoc::dedent_string;

use rip_diagnostic::{Diagnostic, DiagnosticQueue, ErrorGuaranteed};
use rip_ir::{
    Arg, DiagnosticEvent, Dispatch, Event, EventPos, LexState, LineCol, NodeHandle, ParserEvent,
    ScannerEvent, Span, Token, TokenKind, TokenValue,
};
use rip_lexer_core::{
    DelayedContent, LineBuffer, LineFeed, SourceEncoding, SourceError, SourceReader,
};
use tracing::{debug, trace};

use crate::checkpoint::Checkpoint;
use crate::lex_error::{LexError, LexErrorContext, LexErrorKind};
use crate::locals::LocalScopes;
use crate::options::LexerOptions;
use crate::state::LexerState;

/// Context-sensitive Ruby tokenizer over one source unit.
pub struct Lexer<'a, R> {
    feed: LineFeed<R>,
    line: LineBuffer,
    sink: &'a mut dyn Dispatch,
    options: LexerOptions,
    st: LexerState,
    locals: LocalScopes,
    diagnostics: DiagnosticQueue,
    /// Index in `line` where the pending token text starts.
    ptok: usize,
    /// Cooked value of the token being scanned.
    tokbuf: Vec<u8>,
    value: TokenValue,
    delayed: Option<DelayedContent>,
    encoding: SourceEncoding,
    magic: MagicSettings,
    /// What the scanner was doing, for error reports.
    context: LexErrorContext,
    /// Number of physical lines pulled so far.
    line_count: u32,
    token_seen: bool,
    has_shebang: bool,
    cr_seen: bool,
    /// Set by `__END__`, an unrecoverable scan error, or a source failure.
    halted: bool,
    source_error: Option<SourceError>,
}

impl<'a, R: SourceReader> Lexer<'a, R> {
    pub fn new(reader: R, sink: &'a mut dyn Dispatch, options: LexerOptions) -> Self {
        let feed = LineFeed::new(reader, options.first_line);
        let st = LexerState::new(options.command_start);
        Lexer {
            feed,
            line: LineBuffer::empty(),
            sink,
            options,
            st,
            locals: LocalScopes::new(),
            diagnostics: DiagnosticQueue::new(),
            ptok: 0,
            tokbuf: Vec::new(),
            value: TokenValue::None,
            delayed: None,
            encoding: SourceEncoding::default(),
            magic: MagicSettings::default(),
            context: LexErrorContext::TopLevel,
            line_count: 0,
            token_seen: false,
            has_shebang: false,
            cr_seen: false,
            halted: false,
            source_error: None,
        }
    }

    /// Scan and return the next token.
    ///
    /// Never fails: lexical errors are reported through the diagnostic side
    /// channel and scanning continues. After end of input every call returns
    /// [`TokenKind::EndOfInput`].
    pub fn next_token(&mut self) -> Token {
        self.context = LexErrorContext::TopLevel;
        let kind = if self.halted {
            TokenKind::EndOfInput
        } else {
            match self.st.str_term.take() {
                Some(term) => self.scan_literal(term),
                None => self.scan_token(),
            }
        };
        let token = self.finish(kind);
        trace!(
            kind = ?token.kind,
            state = %token.state,
            line = token.pos.line,
            column = token.pos.column,
            "token"
        );
        token
    }

    // ─── Grammar-driver surface ───

    /// Capture the state an interpolation must not disturb.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint::capture(&self.st)
    }

    /// Put back a state captured by [`checkpoint`](Self::checkpoint).
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        debug!(state = %checkpoint.lex_state(), "restore checkpoint");
        checkpoint.apply(&mut self.st);
    }

    /// Prepare to scan the statements of `#{...}`. Call right after the
    /// `EmbexprBeg` token, having taken a checkpoint.
    pub fn enter_interpolation(&mut self) {
        self.st.enter_interpolation();
    }

    /// Prepare to scan the variable after `#@`/`#$`. Call right after the
    /// `EmbVar` token, having taken a checkpoint.
    pub fn enter_embedded_var(&mut self) {
        self.st.enter_embedded_var();
    }

    pub fn state(&self) -> &LexerState {
        &self.st
    }

    pub fn lex_state(&self) -> LexState {
        self.st.lex_state
    }

    pub fn set_lex_state(&mut self, state: LexState) {
        self.st.set(state);
    }

    pub fn set_command_start(&mut self, value: bool) {
        self.st.command_start = value;
    }

    /// Make a newline after a label significant. Returns the previous
    /// setting.
    pub fn set_in_kwarg(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.st.in_kwarg, value)
    }

    pub fn cond_push(&mut self, bit: bool) {
        self.st.cond.push(bit);
    }

    pub fn cond_pop(&mut self) {
        self.st.cond.pop();
    }

    pub fn cmdarg_push(&mut self, bit: bool) {
        self.st.cmdarg.push(bit);
    }

    pub fn cmdarg_pop(&mut self) {
        self.st.cmdarg.pop();
    }

    /// Mark the current nesting depth as the one where a `->` body opens.
    /// Returns the previous mark for [`end_lambda`](Self::end_lambda).
    pub fn begin_lambda(&mut self) -> i32 {
        std::mem::replace(&mut self.st.lpar_beg, self.st.paren_nest)
    }

    pub fn end_lambda(&mut self, previous: i32) {
        self.st.lpar_beg = previous;
    }

    pub fn locals(&self) -> &LocalScopes {
        &self.locals
    }

    pub fn locals_mut(&mut self) -> &mut LocalScopes {
        &mut self.locals
    }

    /// Dispatch a grammar event to the sink.
    pub fn dispatch(&mut self, event: ParserEvent, args: &[Arg], at: EventPos) -> NodeHandle {
        self.sink.dispatch(Event::Parser(event), args, at)
    }

    /// Record a diagnostic and forward it to the sink's side channel.
    pub fn report(&mut self, diag: Diagnostic) {
        let at = EventPos {
            line: diag.pos.line,
            column: diag.pos.column,
            offset: diag.span.start,
            state: self.st.lex_state,
        };
        self.sink.diagnostic(diag.event, &diag.message, at);
        self.diagnostics.push(diag);
    }

    /// Record an error, forward it to the sink, and get proof of it.
    pub fn emit_error(&mut self, diag: Diagnostic) -> ErrorGuaranteed {
        let at = EventPos {
            line: diag.pos.line,
            column: diag.pos.column,
            offset: diag.span.start,
            state: self.st.lex_state,
        };
        self.sink.diagnostic(diag.event, &diag.message, at);
        self.diagnostics.emit_error(diag)
    }

    pub fn diagnostics(&self) -> &DiagnosticQueue {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticQueue {
        &mut self.diagnostics
    }

    /// True once any error was reported.
    pub fn errored(&self) -> bool {
        self.diagnostics.errored()
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    pub fn magic(&self) -> &MagicSettings {
        &self.magic
    }

    /// The I/O failure that stopped scanning, if any.
    pub fn take_source_error(&mut self) -> Option<SourceError> {
        self.source_error.take()
    }

    /// Line number of the line being scanned.
    pub fn current_line(&self) -> u32 {
        self.line.line()
    }

    /// Position of the scan cursor.
    pub fn cursor_pos(&self) -> EventPos {
        EventPos {
            line: self.line.line(),
            column: self.line.column(self.line.pos()),
            offset: self.line.abs(self.line.pos()),
            state: self.st.lex_state,
        }
    }

    // ─── Byte primitives ───

    /// Consume one byte, refilling at end of line. `\r\n` reads as `\n`.
    fn nextc(&mut self) -> Option<u8> {
        if self.line.at_eol() && !self.refill() {
            return None;
        }
        let b = self.line.bump()?;
        if b == b'\r' && self.line.peek_is(b'\n') {
            self.line.bump();
            return Some(b'\n');
        }
        Some(b)
    }

    /// Undo the last [`nextc`](Self::nextc). A no-op for end of input.
    fn pushback(&mut self, c: Option<u8>) {
        let Some(c) = c else {
            return;
        };
        self.line.back();
        if c == b'\n' && self.line.peek_is(b'\n') && self.line.prev() == Some(b'\r') {
            self.line.back();
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.line.peek()
    }

    #[inline]
    fn peek_is(&self, b: u8) -> bool {
        self.line.peek_is(b)
    }

    /// Move `line[ptok..]` into the delayed buffer.
    fn stash_pending(&mut self) {
        let end = self.line.line_end();
        if self.ptok < end {
            let line = &self.line;
            let ptok = self.ptok;
            let delayed = self.delayed.get_or_insert_with(|| {
                DelayedContent::new(line.line(), line.column(ptok), line.abs(ptok))
            });
            delayed.push(line.slice(ptok, end));
        }
        self.ptok = end;
    }

    #[inline]
    fn peek_at(&self, n: usize) -> Option<u8> {
        self.line.peek_at(n)
    }

    /// Replace the line buffer with the next physical line.
    ///
    /// Pending token text is moved into the delayed buffer once the next
    /// line is in hand. Returns false at end of input, leaving the current
    /// line and the pending text untouched so a pushback stays inside it.
    fn refill(&mut self) -> bool {
        if self.halted {
            return false;
        }
        match self.feed.pull() {
            Ok(Some(line)) => {
                self.stash_pending();
                self.line = line;
                self.line_count += 1;
                if self.line_count == 1 {
                    self.prepare_first_line();
                }
                self.ptok = self.line.pos();
                trace!(line = self.line.line(), "refill");
                true
            }
            Ok(None) => false,
            Err(err) => {
                debug!(error = %err, "source read failed");
                self.source_error = Some(err);
                self.halted = true;
                false
            }
        }
    }

    fn prepare_first_line(&mut self) {
        if self.line.skip_bom() {
            self.encoding = SourceEncoding::Utf8;
        }
        if self.line.rest().starts_with(b"#!") {
            self.has_shebang = true;
        }
    }

    /// Start a fresh cooked value.
    #[inline]
    fn newtok(&mut self) {
        self.tokbuf.clear();
    }

    #[inline]
    fn tokadd(&mut self, b: u8) {
        self.tokbuf.push(b);
    }

    /// Hand the cooked buffer to the token being built.
    fn set_value_from_tok(&mut self) {
        self.value = TokenValue::Bytes(std::mem::take(&mut self.tokbuf));
    }

    /// Where the pending token text starts.
    fn token_anchor(&self) -> (u32, u32, u32) {
        match &self.delayed {
            Some(delayed) => (delayed.line(), delayed.column(), delayed.offset()),
            None => (
                self.line.line(),
                self.line.column(self.ptok),
                self.line.abs(self.ptok),
            ),
        }
    }

    /// Take the pending token text: delayed bytes plus `line[ptok..pos]`.
    fn take_text(&mut self) -> (Vec<u8>, EventPos) {
        let (line, column, offset) = self.token_anchor();
        let tail = self.line.slice(self.ptok, self.line.pos());
        let text = match self.delayed.take() {
            Some(delayed) => {
                let mut text = delayed.into_text();
                text.extend_from_slice(tail);
                text
            }
            None => tail.to_vec(),
        };
        self.ptok = self.line.pos();
        let at = EventPos {
            line,
            column,
            offset,
            state: self.st.lex_state,
        };
        (text, at)
    }

    /// Drop the pending token text without dispatching it.
    fn token_flush(&mut self) {
        self.delayed = None;
        self.ptok = self.line.pos();
    }

    /// Dispatch the pending text as a scanner event that never reaches the
    /// grammar. Empty text dispatches nothing.
    fn dispatch_scan(&mut self, event: ScannerEvent) -> NodeHandle {
        let (text, at) = self.take_text();
        if text.is_empty() {
            return NodeHandle::NONE;
        }
        let text = String::from_utf8_lossy(&text).into_owned();
        self.sink
            .dispatch(Event::Scanner(event), &[Arg::Text(text)], at)
    }

    /// Build the token for `kind` from the pending text and dispatch its
    /// scanner event.
    fn finish(&mut self, kind: TokenKind) -> Token {
        let value = std::mem::take(&mut self.value);
        let (bytes, at) = self.take_text();
        let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        let span = Span::new(at.offset, at.offset.saturating_add(len));
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let node = match kind.scanner_event() {
            Some(event) if !text.is_empty() => {
                self.sink
                    .dispatch(Event::Scanner(event), &[Arg::Text(text.clone())], at)
            }
            _ => NodeHandle::NONE,
        };
        Token {
            kind,
            value,
            text,
            span,
            pos: at.line_col(),
            state: self.st.lex_state,
            node,
        }
    }

    // ─── Diagnostics ───

    fn current_span(&self) -> (Span, LineCol) {
        let (line, column, offset) = self.token_anchor();
        let end = self.line.abs(self.line.pos()).max(offset);
        (Span::new(offset, end), LineCol::new(line, column))
    }

    /// Report a lexical error at the pending token.
    fn compile_error(&mut self, kind: LexErrorKind) {
        let (span, pos) = self.current_span();
        let err = LexError::new(kind, span, pos)
            .with_context(self.context.clone())
            .with_default_suggestion();
        debug!(message = %err.message(), line = pos.line, "lexical error");
        self.report(err.into_diagnostic());
    }

    fn emit_warning(&mut self, event: DiagnosticEvent, message: String) {
        let (span, pos) = self.current_span();
        self.report(Diagnostic::warning(event).with_message(message).at(span, pos));
    }

    /// Warning emitted regardless of verbosity.
    fn warn(&mut self, message: impl Into<String>) {
        self.emit_warning(DiagnosticEvent::Warn, message.into());
    }

    /// Warning emitted only in verbose mode.
    fn warning(&mut self, message: impl Into<String>) {
        if self.options.verbose_warnings {
            self.emit_warning(DiagnosticEvent::Warning, message.into());
        }
    }

    fn operator_ambiguous(&mut self, message: String) {
        self.emit_warning(DiagnosticEvent::OperatorAmbiguous, message);
    }

    /// Stop scanning: every later call yields end of input.
    fn halt(&mut self) -> TokenKind {
        self.halted = true;
        TokenKind::EndOfInput
    }
}
