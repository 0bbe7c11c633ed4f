//! Lookahead navigation and event dispatch helpers.

use rip_ir::{Arg, EventPos, NodeHandle, ParserEvent, Token, TokenKind};
use rip_lexer_core::SourceReader;

use crate::{PResult, Parser};

impl<R: SourceReader> Parser<'_, R> {
    #[inline]
    pub(crate) fn kind(&self) -> TokenKind {
        self.current.kind
    }

    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    #[inline]
    pub(crate) fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current.kind)
    }

    /// At `\n` or `;`.
    #[inline]
    pub(crate) fn at_term(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Semicolon)
    }

    /// Consume the lookahead and scan the next token.
    pub(crate) fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, expecting: &str) -> PResult<Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(Some(expecting)))
        }
    }

    pub(crate) fn skip_terms(&mut self) {
        while self.at_term() {
            self.advance();
        }
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    /// `then`, a terminator, or a terminator followed by `then`.
    pub(crate) fn expect_then(&mut self) -> PResult<()> {
        if self.eat(TokenKind::KwThen).is_some() {
            return Ok(());
        }
        if !self.at_term() {
            return Err(self.unexpected(Some("`then' or ';' or '\\n'")));
        }
        self.skip_terms();
        self.eat(TokenKind::KwThen);
        Ok(())
    }

    /// `do` of a loop header or a terminator.
    pub(crate) fn expect_do(&mut self) -> PResult<()> {
        if self.eat(TokenKind::KwDoCond).is_some() {
            return Ok(());
        }
        if !self.at_term() {
            return Err(self.unexpected(Some("`do' or ';' or '\\n'")));
        }
        self.skip_terms();
        Ok(())
    }

    /// Event position anchored at the lookahead.
    pub(crate) fn pos(&self) -> EventPos {
        EventPos {
            line: self.current.pos.line,
            column: self.current.pos.column,
            offset: self.current.span.start,
            state: self.current.state,
        }
    }

    pub(crate) fn dispatch(&mut self, event: ParserEvent, args: &[Arg]) -> NodeHandle {
        let at = self.pos();
        self.lexer.dispatch(event, args, at)
    }

    /// `nil` for an empty list, otherwise the list.
    pub(crate) fn list_or_nil(items: Vec<Arg>) -> Arg {
        if items.is_empty() {
            Arg::Nil
        } else {
            Arg::List(items)
        }
    }
}
