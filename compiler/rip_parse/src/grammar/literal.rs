//! String-like literals, arrays, and hashes.
//!
//! The lexer frames every quoted literal as a begin token, a run of
//! content/interpolation tokens, and an end token; heredoc bodies arrive the
//! same way, right after their `<<ID` opener. Interpolations are scanned as
//! ordinary statements between a checkpoint and its restore.

use rip_ir::{Arg, NodeHandle, ParserEvent, Token, TokenKind, TokenValue};
use rip_lexer_core::SourceReader;
use tracing::trace;

use crate::operand::Operand;
use crate::{PResult, Parser};

/// A heredoc opener dispatches `heredoc_beg` itself and leaves its token
/// without text.
fn is_heredoc_opener(token: &Token) -> bool {
    token.text.is_empty()
}

/// A double-quoted literal, which may have turned out to be a `"key":`
/// label.
pub(crate) enum Literal {
    Value(NodeHandle),
    /// The `dyna_symbol` key of a quoted label.
    Label(NodeHandle),
}

impl<R: SourceReader> Parser<'_, R> {
    /// `"..."`, `'...'`, `%q(...)`, heredocs, and adjacent concatenations.
    pub(crate) fn parse_string(&mut self) -> PResult<Literal> {
        let (mut string, heredoc) = match self.parse_single_string()? {
            (Literal::Value(string), heredoc) => (string, heredoc),
            (label, _) => return Ok(label),
        };
        if heredoc {
            return Ok(Literal::Value(string));
        }
        while self.at(TokenKind::StringBeg) && !is_heredoc_opener(&self.current) {
            let next = match self.parse_single_string()? {
                (Literal::Value(next), _) => next,
                (Literal::Label(_), _) => return Err(self.unexpected(None)),
            };
            string = self.dispatch(ParserEvent::StringConcat, &[string.into(), next.into()]);
        }
        Ok(Literal::Value(string))
    }

    /// One literal; the flag is set for heredocs.
    fn parse_single_string(&mut self) -> PResult<(Literal, bool)> {
        let beg = self.advance();
        let heredoc = is_heredoc_opener(&beg);
        let (content, end) =
            self.parse_string_parts(ParserEvent::StringContent, ParserEvent::StringAdd)?;
        if end.kind == TokenKind::LabelEnd {
            let key = self.dispatch(ParserEvent::DynaSymbol, &[content.into()]);
            return Ok((Literal::Label(key), heredoc));
        }
        let content = match end.value {
            TokenValue::Dedent(width) => {
                trace!(width, "squiggly heredoc");
                self.dispatch(
                    ParserEvent::HeredocDedent,
                    &[content.into(), Arg::Int(i64::from(width))],
                )
            }
            _ => content,
        };
        let string = self.dispatch(ParserEvent::StringLiteral, &[content.into()]);
        Ok((Literal::Value(string), heredoc))
    }

    /// Content and interpolations up to the closing token, which is
    /// consumed and returned.
    fn parse_string_parts(
        &mut self,
        new: ParserEvent,
        add: ParserEvent,
    ) -> PResult<(NodeHandle, Token)> {
        let mut content = self.dispatch(new, &[]);
        loop {
            let part = match self.kind() {
                TokenKind::StringContent => self.advance().node,
                TokenKind::EmbexprBeg => self.parse_embexpr()?,
                TokenKind::EmbVar => self.parse_embvar()?,
                TokenKind::StringEnd | TokenKind::LabelEnd | TokenKind::RegexpEnd => {
                    return Ok((content, self.advance()));
                }
                _ => return Err(self.unexpected(Some("string literal end"))),
            };
            content = self.dispatch(add, &[content.into(), part.into()]);
        }
    }

    /// `#{ stmts }`.
    fn parse_embexpr(&mut self) -> PResult<NodeHandle> {
        let checkpoint = self.lexer.checkpoint();
        self.lexer.enter_interpolation();
        self.advance();
        let stmts = self.parse_stmts(&[TokenKind::EmbexprEnd])?;
        if !self.at(TokenKind::EmbexprEnd) {
            return Err(self.unexpected(Some("'}'")));
        }
        self.lexer.restore(checkpoint);
        self.advance();
        Ok(self.dispatch(ParserEvent::StringEmbexpr, &[stmts.into()]))
    }

    /// `#@ivar`, `#$gvar`, `#@@cvar`.
    fn parse_embvar(&mut self) -> PResult<NodeHandle> {
        let checkpoint = self.lexer.checkpoint();
        self.lexer.enter_embedded_var();
        self.advance();
        if !matches!(
            self.kind(),
            TokenKind::Ivar | TokenKind::Gvar | TokenKind::Cvar | TokenKind::NthRef | TokenKind::BackRef
        ) {
            return Err(self.unexpected(Some("variable")));
        }
        self.lexer.restore(checkpoint);
        let var = self.advance();
        let var = self.dispatch(ParserEvent::VarRef, &[var.node.into()]);
        Ok(self.dispatch(ParserEvent::StringDvar, &[var.into()]))
    }

    /// `` `cmd` `` and `%x(...)`.
    pub(crate) fn parse_xstring(&mut self) -> PResult<NodeHandle> {
        self.advance();
        let (content, _) =
            self.parse_string_parts(ParserEvent::XstringNew, ParserEvent::XstringAdd)?;
        Ok(self.dispatch(ParserEvent::XstringLiteral, &[content.into()]))
    }

    /// `/re/opts` and `%r{...}`.
    pub(crate) fn parse_regexp(&mut self) -> PResult<NodeHandle> {
        self.advance();
        let (content, end) =
            self.parse_string_parts(ParserEvent::RegexpNew, ParserEvent::RegexpAdd)?;
        Ok(self.dispatch(ParserEvent::RegexpLiteral, &[content.into(), end.node.into()]))
    }

    /// `:name`, `:"..."`, `%s(...)`.
    pub(crate) fn parse_symbol(&mut self) -> PResult<NodeHandle> {
        let beg = self.advance();
        if beg.text != ":" {
            let (content, _) =
                self.parse_string_parts(ParserEvent::StringContent, ParserEvent::StringAdd)?;
            return Ok(self.dispatch(ParserEvent::DynaSymbol, &[content.into()]));
        }
        if matches!(
            self.kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::EndOfInput
        ) {
            return Err(self.unexpected(Some("symbol name")));
        }
        let name = self.advance();
        let symbol = self.dispatch(ParserEvent::Symbol, &[name.node.into()]);
        Ok(self.dispatch(ParserEvent::SymbolLiteral, &[symbol.into()]))
    }

    /// `%w`, `%W`, `%i`, `%I` lists.
    pub(crate) fn parse_word_list(&mut self) -> PResult<NodeHandle> {
        let beg = self.advance();
        let (new, add, interpolating) = match beg.kind {
            TokenKind::QWordsBeg => (ParserEvent::QwordsNew, ParserEvent::QwordsAdd, false),
            TokenKind::QSymbolsBeg => (ParserEvent::QsymbolsNew, ParserEvent::QsymbolsAdd, false),
            TokenKind::WordsBeg => (ParserEvent::WordsNew, ParserEvent::WordsAdd, true),
            _ => (ParserEvent::SymbolsNew, ParserEvent::SymbolsAdd, true),
        };
        let mut list = self.dispatch(new, &[]);
        loop {
            match self.kind() {
                TokenKind::WordSep => {
                    self.advance();
                }
                TokenKind::StringEnd => {
                    self.advance();
                    break;
                }
                TokenKind::StringContent if !interpolating => {
                    let element = self.advance().node;
                    list = self.dispatch(add, &[list.into(), element.into()]);
                }
                TokenKind::StringContent | TokenKind::EmbexprBeg | TokenKind::EmbVar
                    if interpolating =>
                {
                    let word = self.parse_word()?;
                    list = self.dispatch(add, &[list.into(), word.into()]);
                }
                _ => return Err(self.unexpected(Some("string literal end"))),
            }
        }
        Ok(self.dispatch(ParserEvent::Array, &[list.into()]))
    }

    /// One element of `%W`/`%I`: adjacent content and interpolations.
    fn parse_word(&mut self) -> PResult<NodeHandle> {
        let mut word = self.dispatch(ParserEvent::WordNew, &[]);
        loop {
            let part = match self.kind() {
                TokenKind::StringContent => self.advance().node,
                TokenKind::EmbexprBeg => self.parse_embexpr()?,
                TokenKind::EmbVar => self.parse_embvar()?,
                _ => return Ok(word),
            };
            word = self.dispatch(ParserEvent::WordAdd, &[word.into(), part.into()]);
        }
    }

    /// `[ args ]`.
    pub(crate) fn parse_array(&mut self) -> PResult<NodeHandle> {
        self.advance();
        self.skip_newlines();
        let args = if self.at(TokenKind::RBrack) {
            NodeHandle::NONE
        } else {
            self.parse_call_args(Some(TokenKind::RBrack))?
        };
        self.skip_newlines();
        self.expect(TokenKind::RBrack, "']'")?;
        Ok(self.dispatch(ParserEvent::Array, &[args.into()]))
    }

    /// `{ assocs }`.
    pub(crate) fn parse_hash(&mut self) -> PResult<NodeHandle> {
        self.advance();
        self.skip_newlines();
        let mut assocs = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let assoc = self.parse_assoc()?;
            assocs.push(Arg::node(assoc));
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            self.skip_newlines();
        }
        self.skip_newlines();
        self.expect(TokenKind::RBrace, "'}'")?;
        let list = if assocs.is_empty() {
            NodeHandle::NONE
        } else {
            self.dispatch(ParserEvent::AssoclistFromArgs, &[Arg::List(assocs)])
        };
        Ok(self.dispatch(ParserEvent::Hash, &[list.into()]))
    }

    fn parse_assoc(&mut self) -> PResult<NodeHandle> {
        match self.kind() {
            TokenKind::Label => self.parse_label_assoc(Some(TokenKind::RBrace)),
            TokenKind::DStar => {
                self.advance();
                let value = self.parse_arg()?;
                Ok(self.dispatch(ParserEvent::AssocSplat, &[value.into()]))
            }
            kind => {
                if kind == TokenKind::StringBeg {
                    match self.parse_string()? {
                        Literal::Label(key) => {
                            self.skip_newlines();
                            let value = self.parse_arg()?;
                            return Ok(
                                self.dispatch(ParserEvent::AssocNew, &[key.into(), value.into()])
                            );
                        }
                        Literal::Value(string) => self.pending = Some(Operand::Node(string)),
                    }
                }
                let key = self.parse_arg()?;
                self.expect(TokenKind::Assoc, "'=>'")?;
                self.skip_newlines();
                let value = self.parse_arg()?;
                Ok(self.dispatch(ParserEvent::AssocNew, &[key.into(), value.into()]))
            }
        }
    }
}
