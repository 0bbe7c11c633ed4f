//! Method, class, and module definitions.
//!
//! Each body opens a fresh local-variable scope that does not see the
//! enclosing one. The scope is closed while `end` is the lookahead, so the
//! token after `end` is scanned with the outer locals again.

use rip_ir::{DiagnosticEvent, LexState, NodeHandle, ParserEvent, Token, TokenKind};
use rip_lexer_core::SourceReader;
use tracing::debug;

use super::block::ParamContext;
use crate::operand::Operand;
use crate::{PResult, Parser};

impl<R: SourceReader> Parser<'_, R> {
    /// `def name(params) ... end`, `def recv.name ...`, and the endless
    /// `def name(params) = expr`.
    pub(crate) fn parse_def(&mut self) -> PResult<NodeHandle> {
        self.advance();
        self.lexer.locals_mut().push_scope(false);
        let first = self.advance();
        let singleton = if self.at_any(&[TokenKind::Period, TokenKind::Colon2]) {
            let recv = self.dispatch(ParserEvent::VarRef, &[first.node.into()]);
            self.lexer.set_lex_state(LexState::FNAME);
            let op = self.advance();
            Some((recv, op))
        } else {
            None
        };
        let name = match singleton {
            Some(_) => self.advance(),
            None => first,
        };
        debug!(name = %name.text, singleton = singleton.is_some(), "method definition");
        let params = self.parse_def_params()?;
        let endless = self.eat(TokenKind::Assign).is_some();
        let body = if endless {
            self.parse_endless_body()
        } else {
            self.parse_def_body()
        };
        self.lexer.locals_mut().pop_scope();
        let body = body?;
        if !endless {
            self.advance();
        }
        let node = match singleton {
            Some((recv, op)) => self.dispatch(
                ParserEvent::Defs,
                &[
                    recv.into(),
                    op.node.into(),
                    name.node.into(),
                    params.into(),
                    body.into(),
                ],
            ),
            None => self.dispatch(
                ParserEvent::Def,
                &[name.node.into(), params.into(), body.into()],
            ),
        };
        Ok(node)
    }

    fn parse_def_params(&mut self) -> PResult<NodeHandle> {
        if matches!(
            self.kind(),
            TokenKind::ParenCall | TokenKind::LParen | TokenKind::LParenArg
        ) {
            self.advance();
            self.skip_newlines();
            let params = self.parse_params(&[TokenKind::RParen], ParamContext::Method)?;
            self.skip_newlines();
            if !self.at(TokenKind::RParen) {
                return Err(self.unexpected(Some("')'")));
            }
            self.lexer.set_lex_state(LexState::BEG);
            self.lexer.set_command_start(true);
            self.advance();
            return Ok(self.dispatch(ParserEvent::Paren, &[params.into()]));
        }
        if self.at_term() || self.at(TokenKind::Assign) {
            return Ok(self.empty_params());
        }
        let in_kwarg = self.lexer.set_in_kwarg(true);
        let params =
            self.parse_params(&[TokenKind::Newline, TokenKind::Semicolon], ParamContext::Method);
        self.lexer.set_in_kwarg(in_kwarg);
        params
    }

    /// Body of a `def`, leaving `end` as the lookahead.
    fn parse_def_body(&mut self) -> PResult<NodeHandle> {
        let body = self.parse_bodystmt()?;
        if !self.at(TokenKind::KwEnd) {
            return Err(self.unexpected(Some("`end'")));
        }
        Ok(body)
    }

    /// `= expr [rescue expr]` of an endless method.
    fn parse_endless_body(&mut self) -> PResult<NodeHandle> {
        let mut body = self.parse_arg()?;
        if self.eat(TokenKind::ModRescue).is_some() {
            let rescue = self.parse_arg()?;
            body = self.dispatch(ParserEvent::RescueMod, &[body.into(), rescue.into()]);
        }
        Ok(self.dispatch(
            ParserEvent::Bodystmt,
            &[body.into(), rip_ir::Arg::Nil, rip_ir::Arg::Nil, rip_ir::Arg::Nil],
        ))
    }

    /// `class Name [< super] ... end` and `class << obj ... end`.
    pub(crate) fn parse_class(&mut self) -> PResult<NodeHandle> {
        self.advance();
        if self.eat(TokenKind::LShift).is_some() {
            let target = self.parse_expr(false)?;
            let body = self.parse_scoped_body()?;
            return Ok(self.dispatch(ParserEvent::Sclass, &[target.into(), body.into()]));
        }
        let cpath = self.parse_cpath()?;
        let superclass = if self.eat(TokenKind::Lt).is_some() {
            self.parse_expr(false)?
        } else {
            NodeHandle::NONE
        };
        let body = self.parse_scoped_body()?;
        Ok(self.dispatch(
            ParserEvent::Class,
            &[cpath.into(), superclass.into(), body.into()],
        ))
    }

    /// `module Name ... end`.
    pub(crate) fn parse_module(&mut self) -> PResult<NodeHandle> {
        self.advance();
        let cpath = self.parse_cpath()?;
        let body = self.parse_scoped_body()?;
        Ok(self.dispatch(ParserEvent::Module, &[cpath.into(), body.into()]))
    }

    /// A class or module body in its own scope, through `end`.
    fn parse_scoped_body(&mut self) -> PResult<NodeHandle> {
        self.lexer.locals_mut().push_scope(false);
        let body = self.parse_bodystmt();
        self.lexer.locals_mut().pop_scope();
        let body = body?;
        self.expect(TokenKind::KwEnd, "`end'")?;
        Ok(body)
    }

    /// The name after `class`/`module`.
    fn parse_cpath(&mut self) -> PResult<NodeHandle> {
        let operand = self.parse_primary_operand()?;
        let node = match operand {
            Operand::Var(name) if name.kind == TokenKind::Constant => {
                self.dispatch(ParserEvent::ConstRef, &[name.node.into()])
            }
            Operand::ConstPath {
                scope: Some(scope),
                name,
            } => self.dispatch(ParserEvent::ConstPathRef, &[scope.into(), name.node.into()]),
            Operand::ConstPath { scope: None, name } => {
                self.dispatch(ParserEvent::TopConstRef, &[name.node.into()])
            }
            other => {
                let at = self.operand_token(&other);
                let value = self.value(other);
                self.soft_error(
                    ParserEvent::ClassNameError,
                    DiagnosticEvent::ClassNameError,
                    "class/module name must be CONSTANT".to_owned(),
                    &at,
                    value,
                )
            }
        };
        Ok(node)
    }

    /// A token to anchor a diagnostic about `operand`.
    fn operand_token(&self, operand: &Operand) -> Token {
        match operand {
            Operand::Var(token) => token.clone(),
            Operand::Attr { name, .. } | Operand::ConstPath { name, .. } => name.clone(),
            _ => self.current.clone(),
        }
    }
}
