//! Blocks, lambdas, and parameter lists.

use rip_ir::{Arg, DiagnosticEvent, NodeHandle, ParserEvent, Token, TokenKind};
use rip_lexer_core::SourceReader;
use tracing::trace;

use crate::operand::is_numbered_param;
use crate::{PResult, Parser};

/// Where a parameter list appears; block parameters take primaries as
/// defaults so that `|a = 1|` does not read the closing `|` as an operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParamContext {
    Method,
    Block,
    Lambda,
}

/// The seven slots of a `params` event.
#[derive(Default)]
struct ParamSlots {
    required: Vec<Arg>,
    optional: Vec<Arg>,
    rest: Option<NodeHandle>,
    post: Vec<Arg>,
    keywords: Vec<Arg>,
    kwrest: Option<NodeHandle>,
    block: Option<NodeHandle>,
}

impl<R: SourceReader> Parser<'_, R> {
    /// `{ |params| stmts }`.
    pub(crate) fn parse_brace_block(&mut self) -> PResult<NodeHandle> {
        self.lexer.locals_mut().push_scope(true);
        self.advance();
        let params = self.parse_block_var()?;
        let body = self.parse_stmts(&[TokenKind::RBrace]);
        self.lexer.locals_mut().pop_scope();
        let body = body?;
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(self.dispatch(ParserEvent::BraceBlock, &[params.into(), body.into()]))
    }

    /// `do |params| bodystmt end`.
    pub(crate) fn parse_do_block(&mut self) -> PResult<NodeHandle> {
        self.lexer.locals_mut().push_scope(true);
        self.advance();
        let params = self.parse_block_var()?;
        let body = self.parse_bodystmt();
        self.lexer.locals_mut().pop_scope();
        let body = body?;
        self.expect(TokenKind::KwEnd, "`end'")?;
        Ok(self.dispatch(ParserEvent::DoBlock, &[params.into(), body.into()]))
    }

    /// `|params; locals|`, or nothing.
    fn parse_block_var(&mut self) -> PResult<NodeHandle> {
        self.skip_newlines();
        if !self.at(TokenKind::Pipe) {
            return Ok(NodeHandle::NONE);
        }
        self.advance();
        let params =
            self.parse_params(&[TokenKind::Pipe, TokenKind::Semicolon], ParamContext::Block)?;
        let mut locals = Vec::new();
        if self.eat(TokenKind::Semicolon).is_some() {
            loop {
                let name = self.expect(TokenKind::Identifier, "block local variable")?;
                self.declare_param(&name);
                locals.push(Arg::node(name.node));
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::Pipe, "'|'")?;
        let locals = if locals.is_empty() {
            Arg::Bool(false)
        } else {
            Arg::List(locals)
        };
        Ok(self.dispatch(ParserEvent::BlockVar, &[params.into(), locals]))
    }

    /// `-> (params) { stmts }` or `-> params do bodystmt end`.
    pub(crate) fn parse_lambda(&mut self) -> PResult<NodeHandle> {
        let previous = self.lexer.begin_lambda();
        self.lexer.locals_mut().push_scope(true);
        self.advance();
        let result = self.parse_lambda_rest(previous);
        self.lexer.locals_mut().pop_scope();
        let (params, body) = result?;
        Ok(self.dispatch(ParserEvent::Lambda, &[params.into(), body.into()]))
    }

    fn parse_lambda_rest(&mut self, previous: i32) -> PResult<(NodeHandle, NodeHandle)> {
        let params = match self.kind() {
            TokenKind::ParenCall | TokenKind::LParen | TokenKind::LParenArg => {
                self.advance();
                let params = self.parse_params(&[TokenKind::RParen], ParamContext::Lambda)?;
                self.expect(TokenKind::RParen, "')'")?;
                self.dispatch(ParserEvent::Paren, &[params.into()])
            }
            TokenKind::LamBeg | TokenKind::KwDoLambda => self.empty_params(),
            _ => self.parse_params(
                &[TokenKind::LamBeg, TokenKind::KwDoLambda],
                ParamContext::Lambda,
            )?,
        };
        let body = match self.kind() {
            TokenKind::LamBeg => {
                self.lexer.end_lambda(previous);
                self.advance();
                let body = self.parse_stmts(&[TokenKind::RBrace])?;
                self.expect(TokenKind::RBrace, "'}'")?;
                body
            }
            TokenKind::KwDoLambda => {
                self.lexer.end_lambda(previous);
                self.advance();
                let body = self.parse_bodystmt()?;
                self.expect(TokenKind::KwEnd, "`end'")?;
                body
            }
            _ => return Err(self.unexpected(Some("'{' or `do'"))),
        };
        Ok((params, body))
    }

    pub(crate) fn empty_params(&mut self) -> NodeHandle {
        self.dispatch(ParserEvent::Params, &vec![Arg::Nil; 7])
    }

    /// A parameter list ending before one of `close`.
    pub(crate) fn parse_params(
        &mut self,
        close: &[TokenKind],
        context: ParamContext,
    ) -> PResult<NodeHandle> {
        let mut slots = ParamSlots::default();
        loop {
            if self.at_any(close) {
                break;
            }
            match self.kind() {
                TokenKind::Identifier => {
                    let name = self.advance_param();
                    if self.at(TokenKind::Assign) {
                        self.advance();
                        let default = if context == ParamContext::Block {
                            self.parse_primary_value()?
                        } else {
                            self.parse_arg()?
                        };
                        slots
                            .optional
                            .push(Arg::List(vec![Arg::node(name.node), Arg::node(default)]));
                    } else if slots.rest.is_some() || !slots.optional.is_empty() {
                        slots.post.push(Arg::node(name.node));
                    } else {
                        slots.required.push(Arg::node(name.node));
                    }
                }
                TokenKind::Star | TokenKind::Mul => {
                    self.advance();
                    let name = self.optional_param_name();
                    slots.rest = Some(self.dispatch(ParserEvent::RestParam, &[name.into()]));
                }
                TokenKind::DStar | TokenKind::Pow => {
                    self.advance();
                    slots.kwrest = Some(if self.at(TokenKind::KwNil) {
                        self.advance();
                        self.dispatch(ParserEvent::NokwParam, &[Arg::Nil])
                    } else {
                        let name = self.optional_param_name();
                        self.dispatch(ParserEvent::KwrestParam, &[name.into()])
                    });
                }
                TokenKind::Amper | TokenKind::Amp => {
                    self.advance();
                    let name = self.optional_param_name();
                    slots.block = Some(self.dispatch(ParserEvent::Blockarg, &[name.into()]));
                }
                TokenKind::BDot3 | TokenKind::Dot3 if context == ParamContext::Method => {
                    self.advance();
                    slots.rest = Some(self.dispatch(ParserEvent::ArgsForward, &[]));
                }
                TokenKind::Label => {
                    let label = self.advance();
                    let name = label.text.trim_end_matches(':');
                    self.declare_param_name(name, &label);
                    let value = if self.at(TokenKind::Comma) || self.at_any(close) {
                        Arg::Bool(false)
                    } else if context == ParamContext::Block {
                        Arg::node(self.parse_primary_value()?)
                    } else {
                        Arg::node(self.parse_arg()?)
                    };
                    slots.keywords.push(Arg::List(vec![Arg::node(label.node), value]));
                }
                TokenKind::Ivar | TokenKind::Gvar | TokenKind::Cvar | TokenKind::Constant => {
                    let bad = self.advance();
                    let what = match bad.kind {
                        TokenKind::Ivar => "an instance variable",
                        TokenKind::Gvar => "a global variable",
                        TokenKind::Cvar => "a class variable",
                        _ => "a constant",
                    };
                    let node = bad.node;
                    let error = self.soft_error(
                        ParserEvent::ParamError,
                        DiagnosticEvent::ParamError,
                        format!("formal argument cannot be {what}"),
                        &bad,
                        node,
                    );
                    slots.required.push(Arg::node(error));
                }
                _ => return Err(self.unexpected(Some("parameter"))),
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            if context == ParamContext::Block && self.at(TokenKind::Pipe) {
                let comma = self.dispatch(ParserEvent::ExcessedComma, &[]);
                slots.rest = Some(comma);
                break;
            }
        }
        Ok(self.dispatch_params(slots))
    }

    fn dispatch_params(&mut self, slots: ParamSlots) -> NodeHandle {
        let list = Self::list_or_nil;
        self.dispatch(
            ParserEvent::Params,
            &[
                list(slots.required),
                list(slots.optional),
                slots.rest.into(),
                list(slots.post),
                list(slots.keywords),
                slots.kwrest.into(),
                slots.block.into(),
            ],
        )
    }

    /// Consume a parameter name, declaring it.
    fn advance_param(&mut self) -> Token {
        let name = self.current.clone();
        self.declare_param(&name);
        self.advance();
        name
    }

    /// The name after `*`, `**`, or `&`, if there is one.
    fn optional_param_name(&mut self) -> NodeHandle {
        if self.at(TokenKind::Identifier) {
            self.advance_param().node
        } else {
            NodeHandle::NONE
        }
    }

    fn declare_param(&mut self, name: &Token) {
        self.declare_param_name(&name.text, name);
    }

    /// Declare a parameter in the innermost scope, reporting duplicates,
    /// reserved names, and shadowed outer locals.
    fn declare_param_name(&mut self, name: &str, at: &Token) {
        if is_numbered_param(name) {
            self.lexer.report(
                rip_diagnostic::Diagnostic::error(DiagnosticEvent::ParamError)
                    .with_message(format!("{name} is reserved for numbered parameter"))
                    .at(at.span, at.pos),
            );
        } else if !name.starts_with('_') && self.lexer.locals().is_declared_here(name) {
            let node = at.node;
            self.soft_error(
                ParserEvent::ParamError,
                DiagnosticEvent::ParamError,
                "duplicated argument name".to_owned(),
                at,
                node,
            );
        } else if self.lexer.locals().shadows_outer(name) {
            self.verbose_warning(format!("shadowing outer local variable - {name}"), at);
        }
        trace!(name, "declare parameter");
        self.lexer.locals_mut().declare(name);
    }
}
