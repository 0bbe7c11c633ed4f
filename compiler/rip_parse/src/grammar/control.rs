//! Conditionals, loops, `case`, `begin`/`rescue`, and jumps.

use rip_ir::{Arg, LexState, NodeHandle, ParserEvent, TokenKind};
use rip_lexer_core::SourceReader;

use super::expr::begins_value;
use crate::operand::Operand;
use crate::stack::ensure_sufficient_stack;
use crate::{PResult, Parser};

/// Tokens that end the statements of a `begin`-like body section.
const BODY_STOP: &[TokenKind] = &[
    TokenKind::KwRescue,
    TokenKind::KwElse,
    TokenKind::KwEnsure,
    TokenKind::KwEnd,
];

const IF_STOP: &[TokenKind] = &[TokenKind::KwElsif, TokenKind::KwElse, TokenKind::KwEnd];

impl<R: SourceReader> Parser<'_, R> {
    /// `if`/`unless` with their `elsif`/`else` tails.
    pub(crate) fn parse_if(&mut self) -> PResult<NodeHandle> {
        let keyword = self.advance();
        let cond = self.parse_expr(false)?;
        self.expect_then()?;
        let body = self.parse_stmts(IF_STOP)?;
        let (event, tail) = if keyword.kind == TokenKind::KwIf {
            (ParserEvent::If, self.parse_if_tail()?)
        } else {
            (ParserEvent::Unless, self.parse_else()?)
        };
        self.expect(TokenKind::KwEnd, "`end'")?;
        Ok(self.dispatch(event, &[cond.into(), body.into(), tail.into()]))
    }

    fn parse_if_tail(&mut self) -> PResult<NodeHandle> {
        if self.eat(TokenKind::KwElsif).is_none() {
            return self.parse_else();
        }
        let cond = self.parse_expr(false)?;
        self.expect_then()?;
        let body = self.parse_stmts(IF_STOP)?;
        let tail = ensure_sufficient_stack(|| self.parse_if_tail())?;
        Ok(self.dispatch(
            ParserEvent::Elsif,
            &[cond.into(), body.into(), tail.into()],
        ))
    }

    fn parse_else(&mut self) -> PResult<NodeHandle> {
        if self.eat(TokenKind::KwElse).is_none() {
            return Ok(NodeHandle::NONE);
        }
        let body = self.parse_stmts(&[TokenKind::KwEnd])?;
        Ok(self.dispatch(ParserEvent::Else, &[body.into()]))
    }

    /// `while`/`until`. The condition is scanned with the condition bit
    /// set, so its `do` closes the header.
    pub(crate) fn parse_while(&mut self) -> PResult<NodeHandle> {
        let event = if self.at(TokenKind::KwWhile) {
            ParserEvent::While
        } else {
            ParserEvent::Until
        };
        self.lexer.cond_push(true);
        self.advance();
        let cond = self.parse_expr(false);
        self.lexer.cond_pop();
        let cond = cond?;
        self.expect_do()?;
        let body = self.parse_stmts(&[TokenKind::KwEnd])?;
        self.expect(TokenKind::KwEnd, "`end'")?;
        Ok(self.dispatch(event, &[cond.into(), body.into()]))
    }

    /// `for targets in expr do ... end`.
    pub(crate) fn parse_for(&mut self) -> PResult<NodeHandle> {
        self.advance();
        let var = if self.at(TokenKind::Star) {
            let mlhs = self.dispatch(ParserEvent::MlhsNew, &[]);
            self.parse_mlhs_items(mlhs, &[TokenKind::KwIn])?
        } else {
            let first = self.parse_primary_operand()?;
            let first = self.target(first)?;
            if self.eat(TokenKind::Comma).is_some() {
                let mlhs = self.dispatch(ParserEvent::MlhsNew, &[]);
                let mlhs = self.dispatch(ParserEvent::MlhsAdd, &[mlhs.into(), first.into()]);
                self.parse_mlhs_items(mlhs, &[TokenKind::KwIn])?
            } else {
                first
            }
        };
        if !self.at(TokenKind::KwIn) {
            return Err(self.unexpected(Some("`in'")));
        }
        self.lexer.cond_push(true);
        self.advance();
        let iter = self.parse_expr(false);
        self.lexer.cond_pop();
        let iter = iter?;
        self.expect_do()?;
        let body = self.parse_stmts(&[TokenKind::KwEnd])?;
        self.expect(TokenKind::KwEnd, "`end'")?;
        Ok(self.dispatch(ParserEvent::For, &[var.into(), iter.into(), body.into()]))
    }

    /// `case [subject] when ... end` or `case subject in ... end`.
    pub(crate) fn parse_case(&mut self) -> PResult<NodeHandle> {
        self.advance();
        let subject = if self.at_term() {
            NodeHandle::NONE
        } else {
            self.parse_expr(false)?
        };
        self.skip_terms();
        let clauses = match self.kind() {
            TokenKind::KwWhen => self.parse_when()?,
            TokenKind::KwIn => self.parse_in()?,
            _ => return Err(self.unexpected(Some("`when'"))),
        };
        self.expect(TokenKind::KwEnd, "`end'")?;
        Ok(self.dispatch(ParserEvent::Case, &[subject.into(), clauses.into()]))
    }

    fn parse_when(&mut self) -> PResult<NodeHandle> {
        self.advance();
        let values = self.parse_call_args(None)?;
        self.expect_then()?;
        let body = self.parse_stmts(&[TokenKind::KwWhen, TokenKind::KwElse, TokenKind::KwEnd])?;
        let next = if self.at(TokenKind::KwWhen) {
            ensure_sufficient_stack(|| self.parse_when())?
        } else {
            self.parse_else()?
        };
        Ok(self.dispatch(
            ParserEvent::When,
            &[values.into(), body.into(), next.into()],
        ))
    }

    fn parse_in(&mut self) -> PResult<NodeHandle> {
        self.lexer.set_lex_state(LexState::BEG | LexState::LABEL);
        self.lexer.set_command_start(false);
        let in_kwarg = self.lexer.set_in_kwarg(true);
        self.advance();
        let pattern = self.parse_pattern_top();
        self.lexer.set_in_kwarg(in_kwarg);
        let pattern = pattern?;
        self.expect_then()?;
        let body = self.parse_stmts(&[TokenKind::KwIn, TokenKind::KwElse, TokenKind::KwEnd])?;
        let next = if self.at(TokenKind::KwIn) {
            ensure_sufficient_stack(|| self.parse_in())?
        } else {
            self.parse_else()?
        };
        Ok(self.dispatch(
            ParserEvent::In,
            &[pattern.into(), body.into(), next.into()],
        ))
    }

    /// `begin bodystmt end`.
    pub(crate) fn parse_begin(&mut self) -> PResult<NodeHandle> {
        self.advance();
        let body = self.parse_bodystmt()?;
        self.expect(TokenKind::KwEnd, "`end'")?;
        Ok(self.dispatch(ParserEvent::Begin, &[body.into()]))
    }

    /// Statements with optional `rescue`, `else`, and `ensure` sections,
    /// up to (not including) `end`.
    pub(crate) fn parse_bodystmt(&mut self) -> PResult<NodeHandle> {
        let stmts = self.parse_stmts(BODY_STOP)?;
        let rescue = if self.at(TokenKind::KwRescue) {
            self.parse_rescue()?
        } else {
            NodeHandle::NONE
        };
        let otherwise = if self.eat(TokenKind::KwElse).is_some() {
            self.parse_stmts(&[TokenKind::KwEnsure, TokenKind::KwEnd])?
        } else {
            NodeHandle::NONE
        };
        let ensure = if self.eat(TokenKind::KwEnsure).is_some() {
            let body = self.parse_stmts(&[TokenKind::KwEnd])?;
            self.dispatch(ParserEvent::Ensure, &[body.into()])
        } else {
            NodeHandle::NONE
        };
        Ok(self.dispatch(
            ParserEvent::Bodystmt,
            &[stmts.into(), rescue.into(), otherwise.into(), ensure.into()],
        ))
    }

    /// `rescue [classes] [=> var] then stmts`, chained.
    fn parse_rescue(&mut self) -> PResult<NodeHandle> {
        self.advance();
        let mut classes = Vec::new();
        while !self.at_term() && !self.at_any(&[TokenKind::Assoc, TokenKind::KwThen]) {
            let class = if self.eat(TokenKind::Star).is_some() {
                let value = self.parse_arg()?;
                let mrhs = self.dispatch(ParserEvent::MrhsNew, &[]);
                self.dispatch(ParserEvent::MrhsAddStar, &[mrhs.into(), value.into()])
            } else {
                self.parse_arg()?
            };
            classes.push(Arg::node(class));
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        let var = if self.eat(TokenKind::Assoc).is_some() {
            let var = self.parse_primary_operand()?;
            self.target(var)?
        } else {
            NodeHandle::NONE
        };
        self.expect_then()?;
        let body = self.parse_stmts(BODY_STOP)?;
        let next = if self.at(TokenKind::KwRescue) {
            ensure_sufficient_stack(|| self.parse_rescue())?
        } else {
            NodeHandle::NONE
        };
        Ok(self.dispatch(
            ParserEvent::Rescue,
            &[Self::list_or_nil(classes), var.into(), body.into(), next.into()],
        ))
    }

    /// `return`, `break`, `next`, with or without arguments.
    pub(crate) fn parse_jump(&mut self) -> PResult<NodeHandle> {
        let keyword = self.advance();
        let args = if begins_value(self.kind()) || self.at(TokenKind::Star) {
            Some(self.parse_call_args(None)?)
        } else {
            None
        };
        let node = match (keyword.kind, args) {
            (TokenKind::KwReturn, Some(args)) => self.dispatch(ParserEvent::Return, &[args.into()]),
            (TokenKind::KwReturn, None) => self.dispatch(ParserEvent::Return0, &[]),
            (kind, args) => {
                let args = match args {
                    Some(args) => args,
                    None => self.dispatch(ParserEvent::ArgsNew, &[]),
                };
                let event = if kind == TokenKind::KwBreak {
                    ParserEvent::Break
                } else {
                    ParserEvent::Next
                };
                self.dispatch(event, &[args.into()])
            }
        };
        Ok(node)
    }

    /// `yield`, `yield(args)`, `yield args`.
    pub(crate) fn parse_yield(&mut self) -> PResult<NodeHandle> {
        self.advance();
        if self.at(TokenKind::ParenCall) {
            self.advance();
            self.skip_newlines();
            let args = if self.at(TokenKind::RParen) {
                NodeHandle::NONE
            } else {
                self.parse_call_args(Some(TokenKind::RParen))?
            };
            self.skip_newlines();
            self.expect(TokenKind::RParen, "')'")?;
            let paren = self.dispatch(ParserEvent::Paren, &[args.into()]);
            return Ok(self.dispatch(ParserEvent::Yield, &[paren.into()]));
        }
        if self.starts_command_args() {
            let args = self.parse_command_args()?;
            return Ok(self.dispatch(ParserEvent::Yield, &[args.into()]));
        }
        Ok(self.dispatch(ParserEvent::Yield0, &[]))
    }

    /// `super`, `super(args)`, `super args`; a block may follow.
    pub(crate) fn parse_super(&mut self) -> PResult<Operand> {
        self.advance();
        if self.at(TokenKind::ParenCall) {
            let args = self.parse_paren_args()?;
            return Ok(Operand::Call(
                self.dispatch(ParserEvent::Super, &[args.into()]),
            ));
        }
        if self.starts_command_args() {
            let args = self.parse_command_args()?;
            let node = self.dispatch(ParserEvent::Super, &[args.into()]);
            return self.parse_command_block(node);
        }
        Ok(Operand::Call(self.dispatch(ParserEvent::Zsuper, &[])))
    }
}
