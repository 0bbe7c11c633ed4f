//! Primaries, postfix chains, and call arguments.

use rip_ir::{Arg, NodeHandle, ParserEvent, Token, TokenKind};
use rip_lexer::begins_argument;
use rip_lexer_core::SourceReader;

use super::literal::Literal;
use crate::operand::{call_op, Operand};
use crate::stack::ensure_sufficient_stack;
use crate::{PResult, Parser};

impl<R: SourceReader> Parser<'_, R> {
    /// A primary followed by its `.`/`::`/`[]`/block postfixes.
    pub(crate) fn parse_primary_operand(&mut self) -> PResult<Operand> {
        ensure_sufficient_stack(|| {
            let primary = self.parse_primary()?;
            self.parse_postfix(primary)
        })
    }

    /// A primary, dispatched as a read.
    pub(crate) fn parse_primary_value(&mut self) -> PResult<NodeHandle> {
        let operand = self.parse_primary_operand()?;
        Ok(self.value(operand))
    }

    fn parse_primary(&mut self) -> PResult<Operand> {
        if let Some(pending) = self.pending.take() {
            return Ok(pending);
        }
        use TokenKind::*;
        let node = match self.kind() {
            Integer | Float | Rational | Imaginary | Char => {
                return Ok(Operand::Node(self.advance().node));
            }
            Identifier | Fid | Constant => return self.parse_identifier(),
            Ivar | Gvar | Cvar | NthRef | BackRef | KwNil | KwTrue | KwFalse | KwSelf | KwFile
            | KwLine | KwEncoding => return Ok(Operand::Var(self.advance())),
            StringBeg => match self.parse_string()? {
                Literal::Value(node) => node,
                Literal::Label(_) => return Err(self.unexpected(None)),
            },
            XStringBeg => self.parse_xstring()?,
            RegexpBeg => self.parse_regexp()?,
            SymBeg => self.parse_symbol()?,
            WordsBeg | QWordsBeg | SymbolsBeg | QSymbolsBeg => self.parse_word_list()?,
            LBrack => self.parse_array()?,
            LBrace => self.parse_hash()?,
            LParen | LParenArg => return self.parse_paren(),
            Lambda => self.parse_lambda()?,
            Colon3 => {
                self.advance();
                let name = self.expect(Constant, "constant")?;
                return Ok(Operand::ConstPath { scope: None, name });
            }
            BDot2 | BDot3 => {
                let op = self.advance();
                let rhs = self.parse_binary(1)?;
                let rhs = self.value(rhs);
                let event = if op.kind == BDot2 {
                    ParserEvent::Dot2
                } else {
                    ParserEvent::Dot3
                };
                self.dispatch(event, &[Arg::Nil, rhs.into()])
            }
            KwIf | KwUnless => self.parse_if()?,
            KwWhile | KwUntil => self.parse_while()?,
            KwCase => self.parse_case()?,
            KwFor => self.parse_for()?,
            KwBegin => self.parse_begin()?,
            KwDef => self.parse_def()?,
            KwClass => self.parse_class()?,
            KwModule => self.parse_module()?,
            KwReturn | KwBreak | KwNext => self.parse_jump()?,
            KwRedo => {
                self.advance();
                self.dispatch(ParserEvent::Redo, &[])
            }
            KwRetry => {
                self.advance();
                self.dispatch(ParserEvent::Retry, &[])
            }
            KwYield => self.parse_yield()?,
            KwSuper => return self.parse_super(),
            KwNot => self.parse_expr(false)?,
            _ => return Err(self.unexpected(None)),
        };
        Ok(Operand::Node(node))
    }

    /// `( stmts )`, or a nested target list `(a, b)` on the left of a
    /// multiple assignment.
    fn parse_paren(&mut self) -> PResult<Operand> {
        use TokenKind::*;
        self.advance();
        if self.at(RParen) {
            self.advance();
            let node = self.dispatch(ParserEvent::Paren, &[NodeHandle::NONE.into()]);
            return Ok(Operand::Node(node));
        }
        let mlhs = if self.at(Star) {
            Some(self.dispatch(ParserEvent::MlhsNew, &[]))
        } else if matches!(
            self.kind(),
            Identifier | Constant | Ivar | Gvar | Cvar | KwSelf | Colon3 | LParen
        ) {
            let first = self.parse_primary_operand()?;
            if self.at(Comma) && first.is_assignable() {
                let target = self.target(first)?;
                let mlhs = self.dispatch(ParserEvent::MlhsNew, &[]);
                let mlhs = self.dispatch(ParserEvent::MlhsAdd, &[mlhs.into(), target.into()]);
                self.advance();
                Some(mlhs)
            } else {
                self.pending = Some(first);
                None
            }
        } else {
            None
        };
        if let Some(mlhs) = mlhs {
            let mlhs = self.parse_mlhs_items(mlhs, &[RParen, Assign])?;
            if !self.at(Assign) {
                return self.finish_mlhs_paren(mlhs);
            }
            // `(a, b = 1, 2)` holds a multiple assignment statement.
            let massign = self.parse_massign(mlhs)?;
            self.pending = Some(Operand::Node(massign));
        }
        let body = self.parse_stmts(&[RParen])?;
        self.expect(RParen, "')'")?;
        Ok(Operand::Node(self.dispatch(ParserEvent::Paren, &[body.into()])))
    }

    /// Close `( mlhs )`. Only an assignment, another target, or the `in`
    /// of a `for` may follow.
    fn finish_mlhs_paren(&mut self, mlhs: NodeHandle) -> PResult<Operand> {
        self.expect(TokenKind::RParen, "')'")?;
        let node = self.dispatch(ParserEvent::MlhsParen, &[mlhs.into()]);
        if !matches!(
            self.kind(),
            TokenKind::Assign | TokenKind::Comma | TokenKind::KwIn
        ) {
            return Err(self.unexpected(Some("'='")));
        }
        Ok(Operand::Mlhs(node))
    }

    /// A name at the start of a primary: a variable, a method call with
    /// parentheses, or a command.
    fn parse_identifier(&mut self) -> PResult<Operand> {
        let name = self.advance();
        if self.at(TokenKind::ParenCall) {
            let fcall = self.dispatch(ParserEvent::Fcall, &[name.node.into()]);
            let args = self.parse_paren_args()?;
            let call = self.dispatch(ParserEvent::MethodAddArg, &[fcall.into(), args.into()]);
            return Ok(Operand::Call(call));
        }
        if is_command_name(&name) && self.starts_command_args() {
            let args = self.parse_command_args()?;
            let command = self.dispatch(ParserEvent::Command, &[name.node.into(), args.into()]);
            return self.parse_command_block(command);
        }
        Ok(Operand::Var(name))
    }

    /// The lookahead opens an argument of a command without parentheses.
    pub(crate) fn starts_command_args(&self) -> bool {
        begins_argument(self.kind())
            || matches!(
                self.kind(),
                TokenKind::KwBegin
                    | TokenKind::KwCase
                    | TokenKind::KwDef
                    | TokenKind::KwIf
                    | TokenKind::KwUnless
                    | TokenKind::KwWhile
                    | TokenKind::KwUntil
                    | TokenKind::KwYield
                    | TokenKind::KwSuper
            )
    }

    /// `do ... end` or `{ ... }` binding to a command.
    pub(crate) fn parse_command_block(&mut self, command: NodeHandle) -> PResult<Operand> {
        let block = match self.kind() {
            TokenKind::KwDoBlock => self.parse_do_block()?,
            TokenKind::LBraceArg => self.parse_brace_block()?,
            _ => return Ok(Operand::Call(command)),
        };
        Ok(Operand::Call(self.dispatch(
            ParserEvent::MethodAddBlock,
            &[command.into(), block.into()],
        )))
    }

    fn parse_postfix(&mut self, mut operand: Operand) -> PResult<Operand> {
        loop {
            operand = match self.kind() {
                TokenKind::Period | TokenKind::AndDot | TokenKind::Colon2 => {
                    let recv = self.value(operand);
                    let op = self.advance();
                    match self.parse_method_suffix(recv, op)? {
                        Suffix::Continue(next) => next,
                        Suffix::Command(command) => return Ok(command),
                    }
                }
                TokenKind::LBrackIndex => {
                    let recv = self.value(operand);
                    self.advance();
                    self.skip_newlines();
                    let args = if self.at(TokenKind::RBrack) {
                        NodeHandle::NONE
                    } else {
                        self.parse_call_args(Some(TokenKind::RBrack))?
                    };
                    self.skip_newlines();
                    self.expect(TokenKind::RBrack, "']'")?;
                    Operand::Index { recv, args }
                }
                TokenKind::LBraceBlock | TokenKind::KwDo => {
                    let Some(call) = self.block_receiver(operand) else {
                        return Err(self.unexpected(None));
                    };
                    let block = if self.at(TokenKind::KwDo) {
                        self.parse_do_block()?
                    } else {
                        self.parse_brace_block()?
                    };
                    Operand::Call(
                        self.dispatch(ParserEvent::MethodAddBlock, &[call.into(), block.into()]),
                    )
                }
                _ => return Ok(operand),
            };
        }
    }

    /// What follows `recv.`, `recv&.`, or `recv::`.
    fn parse_method_suffix(&mut self, recv: NodeHandle, op: Token) -> PResult<Suffix> {
        if self.at(TokenKind::ParenCall) {
            // `recv.()`
            let call = self.dispatch(
                ParserEvent::Call,
                &[recv.into(), call_op(&op), Arg::sym("call")],
            );
            let args = self.parse_paren_args()?;
            let call = self.dispatch(ParserEvent::MethodAddArg, &[call.into(), args.into()]);
            return Ok(Suffix::Continue(Operand::Call(call)));
        }
        if !is_method_name(self.kind()) {
            return Err(self.unexpected(Some("method name")));
        }
        let name = self.advance();
        if op.kind == TokenKind::Colon2
            && name.kind == TokenKind::Constant
            && !self.at(TokenKind::ParenCall)
        {
            return Ok(Suffix::Continue(Operand::ConstPath {
                scope: Some(recv),
                name,
            }));
        }
        if self.at(TokenKind::ParenCall) {
            let call = self.dispatch(
                ParserEvent::Call,
                &[recv.into(), call_op(&op), name.node.into()],
            );
            let args = self.parse_paren_args()?;
            let call = self.dispatch(ParserEvent::MethodAddArg, &[call.into(), args.into()]);
            return Ok(Suffix::Continue(Operand::Call(call)));
        }
        if name.state.is(rip_ir::LexState::ARG_ANY) && self.starts_command_args() {
            let args = self.parse_command_args()?;
            let command = self.dispatch(
                ParserEvent::CommandCall,
                &[recv.into(), call_op(&op), name.node.into(), args.into()],
            );
            return self.parse_command_block(command).map(Suffix::Command);
        }
        Ok(Suffix::Continue(Operand::Attr { recv, op, name }))
    }

    // ─── Arguments ───

    /// `( args )` after a method name.
    pub(crate) fn parse_paren_args(&mut self) -> PResult<NodeHandle> {
        self.advance();
        self.skip_newlines();
        if self.eat(TokenKind::RParen).is_some() {
            return Ok(self.dispatch(ParserEvent::ArgParen, &[Arg::Nil]));
        }
        let args = self.parse_call_args(Some(TokenKind::RParen))?;
        self.skip_newlines();
        self.expect(TokenKind::RParen, "')'")?;
        Ok(self.dispatch(ParserEvent::ArgParen, &[args.into()]))
    }

    /// Arguments of a command: no parentheses, and a `do` after them
    /// belongs to the command.
    pub(crate) fn parse_command_args(&mut self) -> PResult<NodeHandle> {
        self.lexer.cmdarg_push(true);
        let args = self.parse_call_args(None);
        self.lexer.cmdarg_pop();
        args
    }

    /// A comma separated argument list. With `close`, newlines around
    /// arguments and a trailing comma are allowed.
    pub(crate) fn parse_call_args(&mut self, close: Option<TokenKind>) -> PResult<NodeHandle> {
        let mut args = self.dispatch(ParserEvent::ArgsNew, &[]);
        let mut assocs: Vec<Arg> = Vec::new();
        let mut block: Option<NodeHandle> = None;
        loop {
            if close.is_some_and(|close| self.at(close)) {
                break;
            }
            match self.kind() {
                TokenKind::Star => {
                    self.advance();
                    let value = if self.at(TokenKind::Comma) || close.is_some_and(|c| self.at(c)) {
                        NodeHandle::NONE
                    } else {
                        self.parse_arg()?
                    };
                    args = self.dispatch(ParserEvent::ArgsAddStar, &[args.into(), value.into()]);
                }
                TokenKind::DStar => {
                    self.advance();
                    let value = if self.at(TokenKind::Comma) || close.is_some_and(|c| self.at(c)) {
                        NodeHandle::NONE
                    } else {
                        self.parse_arg()?
                    };
                    assocs.push(self.dispatch(ParserEvent::AssocSplat, &[value.into()]).into());
                }
                TokenKind::Amper => {
                    self.advance();
                    let value = if begins_argument(self.kind()) {
                        self.parse_arg()?
                    } else {
                        NodeHandle::NONE
                    };
                    block = Some(value);
                }
                TokenKind::BDot3 if close == Some(TokenKind::RParen) => {
                    self.advance();
                    let value = if self.at(TokenKind::RParen) {
                        self.dispatch(ParserEvent::ArgsForward, &[])
                    } else {
                        let rhs = self.parse_binary(1)?;
                        let rhs = self.value(rhs);
                        self.dispatch(ParserEvent::Dot3, &[Arg::Nil, rhs.into()])
                    };
                    args = self.dispatch(ParserEvent::ArgsAdd, &[args.into(), value.into()]);
                }
                TokenKind::Label => {
                    let assoc = self.parse_label_assoc(close)?;
                    assocs.push(assoc.into());
                }
                TokenKind::StringBeg => match self.parse_string()? {
                    Literal::Label(key) => {
                        let value = self.parse_arg()?;
                        assocs.push(
                            self.dispatch(ParserEvent::AssocNew, &[key.into(), value.into()])
                                .into(),
                        );
                    }
                    Literal::Value(string) => {
                        self.pending = Some(Operand::Node(string));
                        args = self.parse_positional(args, &mut assocs)?;
                    }
                },
                _ => args = self.parse_positional(args, &mut assocs)?,
            }
            if block.is_some() {
                break;
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            if close.is_some() {
                self.skip_newlines();
            }
        }
        if !assocs.is_empty() {
            let hash = self.dispatch(ParserEvent::BareAssocHash, &[Arg::List(assocs)]);
            args = self.dispatch(ParserEvent::ArgsAdd, &[args.into(), hash.into()]);
        }
        if let Some(block) = block {
            args = self.dispatch(ParserEvent::ArgsAddBlock, &[args.into(), block.into()]);
        }
        Ok(args)
    }

    /// A positional argument, or `key => value` joining the trailing hash.
    fn parse_positional(&mut self, args: NodeHandle, assocs: &mut Vec<Arg>) -> PResult<NodeHandle> {
        let value = self.parse_arg()?;
        if self.eat(TokenKind::Assoc).is_some() {
            self.skip_newlines();
            let rhs = self.parse_arg()?;
            assocs.push(
                self.dispatch(ParserEvent::AssocNew, &[value.into(), rhs.into()])
                    .into(),
            );
            return Ok(args);
        }
        if !assocs.is_empty() {
            return Err(self.unexpected(None));
        }
        Ok(self.dispatch(ParserEvent::ArgsAdd, &[args.into(), value.into()]))
    }

    /// `key: value`, or `key:` alone (value omitted).
    pub(crate) fn parse_label_assoc(&mut self, close: Option<TokenKind>) -> PResult<NodeHandle> {
        let label = self.advance();
        self.skip_newlines();
        let omitted = self.at(TokenKind::Comma)
            || close.is_some_and(|close| self.at(close))
            || self.at(TokenKind::RBrace);
        let value = if omitted {
            NodeHandle::NONE
        } else {
            self.parse_arg()?
        };
        Ok(self.dispatch(ParserEvent::AssocNew, &[label.node.into(), value.into()]))
    }
}

/// Outcome of a `.name` suffix.
enum Suffix {
    Continue(Operand),
    /// A command call; nothing further chains onto it.
    Command(Operand),
}

/// A name that may head a command call.
fn is_command_name(name: &Token) -> bool {
    matches!(
        name.kind,
        TokenKind::Identifier | TokenKind::Fid | TokenKind::Constant
    ) && name.state.is(rip_ir::LexState::ARG_ANY)
}

/// Tokens accepted as the name after `.`.
fn is_method_name(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier | TokenKind::Fid | TokenKind::Constant
    ) || kind.is_keyword()
        || matches!(
            kind,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Mul
                | TokenKind::Div
                | TokenKind::Percent
                | TokenKind::Pow
                | TokenKind::Cmp
                | TokenKind::Eq
                | TokenKind::Eqq
                | TokenKind::Neq
                | TokenKind::Match
                | TokenKind::NMatch
                | TokenKind::Lt
                | TokenKind::Leq
                | TokenKind::Gt
                | TokenKind::Geq
                | TokenKind::LShift
                | TokenKind::RShift
                | TokenKind::Pipe
                | TokenKind::Caret
                | TokenKind::Amp
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::UPlus
                | TokenKind::UMinus
                | TokenKind::Aref
                | TokenKind::Aset
                | TokenKind::Backtick
        )
}
