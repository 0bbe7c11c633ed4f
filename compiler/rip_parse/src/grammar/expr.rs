//! Expressions below the statement level.
//!
//! From loosest to tightest:
//!
//! ```text
//! and or          binary(lhs, :and, rhs)
//! not             unary(:not, x)
//! = op=           assign / opassign / massign
//! ? :             ifop
//! .. ...          dot2 / dot3
//! ||  &&  <=> == === != =~ !~  > >= < <=  | ^  &  << >>  + -  * / %
//! unary - ! ~ +
//! **              (right associative, tighter than unary minus)
//! ```
//!
//! Operator precedence is handled by climbing over [`binary_precedence`].

use rip_ir::{Arg, NodeHandle, ParserEvent, TokenKind};
use rip_lexer_core::SourceReader;

use crate::operand::Operand;
use crate::stack::ensure_sufficient_stack;
use crate::{PResult, Parser};

/// Binding power of `**`.
const POW: u8 = 12;

/// Binding power of a binary operator, or `None` if `kind` isn't one.
fn binary_precedence(kind: TokenKind) -> Option<u8> {
    use TokenKind::*;
    let prec = match kind {
        OrOp => 1,
        AndOp => 2,
        Cmp | Eq | Eqq | Neq | Match | NMatch => 4,
        Gt | Geq | Lt | Leq => 5,
        Pipe | Caret => 6,
        Amp => 7,
        LShift | RShift => 8,
        Plus | Minus => 9,
        Mul | Div | Percent => 10,
        Pow => POW,
        _ => return None,
    };
    Some(prec)
}

impl<R: SourceReader> Parser<'_, R> {
    /// `expr`: `not` expressions joined by `and`/`or`. With `stmt`, the
    /// first operand may be a multiple assignment.
    pub(crate) fn parse_expr(&mut self, stmt: bool) -> PResult<NodeHandle> {
        ensure_sufficient_stack(|| self.parse_expr_inner(stmt))
    }

    fn parse_expr_inner(&mut self, stmt: bool) -> PResult<NodeHandle> {
        let mut lhs = self.parse_not(stmt)?;
        loop {
            let op = match self.kind() {
                TokenKind::KwAnd => "and",
                TokenKind::KwOr => "or",
                _ => break,
            };
            self.advance();
            self.skip_newlines();
            let rhs = self.parse_not(false)?;
            lhs = self.dispatch(ParserEvent::Binary, &[lhs.into(), Arg::sym(op), rhs.into()]);
        }
        Ok(lhs)
    }

    fn parse_not(&mut self, stmt: bool) -> PResult<NodeHandle> {
        if self.eat(TokenKind::KwNot).is_some() {
            let operand = self.parse_not(false)?;
            return Ok(self.dispatch(ParserEvent::Unary, &[Arg::sym("not"), operand.into()]));
        }
        self.parse_assignment(stmt)
    }

    /// `arg`: an expression that can appear as a method argument.
    pub(crate) fn parse_arg(&mut self) -> PResult<NodeHandle> {
        self.parse_assignment(false)
    }

    fn parse_assignment(&mut self, stmt: bool) -> PResult<NodeHandle> {
        let lhs = self.parse_ternary()?;
        if let Operand::Mlhs(mlhs) = lhs {
            return self.parse_mlhs_paren_assign(mlhs, stmt);
        }
        if !lhs.is_assignable() {
            return Ok(self.value(lhs));
        }
        match self.kind() {
            TokenKind::Assign => {
                let target = self.target(lhs)?;
                self.advance();
                let rhs = self.parse_assign_rhs(stmt)?;
                Ok(self.dispatch(ParserEvent::Assign, &[target.into(), rhs.into()]))
            }
            TokenKind::OpAsgn => {
                let target = self.target(lhs)?;
                let op = self.advance();
                let rhs = self.parse_assign_rhs(false)?;
                Ok(self.dispatch(
                    ParserEvent::Opassign,
                    &[target.into(), op.node.into(), rhs.into()],
                ))
            }
            TokenKind::Comma if stmt => self.parse_massign_from(lhs),
            _ => Ok(self.value(lhs)),
        }
    }

    /// `(a, b) = ...` and `(a, b), c = ...`.
    fn parse_mlhs_paren_assign(&mut self, mlhs: NodeHandle, stmt: bool) -> PResult<NodeHandle> {
        match self.kind() {
            TokenKind::Assign if stmt => {
                self.advance();
                let rhs = self.parse_assign_rhs(true)?;
                Ok(self.dispatch(ParserEvent::Massign, &[mlhs.into(), rhs.into()]))
            }
            TokenKind::Comma if stmt => self.parse_massign_from(Operand::Mlhs(mlhs)),
            _ => Err(self.unexpected(Some("'='"))),
        }
    }

    /// Right side of `=`. At statement level it may be a list, and a
    /// `rescue` modifier binds to it rather than to the assignment.
    fn parse_assign_rhs(&mut self, stmt: bool) -> PResult<NodeHandle> {
        if !stmt {
            return self.parse_arg();
        }
        let value = self.parse_mrhs()?;
        if self.eat(TokenKind::ModRescue).is_some() {
            let rescue = self.parse_arg()?;
            return Ok(self.dispatch(ParserEvent::RescueMod, &[value.into(), rescue.into()]));
        }
        Ok(value)
    }

    fn parse_ternary(&mut self) -> PResult<Operand> {
        let cond = self.parse_range()?;
        if !self.at(TokenKind::Question) {
            return Ok(cond);
        }
        let cond = self.value(cond);
        self.advance();
        self.skip_newlines();
        let then = self.parse_arg()?;
        self.skip_newlines();
        self.expect(TokenKind::Colon, "':'")?;
        self.skip_newlines();
        let otherwise = self.parse_arg()?;
        Ok(Operand::Node(self.dispatch(
            ParserEvent::Ifop,
            &[cond.into(), then.into(), otherwise.into()],
        )))
    }

    fn parse_range(&mut self) -> PResult<Operand> {
        let lhs = self.parse_binary(1)?;
        let event = match self.kind() {
            TokenKind::Dot2 => ParserEvent::Dot2,
            TokenKind::Dot3 => ParserEvent::Dot3,
            _ => return Ok(lhs),
        };
        let lhs = self.value(lhs);
        self.advance();
        let rhs = if begins_value(self.kind()) {
            let rhs = self.parse_binary(1)?;
            self.value(rhs)
        } else {
            NodeHandle::NONE
        };
        Ok(Operand::Node(self.dispatch(event, &[lhs.into(), rhs.into()])))
    }

    /// Operators binding at least as tight as `min`.
    pub(crate) fn parse_binary(&mut self, min: u8) -> PResult<Operand> {
        let mut lhs = self.parse_unary()?;
        while let Some(prec) = binary_precedence(self.kind()) {
            if prec < min {
                break;
            }
            let left = self.value(lhs);
            let op = self.advance();
            let next_min = if op.kind == TokenKind::Pow { prec } else { prec + 1 };
            let rhs = self.parse_binary(next_min)?;
            let right = self.value(rhs);
            lhs = Operand::Node(self.dispatch(
                ParserEvent::Binary,
                &[left.into(), Arg::sym(op.text), right.into()],
            ));
        }
        Ok(lhs)
    }

    pub(crate) fn parse_unary(&mut self) -> PResult<Operand> {
        if self.pending.is_some() {
            return self.parse_primary_operand();
        }
        let sym = match self.kind() {
            TokenKind::Bang => "!",
            TokenKind::Tilde => "~",
            TokenKind::UPlus => "+@",
            TokenKind::UMinus | TokenKind::UMinusNum => "-@",
            TokenKind::KwDefined => return self.parse_defined(),
            _ => return self.parse_primary_operand(),
        };
        let op = self.advance();
        let operand = if matches!(op.kind, TokenKind::UMinus | TokenKind::UMinusNum) {
            self.parse_binary(POW)?
        } else {
            ensure_sufficient_stack(|| self.parse_unary())?
        };
        let operand = self.value(operand);
        Ok(Operand::Node(
            self.dispatch(ParserEvent::Unary, &[Arg::sym(sym), operand.into()]),
        ))
    }

    /// `defined?(expr)` or `defined? arg`.
    fn parse_defined(&mut self) -> PResult<Operand> {
        self.advance();
        let expr = if matches!(
            self.kind(),
            TokenKind::ParenCall | TokenKind::LParen | TokenKind::LParenArg
        ) {
            self.advance();
            self.skip_newlines();
            let expr = self.parse_expr(false)?;
            self.skip_newlines();
            self.expect(TokenKind::RParen, "')'")?;
            expr
        } else {
            self.parse_arg()?
        };
        Ok(Operand::Node(self.dispatch(ParserEvent::Defined, &[expr.into()])))
    }
}

/// Tokens that can start a value.
pub(crate) fn begins_value(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Identifier
            | Fid
            | Gvar
            | Ivar
            | Constant
            | Cvar
            | Integer
            | Float
            | Rational
            | Imaginary
            | Char
            | NthRef
            | BackRef
            | StringBeg
            | XStringBeg
            | RegexpBeg
            | WordsBeg
            | QWordsBeg
            | SymbolsBeg
            | QSymbolsBeg
            | SymBeg
            | UPlus
            | UMinus
            | UMinusNum
            | BDot2
            | BDot3
            | Colon3
            | Lambda
            | LParen
            | LParenArg
            | LBrack
            | LBrace
            | Tilde
            | Bang
            | KwNil
            | KwTrue
            | KwFalse
            | KwSelf
            | KwNot
            | KwDefined
            | KwLine
            | KwFile
            | KwEncoding
            | KwIf
            | KwUnless
            | KwWhile
            | KwUntil
            | KwCase
            | KwFor
            | KwBegin
            | KwDef
            | KwClass
            | KwModule
            | KwYield
            | KwSuper
            | KwReturn
            | KwBreak
            | KwNext
            | KwRedo
            | KwRetry
    )
}
