//! Grammar productions.
//!
//! Split by construct, each file adding an `impl Parser` block:
//!
//! - this file: program, statement lists, statements, modifiers, `alias`,
//!   `undef`, `BEGIN`/`END`, multiple assignment
//! - [`expr`]: `and`/`or`/`not`, assignment, ternary, ranges, binary and
//!   unary operators
//! - [`primary`]: primaries, postfix chains, calls and their arguments
//! - [`block`]: blocks, lambdas, parameter lists
//! - [`literal`]: strings, heredocs, symbols, regexps, word lists, arrays,
//!   hashes
//! - [`control`]: conditionals, loops, `case`, `begin`/`rescue`, jumps
//! - [`def`]: `def`, `class`, `module`
//! - [`pattern`]: `case`/`in` patterns

mod block;
mod control;
mod def;
mod expr;
mod literal;
mod pattern;
mod primary;

use rip_ir::{Arg, DiagnosticEvent, NodeHandle, ParserEvent, TokenKind};
use rip_lexer_core::SourceReader;
use tracing::debug;

use crate::operand::Operand;
use crate::stack::ensure_sufficient_stack;
use crate::{PResult, Parser};

impl<R: SourceReader> Parser<'_, R> {
    pub(crate) fn parse_program(&mut self) -> PResult<NodeHandle> {
        let stmts = self.parse_stmts(&[])?;
        if !self.at(TokenKind::EndOfInput) {
            return Err(self.unexpected(Some("end-of-input")));
        }
        debug!("program complete");
        Ok(self.dispatch(ParserEvent::Program, &[stmts.into()]))
    }

    /// Statements up to one of `stop` (or end of input), which is left as
    /// the lookahead. An empty list holds one `void_stmt`.
    pub(crate) fn parse_stmts(&mut self, stop: &[TokenKind]) -> PResult<NodeHandle> {
        let mut list = self.dispatch(ParserEvent::StmtsNew, &[]);
        // A primary read ahead already begins the first statement.
        if self.pending.is_none() {
            self.skip_terms();
            if self.at_stop(stop) {
                let void = self.dispatch(ParserEvent::VoidStmt, &[]);
                return Ok(self.dispatch(ParserEvent::StmtsAdd, &[list.into(), void.into()]));
            }
        }
        loop {
            let stmt = self.parse_stmt()?;
            list = self.dispatch(ParserEvent::StmtsAdd, &[list.into(), stmt.into()]);
            if self.at_stop(stop) {
                break;
            }
            if !self.at_term() {
                return Err(self.unexpected(None));
            }
            self.skip_terms();
            if self.at_stop(stop) {
                break;
            }
        }
        Ok(list)
    }

    fn at_stop(&self, stop: &[TokenKind]) -> bool {
        self.at(TokenKind::EndOfInput) || self.at_any(stop)
    }

    /// A statement with any trailing modifiers.
    pub(crate) fn parse_stmt(&mut self) -> PResult<NodeHandle> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> PResult<NodeHandle> {
        let mut stmt = match self.kind() {
            _ if self.pending.is_some() => self.parse_expr(true)?,
            TokenKind::KwAlias => self.parse_alias()?,
            TokenKind::KwUndef => self.parse_undef()?,
            TokenKind::KwPreExe => self.parse_exe_block(ParserEvent::BeginBlock)?,
            TokenKind::KwPostExe => self.parse_exe_block(ParserEvent::EndBlock)?,
            TokenKind::Star => {
                let mlhs = self.dispatch(ParserEvent::MlhsNew, &[]);
                self.parse_massign(mlhs)?
            }
            _ => self.parse_expr(true)?,
        };
        loop {
            let event = match self.kind() {
                TokenKind::ModIf => ParserEvent::IfMod,
                TokenKind::ModUnless => ParserEvent::UnlessMod,
                TokenKind::ModWhile => ParserEvent::WhileMod,
                TokenKind::ModUntil => ParserEvent::UntilMod,
                TokenKind::ModRescue => ParserEvent::RescueMod,
                _ => break,
            };
            self.advance();
            if event == ParserEvent::RescueMod {
                let rescue = self.parse_expr(false)?;
                stmt = self.dispatch(event, &[stmt.into(), rescue.into()]);
            } else {
                let cond = self.parse_expr(false)?;
                stmt = self.dispatch(event, &[cond.into(), stmt.into()]);
            }
        }
        Ok(stmt)
    }

    /// `a, b = ...` once the first target is known.
    pub(crate) fn parse_massign_from(&mut self, first: Operand) -> PResult<NodeHandle> {
        let target = self.target(first)?;
        let mlhs = self.dispatch(ParserEvent::MlhsNew, &[]);
        let mlhs = self.dispatch(ParserEvent::MlhsAdd, &[mlhs.into(), target.into()]);
        self.advance();
        self.parse_massign(mlhs)
    }

    /// The rest of a multiple-assignment left side, then `=` and the right
    /// side. The lookahead is the item after a comma (or a leading `*`).
    pub(crate) fn parse_massign(&mut self, mlhs: NodeHandle) -> PResult<NodeHandle> {
        let mlhs = self.parse_mlhs_items(mlhs, &[TokenKind::Assign])?;
        self.expect(TokenKind::Assign, "'='")?;
        let rhs = self.parse_mrhs()?;
        Ok(self.dispatch(ParserEvent::Massign, &[mlhs.into(), rhs.into()]))
    }

    /// Items of a left-hand list, continuing `mlhs`, until one of `close`.
    pub(crate) fn parse_mlhs_items(
        &mut self,
        mut mlhs: NodeHandle,
        close: &[TokenKind],
    ) -> PResult<NodeHandle> {
        let mut post: Option<NodeHandle> = None;
        let mut starred = false;
        loop {
            if self.at_any(close) {
                break;
            }
            if self.at(TokenKind::Star) {
                if starred {
                    return Err(self.unexpected(None));
                }
                self.advance();
                let rest = if self.at(TokenKind::Comma) || self.at_any(close) {
                    NodeHandle::NONE
                } else {
                    let item = self.parse_primary_operand()?;
                    self.target(item)?
                };
                mlhs = self.dispatch(ParserEvent::MlhsAddStar, &[mlhs.into(), rest.into()]);
                starred = true;
            } else {
                let item = self.parse_mlhs_item()?;
                if starred {
                    let list = match post {
                        Some(list) => list,
                        None => self.dispatch(ParserEvent::MlhsNew, &[]),
                    };
                    post = Some(self.dispatch(ParserEvent::MlhsAdd, &[list.into(), item.into()]));
                } else {
                    mlhs = self.dispatch(ParserEvent::MlhsAdd, &[mlhs.into(), item.into()]);
                }
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        if let Some(post) = post {
            mlhs = self.dispatch(ParserEvent::MlhsAddPost, &[mlhs.into(), post.into()]);
        }
        Ok(mlhs)
    }

    /// One target, or a parenthesized nested list.
    fn parse_mlhs_item(&mut self) -> PResult<NodeHandle> {
        if self.at(TokenKind::LParen) {
            self.advance();
            let inner = self.dispatch(ParserEvent::MlhsNew, &[]);
            let inner = self.parse_mlhs_items(inner, &[TokenKind::RParen])?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(self.dispatch(ParserEvent::MlhsParen, &[inner.into()]));
        }
        let item = self.parse_primary_operand()?;
        self.target(item)
    }

    /// Right side of `=` at statement level: a single value, or a list.
    pub(crate) fn parse_mrhs(&mut self) -> PResult<NodeHandle> {
        if !self.at(TokenKind::Star) {
            let first = self.parse_arg()?;
            if !self.at(TokenKind::Comma) {
                return Ok(first);
            }
            let mut args = self.dispatch(ParserEvent::ArgsNew, &[]);
            args = self.dispatch(ParserEvent::ArgsAdd, &[args.into(), first.into()]);
            self.advance();
            let mut mrhs = self.dispatch(ParserEvent::MrhsNewFromArgs, &[args.into()]);
            loop {
                mrhs = self.parse_mrhs_item(mrhs)?;
                if self.eat(TokenKind::Comma).is_none() {
                    return Ok(mrhs);
                }
            }
        }
        let mut mrhs = self.dispatch(ParserEvent::MrhsNew, &[]);
        loop {
            mrhs = self.parse_mrhs_item(mrhs)?;
            if self.eat(TokenKind::Comma).is_none() {
                return Ok(mrhs);
            }
        }
    }

    fn parse_mrhs_item(&mut self, mrhs: NodeHandle) -> PResult<NodeHandle> {
        if self.eat(TokenKind::Star).is_some() {
            let value = self.parse_arg()?;
            return Ok(self.dispatch(ParserEvent::MrhsAddStar, &[mrhs.into(), value.into()]));
        }
        let value = self.parse_arg()?;
        Ok(self.dispatch(ParserEvent::MrhsAdd, &[mrhs.into(), value.into()]))
    }

    // ─── alias / undef / BEGIN / END ───

    fn parse_alias(&mut self) -> PResult<NodeHandle> {
        self.advance();
        if matches!(self.kind(), TokenKind::Gvar | TokenKind::BackRef | TokenKind::NthRef) {
            let new = self.advance();
            if !matches!(self.kind(), TokenKind::Gvar | TokenKind::BackRef | TokenKind::NthRef) {
                return Err(self.unexpected(Some("global variable")));
            }
            let old = self.advance();
            let node = self.dispatch(ParserEvent::VarAlias, &[new.node.into(), old.node.into()]);
            if old.kind == TokenKind::NthRef {
                return Ok(self.soft_error(
                    ParserEvent::AliasError,
                    DiagnosticEvent::AliasError,
                    "can't make alias for the number variables".to_owned(),
                    &old,
                    node,
                ));
            }
            return Ok(node);
        }
        let new = self.parse_method_name_item()?;
        let old = self.parse_method_name_item()?;
        Ok(self.dispatch(ParserEvent::Alias, &[new.into(), old.into()]))
    }

    fn parse_undef(&mut self) -> PResult<NodeHandle> {
        self.advance();
        let mut names = vec![Arg::node(self.parse_method_name_item()?)];
        while self.eat(TokenKind::Comma).is_some() {
            names.push(Arg::node(self.parse_method_name_item()?));
        }
        Ok(self.dispatch(ParserEvent::Undef, &[Arg::List(names)]))
    }

    /// A method name in `alias`/`undef`: a bare name or operator, or a
    /// symbol literal.
    fn parse_method_name_item(&mut self) -> PResult<NodeHandle> {
        if self.at(TokenKind::SymBeg) {
            return self.parse_symbol();
        }
        if matches!(
            self.kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::EndOfInput | TokenKind::Comma
        ) {
            return Err(self.unexpected(Some("method name")));
        }
        let name = self.advance();
        Ok(self.dispatch(ParserEvent::SymbolLiteral, &[name.node.into()]))
    }

    /// `BEGIN { ... }` / `END { ... }`.
    fn parse_exe_block(&mut self, event: ParserEvent) -> PResult<NodeHandle> {
        self.advance();
        if !matches!(
            self.kind(),
            TokenKind::LBrace | TokenKind::LBraceBlock | TokenKind::LBraceArg
        ) {
            return Err(self.unexpected(Some("'{'")));
        }
        self.advance();
        let stmts = self.parse_stmts(&[TokenKind::RBrace])?;
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(self.dispatch(event, &[stmts.into()]))
    }
}
