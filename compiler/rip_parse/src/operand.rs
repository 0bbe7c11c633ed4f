//! Deferred operands.
//!
//! `foo.bar` is a `call` when read and a `field` when assigned to, and the
//! parser only learns which once it sees the token after it. Primaries
//! therefore come back as an [`Operand`] that records its parts, and the
//! event is chosen when the operand is used: [`Parser::value`] for reads,
//! [`Parser::target`] for assignment.

use rip_ir::{Arg, DiagnosticEvent, NodeHandle, ParserEvent, Token, TokenKind};
use rip_lexer_core::SourceReader;
use tracing::trace;

use crate::{PResult, Parser};

#[derive(Clone, Debug)]
pub(crate) enum Operand {
    /// Already dispatched; not assignable.
    Node(NodeHandle),
    /// Already dispatched method call; a block may attach to it.
    Call(NodeHandle),
    /// A bare name or pseudo-variable.
    Var(Token),
    /// `recv.name`, `recv&.name`, `recv::name`.
    Attr {
        recv: NodeHandle,
        op: Token,
        name: Token,
    },
    /// `recv[args]`.
    Index { recv: NodeHandle, args: NodeHandle },
    /// `scope::Const`, or `::Const` when `scope` is `None`.
    ConstPath {
        scope: Option<NodeHandle>,
        name: Token,
    },
    /// `(a, b)`: a dispatched `mlhs_paren`, only usable as a target.
    Mlhs(NodeHandle),
}

impl Operand {
    pub(crate) fn is_assignable(&self) -> bool {
        match self {
            Operand::Node(_) | Operand::Call(_) => false,
            Operand::Var(token) => is_variable(token.kind),
            Operand::Attr { .. }
            | Operand::Index { .. }
            | Operand::ConstPath { .. }
            | Operand::Mlhs(_) => true,
        }
    }
}

/// Tokens that name a variable or pseudo-variable.
fn is_variable(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Identifier
            | Constant
            | Ivar
            | Gvar
            | Cvar
            | NthRef
            | BackRef
            | KwSelf
            | KwNil
            | KwTrue
            | KwFalse
            | KwFile
            | KwLine
            | KwEncoding
    )
}

/// Why a name can never be assigned, if it can't.
fn unassignable(token: &Token) -> Option<String> {
    use TokenKind::*;
    let message = match token.kind {
        KwSelf => "Can't change the value of self".to_owned(),
        KwNil => "Can't assign to nil".to_owned(),
        KwTrue => "Can't assign to true".to_owned(),
        KwFalse => "Can't assign to false".to_owned(),
        KwFile => "Can't assign to __FILE__".to_owned(),
        KwLine => "Can't assign to __LINE__".to_owned(),
        KwEncoding => "Can't assign to __ENCODING__".to_owned(),
        NthRef | BackRef => format!("Can't set variable {}", token.text),
        Identifier if is_numbered_param(&token.text) => {
            format!("{} is reserved for numbered parameter", token.text)
        }
        _ => return None,
    };
    Some(message)
}

/// `_1` through `_9`.
pub(crate) fn is_numbered_param(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 2 && bytes[0] == b'_' && matches!(bytes[1], b'1'..=b'9')
}

/// The call operator argument of `call`/`field`/`command_call`.
pub(crate) fn call_op(op: &Token) -> Arg {
    if op.kind == TokenKind::Colon2 {
        Arg::sym("::")
    } else {
        Arg::node(op.node)
    }
}

impl<R: SourceReader> Parser<'_, R> {
    /// Dispatch `operand` as a read.
    pub(crate) fn value(&mut self, operand: Operand) -> NodeHandle {
        match operand {
            Operand::Node(node) | Operand::Call(node) | Operand::Mlhs(node) => node,
            Operand::Var(token) => self.var_value(&token),
            Operand::Attr { recv, op, name } => {
                let op = call_op(&op);
                self.dispatch(ParserEvent::Call, &[recv.into(), op, name.node.into()])
            }
            Operand::Index { recv, args } => {
                self.dispatch(ParserEvent::Aref, &[recv.into(), args.into()])
            }
            Operand::ConstPath { scope: Some(scope), name } => {
                self.dispatch(ParserEvent::ConstPathRef, &[scope.into(), name.node.into()])
            }
            Operand::ConstPath { scope: None, name } => {
                self.dispatch(ParserEvent::TopConstRef, &[name.node.into()])
            }
        }
    }

    fn var_value(&mut self, token: &Token) -> NodeHandle {
        match token.kind {
            TokenKind::Identifier if !self.lexer.locals().is_local(&token.text) => {
                self.dispatch(ParserEvent::Vcall, &[token.node.into()])
            }
            TokenKind::Fid => {
                let fcall = self.dispatch(ParserEvent::Fcall, &[token.node.into()]);
                self.dispatch(ParserEvent::MethodAddArg, &[fcall.into(), Arg::List(Vec::new())])
            }
            _ => self.dispatch(ParserEvent::VarRef, &[token.node.into()]),
        }
    }

    /// Dispatch `operand` as an assignment target.
    ///
    /// Call while the assignment operator is the lookahead: a plain name is
    /// declared as a local before anything after the operator is scanned.
    pub(crate) fn target(&mut self, operand: Operand) -> PResult<NodeHandle> {
        let node = match operand {
            Operand::Node(_) | Operand::Call(_) => return Err(self.unexpected(None)),
            Operand::Var(token) => {
                if !is_variable(token.kind) {
                    return Err(self.unexpected(None));
                }
                let field = self.dispatch(ParserEvent::VarField, &[token.node.into()]);
                if let Some(message) = unassignable(&token) {
                    return Ok(self.soft_error(
                        ParserEvent::AssignError,
                        DiagnosticEvent::AssignError,
                        message,
                        &token,
                        field,
                    ));
                }
                if token.kind == TokenKind::Identifier {
                    trace!(name = %token.text, "declare local");
                    self.lexer.locals_mut().declare(&token.text);
                }
                field
            }
            Operand::Attr { recv, op, name } => {
                let op = call_op(&op);
                self.dispatch(ParserEvent::Field, &[recv.into(), op, name.node.into()])
            }
            Operand::Index { recv, args } => {
                self.dispatch(ParserEvent::ArefField, &[recv.into(), args.into()])
            }
            Operand::ConstPath { scope: Some(scope), name } => {
                self.dispatch(ParserEvent::ConstPathField, &[scope.into(), name.node.into()])
            }
            Operand::ConstPath { scope: None, name } => {
                self.dispatch(ParserEvent::TopConstField, &[name.node.into()])
            }
            Operand::Mlhs(node) => node,
        };
        Ok(node)
    }

    /// The call a block attaches to, or `None` if `operand` can't take one.
    pub(crate) fn block_receiver(&mut self, operand: Operand) -> Option<NodeHandle> {
        match operand {
            Operand::Call(node) => Some(node),
            Operand::Var(token)
                if matches!(
                    token.kind,
                    TokenKind::Identifier | TokenKind::Fid | TokenKind::Constant
                ) =>
            {
                let fcall = self.dispatch(ParserEvent::Fcall, &[token.node.into()]);
                Some(self.dispatch(
                    ParserEvent::MethodAddArg,
                    &[fcall.into(), Arg::List(Vec::new())],
                ))
            }
            Operand::Attr { recv, op, name } => {
                let op = call_op(&op);
                Some(self.dispatch(ParserEvent::Call, &[recv.into(), op, name.node.into()]))
            }
            _ => None,
        }
    }
}
