//! Patterns of `case ... in`.
//!
//! ```text
//! top      := hash-body | item (',' item)* [guard]
//! item     := '*' [ident] | alt
//! alt      := primary ('|' primary)* ('=>' ident)*
//! primary  := '[' items ']' | '{' hash-body '}' | '(' alt ')'
//!           | '^' var | '^(' expr ')' | ident
//!           | const ['(' items | hash-body ')' | '[' ... ']']
//!           | value ['..' | '...' value]
//! ```
//!
//! Identifiers, `*rest`, `**rest`, and value-less labels bind new locals.

use rip_ir::{Arg, NodeHandle, ParserEvent, Token, TokenKind};
use rip_lexer_core::SourceReader;

use super::literal::Literal;
use crate::stack::ensure_sufficient_stack;
use crate::{PResult, Parser};

/// Tokens that end a top-level pattern.
const TOP_CLOSE: &[TokenKind] = &[
    TokenKind::KwThen,
    TokenKind::Newline,
    TokenKind::Semicolon,
    TokenKind::ModIf,
    TokenKind::ModUnless,
    TokenKind::EndOfInput,
];

/// One element of an array pattern.
enum Item {
    Pattern(NodeHandle),
    /// `*name` or a bare `*`, already wrapped in `var_field`.
    Splat(NodeHandle),
}

impl<R: SourceReader> Parser<'_, R> {
    /// The pattern after `in`, with its optional guard.
    pub(crate) fn parse_pattern_top(&mut self) -> PResult<NodeHandle> {
        let pattern = if self.at_any(&[TokenKind::Label, TokenKind::DStar]) {
            self.parse_hash_pattern(NodeHandle::NONE, TOP_CLOSE, false)?
        } else {
            self.parse_top_items()?
        };
        let event = match self.kind() {
            TokenKind::ModIf => ParserEvent::IfMod,
            TokenKind::ModUnless => ParserEvent::UnlessMod,
            _ => return Ok(pattern),
        };
        self.advance();
        let guard = self.parse_expr(false)?;
        Ok(self.dispatch(event, &[guard.into(), pattern.into()]))
    }

    /// `a, *b, c` without brackets. A single plain pattern stands alone.
    fn parse_top_items(&mut self) -> PResult<NodeHandle> {
        let first = self.parse_pattern_item()?;
        if let Item::Pattern(pattern) = first {
            if !self.at(TokenKind::Comma) {
                return Ok(pattern);
            }
        }
        let mut items = vec![first];
        while self.eat(TokenKind::Comma).is_some() {
            if self.at_any(TOP_CLOSE) {
                // `in a,` leaves an anonymous rest.
                let rest = self.dispatch(ParserEvent::VarField, &[Arg::Nil]);
                items.push(Item::Splat(rest));
                break;
            }
            items.push(self.parse_pattern_item()?);
        }
        Ok(self.dispatch_array_pattern(NodeHandle::NONE, items))
    }

    fn parse_pattern_item(&mut self) -> PResult<Item> {
        if self.eat(TokenKind::Star).is_none() {
            return Ok(Item::Pattern(self.parse_pattern_alt()?));
        }
        let name = if self.at(TokenKind::Identifier) {
            self.advance_binding().node
        } else {
            NodeHandle::NONE
        };
        Ok(Item::Splat(
            self.dispatch(ParserEvent::VarField, &[name.into()]),
        ))
    }

    /// Items up to `close`, which is left as the lookahead.
    fn parse_pattern_items(&mut self, close: TokenKind) -> PResult<Vec<Item>> {
        let mut items = Vec::new();
        self.skip_newlines();
        while !self.at(close) {
            items.push(self.parse_pattern_item()?);
            self.skip_newlines();
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            self.skip_newlines();
        }
        Ok(items)
    }

    /// `aryptn`, or `fndptn` when the items both start and end with a
    /// splat.
    fn dispatch_array_pattern(&mut self, constant: NodeHandle, items: Vec<Item>) -> NodeHandle {
        let find = items.len() >= 2
            && matches!(items.first(), Some(Item::Splat(_)))
            && matches!(items.last(), Some(Item::Splat(_)));
        if find {
            let mut middle = Vec::with_capacity(items.len() - 2);
            let mut pre = NodeHandle::NONE;
            let mut post = NodeHandle::NONE;
            let last = items.len() - 1;
            for (i, item) in items.into_iter().enumerate() {
                match (i, item) {
                    (0, Item::Splat(rest)) => pre = rest,
                    (i, Item::Splat(rest)) if i == last => post = rest,
                    (_, Item::Pattern(p) | Item::Splat(p)) => middle.push(Arg::node(p)),
                }
            }
            return self.dispatch(
                ParserEvent::Fndptn,
                &[constant.into(), pre.into(), Arg::List(middle), post.into()],
            );
        }

        let mut pre = Vec::new();
        let mut rest = None;
        let mut post = Vec::new();
        for item in items {
            match item {
                Item::Splat(splat) if rest.is_none() => rest = Some(splat),
                Item::Pattern(p) | Item::Splat(p) => {
                    if rest.is_some() {
                        post.push(Arg::node(p));
                    } else {
                        pre.push(Arg::node(p));
                    }
                }
            }
        }
        self.dispatch(
            ParserEvent::Aryptn,
            &[
                constant.into(),
                Self::list_or_nil(pre),
                rest.into(),
                Self::list_or_nil(post),
            ],
        )
    }

    /// `key: pattern, "key": pattern, **rest` up to one of `close`.
    fn parse_hash_pattern(
        &mut self,
        constant: NodeHandle,
        close: &[TokenKind],
        bracketed: bool,
    ) -> PResult<NodeHandle> {
        let mut pairs = Vec::new();
        let mut rest = NodeHandle::NONE;
        if bracketed {
            self.skip_newlines();
        }
        while !self.at_any(close) {
            match self.kind() {
                TokenKind::Label => {
                    let label = self.advance();
                    let value = if self.ends_hash_value(close) {
                        self.declare_binding(label.text.trim_end_matches(':'));
                        Arg::Nil
                    } else {
                        Arg::node(self.parse_pattern_alt()?)
                    };
                    pairs.push(Arg::List(vec![Arg::node(label.node), value]));
                }
                TokenKind::StringBeg => {
                    let key = match self.parse_string()? {
                        Literal::Label(key) => key,
                        Literal::Value(_) => return Err(self.unexpected(Some("label"))),
                    };
                    let value = if self.ends_hash_value(close) {
                        Arg::Nil
                    } else {
                        Arg::node(self.parse_pattern_alt()?)
                    };
                    pairs.push(Arg::List(vec![Arg::node(key), value]));
                }
                TokenKind::DStar | TokenKind::Pow => {
                    self.advance();
                    let name = match self.kind() {
                        TokenKind::KwNil => {
                            self.advance();
                            Arg::sym("nil")
                        }
                        TokenKind::Identifier => Arg::node(self.advance_binding().node),
                        _ => Arg::Nil,
                    };
                    rest = self.dispatch(ParserEvent::VarField, &[name]);
                }
                _ => return Err(self.unexpected(Some("label"))),
            }
            if bracketed {
                self.skip_newlines();
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            if bracketed {
                self.skip_newlines();
            }
        }
        Ok(self.dispatch(
            ParserEvent::Hshptn,
            &[constant.into(), Self::list_or_nil(pairs), rest.into()],
        ))
    }

    /// `{a:}` and `a:,` leave the value out and bind `a`.
    fn ends_hash_value(&self, close: &[TokenKind]) -> bool {
        self.at_any(close) || self.at_any(&[TokenKind::Comma, TokenKind::Newline])
    }

    /// `pattern | pattern ... => name`.
    fn parse_pattern_alt(&mut self) -> PResult<NodeHandle> {
        ensure_sufficient_stack(|| {
            let mut pattern = self.parse_pattern_primary()?;
            while self.eat(TokenKind::Pipe).is_some() {
                let rhs = self.parse_pattern_primary()?;
                pattern = self.dispatch(
                    ParserEvent::Binary,
                    &[pattern.into(), Arg::sym("|"), rhs.into()],
                );
            }
            while self.eat(TokenKind::Assoc).is_some() {
                if !self.at(TokenKind::Identifier) {
                    return Err(self.unexpected(Some("local variable")));
                }
                let name = self.advance_binding();
                let field = self.dispatch(ParserEvent::VarField, &[name.node.into()]);
                pattern = self.dispatch(
                    ParserEvent::Binary,
                    &[pattern.into(), Arg::sym("=>"), field.into()],
                );
            }
            Ok(pattern)
        })
    }

    fn parse_pattern_primary(&mut self) -> PResult<NodeHandle> {
        match self.kind() {
            TokenKind::LBrack => {
                self.advance();
                let items = self.parse_pattern_items(TokenKind::RBrack)?;
                self.expect(TokenKind::RBrack, "']'")?;
                Ok(self.dispatch_array_pattern(NodeHandle::NONE, items))
            }
            TokenKind::LBrace => {
                self.advance();
                let pattern = self.parse_hash_pattern(NodeHandle::NONE, &[TokenKind::RBrace], true)?;
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(pattern)
            }
            TokenKind::LParen | TokenKind::LParenArg => {
                self.advance();
                self.skip_newlines();
                let pattern = self.parse_pattern_alt()?;
                self.skip_newlines();
                self.expect(TokenKind::RParen, "')'")?;
                Ok(pattern)
            }
            TokenKind::Caret => self.parse_pinned(),
            TokenKind::Identifier => {
                let name = self.advance_binding();
                Ok(self.dispatch(ParserEvent::VarField, &[name.node.into()]))
            }
            TokenKind::Constant | TokenKind::Colon3 => self.parse_constant_pattern(),
            _ => self.parse_pattern_range(),
        }
    }

    /// `^name` and `^(expr)`.
    fn parse_pinned(&mut self) -> PResult<NodeHandle> {
        self.advance();
        match self.kind() {
            TokenKind::Identifier | TokenKind::Ivar | TokenKind::Gvar | TokenKind::Cvar => {
                let var = self.advance();
                Ok(self.dispatch(ParserEvent::VarRef, &[var.node.into()]))
            }
            TokenKind::LParen | TokenKind::LParenArg | TokenKind::ParenCall => {
                self.advance();
                self.skip_newlines();
                let expr = self.parse_expr(false)?;
                self.skip_newlines();
                self.expect(TokenKind::RParen, "')'")?;
                Ok(self.dispatch(ParserEvent::Begin, &[expr.into()]))
            }
            _ => Err(self.unexpected(Some("local variable"))),
        }
    }

    /// `Const`, `A::B`, `::C`, optionally followed by `(...)` or `[...]`.
    fn parse_constant_pattern(&mut self) -> PResult<NodeHandle> {
        let mut constant = if self.eat(TokenKind::Colon3).is_some() {
            let name = self.expect(TokenKind::Constant, "constant")?;
            self.dispatch(ParserEvent::TopConstRef, &[name.node.into()])
        } else {
            let name = self.advance();
            self.dispatch(ParserEvent::VarRef, &[name.node.into()])
        };
        while self.eat(TokenKind::Colon2).is_some() {
            let name = self.expect(TokenKind::Constant, "constant")?;
            constant = self.dispatch(ParserEvent::ConstPathRef, &[constant.into(), name.node.into()]);
        }
        let close = match self.kind() {
            TokenKind::ParenCall => TokenKind::RParen,
            TokenKind::LBrackIndex => TokenKind::RBrack,
            TokenKind::Dot2 | TokenKind::Dot3 => return self.parse_range_tail(constant),
            _ => return Ok(constant),
        };
        self.advance();
        self.skip_newlines();
        let pattern = if self.at_any(&[TokenKind::Label, TokenKind::DStar]) {
            self.parse_hash_pattern(constant, &[close], true)?
        } else {
            let items = self.parse_pattern_items(close)?;
            self.dispatch_array_pattern(constant, items)
        };
        self.expect(close, if close == TokenKind::RParen { "')'" } else { "']'" })?;
        Ok(pattern)
    }

    /// A value pattern: a literal, optionally a range.
    fn parse_pattern_range(&mut self) -> PResult<NodeHandle> {
        let event = match self.kind() {
            TokenKind::BDot2 => ParserEvent::Dot2,
            TokenKind::BDot3 => ParserEvent::Dot3,
            _ => {
                let value = self.parse_pattern_value()?;
                return self.parse_range_tail(value);
            }
        };
        self.advance();
        let upper = self.parse_pattern_value()?;
        Ok(self.dispatch(event, &[Arg::Nil, upper.into()]))
    }

    fn parse_range_tail(&mut self, lower: NodeHandle) -> PResult<NodeHandle> {
        let event = match self.kind() {
            TokenKind::Dot2 => ParserEvent::Dot2,
            TokenKind::Dot3 => ParserEvent::Dot3,
            _ => return Ok(lower),
        };
        self.advance();
        let upper = if self.ends_range_pattern() {
            NodeHandle::NONE
        } else {
            self.parse_pattern_value()?
        };
        Ok(self.dispatch(event, &[lower.into(), upper.into()]))
    }

    /// Tokens after `1..` that leave the range endless.
    fn ends_range_pattern(&self) -> bool {
        self.at_any(TOP_CLOSE)
            || self.at_any(&[
                TokenKind::Comma,
                TokenKind::Pipe,
                TokenKind::Assoc,
                TokenKind::RParen,
                TokenKind::RBrack,
                TokenKind::RBrace,
            ])
    }

    /// A primitive value: literals, keyword variables, lambdas, and
    /// negative numbers. Binary operators are not part of a pattern.
    fn parse_pattern_value(&mut self) -> PResult<NodeHandle> {
        let operand = self.parse_unary()?;
        Ok(self.value(operand))
    }

    /// Consume an identifier that binds in the pattern.
    fn advance_binding(&mut self) -> Token {
        let name = self.current.clone();
        self.declare_binding(&name.text);
        self.advance();
        name
    }

    fn declare_binding(&mut self, name: &str) {
        self.lexer.locals_mut().declare(name);
    }
}
