//! Punctuation rules.
//!
//! Each rule reads the current [`LexState`] (and whether whitespace came
//! before or after the operator) to pick between readings such as
//! binary `*` and splat `*`, division and regexp start, hash and block
//! brace. Every rule writes the state the next token will see.

use rip_ir::{LexState, TokenKind};
use rip_lexer_core::SourceReader;

use super::scan::ScanCtx;
use super::Lexer;
use crate::state::{is_ident_char, is_space};
use crate::str_term::{QuoteTerm, StrFunc, StrTerm};

impl<R: SourceReader> Lexer<'_, R> {
    /// State after a binary operator: `ARG` right after `def`/`.`, else `BEG`.
    fn after_operator_state(&self) -> LexState {
        if self.st.is_after_operator() {
            LexState::ARG
        } else {
            LexState::BEG
        }
    }

    /// `op=` assignment operator: the text is the whole operator.
    fn op_asgn(&mut self) -> TokenKind {
        self.st.set(LexState::BEG);
        TokenKind::OpAsgn
    }

    /// Warn when spacing suggests a unary reading but the operator is
    /// taken as binary (`a -b` after a local or literal).
    pub(super) fn warn_balanced(
        &mut self,
        kind: TokenKind,
        op: &str,
        syn: &str,
        next: Option<u8>,
        ctx: ScanCtx,
    ) -> TokenKind {
        let after_name = ctx
            .last_state
            .is(LexState::CLASS | LexState::DOT | LexState::FNAME | LexState::ENDFN);
        if !after_name && ctx.space_seen && !next.is_some_and(is_space) {
            self.operator_ambiguous(format!(
                "`{op}' after local variable or literal is interpreted as binary operator even though it seems like {syn}"
            ));
        }
        kind
    }

    /// An operator directly before an argument, separated from the method
    /// name by a space (`foo -1`, `foo /re/`).
    fn arg_ambiguous(&mut self, op: u8) -> bool {
        self.operator_ambiguous(format!(
            "ambiguous first argument; put parentheses or a space even after `{}' operator",
            char::from(op)
        ));
        true
    }

    pub(super) fn op_star(&mut self, ctx: ScanCtx) -> TokenKind {
        let kind;
        let mut c = self.nextc();
        if c == Some(b'*') {
            c = self.nextc();
            if c == Some(b'=') {
                return self.op_asgn();
            }
            self.pushback(c);
            if self.st.is_spcarg(ctx.space_seen, c) {
                self.warning("`**' interpreted as argument prefix");
                kind = TokenKind::DStar;
            } else if self.st.is_beg() {
                kind = TokenKind::DStar;
            } else {
                kind = self.warn_balanced(TokenKind::Pow, "**", "argument prefix", c, ctx);
            }
        } else {
            if c == Some(b'=') {
                return self.op_asgn();
            }
            self.pushback(c);
            if self.st.is_spcarg(ctx.space_seen, c) {
                self.warning("`*' interpreted as argument prefix");
                kind = TokenKind::Star;
            } else if self.st.is_beg() {
                kind = TokenKind::Star;
            } else {
                kind = self.warn_balanced(TokenKind::Mul, "*", "argument prefix", c, ctx);
            }
        }
        let next = self.after_operator_state();
        self.st.set(next);
        kind
    }

    pub(super) fn op_bang(&mut self) -> TokenKind {
        let c = self.nextc();
        if self.st.is_after_operator() {
            self.st.set(LexState::ARG);
            if c == Some(b'@') {
                return TokenKind::Bang;
            }
        } else {
            self.st.set(LexState::BEG);
        }
        match c {
            Some(b'=') => TokenKind::Neq,
            Some(b'~') => TokenKind::NMatch,
            _ => {
                self.pushback(c);
                TokenKind::Bang
            }
        }
    }

    pub(super) fn op_eq(&mut self) -> TokenKind {
        let next = self.after_operator_state();
        self.st.set(next);
        let c = self.nextc();
        match c {
            Some(b'=') => {
                let c = self.nextc();
                if c == Some(b'=') {
                    return TokenKind::Eqq;
                }
                self.pushback(c);
                TokenKind::Eq
            }
            Some(b'~') => TokenKind::Match,
            Some(b'>') => TokenKind::Assoc,
            _ => {
                self.pushback(c);
                TokenKind::Assign
            }
        }
    }

    pub(super) fn op_lt(&mut self, ctx: ScanCtx) -> TokenKind {
        let c = self.nextc();
        if c == Some(b'<')
            && !self.st.is(LexState::DOT | LexState::CLASS)
            && !self.st.is_end()
            && (!self.st.is_arg() || self.st.is(LexState::LABELED) || ctx.space_seen)
        {
            if let Some(kind) = self.heredoc_identifier() {
                return kind;
            }
        }
        if self.st.is_after_operator() {
            self.st.set(LexState::ARG);
        } else {
            if self.st.is(LexState::CLASS) {
                self.st.command_start = true;
            }
            self.st.set(LexState::BEG);
        }
        match c {
            Some(b'=') => {
                let c = self.nextc();
                if c == Some(b'>') {
                    return TokenKind::Cmp;
                }
                self.pushback(c);
                TokenKind::Leq
            }
            Some(b'<') => {
                let c = self.nextc();
                if c == Some(b'=') {
                    return self.op_asgn();
                }
                self.pushback(c);
                self.warn_balanced(TokenKind::LShift, "<<", "here document", c, ctx)
            }
            _ => {
                self.pushback(c);
                TokenKind::Lt
            }
        }
    }

    pub(super) fn op_gt(&mut self) -> TokenKind {
        let next = self.after_operator_state();
        self.st.set(next);
        let c = self.nextc();
        match c {
            Some(b'=') => TokenKind::Geq,
            Some(b'>') => {
                let c = self.nextc();
                if c == Some(b'=') {
                    return self.op_asgn();
                }
                self.pushback(c);
                TokenKind::RShift
            }
            _ => {
                self.pushback(c);
                TokenKind::Gt
            }
        }
    }

    pub(super) fn quote_start(&mut self, quote: u8, ctx: ScanCtx) -> TokenKind {
        let mut func = if quote == b'"' {
            StrFunc::DQUOTE
        } else {
            StrFunc::SQUOTE
        };
        if self.st.is_label_possible(ctx.cmd_state) {
            func |= StrFunc::LABEL;
        }
        self.st.str_term = Some(StrTerm::Quote(QuoteTerm::new(func, quote, 0)));
        TokenKind::StringBeg
    }

    pub(super) fn op_backtick(&mut self, ctx: ScanCtx) -> TokenKind {
        if self.st.is(LexState::FNAME) {
            self.st.set(LexState::ENDFN);
            return TokenKind::Backtick;
        }
        if self.st.is(LexState::DOT) {
            self.st.set(if ctx.cmd_state {
                LexState::CMDARG
            } else {
                LexState::ARG
            });
            return TokenKind::Backtick;
        }
        self.st.str_term = Some(StrTerm::Quote(QuoteTerm::new(StrFunc::XQUOTE, b'`', 0)));
        TokenKind::XStringBeg
    }

    pub(super) fn op_amp(&mut self, ctx: ScanCtx) -> TokenKind {
        let c = self.nextc();
        match c {
            Some(b'&') => {
                self.st.set(LexState::BEG);
                let c = self.nextc();
                if c == Some(b'=') {
                    return self.op_asgn();
                }
                self.pushback(c);
                return TokenKind::AndOp;
            }
            Some(b'=') => return self.op_asgn(),
            Some(b'.') => {
                self.st.set(LexState::DOT);
                return TokenKind::AndDot;
            }
            _ => {}
        }
        self.pushback(c);
        let kind = if self.st.is_spcarg(ctx.space_seen, c) {
            // `&:sym` and `&"str"` block arguments are idiomatic; no hint.
            let symbol_arg = c == Some(b':')
                && self
                    .peek_at(1)
                    .is_some_and(|n| n == b'\'' || n == b'"' || is_ident_char(n));
            if !symbol_arg {
                self.warning("`&' interpreted as argument prefix");
            }
            TokenKind::Amper
        } else if self.st.is_beg() {
            TokenKind::Amper
        } else {
            self.warn_balanced(TokenKind::Amp, "&", "argument prefix", c, ctx)
        };
        let next = self.after_operator_state();
        self.st.set(next);
        kind
    }

    pub(super) fn op_pipe(&mut self, ctx: ScanCtx) -> TokenKind {
        let c = self.nextc();
        match c {
            Some(b'|') => {
                self.st.set(LexState::BEG);
                let c = self.nextc();
                if c == Some(b'=') {
                    return self.op_asgn();
                }
                self.pushback(c);
                if ctx.last_state.is(LexState::BEG) {
                    // `||` opening an empty block parameter list is two pipes.
                    self.line.back();
                    return TokenKind::Pipe;
                }
                TokenKind::OrOp
            }
            Some(b'=') => self.op_asgn(),
            _ => {
                self.st.set(if self.st.is_after_operator() {
                    LexState::ARG
                } else {
                    LexState::BEG | LexState::LABEL
                });
                self.pushback(c);
                TokenKind::Pipe
            }
        }
    }

    pub(super) fn op_plus(&mut self, ctx: ScanCtx) -> TokenKind {
        let c = self.nextc();
        if self.st.is_after_operator() {
            self.st.set(LexState::ARG);
            if c == Some(b'@') {
                return TokenKind::UPlus;
            }
            self.pushback(c);
            return TokenKind::Plus;
        }
        if c == Some(b'=') {
            return self.op_asgn();
        }
        if self.st.is_beg() || (self.st.is_spcarg(ctx.space_seen, c) && self.arg_ambiguous(b'+')) {
            self.st.set(LexState::BEG);
            self.pushback(c);
            if c.is_some_and(|c| c.is_ascii_digit()) {
                return self.parse_numeric(b'+');
            }
            return TokenKind::UPlus;
        }
        self.st.set(LexState::BEG);
        self.pushback(c);
        self.warn_balanced(TokenKind::Plus, "+", "unary operator", c, ctx)
    }

    pub(super) fn op_minus(&mut self, ctx: ScanCtx) -> TokenKind {
        let c = self.nextc();
        if self.st.is_after_operator() {
            self.st.set(LexState::ARG);
            if c == Some(b'@') {
                return TokenKind::UMinus;
            }
            self.pushback(c);
            return TokenKind::Minus;
        }
        if c == Some(b'=') {
            return self.op_asgn();
        }
        if c == Some(b'>') {
            self.st.set(LexState::ENDFN);
            return TokenKind::Lambda;
        }
        if self.st.is_beg() || (self.st.is_spcarg(ctx.space_seen, c) && self.arg_ambiguous(b'-')) {
            self.st.set(LexState::BEG);
            self.pushback(c);
            if c.is_some_and(|c| c.is_ascii_digit()) {
                return TokenKind::UMinusNum;
            }
            return TokenKind::UMinus;
        }
        self.st.set(LexState::BEG);
        self.pushback(c);
        self.warn_balanced(TokenKind::Minus, "-", "unary operator", c, ctx)
    }

    /// `.`, `..`, `...`, or the `.5` error. `None` means the error path
    /// consumed the digits and scanning continues.
    pub(super) fn op_dot(&mut self, ctx: ScanCtx) -> Option<TokenKind> {
        let is_beg = self.st.is_beg();
        self.st.set(LexState::BEG);
        let c = self.nextc();
        if c == Some(b'.') {
            let c = self.nextc();
            if c == Some(b'.') {
                if self.st.paren_nest == 0 && self.looking_at_eol() {
                    self.warn("... at EOL, should be parenthesized?");
                } else if self.st.lpar_beg >= 0
                    && self.st.lpar_beg + 1 == self.st.paren_nest
                    && ctx.last_state.is(LexState::LABEL)
                {
                    return Some(TokenKind::Dot3);
                }
                return Some(if is_beg {
                    TokenKind::BDot3
                } else {
                    TokenKind::Dot3
                });
            }
            self.pushback(c);
            return Some(if is_beg {
                TokenKind::BDot2
            } else {
                TokenKind::Dot2
            });
        }
        self.pushback(c);
        if c.is_some_and(|c| c.is_ascii_digit()) {
            let pos = self.line.pos();
            let prev = if pos >= 2 {
                self.line.bytes().get(pos - 2).copied()
            } else {
                None
            };
            self.parse_numeric(b'.');
            self.value = rip_ir::TokenValue::None;
            if prev.is_some_and(|p| p.is_ascii_digit()) {
                self.compile_error(crate::lex_error::LexErrorKind::FractionAfterNumeric);
            } else {
                self.compile_error(crate::lex_error::LexErrorKind::NoLeadingDigit);
            }
            self.st.set(LexState::END);
            self.token_flush();
            return None;
        }
        self.st.set(LexState::DOT);
        Some(TokenKind::Period)
    }

    /// Only whitespace or a comment remains on the line.
    fn looking_at_eol(&self) -> bool {
        let bytes = self.line.bytes();
        let i = self.line.skip_blank(self.line.pos());
        matches!(bytes.get(i), None | Some(b'\n' | b'#'))
    }

    pub(super) fn op_rbrace(&mut self) -> TokenKind {
        let nest = self.st.brace_nest;
        self.st.brace_nest -= 1;
        if nest == 0 {
            return TokenKind::EmbexprEnd;
        }
        self.st.close_nest();
        self.st.set(LexState::END);
        TokenKind::RBrace
    }

    pub(super) fn op_colon(&mut self, ctx: ScanCtx) -> TokenKind {
        let c = self.nextc();
        if c == Some(b':') {
            if self.st.is_beg() || self.st.is(LexState::CLASS) || self.st.is_spcarg(ctx.space_seen, None)
            {
                self.st.set(LexState::BEG);
                return TokenKind::Colon3;
            }
            self.st.set(LexState::DOT);
            return TokenKind::Colon2;
        }
        if self.st.is_end() || c.is_none() || c.is_some_and(|c| is_space(c) || c == b'#') {
            self.pushback(c);
            let kind = self.warn_balanced(TokenKind::Colon, ":", "symbol literal", c, ctx);
            self.st.set(LexState::BEG);
            return kind;
        }
        match c {
            Some(b'\'') => {
                self.st.str_term = Some(StrTerm::Quote(QuoteTerm::new(StrFunc::SSYM, b'\'', 0)));
            }
            Some(b'"') => {
                self.st.str_term = Some(StrTerm::Quote(QuoteTerm::new(StrFunc::DSYM, b'"', 0)));
            }
            _ => self.pushback(c),
        }
        self.st.set(LexState::FNAME);
        TokenKind::SymBeg
    }

    pub(super) fn op_slash(&mut self, ctx: ScanCtx) -> TokenKind {
        if self.st.is_beg() {
            self.st.str_term = Some(StrTerm::Quote(QuoteTerm::new(StrFunc::REGEXP_LIT, b'/', 0)));
            return TokenKind::RegexpBeg;
        }
        let c = self.nextc();
        if c == Some(b'=') {
            return self.op_asgn();
        }
        self.pushback(c);
        if self.st.is_spcarg(ctx.space_seen, c) {
            self.arg_ambiguous(b'/');
            self.st.str_term = Some(StrTerm::Quote(QuoteTerm::new(StrFunc::REGEXP_LIT, b'/', 0)));
            return TokenKind::RegexpBeg;
        }
        let next = self.after_operator_state();
        self.st.set(next);
        self.warn_balanced(TokenKind::Div, "/", "regexp literal", c, ctx)
    }

    pub(super) fn op_caret(&mut self) -> TokenKind {
        let c = self.nextc();
        if c == Some(b'=') {
            return self.op_asgn();
        }
        let next = self.after_operator_state();
        self.st.set(next);
        self.pushback(c);
        TokenKind::Caret
    }

    pub(super) fn op_tilde(&mut self) -> TokenKind {
        if self.st.is_after_operator() {
            let c = self.nextc();
            if c != Some(b'@') {
                self.pushback(c);
            }
            self.st.set(LexState::ARG);
        } else {
            self.st.set(LexState::BEG);
        }
        TokenKind::Tilde
    }

    pub(super) fn op_lparen(&mut self, ctx: ScanCtx) -> TokenKind {
        let kind = if self.st.is_beg() {
            TokenKind::LParen
        } else if !ctx.space_seen {
            TokenKind::ParenCall
        } else if self.st.is_arg() || self.st.has_all(LexState::END | LexState::LABEL) {
            TokenKind::LParenArg
        } else {
            if self.st.is(LexState::ENDFN) && !self.st.lambda_beginning() {
                self.warning(
                    "parentheses after method name is interpreted as an argument list, not a decomposed argument",
                );
            }
            TokenKind::ParenCall
        };
        self.st.open_nest();
        self.st.set(LexState::BEG | LexState::LABEL);
        kind
    }

    pub(super) fn op_lbrack(&mut self, ctx: ScanCtx) -> TokenKind {
        if self.st.is_after_operator() {
            let c = self.nextc();
            if c == Some(b']') {
                self.st.set(LexState::ARG);
                let c = self.nextc();
                if c == Some(b'=') {
                    return TokenKind::Aset;
                }
                self.pushback(c);
                return TokenKind::Aref;
            }
            self.pushback(c);
            self.st.open_nest();
            self.st.set(LexState::ARG | LexState::LABEL);
            return TokenKind::LBrackIndex;
        }
        let kind = if self.st.is_beg()
            || (self.st.is_arg() && (ctx.space_seen || self.st.is(LexState::LABELED)))
        {
            TokenKind::LBrack
        } else {
            TokenKind::LBrackIndex
        };
        self.st.open_nest();
        self.st.set(LexState::BEG | LexState::LABEL);
        kind
    }

    pub(super) fn op_lbrace(&mut self) -> TokenKind {
        self.st.brace_nest += 1;
        if self.st.lambda_beginning() {
            self.st.set(LexState::BEG);
            self.st.open_nest();
            return TokenKind::LamBeg;
        }
        let kind = if self.st.is(LexState::LABELED) {
            TokenKind::LBrace
        } else if self.st.is(LexState::ARG_ANY | LexState::END | LexState::ENDFN) {
            TokenKind::LBraceBlock
        } else if self.st.is(LexState::ENDARG) {
            TokenKind::LBraceArg
        } else {
            TokenKind::LBrace
        };
        if kind == TokenKind::LBrace {
            self.st.set(LexState::BEG | LexState::LABEL);
        } else {
            self.st.command_start = true;
            self.st.set(LexState::BEG);
        }
        self.st.open_nest();
        kind
    }
}
