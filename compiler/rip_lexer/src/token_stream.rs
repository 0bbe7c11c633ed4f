//! Lexer-only driver.
//!
//! A [`Lexer`] on its own cannot get through `"#{...}"`: the grammar is
//! expected to checkpoint, rescan the statements, and restore when it sees
//! the closing brace. [`TokenStream`] does that bracketing itself, plus the
//! few other grammar-to-lexer hand-offs that change tokenization (lambda
//! bodies, loop conditions, command arguments, and simple local variable
//! assignments), so a source file can be tokenized without parsing it.

use rip_diagnostic::Diagnostic;
use rip_ir::{Dispatch, LexState, NoopSink, Token, TokenKind};
use rip_lexer_core::{SourceReader, StrSource};
use smallvec::SmallVec;
use tracing::debug;

use crate::checkpoint::Checkpoint;
use crate::lexer::Lexer;
use crate::options::LexerOptions;

/// Drives a [`Lexer`] to end of input, standing in for the grammar.
pub struct TokenStream<'a, R> {
    lexer: Lexer<'a, R>,
    /// One checkpoint per open `#{`.
    interpolations: SmallVec<[Checkpoint; 4]>,
    /// Set between `#@`/`#$` and the variable that follows it.
    embedded_var: Option<Checkpoint>,
    /// Saved `lpar_beg` for each `->` whose body has not opened yet.
    lambdas: SmallVec<[i32; 4]>,
    /// Condition bits pushed for `while`/`until`/`for` headers.
    conds: u32,
    /// Command-argument bits pushed after command names.
    cmdargs: u32,
    /// The previous token was a command name in statement position.
    after_command: bool,
    /// Identifier that may be the target of a following `=`.
    assign_target: Option<String>,
    previous: TokenKind,
    finished: bool,
}

impl<'a, R: SourceReader> TokenStream<'a, R> {
    pub fn new(reader: R, sink: &'a mut dyn Dispatch, options: LexerOptions) -> Self {
        TokenStream {
            lexer: Lexer::new(reader, sink, options),
            interpolations: SmallVec::new(),
            embedded_var: None,
            lambdas: SmallVec::new(),
            conds: 0,
            cmdargs: 0,
            after_command: false,
            assign_target: None,
            previous: TokenKind::Newline,
            finished: false,
        }
    }

    pub fn lexer(&self) -> &Lexer<'a, R> {
        &self.lexer
    }

    pub fn lexer_mut(&mut self) -> &mut Lexer<'a, R> {
        &mut self.lexer
    }

    pub fn into_lexer(self) -> Lexer<'a, R> {
        self.lexer
    }

    /// Next token, or `None` after [`TokenKind::EndOfInput`] was returned.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let pending_var = self.embedded_var.take();
        let token = self.lexer.next_token();
        if let Some(checkpoint) = pending_var {
            self.lexer.restore(checkpoint);
        }
        self.after_token(&token);
        if token.kind == TokenKind::EndOfInput {
            self.finished = true;
        }
        Some(token)
    }

    fn after_token(&mut self, token: &Token) {
        if std::mem::take(&mut self.after_command) && begins_argument(token.kind) {
            self.lexer.cmdarg_push(true);
            self.cmdargs += 1;
        }
        match token.kind {
            TokenKind::EmbexprBeg => {
                self.interpolations.push(self.lexer.checkpoint());
                self.lexer.enter_interpolation();
            }
            TokenKind::EmbexprEnd => {
                if let Some(checkpoint) = self.interpolations.pop() {
                    self.lexer.restore(checkpoint);
                }
            }
            TokenKind::EmbVar => {
                self.embedded_var = Some(self.lexer.checkpoint());
                self.lexer.enter_embedded_var();
            }
            TokenKind::Lambda => {
                let previous = self.lexer.begin_lambda();
                self.lambdas.push(previous);
            }
            TokenKind::LamBeg | TokenKind::KwDoLambda => {
                if let Some(previous) = self.lambdas.pop() {
                    self.lexer.end_lambda(previous);
                }
            }
            TokenKind::KwWhile | TokenKind::KwUntil | TokenKind::KwFor => {
                self.lexer.cond_push(true);
                self.conds += 1;
            }
            TokenKind::KwDoCond => self.pop_conds(),
            TokenKind::KwDoBlock => self.pop_cmdargs(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::EndOfInput => {
                self.pop_conds();
                self.pop_cmdargs();
            }
            TokenKind::Identifier | TokenKind::Fid | TokenKind::Constant => {
                self.after_command = token.state.is(LexState::CMDARG);
            }
            TokenKind::Assign => {
                if let Some(name) = self.assign_target.take() {
                    debug!(%name, "local variable assigned");
                    self.lexer.locals_mut().declare(&name);
                }
            }
            _ => {}
        }
        let receiver_call = matches!(
            self.previous,
            TokenKind::Period | TokenKind::AndDot | TokenKind::Colon2
        );
        self.assign_target = (token.kind == TokenKind::Identifier && !receiver_call)
            .then(|| token.text.clone());
        self.previous = token.kind;
    }

    fn pop_conds(&mut self) {
        while self.conds > 0 {
            self.lexer.cond_pop();
            self.conds -= 1;
        }
    }

    fn pop_cmdargs(&mut self) {
        while self.cmdargs > 0 {
            self.lexer.cmdarg_pop();
            self.cmdargs -= 1;
        }
    }
}

/// Tokens that can open the first argument of a command call.
pub fn begins_argument(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Identifier
            | Fid
            | Gvar
            | Ivar
            | Constant
            | Cvar
            | Label
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
            | Star
            | DStar
            | Amper
            | Lambda
            | LParenArg
            | LBrack
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
    )
}

impl<R: SourceReader> Iterator for TokenStream<'_, R> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
            .filter(|token| token.kind != TokenKind::EndOfInput)
    }
}

/// Result of [`tokenize`].
#[derive(Clone, Debug)]
pub struct Tokenized {
    /// Every token, without the final end-of-input marker.
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    /// True if any reported diagnostic was an error.
    pub errored: bool,
}

/// Tokenize `src` with default options, discarding scanner events.
pub fn tokenize(src: &str) -> Tokenized {
    let mut sink = NoopSink;
    tokenize_with(src, &mut sink, LexerOptions::default())
}

/// Tokenize `src`, dispatching every scanner event to `sink`.
pub fn tokenize_with(src: &str, sink: &mut dyn Dispatch, options: LexerOptions) -> Tokenized {
    let mut stream = TokenStream::new(StrSource::new(src), sink, options);
    let tokens: Vec<Token> = stream.by_ref().collect();
    let mut lexer = stream.into_lexer();
    let errored = lexer.errored();
    Tokenized {
        tokens,
        diagnostics: lexer.diagnostics_mut().flush(),
        errored,
    }
}

#[cfg(test)]
mod tests;
