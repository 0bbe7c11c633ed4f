//! Lexer output: token kinds and the token record.

#[cfg(test)]
mod tests;

use std::fmt;

use crate::{LexState, LineCol, NodeHandle, ScannerEvent, Span};

/// Token classification.
///
/// Several source spellings map to more than one kind depending on lexer
/// state: `(` is [`ParenCall`](TokenKind::ParenCall), [`LParen`](TokenKind::LParen),
/// or [`LParenArg`](TokenKind::LParenArg); `do` is one of four kinds; `if`
/// is a statement keyword or a modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    // ─── Keywords ───
    KwClass,
    KwModule,
    KwDef,
    KwUndef,
    KwBegin,
    KwRescue,
    KwEnsure,
    KwEnd,
    KwIf,
    KwUnless,
    KwThen,
    KwElsif,
    KwElse,
    KwCase,
    KwWhen,
    KwWhile,
    KwUntil,
    KwFor,
    KwBreak,
    KwNext,
    KwRedo,
    KwRetry,
    KwIn,
    KwDo,
    /// `do` closing a `while`/`until`/`for` condition.
    KwDoCond,
    /// `do` opening a block attached to a command call.
    KwDoBlock,
    /// `do` opening a lambda body.
    KwDoLambda,
    KwReturn,
    KwYield,
    KwSuper,
    KwSelf,
    KwNil,
    KwTrue,
    KwFalse,
    KwAnd,
    KwOr,
    KwNot,
    ModIf,
    ModUnless,
    ModWhile,
    ModUntil,
    ModRescue,
    KwAlias,
    KwDefined,
    /// `BEGIN`
    KwPreExe,
    /// `END`
    KwPostExe,
    KwLine,
    KwFile,
    KwEncoding,

    // ─── Names ───
    Identifier,
    /// Method name ending in `!` or `?`.
    Fid,
    Gvar,
    Ivar,
    Constant,
    Cvar,
    Label,

    // ─── Literals ───
    Integer,
    Float,
    Rational,
    Imaginary,
    Char,
    NthRef,
    BackRef,
    StringContent,

    // ─── String framing ───
    StringBeg,
    XStringBeg,
    RegexpBeg,
    RegexpEnd,
    WordsBeg,
    QWordsBeg,
    SymbolsBeg,
    QSymbolsBeg,
    SymBeg,
    StringEnd,
    LabelEnd,
    /// `#{` inside an interpolating literal.
    EmbexprBeg,
    /// `}` closing an interpolation.
    EmbexprEnd,
    /// `#` before `@ivar`/`$gvar` inside an interpolating literal.
    EmbVar,
    /// Separator between `%w`/`%i` elements.
    WordSep,

    // ─── Multi-character operators ───
    UPlus,
    UMinus,
    /// Unary minus directly before a numeric literal.
    UMinusNum,
    Pow,
    Cmp,
    Eq,
    Eqq,
    Neq,
    Geq,
    Leq,
    AndOp,
    OrOp,
    Match,
    NMatch,
    Dot2,
    Dot3,
    /// Beginless range `..x`.
    BDot2,
    BDot3,
    Aref,
    Aset,
    LShift,
    RShift,
    AndDot,
    Colon2,
    /// Leading `::` (top-level constant).
    Colon3,
    OpAsgn,
    Assoc,
    Star,
    DStar,
    Amper,
    Lambda,
    LamBeg,

    // ─── Brackets ───
    /// `(` directly after a method name.
    ParenCall,
    /// `(` in expression-start position.
    LParen,
    /// `(` after a command name and a space.
    LParenArg,
    RParen,
    /// `[` in index position.
    LBrackIndex,
    /// `[` opening an array literal.
    LBrack,
    RBrack,
    /// `{` opening a block.
    LBraceBlock,
    /// `{` opening a hash literal.
    LBrace,
    /// `{` opening a block after a parenthesized command argument.
    LBraceArg,
    RBrace,

    // ─── Single-character tokens ───
    Comma,
    Period,
    Assign,
    Question,
    Colon,
    Gt,
    Lt,
    Pipe,
    Caret,
    Amp,
    Plus,
    Minus,
    Mul,
    Div,
    Percent,
    Tilde,
    Bang,
    Backtick,
    Backslash,
    Semicolon,
    Newline,

    EndOfInput,
}

impl TokenKind {
    /// The scanner event this token dispatches, if any.
    pub const fn scanner_event(self) -> Option<ScannerEvent> {
        use TokenKind::*;
        let ev = match self {
            KwClass | KwModule | KwDef | KwUndef | KwBegin | KwRescue | KwEnsure | KwEnd
            | KwIf | KwUnless | KwThen | KwElsif | KwElse | KwCase | KwWhen | KwWhile
            | KwUntil | KwFor | KwBreak | KwNext | KwRedo | KwRetry | KwIn | KwDo
            | KwDoCond | KwDoBlock | KwDoLambda | KwReturn | KwYield | KwSuper | KwSelf
            | KwNil | KwTrue | KwFalse | KwAnd | KwOr | KwNot | ModIf | ModUnless
            | ModWhile | ModUntil | ModRescue | KwAlias | KwDefined | KwPreExe | KwPostExe
            | KwLine | KwFile | KwEncoding => ScannerEvent::Kw,
            Identifier | Fid => ScannerEvent::Ident,
            Gvar => ScannerEvent::Gvar,
            Ivar => ScannerEvent::Ivar,
            Constant => ScannerEvent::Const,
            Cvar => ScannerEvent::Cvar,
            Label => ScannerEvent::Label,
            Integer => ScannerEvent::Int,
            Float => ScannerEvent::Float,
            Rational => ScannerEvent::Rational,
            Imaginary => ScannerEvent::Imaginary,
            Char => ScannerEvent::Char,
            NthRef | BackRef => ScannerEvent::Backref,
            StringContent => ScannerEvent::TstringContent,
            StringBeg => ScannerEvent::TstringBeg,
            XStringBeg | Backtick => ScannerEvent::Backtick,
            RegexpBeg => ScannerEvent::RegexpBeg,
            RegexpEnd => ScannerEvent::RegexpEnd,
            WordsBeg => ScannerEvent::WordsBeg,
            QWordsBeg => ScannerEvent::QwordsBeg,
            SymbolsBeg => ScannerEvent::SymbolsBeg,
            QSymbolsBeg => ScannerEvent::QsymbolsBeg,
            SymBeg => ScannerEvent::Symbeg,
            StringEnd => ScannerEvent::TstringEnd,
            LabelEnd => ScannerEvent::LabelEnd,
            EmbexprBeg => ScannerEvent::EmbexprBeg,
            EmbexprEnd => ScannerEvent::EmbexprEnd,
            EmbVar => ScannerEvent::Embvar,
            WordSep => ScannerEvent::WordsSep,
            Lambda => ScannerEvent::Tlambda,
            LamBeg => ScannerEvent::Tlambeg,
            ParenCall | LParen | LParenArg => ScannerEvent::Lparen,
            RParen => ScannerEvent::Rparen,
            LBrackIndex | LBrack => ScannerEvent::Lbracket,
            RBrack => ScannerEvent::Rbracket,
            LBraceBlock | LBrace | LBraceArg => ScannerEvent::Lbrace,
            RBrace => ScannerEvent::Rbrace,
            Comma => ScannerEvent::Comma,
            Period => ScannerEvent::Period,
            Semicolon => ScannerEvent::Semicolon,
            Newline => ScannerEvent::Nl,
            Backslash => ScannerEvent::Sp,
            UPlus | UMinus | UMinusNum | Pow | Cmp | Eq | Eqq | Neq | Geq | Leq | AndOp
            | OrOp | Match | NMatch | Dot2 | Dot3 | BDot2 | BDot3 | Aref | Aset | LShift
            | RShift | AndDot | Colon2 | Colon3 | OpAsgn | Assoc | Star | DStar | Amper
            | Assign | Question | Colon | Gt | Lt | Pipe | Caret | Amp | Plus | Minus
            | Mul | Div | Percent | Tilde | Bang => ScannerEvent::Op,
            EndOfInput => return None,
        };
        Some(ev)
    }

    pub const fn is_keyword(self) -> bool {
        matches!(self.scanner_event(), Some(ScannerEvent::Kw))
    }

    /// Human-readable description used in syntax error messages.
    pub const fn describe(self) -> &'static str {
        use TokenKind::*;
        match self {
            Identifier | Fid => "local variable or method",
            Constant => "constant",
            Ivar => "instance variable",
            Cvar => "class variable",
            Gvar => "global variable",
            Label => "label",
            Integer => "integer literal",
            Float => "float literal",
            Rational => "rational literal",
            Imaginary => "imaginary literal",
            Char => "character literal",
            NthRef | BackRef => "back reference",
            StringContent => "string content",
            StringBeg | XStringBeg => "string literal",
            StringEnd | RegexpEnd | LabelEnd => "string literal end",
            RegexpBeg => "regexp literal",
            Newline => "'\\n'",
            EndOfInput => "end-of-input",
            _ if self.is_keyword() => "keyword",
            _ => "operator",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Cooked payload attached to a token.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenValue {
    #[default]
    None,
    /// Escape-processed bytes of string content or a character literal.
    Bytes(Vec<u8>),
    /// Common leading-whitespace width of a squiggly heredoc body, carried
    /// on its closing `StringEnd`.
    Dedent(u32),
}

/// One scanned token.
///
/// `text` is the exact source text, including any content that spans line
/// breaks; `pos` anchors at the first byte of that text even when the token
/// was assembled across several line refills.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub text: String,
    pub span: Span,
    pub pos: LineCol,
    /// Lexer state after this token.
    pub state: LexState,
    /// Handle the sink returned for this token's scanner event, or
    /// [`NodeHandle::NONE`] if no event was dispatched.
    pub node: NodeHandle,
}

impl Token {
    /// Cooked bytes as lossy UTF-8, falling back to the raw text.
    pub fn cooked(&self) -> std::borrow::Cow<'_, str> {
        match &self.value {
            TokenValue::Bytes(bytes) => String::from_utf8_lossy(bytes),
            _ => std::borrow::Cow::Borrowed(&self.text),
        }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
