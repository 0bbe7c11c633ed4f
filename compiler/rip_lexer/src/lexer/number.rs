//! Numeric literals.
//!
//! Integers in bases 2, 8, 10 and 16, floats with fraction and exponent,
//! and the `r`/`i` suffixes. The cooked value is the literal's digits with
//! underscores and the base prefix removed.

use rip_ir::{LexState, TokenKind};
use rip_lexer_core::SourceReader;

use super::Lexer;
use crate::lex_error::{LexErrorContext, LexErrorKind};

bitflags::bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct NumSuffix: u8 {
        const R = 0x01;
        const I = 0x02;
    }
}

impl<R: SourceReader> Lexer<'_, R> {
    /// Scan a number whose first byte `c` was already consumed (a digit,
    /// or the sign/dot that precedes one).
    pub(super) fn parse_numeric(&mut self, c: u8) -> TokenKind {
        self.context = LexErrorContext::NumberLiteral;
        self.st.set(LexState::END);
        self.newtok();
        let mut c = Some(c);
        if matches!(c, Some(b'+' | b'-')) {
            if let Some(sign) = c {
                self.tokadd(sign);
            }
            c = self.nextc();
        }

        if c == Some(b'0') {
            let start = self.tokbuf.len();
            c = self.nextc();
            match c {
                Some(b'x' | b'X') => {
                    return self.prefixed_integer(start, |b| b.is_ascii_hexdigit(), None)
                }
                Some(b'b' | b'B') => {
                    return self.prefixed_integer(
                        start,
                        |b| b == b'0' || b == b'1',
                        Some(LexErrorKind::InvalidBinaryDigit),
                    )
                }
                Some(b'd' | b'D') => {
                    return self.prefixed_integer(start, |b| b.is_ascii_digit(), None)
                }
                Some(b'_' | b'0'..=b'7') => return self.octal_integer(c),
                Some(b'o' | b'O') => {
                    c = self.nextc();
                    if !c.is_some_and(|b| b.is_ascii_digit()) {
                        self.pushback(c);
                        return self.no_digits();
                    }
                    return self.octal_integer(c);
                }
                Some(b'8' | b'9') => {
                    self.compile_error(LexErrorKind::InvalidOctalDigit);
                }
                Some(b'.' | b'e' | b'E') => self.tokadd(b'0'),
                _ => {
                    self.pushback(c);
                    let suffix = self.number_suffix(NumSuffix::all());
                    return self.integer_literal(suffix);
                }
            }
        }
        self.decimal(c)
    }

    /// `0x`, `0b`, `0d` bodies. A decimal digit outside the base is
    /// reported as `bad_digit` and kept in the literal.
    fn prefixed_integer(
        &mut self,
        start: usize,
        is_digit: fn(u8) -> bool,
        bad_digit: Option<LexErrorKind>,
    ) -> TokenKind {
        let mut nondigit = None;
        let mut reported = false;
        let mut c = self.nextc();
        if c.is_some_and(is_digit) {
            while let Some(b) = c {
                if b == b'_' {
                    if nondigit.is_some() {
                        break;
                    }
                    nondigit = Some(b);
                } else if is_digit(b) {
                    nondigit = None;
                    self.tokadd(b);
                } else if b.is_ascii_digit() && bad_digit.is_some() {
                    if !reported {
                        reported = true;
                        if let Some(kind) = bad_digit.clone() {
                            self.compile_error(kind);
                        }
                    }
                    nondigit = None;
                    self.tokadd(b);
                } else {
                    break;
                }
                c = self.nextc();
            }
        }
        self.pushback(c);
        if self.tokbuf.len() == start {
            return self.no_digits();
        }
        if let Some(nd) = nondigit {
            self.trailing_underscore(nd);
        }
        let suffix = self.number_suffix(NumSuffix::all());
        self.integer_literal(suffix)
    }

    /// Octal digits after `0`, `0_` or `0o`. An `8` or `9` is reported and
    /// the rest scans as decimal.
    fn octal_integer(&mut self, mut c: Option<u8>) -> TokenKind {
        let mut nondigit = None;
        while let Some(b) = c {
            match b {
                b'_' => {
                    if nondigit.is_some() {
                        break;
                    }
                    nondigit = Some(b);
                }
                b'0'..=b'7' => {
                    nondigit = None;
                    self.tokadd(b);
                }
                b'8' | b'9' => {
                    self.compile_error(LexErrorKind::InvalidOctalDigit);
                    return self.decimal(c);
                }
                _ => break,
            }
            c = self.nextc();
        }
        self.pushback(c);
        if let Some(nd) = nondigit {
            self.trailing_underscore(nd);
        }
        let suffix = self.number_suffix(NumSuffix::all());
        self.integer_literal(suffix)
    }

    /// Decimal integer or float, starting at `c`.
    fn decimal(&mut self, mut c: Option<u8>) -> TokenKind {
        let mut nondigit: Option<u8> = None;
        let mut seen_point = false;
        let mut seen_e = false;
        let mut is_float = false;

        loop {
            match c {
                Some(b @ b'0'..=b'9') => {
                    nondigit = None;
                    self.tokadd(b);
                }
                Some(b'.') => {
                    if let Some(nd) = nondigit {
                        self.pushback(c);
                        return self.finish_number(Some(nd), is_float, seen_e);
                    }
                    if seen_point || seen_e {
                        break;
                    }
                    let c0 = self.nextc();
                    match c0 {
                        Some(d) if d.is_ascii_digit() => {
                            seen_point = true;
                            is_float = true;
                            self.tokadd(b'.');
                            self.tokadd(d);
                            nondigit = None;
                        }
                        _ => {
                            self.pushback(c0);
                            break;
                        }
                    }
                }
                Some(e @ (b'e' | b'E')) => {
                    if nondigit.is_some() {
                        // `1_e5`: both the `e` and the `_` go back.
                        self.pushback(c);
                        break;
                    }
                    if seen_e {
                        break;
                    }
                    let next = self.nextc();
                    match next {
                        Some(s @ (b'+' | b'-')) => {
                            self.tokadd(e);
                            self.tokadd(s);
                            nondigit = Some(s);
                        }
                        Some(d) if d.is_ascii_digit() => {
                            self.tokadd(e);
                            self.tokadd(d);
                            nondigit = None;
                        }
                        _ => {
                            self.pushback(next);
                            break;
                        }
                    }
                    seen_e = true;
                    is_float = true;
                }
                Some(b'_') => {
                    if nondigit.is_some() {
                        break;
                    }
                    nondigit = Some(b'_');
                }
                _ => break,
            }
            c = self.nextc();
        }
        self.pushback(c);
        self.finish_number(nondigit, is_float, seen_e)
    }

    fn finish_number(&mut self, nondigit: Option<u8>, is_float: bool, seen_e: bool) -> TokenKind {
        if let Some(nd) = nondigit {
            self.trailing_underscore(nd);
        }
        if !is_float {
            let suffix = self.number_suffix(NumSuffix::all());
            return self.integer_literal(suffix);
        }
        let mask = if seen_e {
            NumSuffix::I
        } else {
            NumSuffix::all()
        };
        let suffix = self.number_suffix(mask);
        if !suffix.contains(NumSuffix::R) {
            self.check_float_range();
        }
        let kind = if suffix.contains(NumSuffix::I) {
            TokenKind::Imaginary
        } else if suffix.contains(NumSuffix::R) {
            TokenKind::Rational
        } else {
            TokenKind::Float
        };
        self.set_value_from_tok();
        kind
    }

    fn integer_literal(&mut self, suffix: NumSuffix) -> TokenKind {
        self.set_value_from_tok();
        if suffix.contains(NumSuffix::I) {
            TokenKind::Imaginary
        } else if suffix.contains(NumSuffix::R) {
            TokenKind::Rational
        } else {
            TokenKind::Integer
        }
    }

    fn check_float_range(&mut self) {
        let text = String::from_utf8_lossy(&self.tokbuf).into_owned();
        if text.parse::<f64>().is_ok_and(f64::is_infinite) {
            self.warning(format!("Float {text} out of range"));
        }
    }

    /// `r` and `i` suffixes. A suffix followed by more identifier bytes is
    /// not a suffix at all; the cursor goes back to where it started.
    fn number_suffix(&mut self, mut mask: NumSuffix) -> NumSuffix {
        let start = self.line.pos();
        let mut result = NumSuffix::empty();
        loop {
            let c = self.nextc();
            match c {
                Some(b'i') if mask.contains(NumSuffix::I) => {
                    result |= NumSuffix::I;
                    mask.remove(NumSuffix::I | NumSuffix::R);
                }
                Some(b'r') if mask.contains(NumSuffix::R) => {
                    result |= NumSuffix::R;
                    mask.remove(NumSuffix::R);
                }
                Some(b) if !b.is_ascii() || b.is_ascii_alphabetic() || b == b'_' => {
                    self.line.set_pos(start);
                    return NumSuffix::empty();
                }
                _ => {
                    self.pushback(c);
                    return result;
                }
            }
        }
    }

    fn no_digits(&mut self) -> TokenKind {
        self.compile_error(LexErrorKind::NumericWithoutDigits);
        if self.peek_is(b'_') {
            self.line.bump();
        }
        self.tokbuf.clear();
        self.tokadd(b'0');
        self.integer_literal(NumSuffix::empty())
    }

    fn trailing_underscore(&mut self, nondigit: u8) {
        self.compile_error(LexErrorKind::TrailingUnderscore {
            ch: char::from(nondigit),
        });
    }
}
