//! Backslash escapes.
//!
//! `read_escape` cooks one escape after the backslash into a byte;
//! `tokadd_utf8` handles `\u` and `\u{...}`, encoding codepoints as UTF-8
//! and recording that the literal is UTF-8 so a later raw byte of another
//! encoding can be reported as mixed.

use bitflags::bitflags;
use rip_lexer_core::{SourceEncoding, SourceReader};

use super::Lexer;
use crate::lex_error::LexErrorKind;
use crate::state::is_space;

bitflags! {
    /// Which prefixes already wrap the escape being read.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub(super) struct EscapeFlags: u8 {
        const CONTROL = 0x01;
        const META = 0x02;
    }
}

/// Encoding a literal has committed to, once it holds a non-ASCII char.
pub(super) type LiteralEncoding = Option<SourceEncoding>;

/// The letter `\s`-style syntax uses for a whitespace control character.
pub(super) fn escaped_control_code(c: u8) -> Option<u8> {
    match c {
        b' ' => Some(b's'),
        b'\n' => Some(b'n'),
        b'\t' => Some(b't'),
        0x0b => Some(b'v'),
        b'\r' => Some(b'r'),
        0x0c => Some(b'f'),
        _ => None,
    }
}

impl<R: SourceReader> Lexer<'_, R> {
    /// Read up to `max` hex digits at the cursor.
    fn scan_hex(&mut self, max: usize) -> (u32, usize) {
        let mut value = 0u32;
        let mut len = 0;
        while len < max {
            match self.peek().and_then(|b| char::from(b).to_digit(16)) {
                Some(d) => {
                    value = value.saturating_mul(16).saturating_add(d);
                    self.line.bump();
                    len += 1;
                }
                None => break,
            }
        }
        (value, len)
    }

    fn scan_oct(&mut self, max: usize) -> u32 {
        let mut value = 0u32;
        for _ in 0..max {
            match self.peek() {
                Some(b @ b'0'..=b'7') => {
                    value = value * 8 + u32::from(b - b'0');
                    self.line.bump();
                }
                _ => break,
            }
        }
        value
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.line.bump();
        }
    }

    pub(super) fn warn_space_char(&mut self, code: u8, prefix: &str) {
        self.warn(format!(
            "invalid character syntax; use {prefix}\\{}",
            char::from(code)
        ));
    }

    fn invalid_escape(&mut self) -> u8 {
        self.compile_error(LexErrorKind::InvalidEscape);
        0
    }

    /// Cook the escape after a consumed backslash.
    pub(super) fn read_escape(&mut self, flags: EscapeFlags, enc: &mut LiteralEncoding) -> u8 {
        let c = self.nextc();
        match c {
            Some(b'\\') => b'\\',
            Some(b'n') => b'\n',
            Some(b't') => b'\t',
            Some(b'r') => b'\r',
            Some(b'f') => 0x0c,
            Some(b'v') => 0x0b,
            Some(b'a') => 0x07,
            Some(b'e') => 0x1b,
            Some(b'b') => 0x08,
            Some(b's') => b' ',
            Some(b'0'..=b'7') => {
                self.pushback(c);
                (self.scan_oct(3) & 0xff) as u8
            }
            Some(b'x') => {
                let (value, len) = self.scan_hex(2);
                if len == 0 {
                    self.compile_error(LexErrorKind::InvalidHexEscape);
                    return 0;
                }
                (value & 0xff) as u8
            }
            Some(b'M') => {
                if flags.contains(EscapeFlags::META) || self.nextc() != Some(b'-') {
                    return self.invalid_escape();
                }
                match self.nextc() {
                    Some(b'\\') => {
                        if matches!(self.peek(), Some(b'u' | b'U')) {
                            self.line.bump();
                            return self.invalid_escape();
                        }
                        self.read_escape(flags | EscapeFlags::META, enc) | 0x80
                    }
                    Some(c) if c.is_ascii() => {
                        if let Some(code) = escaped_control_code(c) {
                            if c.is_ascii_control() || !flags.contains(EscapeFlags::CONTROL) {
                                self.warn_space_char(code, "\\M-");
                            } else {
                                self.warn_space_char(code, "\\C-\\M-");
                            }
                        } else if c.is_ascii_control() {
                            return self.invalid_escape();
                        }
                        c | 0x80
                    }
                    _ => self.invalid_escape(),
                }
            }
            Some(b'C') | Some(b'c') => {
                if c == Some(b'C') && self.nextc() != Some(b'-') {
                    return self.invalid_escape();
                }
                if flags.contains(EscapeFlags::CONTROL) {
                    return self.invalid_escape();
                }
                let inner = match self.nextc() {
                    Some(b'\\') => {
                        if matches!(self.peek(), Some(b'u' | b'U')) {
                            self.line.bump();
                            return self.invalid_escape();
                        }
                        self.read_escape(flags | EscapeFlags::CONTROL, enc)
                    }
                    Some(b'?') => return 0x7f,
                    Some(c) if c.is_ascii() => {
                        if let Some(code) = escaped_control_code(c) {
                            let meta = flags.contains(EscapeFlags::META);
                            let prefix = match (c.is_ascii_control(), meta) {
                                (true, true) => "\\M-",
                                (true, false) => "",
                                (false, true) => "\\M-\\C-",
                                (false, false) => "\\C-",
                            };
                            self.warn_space_char(code, prefix);
                        } else if c.is_ascii_control() {
                            return self.invalid_escape();
                        }
                        c
                    }
                    _ => return self.invalid_escape(),
                };
                inner & 0x9f
            }
            None => self.invalid_escape(),
            Some(other) => other,
        }
    }

    /// Append `c`, plus the rest of its multibyte character, to the cooked
    /// value. Reports a literal that mixes encodings.
    pub(super) fn tokadd_mbchar(&mut self, c: u8, enc: &mut LiteralEncoding) {
        self.tokadd(c);
        if c.is_ascii() {
            return;
        }
        match *enc {
            None => *enc = Some(self.encoding),
            Some(e) if e != self.encoding => {
                self.compile_error(LexErrorKind::MixedEncoding {
                    inner: e.name(),
                    outer: self.encoding.name(),
                });
            }
            Some(_) => {}
        }
        for _ in 1..self.encoding.char_len(c) {
            match self.peek() {
                Some(b) if !b.is_ascii() => {
                    self.line.bump();
                    self.tokadd(b);
                }
                _ => break,
            }
        }
    }

    /// One codepoint of a `\u` escape. Returns false when the escape is
    /// malformed beyond recovery.
    fn tokadd_codepoint(&mut self, enc: &mut LiteralEncoding, regexp: bool, wide: bool) -> bool {
        let start = self.line.pos();
        let max = if wide {
            self.line.line_end().saturating_sub(start)
        } else {
            4
        };
        let (codepoint, len) = self.scan_hex(max);
        if !regexp {
            let bad_len = if wide { len == 0 || len > 6 } else { len < 4 };
            if bad_len {
                self.compile_error(LexErrorKind::InvalidUnicodeEscape);
                return wide && len > 0;
            }
            if codepoint > 0x10ffff {
                self.compile_error(LexErrorKind::CodepointTooLarge);
                return wide;
            }
            if codepoint & 0xffff_f800 == 0xd800 {
                self.compile_error(LexErrorKind::InvalidCodepoint);
                return wide;
            }
        }
        if regexp {
            let digits = self.line.slice(start, start + len).to_vec();
            self.tokbuf.extend_from_slice(&digits);
        } else if codepoint >= 0x80 {
            if let Some(e) = *enc {
                if e != SourceEncoding::Utf8 {
                    self.compile_error(LexErrorKind::MixedEncoding {
                        inner: SourceEncoding::Utf8.name(),
                        outer: e.name(),
                    });
                    return wide;
                }
            }
            *enc = Some(SourceEncoding::Utf8);
            let ch = char::from_u32(codepoint).unwrap_or(char::REPLACEMENT_CHARACTER);
            let mut buf = [0u8; 4];
            self.tokbuf
                .extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        } else {
            self.tokadd(codepoint as u8);
        }
        true
    }

    /// `\u` escape after the consumed `\u`. `term` is the literal's
    /// terminator, or `None` for a character literal (which allows only one
    /// codepoint).
    pub(super) fn tokadd_utf8(
        &mut self,
        enc: &mut LiteralEncoding,
        term: Option<u8>,
        regexp: bool,
    ) {
        if regexp {
            self.tokadd(b'\\');
            self.tokadd(b'u');
        }
        if !self.peek_is(b'{') {
            self.tokadd_codepoint(enc, regexp, false);
            return;
        }
        if regexp {
            self.copy_regexp_brace_escape(term);
            return;
        }

        self.line.bump();
        let end = self.line.line_end();
        if self.line.pos() >= end {
            self.compile_error(LexErrorKind::UnterminatedUnicodeEscape);
            return;
        }
        self.skip_spaces();
        let mut count = 0;
        loop {
            let Some(c) = self.peek() else {
                self.compile_error(LexErrorKind::UnterminatedUnicodeEscape);
                return;
            };
            if c == b'}' {
                break;
            }
            if Some(c) == term || c == b'\n' {
                self.compile_error(LexErrorKind::UnterminatedUnicodeEscape);
                return;
            }
            if !self.tokadd_codepoint(enc, false, true) {
                break;
            }
            count += 1;
            self.skip_spaces();
        }
        if !self.peek_is(b'}') {
            self.compile_error(LexErrorKind::UnterminatedUnicodeEscape);
            return;
        }
        if term.is_none() && count > 1 {
            self.compile_error(LexErrorKind::MultipleCodepoints);
        }
        self.line.bump();
    }

    /// Inside a regexp, `\u{...}` is kept verbatim for the regexp engine.
    fn copy_regexp_brace_escape(&mut self, term: Option<u8>) {
        self.line.bump();
        self.tokadd(b'{');
        while let Some(c) = self.peek() {
            if c == b'}' {
                self.line.bump();
                self.tokadd(c);
                break;
            }
            if Some(c) == term || c == b'\n' {
                break;
            }
            self.line.bump();
            self.tokadd(c);
            if c == b'\\' {
                if let Some(next) = self.line.bump() {
                    self.tokadd(next);
                }
            }
        }
    }
}
