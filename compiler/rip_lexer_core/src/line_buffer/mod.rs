//! The current line and its cursor.
//!
//! Invariant: `line_start <= pos <= line_end`, where `line_end` is the
//! length of the line's bytes (including any trailing `\n`). The buffer is
//! replaced wholesale on every refill; nothing here ever reaches into a
//! neighbouring line.

#[cfg(test)]
mod tests;

use crate::UTF8_BOM;

/// One source line plus a byte cursor.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    /// 1-based line number; 0 for the empty buffer before the first refill.
    line: u32,
    /// Absolute offset of `bytes[0]` in the logical source.
    offset: u32,
    pos: usize,
    line_start: usize,
}

impl LineBuffer {
    pub fn new(bytes: Vec<u8>, line: u32, offset: u32) -> Self {
        LineBuffer {
            bytes,
            line,
            offset,
            pos: 0,
            line_start: 0,
        }
    }

    /// The empty buffer the lexer starts with.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn line_start(&self) -> usize {
        self.line_start
    }

    #[inline]
    pub fn line_end(&self) -> usize {
        self.bytes.len()
    }

    /// Move the cursor, clamped to `line_start..=line_end`.
    #[inline]
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos.clamp(self.line_start, self.bytes.len());
    }

    /// Byte at the cursor.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Byte `n` positions past the cursor.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    /// True if the byte at the cursor is `b`.
    #[inline]
    pub fn peek_is(&self, b: u8) -> bool {
        self.peek() == Some(b)
    }

    /// Byte just before the cursor, if it is inside the line.
    #[inline]
    pub fn prev(&self) -> Option<u8> {
        if self.pos > self.line_start {
            self.bytes.get(self.pos - 1).copied()
        } else {
            None
        }
    }

    /// Consume and return the byte at the cursor.
    #[inline]
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Step the cursor back one byte; no-op at `line_start`.
    #[inline]
    pub fn back(&mut self) {
        if self.pos > self.line_start {
            self.pos -= 1;
        }
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.set_pos(self.pos + n);
    }

    #[inline]
    pub fn at_eol(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    #[inline]
    pub fn goto_eol(&mut self) {
        self.pos = self.bytes.len();
    }

    /// True right after consuming the first byte of the line.
    #[inline]
    pub fn was_bol(&self) -> bool {
        self.pos == self.line_start + 1
    }

    /// Unconsumed bytes.
    #[inline]
    pub fn rest(&self) -> &[u8] {
        &self.bytes[self.pos..]
    }

    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        let end = end.min(self.bytes.len());
        &self.bytes[start.min(end)..end]
    }

    /// Absolute source offset of byte index `at`.
    #[inline]
    pub fn abs(&self, at: usize) -> u32 {
        self.offset + u32::try_from(at).unwrap_or(u32::MAX - self.offset)
    }

    /// Column of byte index `at`.
    #[inline]
    pub fn column(&self, at: usize) -> u32 {
        u32::try_from(at).unwrap_or(u32::MAX)
    }

    pub fn ends_with_newline(&self) -> bool {
        self.bytes.last() == Some(&b'\n')
    }

    /// Index one past the line's content, excluding `\n` or `\r\n`.
    pub fn content_end(&self) -> usize {
        let mut end = self.bytes.len();
        if end > 0 && self.bytes[end - 1] == b'\n' {
            end -= 1;
            if end > 0 && self.bytes[end - 1] == b'\r' {
                end -= 1;
            }
        }
        end
    }

    /// Skip a leading UTF-8 BOM by moving `line_start` past it.
    pub fn skip_bom(&mut self) -> bool {
        if self.line_start == 0 && self.bytes.starts_with(UTF8_BOM) {
            self.line_start = UTF8_BOM.len();
            self.pos = self.pos.max(self.line_start);
            true
        } else {
            false
        }
    }

    /// Position of the next `byte` at or after the cursor.
    pub fn find(&self, byte: u8) -> Option<usize> {
        memchr::memchr(byte, self.rest()).map(|i| self.pos + i)
    }

    /// True if `pat` occurs at byte index `at`.
    pub fn matches_at(&self, at: usize, pat: &[u8]) -> bool {
        self.bytes.get(at..at + pat.len()) == Some(pat)
    }

    /// Index of the first byte at or after `from` that is not a space or tab.
    pub fn skip_blank(&self, from: usize) -> usize {
        let mut i = from;
        while let Some(b' ' | b'\t' | b'\x0c' | b'\r' | b'\x0b') = self.bytes.get(i) {
            i += 1;
        }
        i
    }
}
