//! Token text that spans line refills.
//!
//! When a token (string content, a heredoc body, the whitespace between
//! `%w` elements) is still open at the end of a line, the part already
//! scanned is moved here before the line buffer is replaced. The token is
//! later dispatched as one event anchored at the position where the first
//! fragment began.

/// Accumulated text plus the anchor of its first byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelayedContent {
    text: Vec<u8>,
    line: u32,
    column: u32,
    offset: u32,
}

impl DelayedContent {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        DelayedContent {
            text: Vec::new(),
            line,
            column,
            offset,
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.text.extend_from_slice(bytes);
    }

    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn into_text(self) -> Vec<u8> {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_anchor() {
        let mut delayed = DelayedContent::new(2, 5, 17);
        delayed.push(b"abc\n");
        delayed.push(b"def");
        assert_eq!(delayed.text(), b"abc\ndef");
        assert_eq!((delayed.line(), delayed.column(), delayed.offset()), (2, 5, 17));
        assert_eq!(delayed.into_text(), b"abc\ndef".to_vec());
    }
}
