//! Numbered, offset-tracked line supply with look-ahead.
//!
//! Lines are numbered and positioned the moment they are first read from
//! the [`SourceReader`], so a line keeps its identity no matter how the
//! lexer later shuffles buffers around (heredoc bodies are consumed before
//! the rest of the line that introduced them).

#[cfg(test)]
mod tests;

use std::collections::VecDeque;

use crate::{LineBuffer, SourceError, SourceReader};

/// Wraps a [`SourceReader`] and hands out [`LineBuffer`]s.
#[derive(Debug)]
pub struct LineFeed<R> {
    reader: R,
    lookahead: VecDeque<LineBuffer>,
    next_line: u32,
    next_offset: u32,
    /// Set once the reader is exhausted or a line without `\n` was read.
    done: bool,
}

impl<R: SourceReader> LineFeed<R> {
    pub fn new(reader: R, first_line: u32) -> Self {
        LineFeed {
            reader,
            lookahead: VecDeque::new(),
            next_line: first_line,
            next_offset: 0,
            done: false,
        }
    }

    /// Take the next line.
    pub fn pull(&mut self) -> Result<Option<LineBuffer>, SourceError> {
        if let Some(line) = self.lookahead.pop_front() {
            return Ok(Some(line));
        }
        self.read()
    }

    /// Look at the line `n` positions ahead without consuming anything.
    pub fn peek(&mut self, n: usize) -> Result<Option<&LineBuffer>, SourceError> {
        while self.lookahead.len() <= n {
            match self.read()? {
                Some(line) => self.lookahead.push_back(line),
                None => return Ok(None),
            }
        }
        Ok(self.lookahead.get(n))
    }

    /// Put a line back so the next [`pull`](Self::pull) returns it again.
    pub fn unpull(&mut self, line: LineBuffer) {
        self.lookahead.push_front(line);
    }

    /// Drain every remaining line's bytes.
    pub fn drain_rest(&mut self) -> Result<Vec<u8>, SourceError> {
        let mut rest = Vec::new();
        while let Some(line) = self.pull()? {
            rest.extend_from_slice(line.bytes());
        }
        Ok(rest)
    }

    /// Absolute offset the next freshly read line will start at.
    pub fn next_offset(&self) -> u32 {
        self.next_offset
    }

    fn read(&mut self) -> Result<Option<LineBuffer>, SourceError> {
        if self.done {
            return Ok(None);
        }
        let Some(bytes) = self.reader.read_line()? else {
            self.done = true;
            return Ok(None);
        };
        if bytes.last() != Some(&b'\n') {
            self.done = true;
        }
        let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
        let line = LineBuffer::new(bytes, self.next_line, self.next_offset);
        self.next_line += 1;
        self.next_offset = self.next_offset.saturating_add(len);
        Ok(Some(line))
    }
}
