//! Line producers.

use std::io::BufRead;

use thiserror::Error;

/// Failure to read the next line.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces source lines on demand.
///
/// Each returned line includes its trailing `\n` if it has one; only the
/// final line may lack it. `Ok(None)` means end of input.
pub trait SourceReader {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, SourceError>;
}

impl<S: SourceReader + ?Sized> SourceReader for &mut S {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        (**self).read_line()
    }
}

impl<S: SourceReader + ?Sized> SourceReader for Box<S> {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        (**self).read_line()
    }
}

/// Reader over an in-memory byte slice.
#[derive(Clone, Debug)]
pub struct StrSource<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> StrSource<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::from_bytes(source.as_bytes())
    }

    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        StrSource { bytes, pos: 0 }
    }
}

impl SourceReader for StrSource<'_> {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let rest = &self.bytes[self.pos..];
        if rest.is_empty() {
            return Ok(None);
        }
        let len = memchr::memchr(b'\n', rest).map_or(rest.len(), |nl| nl + 1);
        self.pos += len;
        Ok(Some(rest[..len].to_vec()))
    }
}

/// Reader over any buffered I/O source.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> SourceReader for ReaderSource<R> {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut line = Vec::new();
        let n = self.reader.read_until(b'\n', &mut line)?;
        if n == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn drain(mut reader: impl SourceReader) -> Vec<Vec<u8>> {
        let mut lines = Vec::new();
        while let Ok(Some(line)) = reader.read_line() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn str_source_keeps_newlines() {
        let lines = drain(StrSource::new("a\nbb\n\nc"));
        assert_eq!(
            lines,
            vec![b"a\n".to_vec(), b"bb\n".to_vec(), b"\n".to_vec(), b"c".to_vec()]
        );
    }

    #[test]
    fn str_source_empty_input() {
        assert!(drain(StrSource::new("")).is_empty());
    }

    #[test]
    fn reader_source_matches_str_source() {
        let text = "x = 1\r\ny = 2\nz";
        let from_reader = drain(ReaderSource::new(std::io::Cursor::new(text)));
        assert_eq!(from_reader, drain(StrSource::new(text)));
    }
}
