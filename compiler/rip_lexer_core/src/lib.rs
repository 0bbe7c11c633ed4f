//! Line-oriented source reading for the Ruby lexer.
//!
//! The lexer never sees the whole program at once. It pulls one line at a
//! time from a [`SourceReader`], scans it out of a [`LineBuffer`], and
//! stitches tokens that cross a line break together in a
//! [`DelayedContent`] buffer.
//!
//! # Architecture
//!
//! ```text
//! SourceReader (StrSource / ReaderSource<R: BufRead>)
//!       │ read_line()
//!       ▼
//! LineFeed     numbers lines, tracks offsets, holds look-ahead lines
//!       │ pull() / peek(n)
//!       ▼
//! LineBuffer   one line + cursor (line_start ≤ pos ≤ line_end)
//! ```
//!
//! This crate has no `rip_*` dependencies.

mod delayed;
mod encoding;
mod line_buffer;
mod line_feed;
mod source;

pub use delayed::DelayedContent;
pub use encoding::{strip_bom, EncodingError, SourceEncoding, UTF8_BOM};
pub use line_buffer::LineBuffer;
pub use line_feed::LineFeed;
pub use source::{ReaderSource, SourceError, SourceReader, StrSource};
