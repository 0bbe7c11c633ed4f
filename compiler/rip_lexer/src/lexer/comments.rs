//! Comments, magic comments, embedded documents, and `__END__`.

use rip_ir::{Arg, Event, EventPos, ParserEvent, ScannerEvent};
use rip_lexer_core::{SourceEncoding, SourceReader};
use tracing::debug;

use super::Lexer;
use crate::lex_error::{LexErrorContext, LexErrorKind};
use crate::state::is_space;

/// `shareable_constant_value` setting.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ShareableConstantValue {
    #[default]
    None,
    Literal,
    ExperimentalEverything,
    ExperimentalCopy,
}

/// Settings collected from magic comments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MagicSettings {
    pub frozen_string_literal: Option<bool>,
    pub warn_indent: Option<bool>,
    pub shareable_constant_value: ShareableConstantValue,
}

/// Position just past a `-*-` marker.
fn find_marker(text: &[u8]) -> Option<usize> {
    text.windows(3).position(|w| w == b"-*-").map(|i| i + 3)
}

fn skip_spaces(s: &[u8]) -> &[u8] {
    let n = s.iter().take_while(|&&b| is_space(b)).count();
    &s[n..]
}

fn is_pair_separator(b: u8) -> bool {
    matches!(b, b'\'' | b'"' | b':' | b';')
}

/// Parse the text after `#` as `name: value` pairs, either Emacs style
/// (`-*- a: b; c: d -*-`) or a bare single pair. `None` when the comment
/// is not a magic comment. Names have `-` folded to `_`.
pub(super) fn parse_magic_comment(text: &[u8]) -> Option<Vec<(String, String)>> {
    if text.len() <= 7 {
        return None;
    }
    let (mut s, emacs) = match find_marker(text) {
        Some(beg) => {
            let end = find_marker(&text[beg..])?;
            (&text[beg..beg + end - 3], true)
        }
        None => (text, false),
    };

    let mut pairs = Vec::new();
    while !s.is_empty() {
        let skip = s
            .iter()
            .take_while(|&&b| is_pair_separator(b) || is_space(b))
            .count();
        s = &s[skip..];
        let name_len = s
            .iter()
            .take_while(|&&b| !is_pair_separator(b) && !is_space(b))
            .count();
        let name = &s[..name_len];
        s = skip_spaces(&s[name_len..]);
        if s.is_empty() {
            break;
        }
        if s[0] != b':' {
            if !emacs {
                return None;
            }
            continue;
        }
        s = skip_spaces(&s[1..]);
        if s.is_empty() {
            break;
        }
        let value;
        if s[0] == b'"' {
            s = &s[1..];
            let mut i = 0;
            while i < s.len() && s[i] != b'"' {
                if s[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            let i = i.min(s.len());
            value = &s[..i];
            s = &s[(i + 1).min(s.len())..];
        } else {
            let n = s
                .iter()
                .take_while(|&&b| b != b'"' && b != b';' && !is_space(b))
                .count();
            value = &s[..n];
            s = &s[n..];
        }
        if emacs {
            let n = s.iter().take_while(|&&b| b == b';' || is_space(b)).count();
            s = &s[n..];
        } else {
            s = skip_spaces(s);
            if !s.is_empty() {
                return None;
            }
        }
        let name = String::from_utf8_lossy(name).replace('-', "_");
        pairs.push((name, String::from_utf8_lossy(value).into_owned()));
    }
    Some(pairs)
}

/// The encoding named by a Vim-style `coding: NAME` / `coding=NAME` comment.
pub(super) fn vim_coding(text: &[u8]) -> Option<&[u8]> {
    let lower = text.to_ascii_lowercase();
    let mut from = 0;
    while let Some(i) = lower[from..].windows(6).position(|w| w == b"coding") {
        let after = from + i + 6;
        if matches!(text.get(after), Some(b':' | b'=')) {
            let rest = skip_spaces(&text[after + 1..]);
            let n = rest
                .iter()
                .take_while(|&&b| b == b'-' || b == b'_' || b.is_ascii_alphanumeric())
                .count();
            return (n > 0).then(|| &rest[..n]);
        }
        from = after;
    }
    None
}

/// Drop a line-ending suffix (`-unix`, `-dos`, `-mac`) from an encoding name.
pub(super) fn strip_newline_suffix(name: &str) -> &str {
    let lower = name.to_ascii_lowercase();
    for suffix in ["-unix", "-dos", "-mac"] {
        if lower.len() > suffix.len() && lower.ends_with(suffix) && lower != "utf8-mac" {
            return &name[..name.len() - suffix.len()];
        }
    }
    name
}

impl<R: SourceReader> Lexer<'_, R> {
    /// A `#` comment; the `#` was consumed.
    pub(super) fn comment(&mut self) {
        let body = self
            .line
            .slice(self.line.pos(), self.line.content_end())
            .to_vec();
        match parse_magic_comment(&body) {
            Some(pairs) => {
                for (name, value) in pairs {
                    self.magic_comment(&name, &value);
                }
            }
            None => {
                if self.comment_at_top() {
                    if let Some(name) = vim_coding(&body) {
                        let name = String::from_utf8_lossy(name).into_owned();
                        self.set_encoding(strip_newline_suffix(&name));
                    }
                }
            }
        }
        self.line.goto_eol();
        self.dispatch_scan(ScannerEvent::Comment);
    }

    /// The comment is on the first line (or the second after a shebang)
    /// with only whitespace before it.
    fn comment_at_top(&self) -> bool {
        let expected = if self.has_shebang { 2 } else { 1 };
        if self.line_count != expected {
            return false;
        }
        let hash = self.line.pos().saturating_sub(1);
        self.line
            .slice(self.line.line_start(), hash)
            .iter()
            .all(|&b| is_space(b))
    }

    /// Only blanks precede the comment on this line.
    fn comment_only_line(&self) -> bool {
        let hash = self.line.pos().saturating_sub(1);
        self.line
            .slice(self.line.line_start(), hash)
            .iter()
            .all(|&b| b == b' ' || b == b'\t')
    }

    fn magic_comment(&mut self, name: &str, value: &str) {
        let (line, column, offset) = self.token_anchor();
        let at = EventPos {
            line,
            column,
            offset,
            state: self.st.lex_state,
        };
        self.sink.dispatch(
            Event::Parser(ParserEvent::MagicComment),
            &[Arg::Text(name.to_owned()), Arg::Text(value.to_owned())],
            at,
        );
        debug!(name, value, "magic comment");

        match name.to_ascii_lowercase().as_str() {
            "coding" | "encoding" => {
                if self.comment_at_top() {
                    self.set_encoding(strip_newline_suffix(value));
                }
            }
            "frozen_string_literal" => {
                if self.token_seen {
                    self.warning("`frozen_string_literal' is ignored after any tokens");
                } else if let Some(b) = self.magic_bool("frozen_string_literal", value) {
                    self.magic.frozen_string_literal = Some(b);
                }
            }
            "warn_indent" => {
                if let Some(b) = self.magic_bool("warn_indent", value) {
                    self.magic.warn_indent = Some(b);
                }
            }
            "shareable_constant_value" => {
                if !self.comment_only_line() {
                    self.warning(
                        "`shareable_constant_value' is ignored unless in comment-only line",
                    );
                    return;
                }
                let setting = match value.to_ascii_lowercase().as_str() {
                    "none" => ShareableConstantValue::None,
                    "literal" => ShareableConstantValue::Literal,
                    "experimental_everything" => ShareableConstantValue::ExperimentalEverything,
                    "experimental_copy" => ShareableConstantValue::ExperimentalCopy,
                    _ => {
                        self.invalid_pragma_value("shareable_constant_value", value);
                        return;
                    }
                };
                self.magic.shareable_constant_value = setting;
            }
            _ => {}
        }
    }

    fn magic_bool(&mut self, name: &str, value: &str) -> Option<bool> {
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            self.invalid_pragma_value(name, value);
            None
        }
    }

    fn invalid_pragma_value(&mut self, name: &str, value: &str) {
        self.warning(format!("invalid value for {name}: {value}"));
    }

    fn set_encoding(&mut self, name: &str) {
        let saved = std::mem::replace(&mut self.context, LexErrorContext::MagicComment);
        match SourceEncoding::from_name(name) {
            Ok(enc) => {
                debug!(encoding = enc.name(), "source encoding");
                self.encoding = enc;
            }
            Err(rip_lexer_core::EncodingError::Unknown(name)) => {
                self.compile_error(LexErrorKind::UnknownEncoding { name });
            }
            Err(rip_lexer_core::EncodingError::NotAsciiCompatible(name)) => {
                self.compile_error(LexErrorKind::NotAsciiCompatible {
                    name: name.to_owned(),
                });
            }
        }
        self.context = saved;
    }

    /// `word` at the cursor, followed by whitespace or end of line.
    fn word_match(&self, word: &[u8]) -> bool {
        let rest = self.line.rest();
        if !rest.starts_with(word) {
            return false;
        }
        match rest.get(word.len()) {
            None => true,
            Some(&b) => is_space(b) || matches!(b, 0 | 0x04 | 0x1a),
        }
    }

    /// `=begin` ... `=end`. The `=` at the start of the line was consumed.
    /// Returns false when this is not an embedded document.
    pub(super) fn embdoc(&mut self) -> bool {
        if !self.word_match(b"begin") {
            return false;
        }
        self.line.goto_eol();
        self.dispatch_scan(ScannerEvent::EmbdocBeg);
        loop {
            let c = self.nextc();
            let Some(c) = c else {
                self.compile_error(LexErrorKind::EmbdocMeetsEof);
                self.halt();
                return true;
            };
            if c == b'=' && self.word_match(b"end") {
                break;
            }
            self.pushback(Some(c));
            self.line.goto_eol();
            self.dispatch_scan(ScannerEvent::Embdoc);
        }
        self.line.goto_eol();
        self.dispatch_scan(ScannerEvent::EmbdocEnd);
        true
    }

    /// `__END__` at the start of a line: everything from here on is data.
    pub(super) fn end_of_program(&mut self) {
        self.line.goto_eol();
        let (mut text, at) = self.take_text();
        match self.feed.drain_rest() {
            Ok(rest) => text.extend_from_slice(&rest),
            Err(err) => self.source_error = Some(err),
        }
        debug!(line = at.line, "__END__");
        let text = String::from_utf8_lossy(&text).into_owned();
        self.sink
            .dispatch(Event::Scanner(ScannerEvent::End), &[Arg::Text(text)], at);
        self.halt();
    }
}
