//! Source encodings.
//!
//! Only ASCII-compatible encodings can carry Ruby source: the lexer scans
//! syntax as ASCII bytes and treats every non-ASCII byte sequence as part of
//! an identifier or literal. UTF-16/32 are recognized by name so they can be
//! rejected with a precise message.

use std::fmt;

use thiserror::Error;

/// UTF-8 byte-order mark.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Strip a leading UTF-8 BOM, if present.
pub fn strip_bom(bytes: &[u8]) -> Option<&[u8]> {
    bytes.strip_prefix(UTF8_BOM)
}

/// Error resolving an encoding name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("unknown encoding name: {0}")]
    Unknown(String),
    #[error("{0} is not ASCII compatible")]
    NotAsciiCompatible(&'static str),
}

const ISO_8859_NAMES: [&str; 16] = [
    "ISO-8859-1",
    "ISO-8859-2",
    "ISO-8859-3",
    "ISO-8859-4",
    "ISO-8859-5",
    "ISO-8859-6",
    "ISO-8859-7",
    "ISO-8859-8",
    "ISO-8859-9",
    "ISO-8859-10",
    "ISO-8859-11",
    "ISO-8859-12",
    "ISO-8859-13",
    "ISO-8859-14",
    "ISO-8859-15",
    "ISO-8859-16",
];

/// An ASCII-compatible source encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SourceEncoding {
    #[default]
    Utf8,
    UsAscii,
    /// Raw bytes (`BINARY`).
    Ascii8Bit,
    /// `ISO-8859-n`, n in 1..=16 except 12.
    Iso8859(u8),
    Windows1252,
    EucJp,
    ShiftJis,
    Windows31J,
    Gbk,
    Big5,
}

impl SourceEncoding {
    /// Resolve an encoding name or alias, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, EncodingError> {
        let lower = name.trim().to_ascii_lowercase();
        let enc = match lower.as_str() {
            "utf-8" | "utf8" | "cp65001" => SourceEncoding::Utf8,
            "us-ascii" | "ascii" | "ansi_x3.4-1968" | "646" => SourceEncoding::UsAscii,
            "ascii-8bit" | "binary" => SourceEncoding::Ascii8Bit,
            "windows-1252" | "cp1252" => SourceEncoding::Windows1252,
            "euc-jp" | "eucjp" => SourceEncoding::EucJp,
            "shift_jis" | "sjis" => SourceEncoding::ShiftJis,
            "windows-31j" | "cp932" | "cswindows31j" => SourceEncoding::Windows31J,
            "gbk" | "cp936" => SourceEncoding::Gbk,
            "big5" => SourceEncoding::Big5,
            "utf-16" => return Err(EncodingError::NotAsciiCompatible("UTF-16")),
            "utf-16le" => return Err(EncodingError::NotAsciiCompatible("UTF-16LE")),
            "utf-16be" | "ucs-2be" => return Err(EncodingError::NotAsciiCompatible("UTF-16BE")),
            "utf-32" => return Err(EncodingError::NotAsciiCompatible("UTF-32")),
            "utf-32le" | "ucs-4le" => return Err(EncodingError::NotAsciiCompatible("UTF-32LE")),
            "utf-32be" => return Err(EncodingError::NotAsciiCompatible("UTF-32BE")),
            "utf-7" | "cp65000" => return Err(EncodingError::NotAsciiCompatible("UTF-7")),
            other => match Self::iso_8859_part(other) {
                Some(n) => SourceEncoding::Iso8859(n),
                None => return Err(EncodingError::Unknown(name.trim().to_owned())),
            },
        };
        Ok(enc)
    }

    /// Parse `iso-8859-N` / `iso8859-N` into `N`.
    fn iso_8859_part(lower: &str) -> Option<u8> {
        let digits = lower
            .strip_prefix("iso-8859-")
            .or_else(|| lower.strip_prefix("iso8859-"))?;
        let n: u8 = digits.parse().ok()?;
        ((1..=16).contains(&n) && n != 12).then_some(n)
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "UTF-8",
            SourceEncoding::UsAscii => "US-ASCII",
            SourceEncoding::Ascii8Bit => "ASCII-8BIT",
            SourceEncoding::Iso8859(n) => ISO_8859_NAMES
                .get(usize::from(n.saturating_sub(1)))
                .copied()
                .unwrap_or("ISO-8859-1"),
            SourceEncoding::Windows1252 => "Windows-1252",
            SourceEncoding::EucJp => "EUC-JP",
            SourceEncoding::ShiftJis => "Shift_JIS",
            SourceEncoding::Windows31J => "Windows-31J",
            SourceEncoding::Gbk => "GBK",
            SourceEncoding::Big5 => "Big5",
        }
    }

    #[inline]
    pub fn is_utf8(self) -> bool {
        self == SourceEncoding::Utf8
    }

    /// Byte length of the character whose first byte is `lead`.
    ///
    /// Malformed lead bytes count as one byte so scanning always advances.
    pub fn char_len(self, lead: u8) -> usize {
        if lead < 0x80 {
            return 1;
        }
        match self {
            SourceEncoding::Utf8 => match lead {
                0xC2..=0xDF => 2,
                0xE0..=0xEF => 3,
                0xF0..=0xF4 => 4,
                _ => 1,
            },
            SourceEncoding::EucJp => match lead {
                0x8F => 3,
                0x8E | 0xA1..=0xFE => 2,
                _ => 1,
            },
            SourceEncoding::ShiftJis | SourceEncoding::Windows31J => match lead {
                0x81..=0x9F | 0xE0..=0xFC => 2,
                _ => 1,
            },
            SourceEncoding::Gbk | SourceEncoding::Big5 => match lead {
                0x81..=0xFE => 2,
                _ => 1,
            },
            SourceEncoding::UsAscii
            | SourceEncoding::Ascii8Bit
            | SourceEncoding::Iso8859(_)
            | SourceEncoding::Windows1252 => 1,
        }
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
