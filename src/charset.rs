//! Output character sets.

use std::fmt;
use std::str::FromStr;

use encoding_rs::Encoding;

use crate::error::Error;

/// The character set the printed document is encoded in.
///
/// The charset decides two things: which code points the printer escapes as
/// entities, and how the [`EncodingSink`](crate::sink::EncodingSink) turns
/// finished lines into bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
pub enum Charset {
    Ascii,
    Latin1,
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
    Windows1252,
    MacRoman,
    Big5,
    ShiftJis,
    Iso2022Jp,
    /// Characters pass through unescaped and are written as UTF-8.
    Raw,
}

impl Charset {
    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Charset::Ascii => "ascii",
            Charset::Latin1 => "latin1",
            Charset::Utf8 => "utf8",
            Charset::Utf16Le => "utf16le",
            Charset::Utf16Be => "utf16be",
            Charset::Windows1252 => "win1252",
            Charset::MacRoman => "mac",
            Charset::Big5 => "big5",
            Charset::ShiftJis => "shiftjis",
            Charset::Iso2022Jp => "iso2022",
            Charset::Raw => "raw",
        }
    }

    /// True for the Unicode transformation formats.
    pub fn is_unicode(self) -> bool {
        matches!(self, Charset::Utf8 | Charset::Utf16Le | Charset::Utf16Be)
    }

    /// The `encoding_rs` encoder backing this charset, where one exists.
    ///
    /// ASCII, Latin-1 and UTF-16 are encoded directly: `encoding_rs` maps the
    /// `iso-8859-1` label to windows-1252 and never encodes into UTF-16.
    pub fn encoding(self) -> Option<&'static Encoding> {
        match self {
            Charset::Utf8 | Charset::Raw => Some(encoding_rs::UTF_8),
            Charset::Windows1252 => Some(encoding_rs::WINDOWS_1252),
            Charset::MacRoman => Some(encoding_rs::MACINTOSH),
            Charset::Big5 => Some(encoding_rs::BIG5),
            Charset::ShiftJis => Some(encoding_rs::SHIFT_JIS),
            Charset::Iso2022Jp => Some(encoding_rs::ISO_2022_JP),
            Charset::Ascii | Charset::Latin1 | Charset::Utf16Le | Charset::Utf16Be => None,
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let charset = match key.as_str() {
            "ascii" | "usascii" => Charset::Ascii,
            "latin1" | "iso88591" => Charset::Latin1,
            "utf8" => Charset::Utf8,
            "utf16" | "utf16le" => Charset::Utf16Le,
            "utf16be" => Charset::Utf16Be,
            "win1252" | "windows1252" | "cp1252" => Charset::Windows1252,
            "mac" | "macroman" | "macintosh" => Charset::MacRoman,
            "big5" => Charset::Big5,
            "shiftjis" | "sjis" => Charset::ShiftJis,
            "iso2022" | "iso2022jp" => Charset::Iso2022Jp,
            "raw" => Charset::Raw,
            _ => return Err(Error::UnsupportedEncoding(s.to_string())),
        };
        Ok(charset)
    }
}

impl TryFrom<String> for Charset {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
