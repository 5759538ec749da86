//! Per-character escaping and charset handling.
//!
//! A strategy is chosen once per render from the output charset; after that
//! each character is a handful of comparisons and pushes into the line.

use crate::charset::Charset;
use crate::config::PrintConfig;
use crate::entities::entity_name;

use super::line::LineBuffer;
use super::mode::Mode;

const NBSP: char = '\u{a0}';

/// Escaping switches copied out of the configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EscapeFlags {
    pub quote_ampersand: bool,
    pub quote_marks: bool,
    pub quote_nbsp: bool,
    pub num_entities: bool,
    /// Use `&#160;` rather than `&nbsp;`.
    pub numeric_nbsp: bool,
    pub make_bare: bool,
    /// Leave U+00A0 alone regardless of the nbsp switches.
    pub raw_out: bool,
    /// Fold typographic quotes and dashes to ASCII.
    pub smart_quotes: bool,
    pub xml_tags: bool,
}

impl EscapeFlags {
    fn from_config(config: &PrintConfig) -> Self {
        Self {
            quote_ampersand: config.quote_ampersand,
            quote_marks: config.quote_marks,
            quote_nbsp: config.quote_nbsp,
            num_entities: config.num_entities,
            numeric_nbsp: config.num_entities || config.xml_tags,
            make_bare: config.make_bare,
            raw_out: config.raw_out || config.output_encoding == Charset::Raw,
            smart_quotes: (config.make_clean && config.ascii_chars) || config.make_bare,
            xml_tags: config.xml_tags,
        }
    }
}

/// High half (0x80..=0xFF) of a single-byte charset, `None` where unmapped.
#[derive(Debug, Clone)]
pub(crate) struct HighHalf(Box<[Option<char>; 128]>);

impl HighHalf {
    /// Latin-1; the C1 controls count as unrepresentable.
    fn latin1() -> Self {
        let mut table = Box::new([None; 128]);
        for (i, slot) in table.iter_mut().enumerate().skip(0x20) {
            *slot = char::from_u32(0x80 + i as u32);
        }
        Self(table)
    }

    /// Build from an `encoding_rs` single-byte encoding.
    fn decoded(encoding: &'static encoding_rs::Encoding) -> Self {
        let mut table = Box::new([None; 128]);
        for (i, slot) in table.iter_mut().enumerate() {
            let byte = [0x80 + i as u8];
            let (decoded, malformed) = encoding.decode_without_bom_handling(&byte);
            if !malformed {
                *slot = decoded.chars().next();
            }
        }
        Self(table)
    }

    fn represents(&self, c: char) -> bool {
        let cp = c as u32;
        if cp < 0x7F {
            return true;
        }
        if (0x80..=0xFF).contains(&cp) && self.0[(cp - 0x80) as usize] == Some(c) {
            return true;
        }
        cp > 0xFF && self.0.contains(&Some(c))
    }
}

/// Charset-specific handling chosen once per render.
#[derive(Debug, Clone)]
pub(crate) enum Strategy {
    /// UTF-8 / UTF-16: break around CJK punctuation, pass everything through.
    Unicode,
    /// Big5: pass through, break around full-width punctuation.
    DoubleByte,
    /// Shift_JIS, ISO-2022 or raw output: pass through untouched.
    Raw,
    /// Western single-byte sets: escape what the set cannot hold.
    SingleByte(HighHalf),
    Ascii,
}

impl Strategy {
    fn for_config(config: &PrintConfig) -> Self {
        match config.output_encoding {
            Charset::Utf8 | Charset::Utf16Le | Charset::Utf16Be => Strategy::Unicode,
            Charset::Big5 => Strategy::DoubleByte,
            Charset::ShiftJis | Charset::Iso2022Jp | Charset::Raw => Strategy::Raw,
            _ if config.raw_out => Strategy::Raw,
            Charset::Latin1 => Strategy::SingleByte(HighHalf::latin1()),
            Charset::Windows1252 => {
                Strategy::SingleByte(HighHalf::decoded(encoding_rs::WINDOWS_1252))
            }
            Charset::MacRoman => Strategy::SingleByte(HighHalf::decoded(encoding_rs::MACINTOSH)),
            Charset::Ascii => Strategy::Ascii,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Break {
    None,
    Before,
    After,
}

/// Wrap opportunity around a Unicode punctuation or space character.
fn cjk_break(c: char) -> Break {
    let cp = c as u32;
    if cp < 0x2000 {
        return Break::None;
    }
    let breakable = matches!(
        cp,
        0x2000..=0x2006
            | 0x2008..=0x2046
            | 0x207D..=0x207E
            | 0x208D..=0x208E
            | 0x2329..=0x232A
            | 0x3001..=0x3003
            | 0x3008..=0x3011
            | 0x3014..=0x301F
            | 0xFD3E..=0xFD3F
            | 0xFE30..=0xFE44
            | 0xFE49..=0xFE52
            | 0xFE54..=0xFE61
            | 0xFE6A..=0xFE6B
            | 0xFF01..=0xFF03
            | 0xFF05..=0xFF0A
            | 0xFF0C..=0xFF0F
            | 0xFF1A..=0xFF1B
            | 0xFF1F..=0xFF20
            | 0xFF3B..=0xFF3D
            | 0xFF61..=0xFF65
            | 0xFE63
            | 0xFE68
            | 0x3030
            | 0x30FB
            | 0xFF3F
            | 0xFF5B
            | 0xFF5D
    );
    if !breakable {
        return Break::None;
    }
    // Opening punctuation binds to what follows it.
    let opening = matches!(
        cp,
        0x201A..=0x201C
            | 0x201E..=0x201F
            | 0x2018
            | 0x2039
            | 0x2045
            | 0x207D
            | 0x208D
            | 0x2329
            | 0x3008
            | 0x300A
            | 0x300C
            | 0x300E
            | 0x3010
            | 0x3014
            | 0x3016
            | 0x3018
            | 0x301A
            | 0x301D
            | 0xFD3E
            | 0xFE35
            | 0xFE37
            | 0xFE39
            | 0xFE3B
            | 0xFE3D
            | 0xFE3F
            | 0xFE41
            | 0xFE43
            | 0xFE59
            | 0xFE5B
            | 0xFE5D
            | 0xFF08
            | 0xFF3B
            | 0xFF5B
            | 0xFF62
    );
    if opening { Break::Before } else { Break::After }
}

/// Lead and trail byte of `c` in Big5, if it has a double-byte code.
fn big5_code(c: char) -> Option<(u8, u8)> {
    if c.is_ascii() {
        return None;
    }
    let mut buf = [0u8; 4];
    let (bytes, _, unmappable) = encoding_rs::BIG5.encode(c.encode_utf8(&mut buf));
    match *bytes {
        [lead, trail] if !unmappable => Some((lead, trail)),
        _ => None,
    }
}

/// Wrap opportunity around Big5 punctuation, which sits at lead byte 0xA1.
fn big5_break(c: char) -> Break {
    match big5_code(c) {
        // Opening brackets have odd trail bytes.
        Some((0xA1, trail)) if (0x5D..=0xAC).contains(&trail) && trail & 1 == 1 => Break::Before,
        Some((0xA1, _)) => Break::After,
        _ => Break::None,
    }
}

/// Typographic quote or dash folded to its ASCII stand-in.
fn fold_smart_quote(c: char) -> char {
    match c {
        '\u{2013}' | '\u{2014}' => '-',
        '\u{2018}' | '\u{2019}' | '\u{201a}' => '\'',
        '\u{201c}' | '\u{201d}' | '\u{201e}' => '"',
        other => other,
    }
}

fn push_with_break(line: &mut LineBuffer, c: char, brk: Break) {
    match brk {
        Break::Before => {
            line.mark_wrap_point();
            line.push(c);
        }
        Break::After => {
            line.push(c);
            line.mark_wrap_point();
        }
        Break::None => line.push(c),
    }
}

/// `&#NNN;` without allocating.
fn push_numeric(line: &mut LineBuffer, cp: u32) {
    let mut digits = [0u8; 10];
    let mut n = cp;
    let mut i = digits.len();
    loop {
        i -= 1;
        digits[i] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    line.push('&');
    line.push('#');
    for &d in &digits[i..] {
        line.push(d as char);
    }
    line.push(';');
}

fn push_entity(line: &mut LineBuffer, c: char, flags: EscapeFlags) {
    match entity_name(c) {
        Some(name) if !flags.num_entities => {
            line.push('&');
            line.push_str(name);
            line.push(';');
        }
        _ => push_numeric(line, c as u32),
    }
}

/// Turns characters into output text for one render.
#[derive(Debug, Clone)]
pub(crate) struct CharEncoder {
    strategy: Strategy,
    flags: EscapeFlags,
}

impl CharEncoder {
    pub(crate) fn new(config: &PrintConfig) -> Self {
        Self {
            strategy: Strategy::for_config(config),
            flags: EscapeFlags::from_config(config),
        }
    }

    pub(crate) fn flags(&self) -> EscapeFlags {
        self.flags
    }

    #[inline]
    pub(crate) fn encode(&self, c: char, mode: Mode, line: &mut LineBuffer) {
        self.encode_with(c, mode, self.flags, line);
    }

    /// Encode one character with explicit escaping switches.
    pub(crate) fn encode_with(&self, c: char, mode: Mode, flags: EscapeFlags, line: &mut LineBuffer) {
        let verbatim = Mode::PREFORMATTED | Mode::COMMENT | Mode::ATTR_VALUE | Mode::CDATA;
        if c == ' ' && !mode.intersects(verbatim) {
            if mode.contains(Mode::NO_WRAP) {
                line.push_str(if flags.numeric_nbsp { "&#160;" } else { "&nbsp;" });
                return;
            }
            line.mark_wrap_point();
        }

        if mode.intersects(Mode::COMMENT | Mode::CDATA) {
            line.push(c);
            return;
        }

        match c {
            '<' => return line.push_str("&lt;"),
            '>' => return line.push_str("&gt;"),
            '&' if flags.quote_ampersand => return line.push_str("&amp;"),
            '"' if flags.quote_marks => return line.push_str("&quot;"),
            '\'' if flags.quote_marks => return line.push_str("&#39;"),
            NBSP if !flags.raw_out => {
                if flags.make_bare {
                    line.push(' ');
                } else if flags.quote_nbsp {
                    line.push_str(if flags.numeric_nbsp { "&#160;" } else { "&nbsp;" });
                } else {
                    line.push(c);
                }
                return;
            }
            _ => {}
        }

        let brk = match &self.strategy {
            Strategy::Unicode if !mode.contains(Mode::PREFORMATTED) => cjk_break(c),
            Strategy::DoubleByte => {
                let brk = if mode.contains(Mode::PREFORMATTED) {
                    Break::None
                } else {
                    big5_break(c)
                };
                return push_with_break(line, c, brk);
            }
            Strategy::Raw => return line.push(c),
            _ => Break::None,
        };

        if c == NBSP && mode.contains(Mode::PREFORMATTED) {
            return line.push(' ');
        }

        let c = if flags.smart_quotes { fold_smart_quote(c) } else { c };

        match &self.strategy {
            Strategy::SingleByte(high) if !high.represents(c) => push_entity(line, c, flags),
            Strategy::Ascii => {
                let cp = c as u32;
                if flags.xml_tags {
                    if cp > 127 {
                        push_numeric(line, cp);
                    } else {
                        line.push(c);
                    }
                } else if cp > 126 || (cp < 0x20 && c != '\t') {
                    push_entity(line, c, flags);
                } else {
                    line.push(c);
                }
            }
            _ => push_with_break(line, c, brk),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::print::line::WrapBias;

    fn encode_all(config: &PrintConfig, mode: Mode, text: &str) -> (String, usize) {
        let encoder = CharEncoder::new(config);
        let mut line = LineBuffer::new(10_000, WrapBias::None, false);
        for c in text.chars() {
            encoder.encode(c, mode, &mut line);
        }
        let wrap_point = line.wrap_point();
        let mut out = crate::sink::StringSink::new(crate::config::LineEnding::Lf);
        line.cond_flush_inline(&mut out, 0).unwrap();
        (out.into_string(), wrap_point)
    }

    fn encode_str(config: &PrintConfig, mode: Mode, text: &str) -> String {
        encode_all(config, mode, text).0
    }

    #[test]
    fn test_markup_escapes() {
        let config = PrintConfig::default();
        assert_eq!(
            encode_str(&config, Mode::NORMAL, "a<b>&\"'"),
            "a&lt;b&gt;&amp;\"'"
        );
        let config = PrintConfig {
            quote_marks: true,
            quote_ampersand: false,
            ..PrintConfig::default()
        };
        assert_eq!(encode_str(&config, Mode::NORMAL, "&\"'"), "&&quot;&#39;");
    }

    #[test]
    fn test_comment_and_cdata_pass_through() {
        let config = PrintConfig::default();
        assert_eq!(encode_str(&config, Mode::COMMENT, "<&>"), "<&>");
        assert_eq!(encode_str(&config, Mode::CDATA, "<&>\u{a0}"), "<&>\u{a0}");
    }

    #[test]
    fn test_space_in_no_wrap_mode() {
        let config = PrintConfig::default();
        assert_eq!(encode_str(&config, Mode::NO_WRAP, "a b"), "a&nbsp;b");
        let config = PrintConfig {
            num_entities: true,
            ..PrintConfig::default()
        };
        assert_eq!(encode_str(&config, Mode::NO_WRAP, "a b"), "a&#160;b");
        assert_eq!(
            encode_str(&config, Mode::NO_WRAP | Mode::PREFORMATTED, "a b"),
            "a b"
        );
    }

    #[test]
    fn test_space_records_wrap_point() {
        let config = PrintConfig::default();
        assert_eq!(encode_all(&config, Mode::NORMAL, "ab cd"), ("ab cd".to_string(), 2));
        assert_eq!(encode_all(&config, Mode::PREFORMATTED, "ab cd").1, 0);
    }

    #[test]
    fn test_nbsp_handling() {
        let config = PrintConfig::default();
        assert_eq!(encode_str(&config, Mode::NORMAL, "\u{a0}"), "&nbsp;");
        let bare = PrintConfig {
            make_bare: true,
            ..PrintConfig::default()
        };
        assert_eq!(encode_str(&bare, Mode::NORMAL, "\u{a0}"), " ");
        let raw = PrintConfig {
            quote_nbsp: false,
            ..PrintConfig::default()
        };
        assert_eq!(encode_str(&raw, Mode::NORMAL, "\u{a0}"), "\u{a0}");
    }

    #[test]
    fn test_ascii_output() {
        let config = PrintConfig::default().with_encoding(Charset::Ascii);
        assert_eq!(encode_str(&config, Mode::NORMAL, "caf\u{e9}"), "caf&eacute;");
        assert_eq!(encode_str(&config, Mode::NORMAL, "\u{4e2d}"), "&#20013;");
        assert_eq!(encode_str(&config, Mode::NORMAL, "\t\u{1}"), "\t&#1;");

        let numeric = PrintConfig {
            num_entities: true,
            ..config.clone()
        };
        assert_eq!(encode_str(&numeric, Mode::NORMAL, "\u{e9}"), "&#233;");

        let xml = PrintConfig {
            xml_tags: true,
            ..config
        };
        assert_eq!(encode_str(&xml, Mode::NORMAL, "\u{e9}\u{7f}"), "&#233;\u{7f}");
    }

    #[test]
    fn test_latin1_output() {
        let config = PrintConfig::default().with_encoding(Charset::Latin1);
        assert_eq!(encode_str(&config, Mode::NORMAL, "\u{e9}"), "\u{e9}");
        assert_eq!(encode_str(&config, Mode::NORMAL, "\u{20ac}"), "&euro;");
        assert_eq!(encode_str(&config, Mode::NORMAL, "\u{85}"), "&#133;");
        assert_eq!(encode_str(&config, Mode::NORMAL, "\u{4e2d}"), "&#20013;");
    }

    #[test]
    fn test_windows_1252_output() {
        let config = PrintConfig::default().with_encoding(Charset::Windows1252);
        assert_eq!(encode_str(&config, Mode::NORMAL, "\u{20ac}\u{e9}"), "\u{20ac}\u{e9}");
        assert_eq!(encode_str(&config, Mode::NORMAL, "\u{3a9}"), "&Omega;");
    }

    #[test]
    fn test_utf8_passes_through_and_breaks() {
        let config = PrintConfig::default();
        assert_eq!(
            encode_all(&config, Mode::NORMAL, "\u{4e2d}\u{3001}"),
            ("\u{4e2d}\u{3001}".to_string(), 2)
        );
        assert_eq!(encode_all(&config, Mode::NORMAL, "\u{4e2d}\u{300c}").1, 1);
        assert_eq!(encode_all(&config, Mode::PREFORMATTED, "\u{4e2d}\u{3001}").1, 0);
    }

    #[test]
    fn test_smart_quotes_folded() {
        let config = PrintConfig {
            make_bare: true,
            ..PrintConfig::default()
        };
        assert_eq!(
            encode_str(&config, Mode::NORMAL, "\u{201c}hi\u{201d} \u{2014} \u{2019}"),
            "\"hi\" - '"
        );
        let plain = PrintConfig::default();
        assert_eq!(encode_str(&plain, Mode::NORMAL, "\u{2014}"), "\u{2014}");
    }

    #[test]
    fn test_big5_breaks() {
        let config = PrintConfig::default().with_encoding(Charset::Big5);
        // Full-width comma is A1 41: break after it.
        assert_eq!(encode_all(&config, Mode::NORMAL, "\u{4e2d}\u{ff0c}\u{6587}").1, 2);
        // Full-width left parenthesis is A1 5D: break before it.
        assert_eq!(encode_all(&config, Mode::NORMAL, "x\u{ff08}").1, 1);
        assert_eq!(encode_all(&config, Mode::NORMAL, "x\u{ff09}").1, 2);
        assert_eq!(encode_all(&config, Mode::NORMAL, "x\u{4e2d}").1, 0);
        // Yi syllables have no Big5 code.
        assert_eq!(encode_all(&config, Mode::NORMAL, "x\u{a141}").1, 0);
        assert_eq!(encode_all(&config, Mode::PREFORMATTED, "x\u{ff0c}").1, 0);
    }

    #[test]
    fn test_big5_code() {
        assert_eq!(big5_code('\u{ff0c}'), Some((0xA1, 0x41)));
        assert_eq!(big5_code('\u{ff08}'), Some((0xA1, 0x5D)));
        assert_eq!(big5_code('a'), None);
        assert_eq!(big5_code('\u{a141}'), None);
    }

    #[test]
    fn test_raw_strategies() {
        let config = PrintConfig::default().with_encoding(Charset::ShiftJis);
        assert_eq!(encode_str(&config, Mode::NORMAL, "\u{3042}<"), "\u{3042}&lt;");
        assert_eq!(encode_str(&config, Mode::NORMAL, "a\u{a0}b"), "a&nbsp;b");
        let raw_sjis = PrintConfig {
            raw_out: true,
            ..config
        };
        assert_eq!(encode_str(&raw_sjis, Mode::NORMAL, "a\u{a0}b"), "a\u{a0}b");
        let raw_utf8 = PrintConfig {
            raw_out: true,
            ..PrintConfig::default()
        };
        assert_eq!(encode_str(&raw_utf8, Mode::NORMAL, "a\u{a0}b"), "a\u{a0}b");
        let raw_charset = PrintConfig::default().with_encoding(Charset::Raw);
        assert_eq!(encode_str(&raw_charset, Mode::NORMAL, "a\u{a0}b"), "a\u{a0}b");
        let raw = PrintConfig {
            raw_out: true,
            ..PrintConfig::default().with_encoding(Charset::Ascii)
        };
        assert_eq!(encode_str(&raw, Mode::NORMAL, "\u{e9}<"), "\u{e9}&lt;");
    }

    fn unescape(s: &str) -> String {
        s.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    proptest! {
        #[test]
        fn prop_markup_escaping_reverses(s in "[a-z<>&\"' ]{0,40}") {
            let config = PrintConfig { quote_marks: true, ..PrintConfig::default() };
            let encoded = encode_str(&config, Mode::NORMAL, &s);
            prop_assert!(!encoded.contains('<') && !encoded.contains('>'));
            prop_assert_eq!(unescape(&encoded), s);
        }

        #[test]
        fn prop_ascii_output_is_ascii(s in "\\PC{0,30}") {
            let config = PrintConfig::default().with_encoding(Charset::Ascii);
            let encoded = encode_str(&config, Mode::NORMAL, &s);
            prop_assert!(encoded.chars().all(|c| c == '\t' || (' '..='~').contains(&c)));
        }
    }
}
