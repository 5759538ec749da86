//! Input decoding helpers.

use std::borrow::Cow;

use memchr::memmem;

/// How far into a document to look for a declared encoding.
const SNIFF_LIMIT: usize = 1024;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`
///    or `<meta charset="...">`)
/// 3. Falls back to Windows-1252, a superset of ISO-8859-1
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
///
/// ```
/// use kempt::util::decode_text;
///
/// assert_eq!(decode_text("Hello".as_bytes(), None), "Hello");
/// assert_eq!(decode_text(b"caf\xe9", None), "caf\u{e9}");
/// assert_eq!(decode_text(b"\x82\xa0", Some("shift_jis")), "\u{3042}");
/// ```
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find the encoding a document declares near its start.
///
/// Looks for `encoding="..."` in an XML declaration, then `charset=...` in
/// a `<meta>` element. Only the first kilobyte is examined.
///
/// ```
/// use kempt::util::sniff_encoding;
///
/// assert_eq!(sniff_encoding(b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>"), Some("ISO-8859-1"));
/// assert_eq!(sniff_encoding(b"<meta charset=utf-8>"), Some("utf-8"));
/// assert_eq!(sniff_encoding(b"<p>none</p>"), None);
/// ```
pub fn sniff_encoding(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(SNIFF_LIMIT)];

    if head.starts_with(b"<?xml") {
        let decl_end = memchr::memchr(b'>', head).unwrap_or(head.len());
        let decl = &head[..decl_end];
        if let Some(pos) = memmem::find(decl, b"encoding=") {
            return declared_value(&decl[pos + b"encoding=".len()..]);
        }
    }

    let lower = head.to_ascii_lowercase();
    let pos = memmem::find(&lower, b"charset=")?;
    let start = pos + b"charset=".len();
    declared_value(&head[start..])
}

/// The value at the start of `rest`, quoted or bare.
fn declared_value(rest: &[u8]) -> Option<&str> {
    let (body, quoted) = match rest.first() {
        Some(&q @ (b'"' | b'\'')) => (&rest[1..], Some(q)),
        _ => (rest, None),
    };
    let end = match quoted {
        Some(q) => memchr::memchr(q, body)?,
        None => body
            .iter()
            .position(|b| matches!(b, b'"' | b'\'' | b';' | b'>' | b'/') || b.is_ascii_whitespace())
            .unwrap_or(body.len()),
    };
    let value = std::str::from_utf8(&body[..end]).ok()?.trim();
    (!value.is_empty()).then_some(value)
}
