//! Output sinks the printer writes finished lines into.

use std::io::{self, Write};

use crate::charset::Charset;
use crate::config::LineEnding;

/// Destination for printed characters.
///
/// The printer emits whole lines: characters followed by [`newline`]. A sink
/// may fail with an I/O error; the printer propagates it unchanged.
///
/// [`newline`]: OutputSink::newline
pub trait OutputSink {
    fn write_char(&mut self, c: char) -> io::Result<()>;

    fn newline(&mut self) -> io::Result<()>;

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        for c in s.chars() {
            self.write_char(c)?;
        }
        Ok(())
    }
}

/// In-memory sink.
#[derive(Debug, Default)]
pub struct StringSink {
    buf: String,
    line_ending: LineEnding,
}

impl StringSink {
    pub fn new(line_ending: LineEnding) -> Self {
        Self {
            buf: String::new(),
            line_ending,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

impl OutputSink for StringSink {
    fn write_char(&mut self, c: char) -> io::Result<()> {
        self.buf.push(c);
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        self.buf.push_str(self.line_ending.as_str());
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.buf.push_str(s);
        Ok(())
    }
}

/// Sink that encodes each finished line into a byte charset.
///
/// Characters collect in a pending line and are encoded when the line ends
/// (or on [`finish`](EncodingSink::finish)), so stateful encodings such as
/// ISO-2022-JP return to ASCII at every line boundary.
pub struct EncodingSink<W: Write> {
    writer: W,
    charset: Charset,
    line_ending: LineEnding,
    pending: String,
}

impl<W: Write> EncodingSink<W> {
    pub fn new(writer: W, charset: Charset, line_ending: LineEnding) -> Self {
        Self {
            writer,
            charset,
            line_ending,
            pending: String::with_capacity(256),
        }
    }

    fn encode_pending(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        match self.charset {
            Charset::Ascii => {
                let bytes: Vec<u8> = self
                    .pending
                    .chars()
                    .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                    .collect();
                self.writer.write_all(&bytes)?;
            }
            Charset::Latin1 => {
                let bytes: Vec<u8> = self
                    .pending
                    .chars()
                    .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                    .collect();
                self.writer.write_all(&bytes)?;
            }
            Charset::Utf16Le | Charset::Utf16Be => {
                let big_endian = self.charset == Charset::Utf16Be;
                let mut bytes = Vec::with_capacity(self.pending.len() * 2);
                for unit in self.pending.encode_utf16() {
                    let pair = if big_endian {
                        unit.to_be_bytes()
                    } else {
                        unit.to_le_bytes()
                    };
                    bytes.extend_from_slice(&pair);
                }
                self.writer.write_all(&bytes)?;
            }
            Charset::Utf8 | Charset::Raw => self.writer.write_all(self.pending.as_bytes())?,
            charset => {
                let encoding = charset.encoding().unwrap_or(encoding_rs::UTF_8);
                let (bytes, _, _) = encoding.encode(&self.pending);
                self.writer.write_all(&bytes)?;
            }
        }
        self.pending.clear();
        Ok(())
    }

    /// Encode anything still pending and flush the writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.encode_pending()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> OutputSink for EncodingSink<W> {
    fn write_char(&mut self, c: char) -> io::Result<()> {
        self.pending.push(c);
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        self.pending.push_str(self.line_ending.as_str());
        self.encode_pending()
    }

    fn write_str(&mut self, s: &str) -> io::Result<()> {
        self.pending.push_str(s);
        Ok(())
    }
}
