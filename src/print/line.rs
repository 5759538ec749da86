//! The pending output line and the wrap engine.

use std::io;

use crate::sink::OutputSink;

const INITIAL_CAPACITY: usize = 256;

/// Language-dependent shortening of the wrap limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WrapBias {
    None,
    /// Half of the space right of the indent.
    Chinese,
    /// Seven tenths of the space right of the indent.
    Japanese,
}

impl WrapBias {
    pub(crate) fn from_language(language: Option<&str>) -> Self {
        match language.map(|l| l.get(..2).unwrap_or(l).to_ascii_lowercase()) {
            Some(l) if l == "zh" => WrapBias::Chinese,
            Some(l) if l == "ja" => WrapBias::Japanese,
            _ => WrapBias::None,
        }
    }
}

/// Characters of the line being built, plus the last place it may break.
///
/// Nothing reaches the sink until the line is flushed or wrapped. The wrap
/// point is a column inside `chars`; 0 means "no break recorded".
pub(crate) struct LineBuffer {
    chars: Vec<char>,
    wrap_point: usize,
    /// The break was recorded inside a quoted string of a script value.
    wrap_in_string: bool,
    /// The break was recorded inside an attribute value.
    wrap_in_value: bool,
    /// Line start continues an attribute value and must not be indented.
    continuation: bool,
    pub(crate) in_string: bool,
    pub(crate) in_attr_value: bool,
    width: usize,
    bias: WrapBias,
    indent_attributes: bool,
}

impl LineBuffer {
    pub(crate) fn new(width: usize, bias: WrapBias, indent_attributes: bool) -> Self {
        Self {
            chars: Vec::with_capacity(INITIAL_CAPACITY),
            wrap_point: 0,
            wrap_in_string: false,
            wrap_in_value: false,
            continuation: false,
            in_string: false,
            in_attr_value: false,
            width,
            bias,
            indent_attributes,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, c: char) {
        self.chars.push(c);
    }

    pub(crate) fn push_str(&mut self, s: &str) {
        self.chars.extend(s.chars());
    }

    /// Pad with spaces up to `column`.
    pub(crate) fn pad_to(&mut self, column: usize) {
        while self.chars.len() < column {
            self.chars.push(' ');
        }
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Replace the wrap width, returning the previous one.
    pub(crate) fn set_width(&mut self, width: usize) -> usize {
        std::mem::replace(&mut self.width, width)
    }

    pub(crate) fn wrap_point(&self) -> usize {
        self.wrap_point
    }

    /// Allow a break at the current end of the line.
    #[inline]
    pub(crate) fn mark_wrap_point(&mut self) {
        self.wrap_point = self.chars.len();
        self.wrap_in_string = self.in_string;
        self.wrap_in_value = self.in_attr_value;
    }

    fn limit(&self, indent: usize) -> usize {
        let room = self.width.saturating_sub(indent);
        match self.bias {
            WrapBias::None => self.width,
            WrapBias::Chinese => indent + room / 2,
            WrapBias::Japanese => indent + room * 7 / 10,
        }
    }

    /// True once `indent` plus the line length reaches the wrap limit.
    #[inline]
    pub(crate) fn exceeds(&self, indent: usize) -> bool {
        indent + self.chars.len() >= self.limit(indent)
    }

    #[inline]
    pub(crate) fn fits(&self, indent: usize) -> bool {
        !self.exceeds(indent)
    }

    fn write_indent<S: OutputSink + ?Sized>(&self, out: &mut S, indent: usize) -> io::Result<()> {
        if self.continuation && !self.indent_attributes {
            return Ok(());
        }
        for _ in 0..indent {
            out.write_char(' ')?;
        }
        Ok(())
    }

    fn write_head<S: OutputSink + ?Sized>(&self, out: &mut S, indent: usize) -> io::Result<()> {
        self.write_indent(out, indent)?;
        for &c in &self.chars[..self.wrap_point] {
            out.write_char(c)?;
        }
        Ok(())
    }

    /// Keep what follows the wrap point, dropping one separating space.
    fn carry_over(&mut self) {
        let mut start = self.wrap_point;
        if self.chars.get(start) == Some(&' ') {
            start += 1;
        }
        self.chars.drain(..start.min(self.chars.len()));
        self.continuation = self.wrap_in_value;
        self.wrap_point = 0;
    }

    /// Break the line at the wrap point, if one was recorded.
    pub(crate) fn wrap_line<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
    ) -> io::Result<()> {
        if self.wrap_point == 0 {
            return Ok(());
        }
        self.write_head(out, indent)?;
        if self.wrap_in_string {
            out.write_str(" \\")?;
        }
        out.newline()?;
        self.carry_over();
        Ok(())
    }

    /// Break inside an attribute value, keeping the separating space on the
    /// first line.
    pub(crate) fn wrap_attr_value<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
    ) -> io::Result<()> {
        self.write_head(out, indent)?;
        out.write_char(' ')?;
        if self.wrap_in_string {
            out.write_char('\\')?;
        }
        out.newline()?;
        self.carry_over();
        Ok(())
    }

    fn emit<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
        newline: bool,
    ) -> io::Result<()> {
        if !self.chars.is_empty() {
            if self.exceeds(indent) {
                self.wrap_line(out, indent)?;
            }
            self.write_indent(out, indent)?;
            for &c in &self.chars {
                out.write_char(c)?;
            }
        }
        if newline {
            out.newline()?;
        }
        self.chars.clear();
        self.wrap_point = 0;
        self.continuation = false;
        Ok(())
    }

    /// Write the line and a line break, even if the line is empty.
    pub(crate) fn flush<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
    ) -> io::Result<()> {
        self.emit(out, indent, true)
    }

    /// Write the line and a line break only if the line has content.
    pub(crate) fn cond_flush<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
    ) -> io::Result<()> {
        if self.chars.is_empty() {
            return Ok(());
        }
        self.emit(out, indent, true)
    }

    /// Write pending content without ending the output line.
    pub(crate) fn cond_flush_inline<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
    ) -> io::Result<()> {
        if self.chars.is_empty() {
            return Ok(());
        }
        self.emit(out, indent, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineEnding;
    use crate::sink::StringSink;

    fn feed(line: &mut LineBuffer, out: &mut StringSink, indent: usize, text: &str) {
        for c in text.chars() {
            if line.exceeds(indent) {
                line.wrap_line(out, indent).unwrap();
            }
            if c == ' ' {
                line.mark_wrap_point();
            }
            line.push(c);
        }
    }

    #[test]
    fn test_wraps_at_last_space() {
        let mut line = LineBuffer::new(20, WrapBias::None, false);
        let mut out = StringSink::new(LineEnding::Lf);
        feed(&mut line, &mut out, 0, "aaaaaaaaaa bbbbbbbbbb");
        line.flush(&mut out, 0).unwrap();
        assert_eq!(out.as_str(), "aaaaaaaaaa\nbbbbbbbbbb\n");
    }

    #[test]
    fn test_no_wrap_point_overflows() {
        let mut line = LineBuffer::new(5, WrapBias::None, false);
        let mut out = StringSink::new(LineEnding::Lf);
        feed(&mut line, &mut out, 0, "abcdefghij");
        line.flush(&mut out, 0).unwrap();
        assert_eq!(out.as_str(), "abcdefghij\n");
    }

    #[test]
    fn test_indent_applies_to_both_lines() {
        let mut line = LineBuffer::new(12, WrapBias::None, false);
        let mut out = StringSink::new(LineEnding::Lf);
        feed(&mut line, &mut out, 2, "abcd efgh ijkl");
        line.flush(&mut out, 2).unwrap();
        assert_eq!(out.as_str(), "  abcd efgh\n  ijkl\n");
    }

    #[test]
    fn test_cond_flush_on_empty_is_silent() {
        let mut line = LineBuffer::new(68, WrapBias::None, false);
        let mut out = StringSink::new(LineEnding::Lf);
        line.cond_flush(&mut out, 4).unwrap();
        line.cond_flush_inline(&mut out, 4).unwrap();
        assert_eq!(out.as_str(), "");
        line.flush(&mut out, 4).unwrap();
        assert_eq!(out.as_str(), "\n");
    }

    #[test]
    fn test_inline_flush_keeps_output_line_open() {
        let mut line = LineBuffer::new(68, WrapBias::None, false);
        let mut out = StringSink::new(LineEnding::Lf);
        line.push_str("<br>");
        line.cond_flush_inline(&mut out, 0).unwrap();
        line.push_str("next");
        line.flush(&mut out, 0).unwrap();
        assert_eq!(out.as_str(), "<br>next\n");
    }

    #[test]
    fn test_string_continuation_marker() {
        let mut line = LineBuffer::new(10, WrapBias::None, false);
        let mut out = StringSink::new(LineEnding::Lf);
        line.push_str("f('abc");
        line.in_string = true;
        line.mark_wrap_point();
        line.push_str(" defgh')");
        line.in_string = false;
        line.flush(&mut out, 0).unwrap();
        assert_eq!(out.as_str(), "f('abc \\\ndefgh')\n");
    }

    #[test]
    fn test_value_continuation_not_indented() {
        let mut line = LineBuffer::new(12, WrapBias::None, false);
        let mut out = StringSink::new(LineEnding::Lf);
        line.push_str("a=\"one");
        line.in_attr_value = true;
        line.mark_wrap_point();
        line.push_str(" two three\"");
        line.in_attr_value = false;
        line.wrap_attr_value(&mut out, 4).unwrap();
        line.flush(&mut out, 4).unwrap();
        assert_eq!(out.as_str(), "    a=\"one \ntwo three\"\n");
    }

    #[test]
    fn test_language_bias() {
        let line = LineBuffer::new(20, WrapBias::Chinese, false);
        assert_eq!(line.limit(0), 10);
        assert_eq!(line.limit(4), 12);
        let line = LineBuffer::new(20, WrapBias::Japanese, false);
        assert_eq!(line.limit(0), 14);
        assert_eq!(WrapBias::from_language(Some("zh-TW")), WrapBias::Chinese);
        assert_eq!(WrapBias::from_language(Some("ja")), WrapBias::Japanese);
        assert_eq!(WrapBias::from_language(Some("en")), WrapBias::None);
        assert_eq!(WrapBias::from_language(None), WrapBias::None);
    }

    #[test]
    fn test_set_width_returns_previous() {
        let mut line = LineBuffer::new(68, WrapBias::None, false);
        assert_eq!(line.set_width(10), 68);
        assert_eq!(line.width(), 10);
    }
}
