//! Printer configuration.

use std::path::PathBuf;

use crate::charset::Charset;

/// Line terminator written by the output sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }
}

/// Options controlling layout and escaping.
///
/// The printer only ever reads this. Temporary overrides (no-wrap regions,
/// doctype quoting) are scoped inside the printer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct PrintConfig {
    /// Wrap width in columns; 0 disables wrapping.
    pub wrap_len: usize,
    /// Columns per indentation level.
    pub spaces: usize,
    pub output_encoding: Charset,
    pub newline: LineEnding,

    /// Two-letter language hint; `zh` and `ja` wrap earlier.
    pub language: Option<String>,

    pub indent_content: bool,
    pub smart_indent: bool,
    pub indent_attributes: bool,
    pub indent_cdata: bool,

    /// Emit XML syntax for empty elements and attribute values.
    pub xml_out: bool,
    /// Input is generic XML: no case folding, XML tree walker.
    pub xml_tags: bool,
    pub xhtml: bool,
    /// Add `xml:space="preserve"` to whitespace-preserving elements.
    pub xml_space: bool,

    pub upper_case_tags: bool,
    pub upper_case_attrs: bool,

    pub quote_ampersand: bool,
    pub quote_marks: bool,
    pub quote_nbsp: bool,
    pub num_entities: bool,
    pub raw_out: bool,

    pub make_clean: bool,
    pub make_bare: bool,
    pub ascii_chars: bool,

    pub wrap_attr_values: bool,
    pub wrap_script_attrs: bool,
    pub wrap_asp: bool,
    pub wrap_jste: bool,
    pub wrap_php: bool,
    pub wrap_section: bool,

    pub hide_comments: bool,
    pub hide_end_tags: bool,
    pub break_before_br: bool,
    pub escape_cdata: bool,
    pub drop_proprietary_attrs: bool,

    pub burst_slides: bool,
    pub slide_dir: Option<PathBuf>,
    /// Seconds for the `Page-Enter` transition added to slides.
    pub transition_duration: f64,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            wrap_len: 68,
            spaces: 2,
            output_encoding: Charset::Utf8,
            newline: LineEnding::Lf,
            language: None,
            indent_content: false,
            smart_indent: false,
            indent_attributes: false,
            indent_cdata: false,
            xml_out: false,
            xml_tags: false,
            xhtml: false,
            xml_space: false,
            upper_case_tags: false,
            upper_case_attrs: false,
            quote_ampersand: true,
            quote_marks: false,
            quote_nbsp: true,
            num_entities: false,
            raw_out: false,
            make_clean: false,
            make_bare: false,
            ascii_chars: false,
            wrap_attr_values: false,
            wrap_script_attrs: false,
            wrap_asp: true,
            wrap_jste: true,
            wrap_php: true,
            wrap_section: true,
            hide_comments: false,
            hide_end_tags: false,
            break_before_br: false,
            escape_cdata: false,
            drop_proprietary_attrs: false,
            burst_slides: false,
            slide_dir: None,
            transition_duration: 3.0,
        }
    }
}

impl PrintConfig {
    /// Set the wrap width (0 disables wrapping).
    pub fn with_wrap(mut self, wrap_len: usize) -> Self {
        self.wrap_len = wrap_len;
        self
    }

    /// Indent block content by `spaces` columns per level.
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent_content = true;
        self.spaces = spaces;
        self
    }

    pub fn with_smart_indent(mut self) -> Self {
        self.indent_content = true;
        self.smart_indent = true;
        self
    }

    pub fn with_encoding(mut self, charset: Charset) -> Self {
        self.output_encoding = charset;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Output XHTML: HTML rules with XML empty-element syntax.
    pub fn xhtml(mut self) -> Self {
        self.xhtml = true;
        self.xml_out = true;
        self
    }

    /// Treat the document as generic XML.
    pub fn xml(mut self) -> Self {
        self.xml_tags = true;
        self.xml_out = true;
        self
    }

    /// The wrap width with 0 mapped to "unbounded".
    pub(crate) fn effective_wrap_len(&self) -> usize {
        if self.wrap_len == 0 {
            crate::print::UNBOUNDED_WIDTH
        } else {
            self.wrap_len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PrintConfig::default();
        assert_eq!(config.wrap_len, 68);
        assert_eq!(config.spaces, 2);
        assert!(config.quote_ampersand);
        assert!(config.quote_nbsp);
        assert!(!config.quote_marks);
        assert!(config.wrap_asp && config.wrap_jste && config.wrap_php && config.wrap_section);
    }

    #[test]
    fn test_builders() {
        let config = PrintConfig::default().with_wrap(0).with_indent(4).xhtml();
        assert_eq!(config.effective_wrap_len(), crate::print::UNBOUNDED_WIDTH);
        assert!(config.indent_content);
        assert_eq!(config.spaces, 4);
        assert!(config.xhtml && config.xml_out);
        assert!(!config.xml_tags);
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
        assert_eq!(LineEnding::Cr.as_str(), "\r");
    }
}
