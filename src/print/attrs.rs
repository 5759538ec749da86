//! Attribute printing.

use std::io;

use crate::dom::{AttrClass, Attribute, Document, Node, NodeId, NodeKind};
use crate::sink::OutputSink;

use super::{Mode, Printer};

/// Computed values from server-side templates are printed unescaped.
fn is_computed(value: &str) -> bool {
    value.len() >= 5
        && (value.starts_with("<%") || value.starts_with("<@") || value.starts_with("<?php"))
}

impl Printer<'_> {
    /// Print every attribute of a node in document order.
    ///
    /// Returns `true` when the attributes were put on lines of their own.
    pub(super) fn print_attrs<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
    ) -> io::Result<bool> {
        let node = doc.node(id);
        let mut printed = 0;
        for attr in &node.attributes {
            if attr.embedded.is_some() {
                let embedded = doc.node(attr.embedded);
                if let NodeKind::Embedded(dialect) = embedded.kind {
                    self.line.push(' ');
                    self.print_embedded(out, doc, indent, attr.embedded, dialect)?;
                }
                continue;
            }
            if self.config.drop_proprietary_attrs && attr.class.contains(AttrClass::PROPRIETARY) {
                continue;
            }
            self.print_attribute(out, indent, node, attr, printed == 0)?;
            printed += 1;
        }
        Ok(self.config.indent_attributes && printed > 0)
    }

    fn print_attribute<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
        node: &Node,
        attr: &Attribute,
        first: bool,
    ) -> io::Result<()> {
        let config = self.config;
        let mut indent = indent;
        if config.indent_attributes {
            let previous = if first { indent } else { indent + config.spaces };
            self.line.flush(out, previous)?;
            indent += config.spaces;
        }

        if self.line.exceeds(indent) {
            self.line.wrap_line(out, indent)?;
        }

        let wrappable = if config.xml_tags || config.xml_out {
            false
        } else if attr.class.contains(AttrClass::SCRIPT) {
            config.wrap_script_attrs
        } else {
            !attr.class.contains(AttrClass::NOWRAP) && config.wrap_attr_values
        };

        if self.line.fits(indent) {
            self.line.mark_wrap_point();
        } else {
            self.line.cond_flush(out, indent)?;
        }
        self.line.push(' ');
        let name = self.fold_case(&attr.name, config.upper_case_attrs);
        self.line.push_str(&name);

        if self.line.exceeds(indent) {
            self.line.wrap_line(out, indent)?;
        }

        match &attr.value {
            Some(value) => self.print_attr_value(out, indent, value, attr.delimiter, wrappable),
            None if config.xml_tags || config.xml_out => {
                let value = if attr.is_boolean() { attr.name.as_str() } else { "" };
                self.print_attr_value(out, indent, value, attr.delimiter, true)
            }
            None if !attr.is_boolean() && !node.implicit => {
                self.print_attr_value(out, indent, "", attr.delimiter, true)
            }
            None => {
                self.mark_if_fits(indent);
                Ok(())
            }
        }
    }

    /// Print `="value"`, escaping the delimiter and line breaks.
    ///
    /// Inside a wrappable value, breaks are only taken at spaces; a break
    /// inside a quoted script string is marked with a trailing backslash.
    pub(super) fn print_attr_value<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
        value: &str,
        delimiter: Option<char>,
        wrappable: bool,
    ) -> io::Result<()> {
        let mut mode = if wrappable {
            Mode::ATTR_VALUE
        } else {
            Mode::PREFORMATTED | Mode::ATTR_VALUE
        };
        if is_computed(value) {
            mode |= Mode::CDATA;
        }
        let delimiter = delimiter.unwrap_or('"');
        let quote_marks = self.config.quote_marks;

        self.line.push('=');
        // XML output never breaks after `=`.
        if !self.config.xml_out {
            self.mark_if_fits(indent);
            if self.line.exceeds(indent) {
                self.line.wrap_line(out, indent)?;
            }
            if self.line.fits(indent) {
                self.line.mark_wrap_point();
            } else {
                self.line.cond_flush(out, indent)?;
            }
        }
        self.line.push(delimiter);

        self.line.in_string = false;
        self.line.in_attr_value = true;
        for c in value.chars() {
            if wrappable && c == ' ' && self.line.fits(indent) {
                self.line.mark_wrap_point();
            }
            if wrappable && self.line.wrap_point() > 0 && self.line.exceeds(indent) {
                self.line.wrap_attr_value(out, indent)?;
            }

            match c {
                c if c == delimiter => {
                    self.line.push_str(if c == '"' { "&quot;" } else { "&#39;" });
                }
                '"' => {
                    if quote_marks {
                        self.line.push_str("&quot;");
                    } else {
                        self.line.push('"');
                    }
                    if delimiter == '\'' {
                        self.line.in_string = !self.line.in_string;
                    }
                }
                '\'' => {
                    if quote_marks {
                        self.line.push_str("&#39;");
                    } else {
                        self.line.push('\'');
                    }
                    if delimiter == '"' {
                        self.line.in_string = !self.line.in_string;
                    }
                }
                '\n' => self.line.push_str("&#10;"),
                c => self.encoder.encode(c, mode, &mut self.line),
            }
        }
        self.line.in_string = false;
        self.line.in_attr_value = false;
        self.line.push(delimiter);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LineEnding, PrintConfig};
    use crate::sink::StringSink;

    fn print_value(config: &PrintConfig, value: &str, delimiter: Option<char>, wrappable: bool) -> String {
        let mut printer = Printer::new(config);
        let mut out = StringSink::new(LineEnding::Lf);
        printer.line.push_str("<a x");
        printer.print_attr_value(&mut out, 0, value, delimiter, wrappable).unwrap();
        printer.flush_line(&mut out, 0).unwrap();
        out.into_string()
    }

    #[test]
    fn test_delimiter_is_always_escaped() {
        let config = PrintConfig::default();
        assert_eq!(print_value(&config, "say \"hi\"", None, false), "<a x=\"say &quot;hi&quot;\"\n");
        assert_eq!(print_value(&config, "it's", Some('\''), false), "<a x='it&#39;s'\n");
        assert_eq!(print_value(&config, "it's", Some('"'), false), "<a x=\"it's\"\n");
    }

    #[test]
    fn test_quote_marks_escape_both_quotes() {
        let config = PrintConfig {
            quote_marks: true,
            ..PrintConfig::default()
        };
        assert_eq!(
            print_value(&config, "'a' \"b\"", None, false),
            "<a x=\"&#39;a&#39; &quot;b&quot;\"\n"
        );
    }

    #[test]
    fn test_newline_and_markup_in_value() {
        let config = PrintConfig::default();
        assert_eq!(print_value(&config, "a\nb<c>&", None, false), "<a x=\"a&#10;b&lt;c&gt;&amp;\"\n");
    }

    #[test]
    fn test_computed_values_are_raw() {
        let config = PrintConfig::default();
        assert_eq!(print_value(&config, "<%= url %>", None, false), "<a x=\"<%= url %>\"\n");
        assert_eq!(print_value(&config, "<?php echo $u ?>", None, false), "<a x=\"<?php echo $u ?>\"\n");
    }

    #[test]
    fn test_wrappable_value_breaks_at_space() {
        let config = PrintConfig::default().with_wrap(16);
        let out = print_value(&config, "one two three four", None, true);
        assert_eq!(out, "<a x=\"one two \nthree four\"\n");
    }

    #[test]
    fn test_unwrappable_value_stays_whole() {
        let config = PrintConfig::default().with_wrap(16);
        let out = print_value(&config, "one two three four", None, false);
        assert_eq!(out, "<a x=\n\"one two three four\"\n");
    }

    #[test]
    fn test_script_string_wrap_marks_continuation() {
        let config = PrintConfig {
            wrap_script_attrs: true,
            ..PrintConfig::default().with_wrap(20)
        };
        let out = print_value(&config, "alert('one two three')", None, true);
        assert_eq!(out, "<a x=\"alert('one \\\ntwo three')\"\n");
    }

    #[test]
    fn test_is_computed() {
        assert!(is_computed("<%= x %>"));
        assert!(is_computed("<@ y @>"));
        assert!(is_computed("<?php x ?>"));
        assert!(!is_computed("<%x"));
        assert!(!is_computed("plain value"));
    }
}
