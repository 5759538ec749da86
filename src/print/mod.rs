//! The pretty-printer.
//!
//! A [`Printer`] walks a [`Document`] and writes formatted markup into an
//! [`OutputSink`]. Characters are collected in a single pending line; the
//! tree walk decides where lines break, the encoder decides how each
//! character is escaped, and the line buffer wraps anything that runs past
//! the configured width.
//!
//! ```
//! use kempt::{PrintConfig, dom, print};
//!
//! let mut doc = dom::parse_html("<p>Fish &amp; chips</p>");
//! let html = print::render(&mut doc, &PrintConfig::default()).unwrap();
//! assert!(html.contains("<p>Fish &amp; chips</p>"));
//! ```

use std::borrow::Cow;
use std::io;

use tracing::debug;

use crate::config::PrintConfig;
use crate::dom::{Attribute, Document, NodeId};
use crate::error::Result;
use crate::sink::{OutputSink, StringSink};

mod attrs;
mod encoder;
mod line;
mod mode;
mod slides;
mod tree;
mod xml;

pub use mode::Mode;
pub use slides::{SlideSummary, add_transition_effect, count_slides};

use encoder::CharEncoder;
use line::{LineBuffer, WrapBias};
use slides::SlideState;

/// Width used while wrapping is switched off.
pub(crate) const UNBOUNDED_WIDTH: usize = usize::MAX >> 2;

/// Formats a document tree according to a [`PrintConfig`].
///
/// A printer owns the pending output line, so one instance serves one render
/// at a time. It never modifies the tree it prints.
pub struct Printer<'c> {
    config: &'c PrintConfig,
    encoder: CharEncoder,
    line: LineBuffer,
    slides: Option<SlideState>,
}

impl<'c> Printer<'c> {
    pub fn new(config: &'c PrintConfig) -> Self {
        Self {
            config,
            encoder: CharEncoder::new(config),
            line: Self::fresh_line(config),
            slides: None,
        }
    }

    fn fresh_line(config: &PrintConfig) -> LineBuffer {
        LineBuffer::new(
            config.effective_wrap_len(),
            WrapBias::from_language(config.language.as_deref()),
            config.indent_attributes,
        )
    }

    pub fn config(&self) -> &PrintConfig {
        self.config
    }

    /// Write the pending line followed by a line break.
    pub fn flush_line<S: OutputSink + ?Sized>(&mut self, out: &mut S, indent: usize) -> io::Result<()> {
        self.line.flush(out, indent)
    }

    /// Write the pending line followed by a line break, if there is one.
    pub fn cond_flush_line<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
    ) -> io::Result<()> {
        self.line.cond_flush(out, indent)
    }

    /// Run `f` with wrapping switched off when `suppress` is set.
    ///
    /// The previous width is restored whatever `f` returns.
    fn unwrapped<T>(&mut self, suppress: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        if !suppress {
            return f(self);
        }
        let saved = self.line.set_width(UNBOUNDED_WIDTH);
        let result = f(self);
        self.line.set_width(saved);
        result
    }

    /// Element or attribute name with the configured case folding.
    fn fold_case<'n>(&self, name: &'n str, upper: bool) -> Cow<'n, str> {
        if self.config.xml_tags {
            Cow::Borrowed(name)
        } else if upper {
            if name.bytes().any(|b| b.is_ascii_lowercase()) {
                Cow::Owned(name.to_ascii_uppercase())
            } else {
                Cow::Borrowed(name)
            }
        } else if name.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(name.to_ascii_lowercase())
        } else {
            Cow::Borrowed(name)
        }
    }

    fn mark_if_fits(&mut self, indent: usize) {
        if self.line.fits(indent) {
            self.line.mark_wrap_point();
        }
    }
}

/// Add `xml:space="preserve"` to whitespace-preserving elements.
///
/// Only applies when both `xml_out` and `xml_space` are set. Elements that
/// already carry `xml:space` are left alone, so calling this twice is the
/// same as calling it once. Returns the number of attributes added.
pub fn prepare_document(doc: &mut Document, config: &PrintConfig) -> usize {
    if !(config.xml_out && config.xml_space) {
        return 0;
    }
    let mut added = 0;
    for index in 0..doc.len() {
        let id = NodeId(index as u32);
        if doc.node(id).is_element()
            && doc.preserves_whitespace(id)
            && doc.add_attribute_if_missing(id, Attribute::with_value("xml:space", "preserve"))
        {
            added += 1;
        }
    }
    added
}

/// Render a whole document into `out`.
///
/// Uses the XML walker when `xml_tags` is set and the HTML walker otherwise.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the sink fails.
pub fn render_to<S: OutputSink + ?Sized>(
    doc: &mut Document,
    config: &PrintConfig,
    out: &mut S,
) -> Result<()> {
    prepare_document(doc, config);
    let doc: &Document = doc;
    let mut printer = Printer::new(config);
    if config.xml_tags {
        printer.print_xml_tree(out, doc, Mode::NORMAL, 0, doc.root())?;
    } else {
        printer.print_tree(out, doc, Mode::NORMAL, 0, doc.root())?;
    }
    printer.cond_flush_line(out, 0)?;
    debug!(nodes = doc.len(), xml = config.xml_tags, "rendered document");
    Ok(())
}

/// Render a whole document to a string.
///
/// # Errors
///
/// Never fails for in-memory output; the `Result` mirrors [`render_to`].
pub fn render(doc: &mut Document, config: &PrintConfig) -> Result<String> {
    let mut sink = StringSink::new(config.newline);
    render_to(doc, config, &mut sink)?;
    Ok(sink.into_string())
}
