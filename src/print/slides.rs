//! Burst a document into one file per `<h2>` section.
//!
//! Each slide is a full rendering of the document in which the content of
//! `<body>` is replaced by one section, framed by navigation links and a
//! click handler that advances to the next slide.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::dom::tags::{self, ContentModel};
use crate::dom::{Attribute, Document, Node, NodeId};
use crate::error::{Error, Result};
use crate::sink::{EncodingSink, OutputSink};

use super::{Mode, Printer, prepare_document};

/// Outcome of [`Printer::create_slides`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideSummary {
    /// Number of slides the document splits into.
    pub count: usize,
    /// Slides written successfully.
    pub written: usize,
    /// Stale slide files from an earlier, longer run that were deleted.
    pub removed: usize,
}

/// Which slide is being printed and where its content starts.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlideState {
    /// One-based.
    current: usize,
    count: usize,
    content: NodeId,
}

fn is_boundary(node: &Node) -> bool {
    node.is_element() && node.is_tag(&tags::H2)
}

fn slide_file_name(n: usize) -> String {
    format!("slide{n:03}.html")
}

/// First node of every slide: each `<h2>` child of `body`, plus the first
/// child when it is not itself an `<h2>`.
fn slide_starts(doc: &Document, body: NodeId) -> Vec<NodeId> {
    let mut starts = Vec::new();
    for (i, child) in doc.children(body).enumerate() {
        if i == 0 || is_boundary(doc.node(child)) {
            starts.push(child);
        }
    }
    starts
}

/// Number of slides `body` splits into; never less than one.
///
/// A leading `<h2>` does not produce an empty first slide.
pub fn count_slides(doc: &Document, body: NodeId) -> usize {
    slide_starts(doc, body).len().max(1)
}

/// Insert `<meta http-equiv="Page-Enter" content="blendTrans(...)">` at the
/// start of `<head>`.
///
/// Returns `false` when there is no head or the transition is already
/// present.
pub fn add_transition_effect(doc: &mut Document, duration: f64) -> bool {
    let Some(head) = doc.head() else {
        return false;
    };
    let present = doc.children(head).any(|c| {
        let node = doc.node(c);
        node.is_tag(&tags::META)
            && node
                .attribute("http-equiv")
                .and_then(|a| a.value.as_deref())
                .is_some_and(|v| v.eq_ignore_ascii_case("Page-Enter"))
    });
    if present {
        return false;
    }

    let meta = doc.create_element("meta");
    if let Some(node) = doc.get_mut(meta) {
        node.implicit = true;
    }
    doc.push_attribute(meta, Attribute::with_value("http-equiv", "Page-Enter"));
    doc.push_attribute(
        meta,
        Attribute::with_value("content", format!("blendTrans(Duration={duration:?})")),
    );
    doc.prepend(head, meta);
    true
}

impl Printer<'_> {
    /// Write `slide001.html`, `slide002.html`, ... into the configured
    /// slide directory (the current directory if unset).
    ///
    /// Adds the page transition to the document first. A slide that cannot
    /// be written is logged and skipped. Afterwards, leftover files numbered
    /// past the last slide are removed until one is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingElement`] if the document has no `<body>`, or
    /// [`Error::Io`] if the output directory cannot be created.
    pub fn create_slides(&mut self, doc: &mut Document) -> Result<SlideSummary> {
        let config = self.config;
        let body = doc
            .body()
            .ok_or_else(|| Error::MissingElement("body".to_string()))?;
        let dir = config.slide_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)?;

        add_transition_effect(doc, config.transition_duration);
        prepare_document(doc, config);
        let doc: &Document = doc;

        let starts = slide_starts(doc, body);
        let count = starts.len().max(1);
        let mut summary = SlideSummary {
            count,
            ..SlideSummary::default()
        };

        for current in 1..=count {
            let path = dir.join(slide_file_name(current));
            self.slides = Some(SlideState {
                current,
                count,
                content: starts.get(current - 1).copied().unwrap_or(NodeId::NONE),
            });
            self.line = Self::fresh_line(config);
            match self.write_slide(doc, &path) {
                Ok(()) => {
                    summary.written += 1;
                    debug!(path = %path.display(), slide = current, count, "wrote slide");
                }
                Err(err) => warn!(path = %path.display(), error = %err, "failed to write slide"),
            }
        }
        self.slides = None;
        self.line = Self::fresh_line(config);

        let mut stale = count + 1;
        while fs::remove_file(dir.join(slide_file_name(stale))).is_ok() {
            summary.removed += 1;
            stale += 1;
        }
        if summary.removed > 0 {
            debug!(removed = summary.removed, "removed stale slides");
        }
        Ok(summary)
    }

    fn write_slide(&mut self, doc: &Document, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        let mut sink = EncodingSink::new(
            BufWriter::new(file),
            self.config.output_encoding,
            self.config.newline,
        );
        self.print_tree(&mut sink, doc, Mode::NORMAL, 0, doc.root())?;
        self.line.cond_flush(&mut sink, 0)?;
        sink.finish()?.flush()
    }

    /// Print the current slide in place of the body content.
    pub(super) fn print_slide<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        mode: Mode,
        indent: usize,
    ) -> io::Result<()> {
        let Some(state) = self.slides else {
            return Ok(());
        };
        let config = self.config;
        let content_indent = if config.indent_content {
            indent + config.spaces
        } else {
            indent
        };

        let next = if state.current < state.count {
            state.current + 1
        } else {
            1
        };
        self.line.push_str(&format!(
            "<div onclick=\"document.location='{}'\">",
            slide_file_name(next)
        ));
        self.line.cond_flush(out, indent)?;

        let mut content = state.content;
        if doc.get(content).is_some_and(is_boundary) {
            self.print_nav_bar(out, indent, state)?;
            self.push_hr();
            if config.indent_content {
                self.line.cond_flush(out, indent)?;
            }
            self.print_tree(out, doc, mode, content_indent, content)?;
            content = doc.node(content).next_sibling;
        }

        let mut last: Option<&Node> = None;
        while let Some(node) = doc.get(content) {
            if is_boundary(node) {
                break;
            }
            // Naked text followed by a block gets a blank line.
            if !config.indent_content
                && last.is_some_and(Node::is_text)
                && node.has_model(ContentModel::BLOCK)
            {
                self.line.flush(out, indent)?;
                self.line.flush(out, indent)?;
            }
            self.print_tree(out, doc, mode, content_indent, content)?;
            last = Some(node);
            content = node.next_sibling;
        }

        self.line.cond_flush(out, indent)?;
        self.line.push_str(if config.xml_out {
            "<br clear=\"all\" />"
        } else {
            "<br clear=\"all\">"
        });
        self.line.cond_flush(out, indent)?;
        self.push_hr();
        if config.indent_content {
            self.line.cond_flush(out, indent)?;
        }
        self.print_nav_bar(out, indent, state)?;
        self.line.push_str("</div>");
        self.line.cond_flush(out, indent)
    }

    fn print_nav_bar<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        indent: usize,
        state: SlideState,
    ) -> io::Result<()> {
        self.line.cond_flush(out, indent)?;
        self.line.push_str("<center><small>");

        if state.current > 1 {
            self.line.push_str(&format!(
                "<a href=\"{}\">previous</a> | ",
                slide_file_name(state.current - 1)
            ));
            self.line.cond_flush(out, indent)?;
            self.line.push_str("<a href=\"slide001.html\">start</a>");
            if state.current < state.count {
                self.line.push_str(" | ");
            }
            self.line.cond_flush(out, indent)?;
        }
        if state.current < state.count {
            self.line.push_str(&format!(
                "<a href=\"{}\">next</a>",
                slide_file_name(state.current + 1)
            ));
        }

        self.line.push_str("</small></center>");
        self.line.cond_flush(out, indent)
    }

    fn push_hr(&mut self) {
        self.line.push('<');
        let name = self.fold_case("hr", self.config.upper_case_tags);
        self.line.push_str(&name);
        if self.config.xml_out {
            self.line.push_str(" />");
        } else {
            self.line.push('>');
        }
    }
}
