//! XML tree walk.
//!
//! XML has no content models to consult, so layout follows the shape of the
//! tree: an element whose children include text is printed inline, every
//! other element puts each child on its own line one level deeper.

use std::io;

use crate::dom::tags::ContentModel;
use crate::dom::{Document, NodeId, NodeKind};
use crate::sink::OutputSink;

use super::tree::descriptor;
use super::{Mode, Printer};

/// Whitespace-only text carries no content between element children.
fn is_blank(doc: &Document, id: NodeId) -> bool {
    doc.node(id).is_text() && doc.text(id).iter().all(u8::is_ascii_whitespace)
}

fn is_mixed(doc: &Document, id: NodeId) -> bool {
    doc.children(id)
        .any(|c| doc.node(c).is_text() && !is_blank(doc, c))
}

impl Printer<'_> {
    /// Print a node and its subtree with XML layout rules.
    ///
    /// # Panics
    ///
    /// Panics if an element has no tag descriptor.
    pub fn print_xml_tree<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        mode: Mode,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        let Some(node) = doc.get(id) else {
            return Ok(());
        };

        match node.kind {
            NodeKind::Text => self.print_text(out, mode, indent, doc.text(id)),
            NodeKind::CData if self.config.escape_cdata => {
                self.print_text(out, mode, indent, doc.text(id))
            }
            NodeKind::Comment => {
                self.line.cond_flush(out, indent)?;
                self.print_comment(out, doc, 0, id)?;
                self.line.cond_flush(out, 0)
            }
            NodeKind::Root => {
                for child in doc.children(id) {
                    if !is_blank(doc, child) {
                        self.print_xml_tree(out, doc, mode, indent, child)?;
                    }
                }
                Ok(())
            }
            NodeKind::DocType => self.print_doctype(out, doc, indent, id),
            NodeKind::ProcIns => self.print_proc_ins(out, doc, indent, id),
            NodeKind::XmlDecl => self.print_xml_decl(out, doc, indent, id),
            NodeKind::CData => self.print_cdata(out, doc, indent, id),
            NodeKind::Section => self.print_section(out, doc, indent, id),
            NodeKind::Embedded(dialect) => self.print_embedded(out, doc, indent, id, dialect),
            NodeKind::EndTag => self.print_tag(out, doc, mode, indent, id, false),
            NodeKind::StartTag | NodeKind::StartEndTag => {
                let self_closing = node.kind == NodeKind::StartEndTag;
                // Elements inside mixed content flow with the text around them.
                let inline = is_mixed(doc, node.parent);
                if descriptor(node).has(ContentModel::EMPTY) || (self_closing && !self.config.xhtml) {
                    if inline {
                        self.push_tag(out, doc, indent, id, self_closing)?;
                        self.mark_if_fits(indent);
                        return Ok(());
                    }
                    self.line.cond_flush(out, indent)?;
                    self.print_tag(out, doc, mode, indent, id, self_closing)
                } else if doc.preserves_whitespace(id) {
                    self.print_preserved_element(out, doc, indent, id, inline)
                } else {
                    self.print_xml_container(out, doc, mode, indent, id, inline)
                }
            }
        }
    }

    fn print_xml_container<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        mode: Mode,
        indent: usize,
        id: NodeId,
        inline: bool,
    ) -> io::Result<()> {
        let mixed = is_mixed(doc, id);
        let has_content = doc.children(id).any(|c| mixed || !is_blank(doc, c));
        let child_indent = if mixed { indent } else { indent + self.config.spaces };

        if !inline {
            self.line.cond_flush(out, indent)?;
        }
        self.print_tag(out, doc, mode, indent, id, false)?;
        if !mixed && has_content {
            self.line.flush(out, indent)?;
        }

        for child in doc.children(id) {
            if mixed || !is_blank(doc, child) {
                self.print_xml_tree(out, doc, mode, child_indent, child)?;
            }
        }

        if !mixed && has_content {
            self.line.cond_flush(out, child_indent)?;
        }
        self.print_end_tag(doc, id);
        Ok(())
    }

    /// Whitespace-preserving element: the indent is written into the line
    /// itself and the content goes out exactly as stored.
    fn print_preserved_element<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
        inline: bool,
    ) -> io::Result<()> {
        if inline {
            return self.unwrapped(true, |p| p.print_preserved(out, doc, id));
        }
        self.line.cond_flush(out, indent)?;
        self.unwrapped(true, |p| {
            p.line.pad_to(indent);
            p.print_preserved(out, doc, id)?;
            p.line.cond_flush(out, 0)
        })
    }

    fn print_preserved<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        id: NodeId,
    ) -> io::Result<()> {
        let node = doc.node(id);
        match node.kind {
            NodeKind::Text => {
                self.print_text(out, Mode::PREFORMATTED | Mode::NO_WRAP, 0, doc.text(id))
            }
            NodeKind::Comment => self.print_comment(out, doc, 0, id),
            NodeKind::StartEndTag if !self.config.xhtml => self.push_tag(out, doc, 0, id, true),
            NodeKind::StartTag | NodeKind::StartEndTag => {
                self.push_tag(out, doc, 0, id, false)?;
                for child in doc.children(id) {
                    self.print_preserved(out, doc, child)?;
                }
                self.print_end_tag(doc, id);
                Ok(())
            }
            _ => self.print_xml_tree(out, doc, Mode::PREFORMATTED | Mode::NO_WRAP, 0, id),
        }
    }
}
