//! HTML tree walk: line-break and indentation decisions per node kind.

use std::io;

use bstr::ByteSlice;

use crate::dom::tags::{self, ContentModel, ParserKind, TagDescriptor};
use crate::dom::{Document, Node, NodeId, NodeKind, ScriptDialect};
use crate::sink::OutputSink;

use super::{Mode, Printer};

const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";

/// Tags that indent their children under smart indentation as soon as one
/// child is not text.
static SMART_INDENT_TAGS: &[&TagDescriptor] = &[
    &tags::P,
    &tags::A,
    &tags::SUP,
    &tags::SUB,
    &tags::SMALL,
    &tags::STRONG,
    &tags::I,
    &tags::S,
    &tags::STRIKE,
    &tags::B,
    &tags::CITE,
    &tags::CODE,
    &tags::SPAN,
    &tags::LABEL,
    &tags::UL,
    &tags::LI,
    &tags::OL,
    &tags::DIV,
    &tags::NOSCRIPT,
    &tags::BUTTON,
    &tags::TD,
    &tags::TR,
    &tags::CAPTION,
    &tags::FIGCAPTION,
    &tags::SCRIPT,
];

/// Resolved descriptor of an element.
///
/// # Panics
///
/// Panics if the element was built without a descriptor; loaders always
/// attach one.
pub(super) fn descriptor(node: &Node) -> &'static TagDescriptor {
    match node.tag {
        Some(tag) => tag,
        None => panic!(
            "element {:?} reached the printer without a tag descriptor",
            node.element_name()
        ),
    }
}

fn has_children(node: &Node) -> bool {
    node.first_child.is_some()
}

fn any_non_text_child(doc: &Document, id: NodeId) -> bool {
    doc.children(id).any(|c| !doc.node(c).is_text())
}

/// True if the node directly follows whitespace, looking through the start
/// of enclosing inline elements.
fn after_space(doc: &Document, id: NodeId) -> bool {
    let Some(node) = doc.get(id) else {
        return true;
    };
    if !node.has_model(ContentModel::INLINE) {
        return true;
    }
    match doc.get(node.prev_sibling) {
        Some(prev) if prev.is_text() => matches!(
            doc.text(node.prev_sibling).chars().next_back(),
            Some(' ' | '\n' | '\u{a0}')
        ),
        Some(_) => false,
        None => after_space(doc, node.parent),
    }
}

/// Spaces after the last newline of a text node, if it ends in a line break.
fn text_ends_with_newline(doc: &Document, id: NodeId) -> Option<usize> {
    if !doc.node(id).is_text() {
        return None;
    }
    let text = doc.text(id);
    let trimmed = text.trim_end_with(|c| matches!(c, ' ' | '\t' | '\r'));
    if trimmed.last() == Some(&b'\n') {
        Some(text.len() - trimmed.len())
    } else {
        None
    }
}

/// A script body needs no CDATA guard if it already has one, or if nothing
/// in it would be read as markup.
fn has_cdata(doc: &Document, id: NodeId) -> bool {
    if !doc.get(id).is_some_and(Node::is_text) {
        return false;
    }
    let text = doc.text(id);
    text.find(CDATA_START).is_some() || !text.iter().any(|b| matches!(b, b'<' | b'>' | b'&'))
}

/// Comment delimiters that hide a CDATA marker from the given script type.
fn comment_delimiters(script_type: Option<&str>) -> (&'static str, &'static str) {
    match script_type {
        Some(t) if t.eq_ignore_ascii_case("text/javascript") => ("//", ""),
        Some(t) if t.eq_ignore_ascii_case("text/css") => ("/*", "*/"),
        Some(t) if t.eq_ignore_ascii_case("text/vbscript") => ("'", ""),
        Some(t) if t.contains("script") => ("//", ""),
        _ => ("", ""),
    }
}

impl Printer<'_> {
    /// Print a node and its subtree with HTML layout rules.
    ///
    /// # Panics
    ///
    /// Panics if an element has no tag descriptor.
    pub fn print_tree<S: OutputSink + ?Sized>(
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
            NodeKind::Comment => self.print_comment(out, doc, indent, id),
            NodeKind::Root => {
                for child in doc.children(id) {
                    self.print_tree(out, doc, mode, indent, child)?;
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
                let tag = descriptor(node);
                let self_closing = node.kind == NodeKind::StartEndTag;
                if tag.has(ContentModel::EMPTY) || (self_closing && !self.config.xhtml) {
                    self.print_empty(out, doc, mode, indent, id, self_closing)
                } else if tag.parser == ParserKind::Pre {
                    self.print_pre(out, doc, mode, indent, id)
                } else if tag.parser == ParserKind::Script {
                    let mode = mode | Mode::PREFORMATTED | Mode::NO_WRAP | Mode::CDATA;
                    self.print_script_style(out, doc, mode, indent, id)
                } else if tag.has(ContentModel::INLINE) {
                    self.print_inline(out, doc, mode, indent, id)
                } else {
                    self.print_block(out, doc, mode, indent, id)
                }
            }
        }
    }

    /// Print the children of `<body>` only.
    pub fn print_body<S: OutputSink + ?Sized>(&mut self, out: &mut S, doc: &Document) -> io::Result<()> {
        let Some(body) = doc.body() else {
            return Ok(());
        };
        for child in doc.children(body) {
            self.print_tree(out, doc, Mode::NORMAL, 0, child)?;
        }
        Ok(())
    }

    /// Decode raw text and feed it through the encoder.
    pub(super) fn print_text<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        mode: Mode,
        indent: usize,
        text: &[u8],
    ) -> io::Result<()> {
        for c in text.chars() {
            if self.line.exceeds(indent) {
                self.line.wrap_line(out, indent)?;
            }
            if c == '\n' {
                self.line.flush(out, indent)?;
                continue;
            }
            self.encoder.encode(c, mode, &mut self.line);
        }
        Ok(())
    }

    pub(super) fn print_tag<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        mode: Mode,
        indent: usize,
        id: NodeId,
        self_closing: bool,
    ) -> io::Result<()> {
        let node = doc.node(id);
        let tag = descriptor(node);
        self.push_tag(out, doc, indent, id, self_closing)?;

        if (!self_closing || self.config.xhtml) && !mode.contains(Mode::PREFORMATTED) {
            if self.line.exceeds(indent) {
                self.line.wrap_line(out, indent)?;
            }
            if self.line.fits(indent)
                && !mode.contains(Mode::NO_WRAP)
                && (!tag.has(ContentModel::INLINE) || tag.is(&tags::BR))
                && after_space(doc, id)
            {
                self.line.mark_wrap_point();
            }
        } else if doc.has_pre_ancestor(node.parent) {
            self.line.cond_flush_inline(out, indent)?;
        } else {
            self.line.cond_flush(out, indent)?;
        }
        Ok(())
    }

    /// Push `<name attrs>` (or `<name />`) without deciding on a break after it.
    pub(super) fn push_tag<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
        self_closing: bool,
    ) -> io::Result<()> {
        let node = doc.node(id);
        let tag = descriptor(node);
        let name = node.element_name().unwrap_or_default();

        self.line.push('<');
        if node.kind == NodeKind::EndTag {
            self.line.push('/');
        }
        let folded = self.fold_case(&name, self.config.upper_case_tags);
        self.line.push_str(&folded);

        let broken = self.print_attrs(out, doc, indent, id)?;

        if (self.config.xml_out || self.config.xhtml)
            && (self_closing || tag.has(ContentModel::EMPTY))
        {
            self.line.push_str(" /");
        }
        self.line.push('>');

        if broken {
            self.line.cond_flush(out, indent + self.config.spaces)?;
        }
        Ok(())
    }

    pub(super) fn print_end_tag(&mut self, doc: &Document, id: NodeId) {
        let name = doc.node(id).element_name().unwrap_or_default();
        self.line.push_str("</");
        let folded = self.fold_case(&name, self.config.upper_case_tags);
        self.line.push_str(&folded);
        self.line.push('>');
    }

    pub(super) fn print_comment<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        if self.config.hide_comments {
            return Ok(());
        }
        self.mark_if_fits(indent);
        self.line.push_str("<!--");
        self.print_text(out, Mode::COMMENT, indent, doc.text(id))?;
        self.line.push_str("-->");
        if doc.node(id).linebreak {
            self.line.flush(out, indent)?;
        }
        Ok(())
    }

    pub(super) fn print_doctype<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        let mut flags = self.encoder.flags();
        flags.quote_marks = false;

        self.mark_if_fits(indent);
        self.line.cond_flush(out, indent)?;
        self.line.push_str("<!DOCTYPE ");
        self.mark_if_fits(indent);

        // Characters of the internal subset pass through unescaped.
        let mut mode = Mode::NORMAL;
        for c in doc.text(id).chars() {
            if self.line.exceeds(indent) {
                self.line.wrap_line(out, indent)?;
            }
            if mode.contains(Mode::CDATA) {
                if c == ']' {
                    mode.remove(Mode::CDATA);
                }
            } else if c == '[' {
                mode.insert(Mode::CDATA);
            }
            if c == '\n' {
                self.line.flush(out, indent)?;
                continue;
            }
            self.encoder.encode_with(c, mode, flags, &mut self.line);
        }

        self.mark_if_fits(0);
        self.line.push('>');
        self.line.cond_flush(out, indent)
    }

    pub(super) fn print_proc_ins<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        let text = doc.text(id);
        self.mark_if_fits(indent);
        self.line.push_str("<?");
        self.print_text(out, Mode::CDATA, indent, text)?;
        if text.last() != Some(&b'?') {
            self.line.push('?');
        }
        self.line.push('>');
        self.line.cond_flush(out, indent)
    }

    pub(super) fn print_xml_decl<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        self.mark_if_fits(indent);
        self.line.push_str("<?xml");
        self.print_attrs(out, doc, indent, id)?;
        self.line.push_str("?>");
        self.line.cond_flush(out, indent)
    }

    pub(super) fn print_cdata<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        let indent = if self.config.indent_cdata { indent } else { 0 };
        self.line.cond_flush(out, indent)?;
        self.unwrapped(true, |p| {
            p.line.push_str(CDATA_START);
            p.print_text(out, Mode::COMMENT, indent, doc.text(id))?;
            p.line.push_str(CDATA_END);
            p.line.cond_flush(out, indent)
        })
    }

    pub(super) fn print_section<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        let wrap = self.config.wrap_section;
        self.unwrapped(!wrap, |p| {
            p.line.push_str("<![");
            let mode = if wrap { Mode::CDATA } else { Mode::COMMENT };
            p.print_text(out, mode, indent, doc.text(id))?;
            p.line.push_str("]>");
            Ok(())
        })
    }

    pub(super) fn print_embedded<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        indent: usize,
        id: NodeId,
        dialect: ScriptDialect,
    ) -> io::Result<()> {
        let wrap = match dialect {
            ScriptDialect::Asp => self.config.wrap_asp,
            ScriptDialect::Jste => self.config.wrap_jste,
            ScriptDialect::Php => self.config.wrap_php,
        };
        self.unwrapped(!wrap, |p| {
            p.line.push_str(dialect.open());
            let mode = if wrap { Mode::CDATA } else { Mode::COMMENT };
            p.print_text(out, mode, indent, doc.text(id))?;
            p.line.push_str(dialect.close());
            Ok(())
        })
    }

    fn print_empty<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        mode: Mode,
        indent: usize,
        id: NodeId,
        self_closing: bool,
    ) -> io::Result<()> {
        let node = doc.node(id);
        let tag = descriptor(node);

        if !tag.has(ContentModel::INLINE) {
            self.line.cond_flush(out, indent)?;
        }
        if tag.is(&tags::BR)
            && self.config.break_before_br
            && doc.get(node.prev_sibling).is_some_and(|prev| !prev.is_tag(&tags::BR))
        {
            self.line.flush(out, indent)?;
        }

        if self.config.make_clean && tag.is(&tags::WBR) {
            self.line.push(' ');
        } else {
            self.print_tag(out, doc, mode, indent, id, self_closing)?;
        }

        if tag.is(&tags::PARAM) || tag.is(&tags::AREA) {
            self.line.cond_flush(out, indent)?;
        } else if [&tags::BR, &tags::HR, &tags::META, &tags::LINK, &tags::STYLE, &tags::SCRIPT]
            .iter()
            .any(|t| tag.is(t))
        {
            self.line.flush(out, indent)?;
        }
        Ok(())
    }

    /// Preformatted content goes out at column 0 with its line breaks.
    fn print_pre<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        mode: Mode,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        self.line.cond_flush(out, indent)?;
        self.print_tag(out, doc, mode, indent, id, false)?;
        self.line.cond_flush(out, indent)?;

        for child in doc.children(id) {
            self.print_tree(out, doc, mode | Mode::PREFORMATTED | Mode::NO_WRAP, 0, child)?;
        }
        self.line.cond_flush_inline(out, 0)?;
        self.print_end_tag(doc, id);
        self.line.cond_flush(out, 0)?;

        if !self.config.indent_content && doc.node(id).next_sibling.is_some() {
            self.line.flush(out, 0)?;
        }
        Ok(())
    }

    fn print_script_style<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        mode: Mode,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        let node = doc.node(id);
        let guarded = self.config.xhtml && has_children(node);

        self.line.flush(out, indent)?;
        self.print_tag(out, doc, mode, indent, id, false)?;

        let script_type = node.attribute("type").and_then(|a| a.value.as_deref());
        let (comment_start, comment_end) = comment_delimiters(script_type);
        let safe = guarded && has_cdata(doc, node.first_child);

        if guarded && !safe {
            self.unwrapped(true, |p| {
                p.line.push_str(comment_start);
                p.line.push_str(CDATA_START);
                p.line.push_str(comment_end);
                p.line.cond_flush(out, indent)
            })?;
        }

        let mut has_content = false;
        let mut content_indent = None;
        for child in doc.children(id) {
            let child_node = doc.node(child);
            if child_node.is_text() && child_node.start == child_node.end {
                continue;
            }
            has_content = true;
            self.print_tree(out, doc, mode, 0, child)?;
            if child_node.next_sibling.is_none() {
                content_indent = text_ends_with_newline(doc, child);
            }
        }
        if content_indent.is_none() && has_content {
            self.line.cond_flush(out, 0)?;
            content_indent = Some(0);
        }

        if guarded && !safe {
            let content_indent = content_indent.unwrap_or(0);
            self.unwrapped(true, |p| {
                p.line.pad_to(content_indent);
                p.line.push_str(comment_start);
                p.line.push_str(CDATA_END);
                p.line.push_str(comment_end);
            });
            self.line.cond_flush(out, 0)?;
        }

        let end_indent = if safe { 0 } else { indent };
        self.print_end_tag(doc, id);
        self.line.flush(out, end_indent)
    }

    fn print_inline<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        mode: Mode,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        let tag = descriptor(doc.node(id));

        if self.config.make_clean {
            if tag.is(&tags::FONT) {
                for child in doc.children(id) {
                    self.print_tree(out, doc, mode, indent, child)?;
                }
                return Ok(());
            }
            if tag.is(&tags::NOBR) {
                for child in doc.children(id) {
                    self.print_tree(out, doc, mode | Mode::NO_WRAP, indent, child)?;
                }
                return Ok(());
            }
        }

        self.print_tag(out, doc, mode, indent, id, false)?;

        if self.should_indent(doc, id) {
            self.line.cond_flush(out, indent)?;
            let child_indent = indent + self.config.spaces;
            let mut on_new_line = true;
            for child in doc.children(id) {
                self.print_tree(out, doc, mode, child_indent, child)?;
                on_new_line = false;
                if self.separates(doc, child) {
                    self.line.cond_flush(out, child_indent)?;
                    on_new_line = true;
                }
            }
            if !on_new_line {
                self.line.cond_flush(out, child_indent)?;
            }
        } else {
            for child in doc.children(id) {
                self.print_tree(out, doc, mode, indent, child)?;
                if self.separates(doc, child) {
                    self.line.cond_flush(out, indent)?;
                }
            }
        }

        self.print_end_tag(doc, id);
        Ok(())
    }

    fn print_block<S: OutputSink + ?Sized>(
        &mut self,
        out: &mut S,
        doc: &Document,
        mode: Mode,
        indent: usize,
        id: NodeId,
    ) -> io::Result<()> {
        let config = self.config;
        let node = doc.node(id);
        let tag = descriptor(node);
        let indented = self.should_indent(doc, id);
        let structural = tag.has(ContentModel::HTML)
            || tag.is(&tags::NOFRAMES)
            || (tag.has(ContentModel::HEAD) && !tag.is(&tags::TITLE));

        self.line.cond_flush(out, indent)?;
        if config.smart_indent {
            if let Some(prev) = doc.get(node.prev_sibling) {
                let empty_text = prev.is_text() && prev.start == prev.end;
                if !empty_text && !tag.is(&tags::LI) {
                    self.line.flush(out, indent)?;
                }
            }
        }

        let omit_start =
            config.hide_end_tags && tag.has(ContentModel::OMITST) && node.attributes.is_empty();
        if !omit_start {
            self.print_tag(out, doc, mode, indent, id, false)?;
            if indented {
                self.line.cond_flush(out, indent)?;
            } else if structural {
                self.line.flush(out, indent)?;
            }
        }

        if tag.is(&tags::BODY) && self.slides.is_some() {
            let slide_indent = if config.indent_content {
                indent + config.spaces
            } else {
                indent
            };
            self.print_slide(out, doc, mode, slide_indent)?;
        } else {
            let child_indent = if indented { indent + config.spaces } else { indent };
            let mut last: Option<&Node> = None;
            for child in doc.children(id) {
                let child_node = doc.node(child);
                // Naked text followed by a block starts a new line.
                if !config.indent_content
                    && last.is_some_and(Node::is_text)
                    && child_node.tag.is_some_and(|t| !t.has(ContentModel::INLINE))
                {
                    self.line.flush(out, indent)?;
                }
                self.print_tree(out, doc, mode, child_indent, child)?;
                last = Some(child_node);

                if child_node.next_sibling.is_some()
                    && !child_node.is_text()
                    && !child_node.is_tag(&tags::LI)
                {
                    self.line.cond_flush(out, child_indent)?;
                } else if self.next_indents(doc, child) {
                    self.line.cond_flush(out, indent)?;
                }
            }
        }

        let print_end = !config.hide_end_tags || !tag.has(ContentModel::OPT);
        if indented || (structural && !config.hide_end_tags) {
            let inner = if config.indent_content {
                indent + config.spaces
            } else {
                indent
            };
            self.line.cond_flush(out, inner)?;
            if print_end {
                self.print_end_tag(doc, id);
                self.line.flush(out, indent)?;
            }
        } else {
            if print_end {
                self.print_end_tag(doc, id);
            }
            self.line.flush(out, indent)?;
        }
        Ok(())
    }

    /// The next sibling is an element that indents its own content.
    fn next_indents(&self, doc: &Document, id: NodeId) -> bool {
        let next = doc.node(id).next_sibling;
        doc.get(next)
            .is_some_and(|n| !n.is_text() && n.tag.is_some() && self.should_indent(doc, next))
    }

    /// A line break belongs between `id` and its next sibling.
    fn separates(&self, doc: &Document, id: NodeId) -> bool {
        let node = doc.node(id);
        if node.next_sibling.is_none() {
            return false;
        }
        (!node.is_text() && !node.is_tag(&tags::LI)) || self.next_indents(doc, id)
    }

    /// Whether an element's children go on their own, deeper-indented lines.
    pub(super) fn should_indent(&self, doc: &Document, id: NodeId) -> bool {
        if !self.config.indent_content {
            return false;
        }
        let node = doc.node(id);
        let Some(tag) = node.tag else {
            return false;
        };

        if self.config.smart_indent {
            if has_children(node) && tag.has(ContentModel::NO_INDENT) {
                return any_non_text_child(doc, id);
            }
            if tag.has(ContentModel::HEADING) || SMART_INDENT_TAGS.iter().any(|t| tag.is(t)) {
                return any_non_text_child(doc, id);
            }
            if tag.is(&tags::TITLE) {
                return false;
            }
        }

        if tag.has(ContentModel::FIELD | ContentModel::OBJECT) || tag.is(&tags::MAP) {
            return true;
        }
        !tag.has(ContentModel::INLINE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LineEnding, PrintConfig};
    use crate::sink::StringSink;

    #[test]
    fn test_after_space() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append(doc.root(), p);
        let text = doc.create_text("word ");
        doc.append(p, text);
        let b = doc.create_element("b");
        doc.append(p, b);
        let i = doc.create_element("i");
        doc.append(b, i);
        let glued = doc.create_element("em");
        doc.append(p, glued);

        assert!(after_space(&doc, p));
        assert!(after_space(&doc, b));
        assert!(after_space(&doc, i));
        assert!(!after_space(&doc, glued));
    }

    #[test]
    fn test_text_ends_with_newline() {
        let mut doc = Document::new();
        let a = doc.create_text("x\n  ");
        let b = doc.create_text("x\n");
        let c = doc.create_text("x");
        assert_eq!(text_ends_with_newline(&doc, a), Some(2));
        assert_eq!(text_ends_with_newline(&doc, b), Some(0));
        assert_eq!(text_ends_with_newline(&doc, c), None);
    }

    #[test]
    fn test_has_cdata() {
        let mut doc = Document::new();
        let plain = doc.create_text("go();");
        let marked = doc.create_text("//<![CDATA[\nif (a < b) {}\n//]]>");
        let risky = doc.create_text("if (a < b) {}");
        assert!(has_cdata(&doc, plain));
        assert!(has_cdata(&doc, marked));
        assert!(!has_cdata(&doc, risky));
        assert!(!has_cdata(&doc, NodeId::NONE));
    }

    #[test]
    fn test_comment_delimiters() {
        assert_eq!(comment_delimiters(Some("text/javascript")), ("//", ""));
        assert_eq!(comment_delimiters(Some("TEXT/CSS")), ("/*", "*/"));
        assert_eq!(comment_delimiters(Some("text/vbscript")), ("'", ""));
        assert_eq!(comment_delimiters(Some("application/ecmascript")), ("//", ""));
        assert_eq!(comment_delimiters(None), ("", ""));
    }

    #[test]
    fn test_should_indent() {
        let mut doc = Document::new();
        let ul = doc.create_element("ul");
        let li = doc.create_element("li");
        let text = doc.create_text("x");
        let select = doc.create_element("select");
        let span = doc.create_element("span");
        doc.append(doc.root(), ul);
        doc.append(ul, li);
        doc.append(li, text);

        let plain = PrintConfig::default();
        assert!(!Printer::new(&plain).should_indent(&doc, ul));

        let indent = PrintConfig::default().with_indent(2);
        let printer = Printer::new(&indent);
        assert!(printer.should_indent(&doc, ul));
        assert!(printer.should_indent(&doc, li));
        assert!(printer.should_indent(&doc, select));
        assert!(!printer.should_indent(&doc, span));

        let smart = PrintConfig::default().with_smart_indent();
        let printer = Printer::new(&smart);
        assert!(printer.should_indent(&doc, ul));
        assert!(!printer.should_indent(&doc, li));
    }

    #[test]
    fn test_inline_children_stay_on_line() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append(doc.root(), p);
        let before = doc.create_text("a ");
        doc.append(p, before);
        let b = doc.create_element("b");
        doc.append(p, b);
        let inner = doc.create_text("bold");
        doc.append(b, inner);

        let config = PrintConfig::default();
        let mut printer = Printer::new(&config);
        let mut out = StringSink::new(LineEnding::Lf);
        printer.print_tree(&mut out, &doc, Mode::NORMAL, 0, doc.root()).unwrap();
        assert_eq!(out.as_str(), "<p>a <b>bold</b></p>\n");
    }

    #[test]
    #[should_panic(expected = "tag descriptor")]
    fn test_missing_descriptor_panics() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append(doc.root(), p);
        doc.get_mut(p).unwrap().tag = None;
        let config = PrintConfig::default();
        let mut printer = Printer::new(&config);
        let mut out = StringSink::new(LineEnding::Lf);
        let _ = printer.print_tree(&mut out, &doc, Mode::NORMAL, 0, doc.root());
    }
}
