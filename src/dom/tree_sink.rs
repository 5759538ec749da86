//! html5ever TreeSink implementation that parses straight into a [`Document`].

use std::cell::RefCell;

use html5ever::driver::ParseOpts;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName, ns, parse_document};

use super::{Attribute, Document, NodeId, ParserKind, tags};

/// Parse an HTML document into the arena.
///
/// The parser recovers from every error the way browsers do, so this never
/// fails; implied `html`, `head` and `body` elements are always present.
/// Whitespace-only text that spans a line break is layout, not content, and
/// is dropped unless it sits inside preformatted or script content.
pub fn parse_html(html: &str) -> Document {
    let sink = DocumentSink::new();
    let result = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    let mut doc = result.into_document();
    drop_layout_whitespace(&mut doc);
    doc
}

fn is_verbatim_context(doc: &Document, mut id: NodeId) -> bool {
    while let Some(node) = doc.get(id) {
        if node.tag.is_some_and(|t| t.parser != ParserKind::Generic)
            || node.element_name().is_some_and(|n| n.eq_ignore_ascii_case("textarea"))
        {
            return true;
        }
        id = node.parent;
    }
    false
}

fn drop_layout_whitespace(doc: &mut Document) {
    let layout: Vec<NodeId> = (0..doc.len())
        .map(|i| NodeId(i as u32))
        .filter(|&id| {
            let node = doc.node(id);
            let text = doc.text(id);
            node.is_text()
                && node.parent.is_some()
                && text.contains(&b'\n')
                && text.iter().all(u8::is_ascii_whitespace)
                && !is_verbatim_context(doc, node.parent)
        })
        .collect();
    for id in layout {
        doc.detach(id);
    }
}

/// Handle used by TreeSink to reference nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(pub NodeId);

impl Default for NodeHandle {
    fn default() -> Self {
        NodeHandle(NodeId::NONE)
    }
}

/// TreeSink implementation that builds a [`Document`].
///
/// html5ever's TreeSink takes `&self` everywhere, so the document sits
/// behind a `RefCell`.
pub struct DocumentSink {
    doc: RefCell<Document>,
    quirks_mode: RefCell<QuirksMode>,
}

impl Default for DocumentSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSink {
    pub fn new() -> Self {
        Self {
            doc: RefCell::new(Document::new()),
            quirks_mode: RefCell::new(QuirksMode::NoQuirks),
        }
    }

    /// Consume the sink and return the document.
    pub fn into_document(self) -> Document {
        self.doc.into_inner()
    }

    pub fn quirks_mode(&self) -> QuirksMode {
        *self.quirks_mode.borrow()
    }
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", &**prefix, &*name.local),
        None => name.local.to_string(),
    }
}

fn convert_attribute(attr: Html5Attribute) -> Attribute {
    let mut converted = Attribute::with_value(attribute_name(&attr.name), attr.value.to_string());
    // html5ever reports `checked` and `checked=""` alike; keep the short form.
    if converted.is_boolean() && converted.value.as_deref() == Some("") {
        converted.value = None;
    }
    converted
}

/// `html PUBLIC "..." "..."` as it would appear after `<!DOCTYPE `.
fn doctype_text(name: &str, public_id: &str, system_id: &str) -> String {
    let mut text = name.to_string();
    if !public_id.is_empty() {
        text.push_str(&format!(" PUBLIC \"{public_id}\""));
        if !system_id.is_empty() {
            text.push_str(&format!(" \"{system_id}\""));
        }
    } else if !system_id.is_empty() {
        text.push_str(&format!(" SYSTEM \"{system_id}\""));
    }
    text
}

impl TreeSink for DocumentSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: std::borrow::Cow<'static, str>) {
        // Recovery is the parser's job; the printer takes whatever tree results.
    }

    fn get_document(&self) -> Self::Handle {
        NodeHandle(self.doc.borrow().root())
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: ns!(),
            local: html5ever::local_name!(""),
        };

        let doc = self.doc.borrow();
        match doc.get(target.0).and_then(|n| n.name.as_ref()) {
            // SAFETY: names are never mutated or dropped while the sink is
            // alive, and html5ever uses the reference before the next call
            // that could grow the arena.
            Some(name) => unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) },
            None => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let tag = if name.ns == ns!(html) {
            tags::lookup_or_generic(&name.local)
        } else {
            &tags::XML_TAGS
        };

        let mut doc = self.doc.borrow_mut();
        let id = doc.create_element_with(name, tag);
        for attr in attrs {
            doc.push_attribute(id, convert_attribute(attr));
        }
        NodeHandle(id)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        NodeHandle(self.doc.borrow_mut().create_comment(&text))
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        let text = if data.is_empty() {
            target.to_string()
        } else {
            format!("{} {}", &*target, &*data)
        };
        NodeHandle(self.doc.borrow_mut().create_proc_ins(&text))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let mut doc = self.doc.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => doc.append(parent.0, node.0),
            NodeOrText::AppendText(text) => doc.append_text(parent.0, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let parent = self.doc.borrow().get(element.0).map(|n| n.parent);
        if let Some(parent) = parent
            && parent.is_some()
        {
            self.append(&NodeHandle(parent), child);
            return;
        }
        self.append(prev_element, child);
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut doc = self.doc.borrow_mut();
        let root = doc.root();
        let doctype = doc.create_doctype(&doctype_text(&name, &public_id, &system_id));
        doc.append(root, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template content is printed in place.
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        *self.quirks_mode.borrow_mut() = mode;
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut doc = self.doc.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => doc.insert_before(sibling.0, node.0),
            NodeOrText::AppendText(text) => {
                let text_node = doc.create_text(&text);
                doc.insert_before(sibling.0, text_node);
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut doc = self.doc.borrow_mut();
        for attr in attrs {
            doc.add_attribute_if_missing(target.0, convert_attribute(attr));
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.doc.borrow_mut().detach(target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        self.doc.borrow_mut().reparent_children(node.0, new_parent.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeKind;

    #[test]
    fn test_basic_parse() {
        let doc = parse_html("<html><body><p>Hello</p></body></html>");

        let p = doc.find_tag(&tags::P).expect("should find p");
        assert_eq!(doc.node(p).element_name().unwrap(), "p");

        let text = doc.children(p).next().expect("p should have child");
        assert_eq!(doc.text(text), b"Hello");
    }

    #[test]
    fn test_implied_structure() {
        let doc = parse_html("<p>Loose paragraph");
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_attributes() {
        let doc = parse_html(r#"<div id="main" class="container header" hidden>Content</div>"#);

        let div = doc.find_tag(&tags::DIV).expect("should find div");
        let node = doc.node(div);
        assert_eq!(node.attribute("id").unwrap().value.as_deref(), Some("main"));
        assert!(node.attribute("hidden").unwrap().is_boolean());
        assert_eq!(node.attributes.len(), 3);
    }

    #[test]
    fn test_doctype() {
        let doc = parse_html(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><p>x"#,
        );
        let doctype = doc.children(doc.root()).next().unwrap();
        assert_eq!(doc.node(doctype).kind, NodeKind::DocType);
        assert_eq!(
            doc.text(doctype),
            br#"html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd""#
        );
    }

    #[test]
    fn test_comments_and_unknown_tags() {
        let doc = parse_html("<body><!-- note --><blorp>x</blorp></body>");
        let body = doc.body().unwrap();
        let kinds: Vec<_> = doc.children(body).map(|c| doc.node(c).kind).collect();
        assert_eq!(kinds, vec![NodeKind::Comment, NodeKind::StartTag]);

        let blorp = doc.children(body).nth(1).unwrap();
        assert!(doc.node(blorp).is_tag(&tags::XML_TAGS));
    }

    #[test]
    fn test_layout_whitespace_dropped() {
        let doc = parse_html("<body>\n<div>\n  <p>a b</p>\n</div>\n<pre>\n\n  </pre></body>");
        let div = doc.find_tag(&tags::DIV).unwrap();
        let kinds: Vec<_> = doc.children(div).map(|c| doc.node(c).kind).collect();
        assert_eq!(kinds, vec![NodeKind::StartTag]);

        let pre = doc.find_tag(&tags::PRE).unwrap();
        assert_eq!(doc.children(pre).count(), 1);

        let p = doc.find_tag(&tags::P).unwrap();
        let text = doc.children(p).next().unwrap();
        assert_eq!(doc.text(text), b"a b");
    }

    #[test]
    fn test_doctype_text_forms() {
        assert_eq!(doctype_text("html", "", ""), "html");
        assert_eq!(doctype_text("html", "", "about:legacy-compat"), "html SYSTEM \"about:legacy-compat\"");
        assert_eq!(doctype_text("html", "-//X", ""), "html PUBLIC \"-//X\"");
    }
}
