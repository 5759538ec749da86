//! Arena document tree consumed by the printer.
//!
//! All nodes live in one vector and link to each other by index, so the
//! printer can walk parents and siblings without owning anything. Textual
//! payloads (text, comments, doctype, processing instructions, CDATA and
//! embedded script blocks) are byte ranges into a shared buffer.

use std::borrow::Cow;

use html5ever::{LocalName, Namespace, Prefix, QualName};

pub mod attrs;
pub mod tags;
mod tree_sink;
mod xml;

pub use attrs::{AttrClass, classify};
pub use tags::{ContentModel, ParserKind, TagDescriptor};
pub use tree_sink::{DocumentSink, parse_html};
pub use xml::parse_xml;

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Server-side script dialects that can appear inline in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDialect {
    /// `<% ... %>`
    Asp,
    /// `<# ... #>`
    Jste,
    /// `<? ... ?>`
    Php,
}

impl ScriptDialect {
    pub fn open(self) -> &'static str {
        match self {
            ScriptDialect::Asp => "<%",
            ScriptDialect::Jste => "<#",
            ScriptDialect::Php => "<?",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            ScriptDialect::Asp => "%>",
            ScriptDialect::Jste => "#>",
            ScriptDialect::Php => "?>",
        }
    }
}

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Root,
    StartTag,
    /// A stray end tag kept in the tree.
    EndTag,
    /// An element written with the self-closing syntax.
    StartEndTag,
    Text,
    Comment,
    DocType,
    ProcIns,
    XmlDecl,
    CData,
    /// Marked section such as `<![if IE]>`.
    Section,
    Embedded(ScriptDialect),
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    /// `None` for an attribute written without `=value`.
    pub value: Option<String>,
    /// Quote character used in the source; `"` when unknown.
    pub delimiter: Option<char>,
    pub class: AttrClass,
    /// Embedded ASP/PHP block standing in attribute position.
    pub embedded: NodeId,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        let name = name.into();
        Self {
            class: classify(&name),
            name,
            value,
            delimiter: None,
            embedded: NodeId::NONE,
        }
    }

    /// Attribute with the given value.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, Some(value.into()))
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// An embedded script block printed where an attribute would be.
    pub fn embedded(node: NodeId) -> Self {
        Self {
            name: String::new(),
            value: None,
            delimiter: None,
            class: AttrClass::empty(),
            embedded: node,
        }
    }

    pub fn is_boolean(&self) -> bool {
        self.class.contains(AttrClass::BOOLEAN)
    }
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Element name; `None` for non-elements.
    pub name: Option<QualName>,
    /// Resolved grammar entry; every element carries one.
    pub tag: Option<&'static TagDescriptor>,
    pub attributes: Vec<Attribute>,
    /// Byte range of the textual payload in the document buffer.
    pub start: usize,
    pub end: usize,
    /// Element was inferred by the parser rather than written in the source.
    pub implicit: bool,
    /// Comment was followed by a line break in the source.
    pub linebreak: bool,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            tag: None,
            attributes: Vec::new(),
            start: 0,
            end: 0,
            implicit: false,
            linebreak: false,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::StartTag | NodeKind::EndTag | NodeKind::StartEndTag
        )
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// True if this node's descriptor is `desc`.
    pub fn is_tag(&self, desc: &TagDescriptor) -> bool {
        self.tag.is_some_and(|t| t.is(desc))
    }

    pub fn has_model(&self, model: ContentModel) -> bool {
        self.tag.is_some_and(|t| t.has(model))
    }

    /// Qualified element name (`prefix:local`) as written.
    pub fn element_name(&self) -> Option<Cow<'_, str>> {
        let name = self.name.as_ref()?;
        Some(match &name.prefix {
            Some(prefix) => Cow::Owned(format!("{}:{}", &**prefix, &*name.local)),
            None => Cow::Borrowed(&*name.local),
        })
    }

    /// Find an attribute by name (ASCII case-insensitive).
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.embedded.is_none() && a.name.eq_ignore_ascii_case(name))
    }
}

/// Arena document tree.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    text: Vec<u8>,
}

impl Document {
    /// Create an empty document holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root)],
            text: Vec::new(),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn alloc_payload(&mut self, kind: NodeKind, payload: &[u8]) -> NodeId {
        let mut node = Node::new(kind);
        node.start = self.text.len();
        self.text.extend_from_slice(payload);
        node.end = self.text.len();
        self.alloc(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Get a node that is known to exist.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the document holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Raw payload bytes of a node (empty for elements).
    pub fn text(&self, id: NodeId) -> &[u8] {
        match self.get(id) {
            Some(node) => &self.text[node.start..node.end],
            None => &[],
        }
    }

    /// Create an element, resolving its descriptor from the tag table.
    ///
    /// A `prefix:local` name keeps its prefix and always resolves to the
    /// generic descriptor.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let qual = match name.split_once(':') {
            Some((prefix, local)) => QualName::new(
                Some(Prefix::from(prefix)),
                Namespace::from(""),
                LocalName::from(local),
            ),
            None => QualName::new(None, Namespace::from(""), LocalName::from(name)),
        };
        let tag = if qual.prefix.is_some() {
            &tags::XML_TAGS
        } else {
            tags::lookup_or_generic(name)
        };
        self.create_element_with(qual, tag)
    }

    /// Create an element from a parsed name and an explicit descriptor.
    pub fn create_element_with(&mut self, name: QualName, tag: &'static TagDescriptor) -> NodeId {
        let mut node = Node::new(NodeKind::StartTag);
        node.name = Some(name);
        node.tag = Some(tag);
        self.alloc(node)
    }

    /// Create an element written as `<name/>`.
    pub fn create_empty_element(&mut self, name: &str) -> NodeId {
        let id = self.create_element(name);
        self.nodes[id.0 as usize].kind = NodeKind::StartEndTag;
        id
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc_payload(NodeKind::Text, text.as_bytes())
    }

    /// Create a text node from raw bytes, which need not be valid UTF-8.
    pub fn create_text_bytes(&mut self, bytes: &[u8]) -> NodeId {
        self.alloc_payload(NodeKind::Text, bytes)
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.alloc_payload(NodeKind::Comment, text.as_bytes())
    }

    /// Create a doctype from everything between `<!DOCTYPE ` and `>`.
    pub fn create_doctype(&mut self, text: &str) -> NodeId {
        self.alloc_payload(NodeKind::DocType, text.as_bytes())
    }

    /// Create a processing instruction from everything between `<?` and `>`.
    pub fn create_proc_ins(&mut self, text: &str) -> NodeId {
        self.alloc_payload(NodeKind::ProcIns, text.as_bytes())
    }

    /// Create an XML declaration; its pseudo-attributes go in `attributes`.
    pub fn create_xml_decl(&mut self) -> NodeId {
        self.alloc(Node::new(NodeKind::XmlDecl))
    }

    pub fn create_cdata(&mut self, text: &str) -> NodeId {
        self.alloc_payload(NodeKind::CData, text.as_bytes())
    }

    pub fn create_section(&mut self, text: &str) -> NodeId {
        self.alloc_payload(NodeKind::Section, text.as_bytes())
    }

    pub fn create_embedded(&mut self, dialect: ScriptDialect, text: &str) -> NodeId {
        self.alloc_payload(NodeKind::Embedded(dialect), text.as_bytes())
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) {
        let first = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        if first.is_some() {
            self.insert_before(first, child);
        } else {
            self.append(parent, child);
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, target: NodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Move every child of `node` to the end of `new_parent`.
    pub fn reparent_children(&mut self, node: NodeId, new_parent: NodeId) {
        let children: Vec<_> = self.children(node).collect();
        for child in children {
            self.detach(child);
            self.append(new_parent, child);
        }
    }

    /// Append text, merging into a trailing text node when there is one.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);
        let buffer_end = self.text.len();

        if let Some(node) = self.nodes.get(last.0 as usize).filter(|n| n.is_text()) {
            let (start, end) = (node.start, node.end);
            if end == buffer_end {
                self.text.extend_from_slice(text.as_bytes());
            } else {
                // The trailing run moved on; copy it to the end of the buffer.
                self.text.extend_from_within(start..end);
                self.text.extend_from_slice(text.as_bytes());
            }
            let new_end = self.text.len();
            let new_start = new_end - (end - start) - text.len();
            let node = &mut self.nodes[last.0 as usize];
            node.start = new_start;
            node.end = new_end;
            return;
        }

        let id = self.create_text(text);
        self.append(parent, id);
    }

    /// Add an attribute unless one with the same name already exists.
    ///
    /// Returns `true` if the attribute was added.
    pub fn add_attribute_if_missing(&mut self, id: NodeId, attr: Attribute) -> bool {
        match self.get_mut(id) {
            Some(node) if node.attribute(&attr.name).is_none() => {
                node.attributes.push(attr);
                true
            }
            _ => false,
        }
    }

    /// Append an attribute unconditionally.
    pub fn push_attribute(&mut self, id: NodeId, attr: Attribute) {
        if let Some(node) = self.get_mut(id) {
            node.attributes.push(attr);
        }
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children {
            doc: self,
            current: first,
        }
    }

    /// Find the first node matching a predicate (depth-first, document order).
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if predicate(node) {
                return Some(id);
            }
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        None
    }

    /// Find the first element with the given descriptor.
    pub fn find_tag(&self, desc: &TagDescriptor) -> Option<NodeId> {
        self.find(|node| node.is_element() && node.is_tag(desc))
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_tag(&tags::BODY)
    }

    pub fn head(&self) -> Option<NodeId> {
        self.find_tag(&tags::HEAD)
    }

    /// True if `id` or any ancestor uses the preformatted parser.
    pub fn has_pre_ancestor(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(node) = self.get(current) {
            if node.tag.is_some_and(|t| t.parser == ParserKind::Pre) {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// True if whitespace inside this element is significant.
    pub fn preserves_whitespace(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if let Some(attr) = node.attribute("xml:space") {
            return attr.value.as_deref() == Some("preserve");
        }
        let Some(name) = node.element_name() else {
            return false;
        };
        if ["pre", "script", "style", "xsl:text"]
            .iter()
            .any(|n| name.eq_ignore_ascii_case(n))
        {
            return true;
        }
        node.tag.is_some_and(|t| t.parser == ParserKind::Pre)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    current: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.doc.get(self.current)?;
        let id = self.current;
        self.current = node.next_sibling;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tree() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let p = doc.create_element("p");
        let em = doc.create_element("em");
        doc.append(doc.root(), div);
        doc.append(div, p);
        doc.prepend(div, em);

        let children: Vec<_> = doc.children(div).collect();
        assert_eq!(children, vec![em, p]);
        assert_eq!(doc.node(p).prev_sibling, em);
        assert!(doc.node(div).is_tag(&tags::DIV));
    }

    #[test]
    fn test_append_text_merges() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.append(doc.root(), p);
        doc.append_text(p, "Hello");
        doc.create_comment("elsewhere");
        doc.append_text(p, ", world");

        let children: Vec<_> = doc.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.text(children[0]), b"Hello, world");
    }

    #[test]
    fn test_detach_and_reparent() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        let x = doc.create_text("x");
        let y = doc.create_text("y");
        doc.append(doc.root(), a);
        doc.append(doc.root(), b);
        doc.append(a, x);
        doc.append(a, y);

        doc.detach(x);
        assert_eq!(doc.children(a).collect::<Vec<_>>(), vec![y]);
        assert!(doc.node(y).prev_sibling.is_none());

        doc.reparent_children(a, b);
        assert_eq!(doc.children(a).count(), 0);
        assert_eq!(doc.children(b).collect::<Vec<_>>(), vec![y]);
    }

    #[test]
    fn test_prefixed_names() {
        let mut doc = Document::new();
        let id = doc.create_element("xsl:text");
        let node = doc.node(id);
        assert_eq!(node.element_name().unwrap(), "xsl:text");
        assert!(node.is_tag(&tags::XML_TAGS));
        assert!(doc.preserves_whitespace(id));
    }

    #[test]
    fn test_attribute_if_missing() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        assert!(doc.add_attribute_if_missing(p, Attribute::with_value("class", "a")));
        assert!(!doc.add_attribute_if_missing(p, Attribute::with_value("CLASS", "b")));
        assert_eq!(doc.node(p).attributes.len(), 1);
    }

    #[test]
    fn test_xml_space_attribute_wins() {
        let mut doc = Document::new();
        let pre = doc.create_element("pre");
        doc.push_attribute(pre, Attribute::with_value("xml:space", "default"));
        assert!(!doc.preserves_whitespace(pre));
        let div = doc.create_element("div");
        assert!(!doc.preserves_whitespace(div));
        let pre2 = doc.create_element("pre");
        assert!(doc.preserves_whitespace(pre2));
    }
}
