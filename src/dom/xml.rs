//! Load a generic XML document into the arena with quick-xml.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesStart, Event};
use tracing::debug;

use super::{Attribute, Document, NodeId, NodeKind, tags};
use crate::entities::entity_char;
use crate::error::{Error, Result};

/// Parse an XML document.
///
/// Every element gets the generic XML descriptor. Whitespace text is kept
/// as-is; the XML printer decides what is significant.
///
/// # Errors
///
/// Returns [`Error::Xml`] for malformed markup and [`Error::InvalidXml`] for
/// mismatched or unclosed elements.
pub fn parse_xml(content: &str) -> Result<Document> {
    let mut doc = Document::new();
    let mut stack: Vec<NodeId> = vec![doc.root()];
    let mut reader = Reader::from_str(content);

    loop {
        let parent = *stack.last().unwrap_or(&doc.root());
        match reader.read_event()? {
            Event::Decl(e) => {
                let decl = doc.create_xml_decl();
                for attr in decl_attributes(&e)? {
                    doc.push_attribute(decl, attr);
                }
                doc.append(parent, decl);
            }
            Event::DocType(e) => {
                let bytes: &[u8] = &e;
                let id = doc.create_doctype(String::from_utf8_lossy(bytes).trim());
                doc.append(parent, id);
            }
            Event::PI(e) => {
                let bytes: &[u8] = &e;
                let id = doc.create_proc_ins(&String::from_utf8_lossy(bytes));
                doc.append(parent, id);
            }
            Event::Comment(e) => {
                let bytes: &[u8] = &e;
                let id = doc.create_comment(&String::from_utf8_lossy(bytes));
                doc.append(parent, id);
            }
            Event::CData(e) => {
                let bytes: &[u8] = &e;
                let id = doc.create_cdata(&String::from_utf8_lossy(bytes));
                doc.append(parent, id);
            }
            Event::Start(e) => {
                let id = create_element(&mut doc, &e)?;
                doc.append(parent, id);
                stack.push(id);
            }
            Event::Empty(e) => {
                let id = create_element(&mut doc, &e)?;
                if let Some(node) = doc.get_mut(id) {
                    node.kind = NodeKind::StartEndTag;
                }
                doc.append(parent, id);
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let open = doc.node(parent).element_name().map(|n| n.into_owned());
                if stack.len() < 2 || open.as_deref() != Some(name.as_str()) {
                    return Err(Error::InvalidXml(format!("unexpected </{name}>")));
                }
                stack.pop();
            }
            Event::Text(e) => {
                let text = String::from_utf8_lossy(e.as_ref());
                doc.append_text(parent, &text);
            }
            Event::GeneralRef(e) => {
                let name = String::from_utf8_lossy(e.as_ref());
                match resolve_reference(&name) {
                    Some(c) => doc.append_text(parent, c.encode_utf8(&mut [0; 4])),
                    None => doc.append_text(parent, &format!("&{name};")),
                }
            }
            Event::Eof => break,
            #[allow(unreachable_patterns)]
            _ => {}
        }
    }

    if stack.len() > 1 {
        let open = doc
            .node(stack[stack.len() - 1])
            .element_name()
            .map(|n| n.into_owned())
            .unwrap_or_default();
        return Err(Error::InvalidXml(format!("unclosed <{open}>")));
    }

    debug!(nodes = doc.len(), "parsed XML document");
    Ok(doc)
}

fn create_element(doc: &mut Document, start: &BytesStart<'_>) -> Result<NodeId> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let id = doc.create_element(&name);
    if let Some(node) = doc.get_mut(id) {
        node.tag = Some(&tags::XML_TAGS);
    }

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::InvalidXml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape_value(&raw);
        doc.push_attribute(id, Attribute::with_value(key, value));
    }
    Ok(id)
}

fn decl_attributes(decl: &BytesDecl<'_>) -> Result<Vec<Attribute>> {
    let mut attrs = Vec::new();
    let version = decl.version()?;
    attrs.push(Attribute::with_value(
        "version",
        String::from_utf8_lossy(&version).into_owned(),
    ));
    if let Some(encoding) = decl.encoding() {
        let encoding = encoding.map_err(|e| Error::InvalidXml(e.to_string()))?;
        attrs.push(Attribute::with_value(
            "encoding",
            String::from_utf8_lossy(&encoding).into_owned(),
        ));
    }
    if let Some(standalone) = decl.standalone() {
        let standalone = standalone.map_err(|e| Error::InvalidXml(e.to_string()))?;
        attrs.push(Attribute::with_value(
            "standalone",
            String::from_utf8_lossy(&standalone).into_owned(),
        ));
    }
    Ok(attrs)
}

/// Unescape an attribute value, accepting HTML entity names as well.
fn unescape_value(raw: &str) -> String {
    match unescape(raw) {
        Ok(value) => value.into_owned(),
        Err(_) => resolve_references(raw).into_owned(),
    }
}

/// Resolve `name` from `&name;`: numeric, predefined or HTML entity.
fn resolve_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    entity_char(name)
}

/// Replace every resolvable reference in `raw`, leaving the rest untouched.
fn resolve_references(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';').and_then(|semi| Some((semi, resolve_reference(&after[..semi])?))) {
            Some((semi, c)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(doc: &Document, id: NodeId) -> Vec<NodeKind> {
        doc.children(id).map(|c| doc.node(c).kind).collect()
    }

    #[test]
    fn test_prolog() {
        let doc = parse_xml(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<?xml-stylesheet href=\"a.xsl\"?><doc/>",
        )
        .unwrap();
        let root = doc.root();
        assert_eq!(
            kinds(&doc, root),
            vec![
                NodeKind::XmlDecl,
                NodeKind::Text,
                NodeKind::ProcIns,
                NodeKind::StartEndTag
            ]
        );
        let decl = doc.children(root).next().unwrap();
        let node = doc.node(decl);
        assert_eq!(node.attribute("version").unwrap().value.as_deref(), Some("1.0"));
        assert_eq!(node.attribute("encoding").unwrap().value.as_deref(), Some("UTF-8"));
    }

    #[test]
    fn test_elements_and_text() {
        let doc = parse_xml("<a x=\"1 &amp; 2\"><b>t &lt; u</b><![CDATA[<raw>]]><!--c--></a>").unwrap();
        let a = doc.children(doc.root()).next().unwrap();
        assert_eq!(
            doc.node(a).attribute("x").unwrap().value.as_deref(),
            Some("1 & 2")
        );
        assert!(doc.node(a).is_tag(&tags::XML_TAGS));
        assert_eq!(
            kinds(&doc, a),
            vec![NodeKind::StartTag, NodeKind::CData, NodeKind::Comment]
        );
        let b = doc.children(a).next().unwrap();
        let text = doc.children(b).next().unwrap();
        assert_eq!(doc.text(text), b"t < u");
    }

    #[test]
    fn test_html_entities_resolve() {
        let doc = parse_xml("<p title=\"caf&eacute;\">a&nbsp;b&#233;&unknown;</p>").unwrap();
        let p = doc.children(doc.root()).next().unwrap();
        assert_eq!(
            doc.node(p).attribute("title").unwrap().value.as_deref(),
            Some("caf\u{e9}")
        );
        let text = doc.children(p).next().unwrap();
        assert_eq!(doc.text(text), "a\u{a0}b\u{e9}&unknown;".as_bytes());
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(matches!(parse_xml("<a><b></a>"), Err(Error::InvalidXml(_)) | Err(Error::Xml(_))));
        assert!(matches!(parse_xml("<a>"), Err(Error::InvalidXml(_)) | Err(Error::Xml(_))));
    }

    #[test]
    fn test_resolve_references() {
        assert_eq!(resolve_references("a &amp b"), "a &amp b");
        assert_eq!(resolve_references("&lt;&#x41;&copy;"), "<A\u{a9}");
        assert_eq!(resolve_references("plain"), "plain");
    }
}
