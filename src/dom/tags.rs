//! Tag grammar table.
//!
//! Each element resolves to a [`TagDescriptor`] describing its content model.
//! Well-known tags are `static` items so the printer can compare identities
//! (`desc.is(&tags::BR)`) instead of strings.

use std::collections::HashMap;
use std::sync::OnceLock;

use bitflags::bitflags;

bitflags! {
    /// Content-model classification of an element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ContentModel: u32 {
        /// Never has content.
        const EMPTY     = 1 << 0;
        /// `html`, `head`, `body`, `frameset`.
        const HTML      = 1 << 1;
        /// Allowed in `head`.
        const HEAD      = 1 << 2;
        const BLOCK     = 1 << 3;
        const INLINE    = 1 << 4;
        const LIST      = 1 << 5;
        const DEFLIST   = 1 << 6;
        const TABLE     = 1 << 7;
        const ROWGRP    = 1 << 8;
        const ROW       = 1 << 9;
        /// Form fields.
        const FIELD     = 1 << 10;
        const OBJECT    = 1 << 11;
        const PARAM     = 1 << 12;
        const FRAMES    = 1 << 13;
        const HEADING   = 1 << 14;
        /// End tag may be omitted.
        const OPT       = 1 << 15;
        const IMG       = 1 << 16;
        /// Allowed in both block and inline context.
        const MIXED     = 1 << 17;
        /// Content is not indented by default.
        const NO_INDENT = 1 << 18;
        const OBSOLETE  = 1 << 19;
        /// Start tag may be omitted.
        const OMITST    = 1 << 20;
    }
}

/// Which content parser an element uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    Generic,
    /// Preformatted text: whitespace is significant.
    Pre,
    /// Script or style body kept verbatim.
    Script,
}

/// Grammar entry for one element name.
#[derive(Debug)]
pub struct TagDescriptor {
    pub name: &'static str,
    pub model: ContentModel,
    pub parser: ParserKind,
}

impl TagDescriptor {
    const fn new(name: &'static str, model: ContentModel) -> Self {
        Self {
            name,
            model,
            parser: ParserKind::Generic,
        }
    }

    const fn with_parser(name: &'static str, model: ContentModel, parser: ParserKind) -> Self {
        Self {
            name,
            model,
            parser,
        }
    }

    /// Identity comparison against a well-known descriptor.
    #[inline]
    pub fn is(&self, other: &TagDescriptor) -> bool {
        std::ptr::eq(self, other)
    }

    #[inline]
    pub fn has(&self, model: ContentModel) -> bool {
        self.model.intersects(model)
    }
}

use ContentModel as M;

/// Descriptor shared by every element of a generic XML document, and by HTML
/// elements the table does not know.
pub static XML_TAGS: TagDescriptor = TagDescriptor::new("", M::BLOCK);

pub static HTML: TagDescriptor = TagDescriptor::new("html", M::HTML.union(M::OPT).union(M::OMITST));
pub static HEAD: TagDescriptor = TagDescriptor::new("head", M::HTML.union(M::OPT).union(M::OMITST));
pub static TITLE: TagDescriptor = TagDescriptor::new("title", M::HEAD);
pub static BASE: TagDescriptor = TagDescriptor::new("base", M::HEAD.union(M::EMPTY));
pub static LINK: TagDescriptor = TagDescriptor::new("link", M::HEAD.union(M::EMPTY));
pub static META: TagDescriptor = TagDescriptor::new("meta", M::HEAD.union(M::EMPTY));
pub static STYLE: TagDescriptor = TagDescriptor::with_parser("style", M::HEAD, ParserKind::Script);
pub static SCRIPT: TagDescriptor = TagDescriptor::with_parser(
    "script",
    M::HEAD.union(M::MIXED).union(M::BLOCK).union(M::INLINE),
    ParserKind::Script,
);
pub static NOSCRIPT: TagDescriptor =
    TagDescriptor::new("noscript", M::BLOCK.union(M::INLINE).union(M::MIXED));
pub static BODY: TagDescriptor = TagDescriptor::new("body", M::HTML.union(M::OPT).union(M::OMITST));
pub static NOFRAMES: TagDescriptor = TagDescriptor::new("noframes", M::BLOCK.union(M::FRAMES));

pub static P: TagDescriptor = TagDescriptor::new("p", M::BLOCK.union(M::OPT));
pub static H1: TagDescriptor = TagDescriptor::new("h1", M::BLOCK.union(M::HEADING));
pub static H2: TagDescriptor = TagDescriptor::new("h2", M::BLOCK.union(M::HEADING));
pub static H3: TagDescriptor = TagDescriptor::new("h3", M::BLOCK.union(M::HEADING));
pub static H4: TagDescriptor = TagDescriptor::new("h4", M::BLOCK.union(M::HEADING));
pub static H5: TagDescriptor = TagDescriptor::new("h5", M::BLOCK.union(M::HEADING));
pub static H6: TagDescriptor = TagDescriptor::new("h6", M::BLOCK.union(M::HEADING));
pub static PRE: TagDescriptor = TagDescriptor::with_parser("pre", M::BLOCK, ParserKind::Pre);
pub static DIV: TagDescriptor = TagDescriptor::new("div", M::BLOCK);
pub static HR: TagDescriptor = TagDescriptor::new("hr", M::BLOCK.union(M::EMPTY));
pub static UL: TagDescriptor = TagDescriptor::new("ul", M::BLOCK);
pub static OL: TagDescriptor = TagDescriptor::new("ol", M::BLOCK);
pub static LI: TagDescriptor =
    TagDescriptor::new("li", M::LIST.union(M::OPT).union(M::NO_INDENT));
pub static TR: TagDescriptor = TagDescriptor::new("tr", M::TABLE.union(M::OPT));
pub static TD: TagDescriptor = TagDescriptor::new("td", M::ROW.union(M::OPT).union(M::NO_INDENT));
pub static CAPTION: TagDescriptor = TagDescriptor::new("caption", M::TABLE);
pub static FIGCAPTION: TagDescriptor = TagDescriptor::new("figcaption", M::BLOCK);
pub static LABEL: TagDescriptor = TagDescriptor::new("label", M::INLINE);

pub static A: TagDescriptor = TagDescriptor::new("a", M::INLINE);
pub static BR: TagDescriptor = TagDescriptor::new("br", M::INLINE.union(M::EMPTY));
pub static WBR: TagDescriptor = TagDescriptor::new("wbr", M::INLINE.union(M::EMPTY));
pub static PARAM: TagDescriptor = TagDescriptor::new("param", M::INLINE.union(M::EMPTY));
pub static AREA: TagDescriptor = TagDescriptor::new("area", M::BLOCK.union(M::EMPTY));
pub static MAP: TagDescriptor = TagDescriptor::new("map", M::INLINE);
pub static FONT: TagDescriptor = TagDescriptor::new("font", M::INLINE);
pub static NOBR: TagDescriptor = TagDescriptor::new("nobr", M::INLINE);
pub static SUP: TagDescriptor = TagDescriptor::new("sup", M::INLINE);
pub static SUB: TagDescriptor = TagDescriptor::new("sub", M::INLINE);
pub static SMALL: TagDescriptor = TagDescriptor::new("small", M::INLINE);
pub static STRONG: TagDescriptor = TagDescriptor::new("strong", M::INLINE);
pub static I: TagDescriptor = TagDescriptor::new("i", M::INLINE);
pub static S: TagDescriptor = TagDescriptor::new("s", M::INLINE);
pub static STRIKE: TagDescriptor = TagDescriptor::new("strike", M::INLINE);
pub static B: TagDescriptor = TagDescriptor::new("b", M::INLINE);
pub static CITE: TagDescriptor = TagDescriptor::new("cite", M::INLINE);
pub static CODE: TagDescriptor = TagDescriptor::new("code", M::INLINE);
pub static SPAN: TagDescriptor = TagDescriptor::new("span", M::INLINE);
pub static BUTTON: TagDescriptor = TagDescriptor::new("button", M::INLINE);

/// Every descriptor the lookup knows, well-known and otherwise.
static TAGS: &[&TagDescriptor] = &[
    &HTML,
    &HEAD,
    &TITLE,
    &BASE,
    &LINK,
    &META,
    &STYLE,
    &SCRIPT,
    &NOSCRIPT,
    &BODY,
    &NOFRAMES,
    &TagDescriptor::new("frameset", M::HTML.union(M::FRAMES)),
    &TagDescriptor::new("frame", M::FRAMES.union(M::EMPTY)),
    &TagDescriptor::new("iframe", M::INLINE),
    &P,
    &H1,
    &H2,
    &H3,
    &H4,
    &H5,
    &H6,
    &PRE,
    &TagDescriptor::with_parser("listing", M::BLOCK.union(M::OBSOLETE), ParserKind::Pre),
    &TagDescriptor::with_parser("xmp", M::BLOCK.union(M::OBSOLETE), ParserKind::Pre),
    &TagDescriptor::with_parser("plaintext", M::BLOCK.union(M::OBSOLETE), ParserKind::Pre),
    &DIV,
    &HR,
    &UL,
    &OL,
    &TagDescriptor::new("dir", M::BLOCK.union(M::OBSOLETE)),
    &TagDescriptor::new("menu", M::BLOCK),
    &LI,
    &TagDescriptor::new("dl", M::BLOCK),
    &TagDescriptor::new("dt", M::DEFLIST.union(M::OPT).union(M::NO_INDENT)),
    &TagDescriptor::new("dd", M::DEFLIST.union(M::OPT).union(M::NO_INDENT)),
    &TagDescriptor::new("address", M::BLOCK),
    &TagDescriptor::new("blockquote", M::BLOCK),
    &TagDescriptor::new("center", M::BLOCK),
    &TagDescriptor::new("form", M::BLOCK),
    &TagDescriptor::new("fieldset", M::BLOCK),
    &TagDescriptor::new("legend", M::INLINE),
    &TagDescriptor::new("isindex", M::BLOCK.union(M::EMPTY)),
    &TagDescriptor::new("table", M::BLOCK),
    &CAPTION,
    &TagDescriptor::new("thead", M::TABLE.union(M::ROWGRP).union(M::OPT)),
    &TagDescriptor::new("tbody", M::TABLE.union(M::ROWGRP).union(M::OPT)),
    &TagDescriptor::new("tfoot", M::TABLE.union(M::ROWGRP).union(M::OPT)),
    &TagDescriptor::new("colgroup", M::TABLE.union(M::OPT)),
    &TagDescriptor::new("col", M::TABLE.union(M::EMPTY)),
    &TR,
    &TD,
    &TagDescriptor::new("th", M::ROW.union(M::OPT).union(M::NO_INDENT)),
    &A,
    &BR,
    &WBR,
    &TagDescriptor::new("img", M::INLINE.union(M::IMG).union(M::EMPTY)),
    &TagDescriptor::new("input", M::INLINE.union(M::IMG).union(M::EMPTY)),
    &TagDescriptor::new("embed", M::INLINE.union(M::IMG).union(M::EMPTY)),
    &TagDescriptor::new("basefont", M::INLINE.union(M::EMPTY)),
    &TagDescriptor::new(
        "object",
        M::OBJECT.union(M::HEAD).union(M::IMG).union(M::INLINE).union(M::PARAM),
    ),
    &TagDescriptor::new(
        "applet",
        M::OBJECT.union(M::IMG).union(M::INLINE).union(M::PARAM),
    ),
    &PARAM,
    &MAP,
    &AREA,
    &TagDescriptor::new("select", M::INLINE.union(M::FIELD)),
    &TagDescriptor::new("option", M::FIELD.union(M::OPT)),
    &TagDescriptor::new("optgroup", M::FIELD.union(M::OPT)),
    &TagDescriptor::new("textarea", M::INLINE.union(M::FIELD)),
    &LABEL,
    &BUTTON,
    &FONT,
    &NOBR,
    &SUP,
    &SUB,
    &SMALL,
    &STRONG,
    &I,
    &S,
    &STRIKE,
    &B,
    &CITE,
    &CODE,
    &SPAN,
    &TagDescriptor::new("abbr", M::INLINE),
    &TagDescriptor::new("acronym", M::INLINE),
    &TagDescriptor::new("bdo", M::INLINE),
    &TagDescriptor::new("big", M::INLINE),
    &TagDescriptor::new("blink", M::INLINE),
    &TagDescriptor::new("dfn", M::INLINE),
    &TagDescriptor::new("em", M::INLINE),
    &TagDescriptor::new("kbd", M::INLINE),
    &TagDescriptor::new("q", M::INLINE),
    &TagDescriptor::new("samp", M::INLINE),
    &TagDescriptor::new("tt", M::INLINE),
    &TagDescriptor::new("u", M::INLINE),
    &TagDescriptor::new("var", M::INLINE),
    &TagDescriptor::new("ins", M::INLINE.union(M::BLOCK).union(M::MIXED)),
    &TagDescriptor::new("del", M::INLINE.union(M::BLOCK).union(M::MIXED)),
    &TagDescriptor::new("article", M::BLOCK),
    &TagDescriptor::new("aside", M::BLOCK),
    &TagDescriptor::new("header", M::BLOCK),
    &TagDescriptor::new("footer", M::BLOCK),
    &TagDescriptor::new("nav", M::BLOCK),
    &TagDescriptor::new("section", M::BLOCK),
    &TagDescriptor::new("main", M::BLOCK),
    &TagDescriptor::new("figure", M::BLOCK),
    &FIGCAPTION,
    &TagDescriptor::new("details", M::BLOCK),
    &TagDescriptor::new("summary", M::BLOCK),
    &TagDescriptor::new("dialog", M::BLOCK),
    &TagDescriptor::new("audio", M::INLINE),
    &TagDescriptor::new("video", M::INLINE),
    &TagDescriptor::new("canvas", M::INLINE),
    &TagDescriptor::new("mark", M::INLINE),
    &TagDescriptor::new("time", M::INLINE),
    &TagDescriptor::new("output", M::INLINE),
    &TagDescriptor::new("meter", M::INLINE),
    &TagDescriptor::new("progress", M::INLINE),
    &TagDescriptor::new("source", M::BLOCK.union(M::EMPTY)),
    &TagDescriptor::new("track", M::BLOCK.union(M::EMPTY)),
];

fn table() -> &'static HashMap<&'static str, &'static TagDescriptor> {
    static TABLE: OnceLock<HashMap<&'static str, &'static TagDescriptor>> = OnceLock::new();
    TABLE.get_or_init(|| TAGS.iter().map(|&desc| (desc.name, desc)).collect())
}

/// Resolve an element name (ASCII case-insensitive).
pub fn lookup(name: &str) -> Option<&'static TagDescriptor> {
    if let Some(&desc) = table().get(name) {
        return Some(desc);
    }
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        return table().get(name.to_ascii_lowercase().as_str()).copied();
    }
    None
}

/// Resolve an element name, falling back to the generic descriptor.
pub fn lookup_or_generic(name: &str) -> &'static TagDescriptor {
    lookup(name).unwrap_or(&XML_TAGS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_identity() {
        assert!(lookup("br").unwrap().is(&BR));
        assert!(lookup("BR").unwrap().is(&BR));
        assert!(!lookup("hr").unwrap().is(&BR));
        assert!(lookup("blorp").is_none());
        assert!(lookup_or_generic("blorp").is(&XML_TAGS));
    }

    #[test]
    fn test_models() {
        assert!(BR.has(M::EMPTY) && BR.has(M::INLINE));
        assert!(H2.has(M::HEADING));
        assert!(BODY.has(M::OMITST));
        assert_eq!(PRE.parser, ParserKind::Pre);
        assert_eq!(lookup("xmp").unwrap().parser, ParserKind::Pre);
        assert_eq!(STYLE.parser, ParserKind::Script);
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(table().len(), TAGS.len());
    }
}
