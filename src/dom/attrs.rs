//! Attribute name classification.

use bitflags::bitflags;

bitflags! {
    /// How the printer treats an attribute, resolved from its name.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrClass: u8 {
        /// Event handler whose value is script.
        const SCRIPT      = 1 << 0;
        /// Value must never be broken across lines (URLs).
        const NOWRAP      = 1 << 1;
        /// Presence alone carries the meaning.
        const BOOLEAN     = 1 << 2;
        /// Vendor extension outside the HTML recommendations.
        const PROPRIETARY = 1 << 3;
    }
}

const URL_VALUED: &[&str] = &[
    "action",
    "archive",
    "background",
    "cite",
    "classid",
    "codebase",
    "data",
    "dynsrc",
    "href",
    "longdesc",
    "lowsrc",
    "profile",
    "src",
    "usemap",
];

const BOOLEAN: &[&str] = &[
    "allowfullscreen",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "compact",
    "controls",
    "declare",
    "default",
    "defer",
    "disabled",
    "formnovalidate",
    "hidden",
    "ismap",
    "itemscope",
    "loop",
    "multiple",
    "muted",
    "nohref",
    "noresize",
    "noshade",
    "novalidate",
    "nowrap",
    "open",
    "readonly",
    "required",
    "reversed",
    "selected",
];

const PROPRIETARY: &[&str] = &[
    "bgproperties",
    "bordercolor",
    "bordercolordark",
    "bordercolorlight",
    "dynsrc",
    "leftmargin",
    "lowsrc",
    "marginheight",
    "marginwidth",
    "rightmargin",
    "topmargin",
];

/// Classify an attribute by name (ASCII case-insensitive).
pub fn classify(name: &str) -> AttrClass {
    let name = name.to_ascii_lowercase();
    let mut class = AttrClass::empty();
    if name.len() > 2 && name.starts_with("on") {
        class |= AttrClass::SCRIPT;
    }
    if URL_VALUED.contains(&name.as_str()) {
        class |= AttrClass::NOWRAP;
    }
    if BOOLEAN.contains(&name.as_str()) {
        class |= AttrClass::BOOLEAN;
    }
    if PROPRIETARY.contains(&name.as_str()) {
        class |= AttrClass::PROPRIETARY;
    }
    class
}
