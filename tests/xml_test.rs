//! Generic XML documents through the XML tree walk.

use kempt::{Error, PrintConfig, dom, render};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

const CATALOG_EXPECTED: &str = "\
<?xml version=\"1.0\" encoding=\"UTF-8\"?>
<!DOCTYPE catalog>
<catalog>
<!-- spring list -->
  <book id=\"b1\" lang=\"en\">
    <title>Rust &amp; Ferris</title>
    <price currency=\"EUR\">12.50</price>
  </book>
  <book id=\"b2\">
    <title>Caf\u{e9} notes</title>
    <note xml:space=\"preserve\">keep
   this   spacing</note>
    <empty />
  </book>
</catalog>
";

fn catalog() -> String {
    std::fs::read_to_string(format!("{}/catalog.xml", FIXTURES_DIR)).expect("Failed to read fixture")
}

#[test]
fn test_catalog_layout() {
    let mut doc = dom::parse_xml(&catalog()).unwrap();
    let out = render(&mut doc, &PrintConfig::default().xml()).unwrap();
    assert_eq!(out, CATALOG_EXPECTED);
}

#[test]
fn test_catalog_rerender_is_stable() {
    let config = PrintConfig::default().xml();
    let mut doc = dom::parse_xml(&catalog()).unwrap();
    let first = render(&mut doc, &config).unwrap();
    let mut again = dom::parse_xml(&first).unwrap();
    assert_eq!(render(&mut again, &config).unwrap(), first);
}

#[test]
fn test_wider_indent() {
    let config = PrintConfig {
        spaces: 4,
        ..PrintConfig::default().xml()
    };
    let mut doc = dom::parse_xml(&catalog()).unwrap();
    let out = render(&mut doc, &config).unwrap();
    assert!(out.contains("\n    <book id=\"b1\" lang=\"en\">\n        <title>"), "{out}");
}

#[test]
fn test_ascii_output_is_numeric() {
    let config = PrintConfig::default()
        .xml()
        .with_encoding(kempt::Charset::Ascii);
    let mut doc = dom::parse_xml(&catalog()).unwrap();
    let out = render(&mut doc, &config).unwrap();
    assert!(out.contains("<title>Caf&#233; notes</title>"), "{out}");
}

#[test]
fn test_invalid_xml() {
    let err = dom::parse_xml("<a><b></a>").unwrap_err();
    assert!(matches!(err, Error::InvalidXml(_) | Error::Xml(_)));
}
