//! End-to-end HTML rendering through the public API.

use kempt::{
    Charset, EncodingSink, LineEnding, PrintConfig, Printer, StringSink, dom, render, render_to,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("{}/{}", FIXTURES_DIR, name)).expect("Failed to read fixture")
}

fn render_menu(config: &PrintConfig) -> String {
    let mut doc = dom::parse_html(&fixture("menu.html"));
    render(&mut doc, config).expect("render failed")
}

fn render_menu_bytes(config: &PrintConfig) -> Vec<u8> {
    let mut doc = dom::parse_html(&fixture("menu.html"));
    let mut sink = EncodingSink::new(Vec::new(), config.output_encoding, config.newline);
    render_to(&mut doc, config, &mut sink).expect("render failed");
    sink.finish().expect("flush failed")
}

#[test]
fn test_document_structure() {
    let out = render_menu(&PrintConfig::default());

    assert!(out.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n"), "{out}");
    assert!(out.contains("<title>Sample page</title>"));
    assert!(out.contains("<h1>Fish &amp; chips</h1>"));
    assert!(out.contains("<li>Cod</li>\n<li>Haddock</li>\n<li>Plaice</li>"));
    assert!(out.contains("<!-- prices include tax -->"));
    assert!(out.contains("Caf\u{e9} hours: 11\u{2013}22"));
    assert!(out.ends_with("</body>\n</html>\n"), "{out}");
}

#[test]
fn test_preformatted_kept() {
    let out = render_menu(&PrintConfig::default().with_indent(4));
    assert!(
        out.contains("<pre>\n  price   qty\n  4.50    2\n</pre>\n"),
        "{out}"
    );
}

#[test]
fn test_lines_fit_width() {
    for width in [30, 40, 68] {
        let out = render_menu(&PrintConfig::default().with_wrap(width));
        for line in out.lines() {
            assert!(
                line.chars().count() <= width,
                "line over {width} columns: {line:?}"
            );
        }
        assert!(out.contains("malt vinegar"));
    }
}

#[test]
fn test_no_wrap() {
    let out = render_menu(&PrintConfig::default().with_wrap(0));
    assert!(out.contains(
        "<p>Served with <em>malt vinegar</em> and a wedge of lemon, wrapped in paper so it stays warm on the walk home.</p>"
    ));
}

/// Leading spaces of the first line containing `needle`.
fn indent_of(out: &str, needle: &str) -> usize {
    let line = out
        .lines()
        .find(|l| l.contains(needle))
        .unwrap_or_else(|| panic!("{needle:?} not found in {out}"));
    line.len() - line.trim_start_matches(' ').len()
}

#[test]
fn test_indentation() {
    let out = render_menu(&PrintConfig::default().with_smart_indent());
    assert_eq!(indent_of(&out, "<li>Cod</li>"), indent_of(&out, "<ul>") + 2, "{out}");
    assert_eq!(indent_of(&out, "<title>"), indent_of(&out, "<head>") + 2, "{out}");
    assert_eq!(indent_of(&out, "<pre>"), indent_of(&out, "<ul>"));
    assert_eq!(indent_of(&out, "4.50"), 2);
}

#[test]
fn test_xhtml_output() {
    let out = render_menu(&PrintConfig::default().xhtml());
    assert!(out.contains("<meta charset=\"utf-8\" />"), "{out}");
    assert!(!out.contains("<meta charset=\"utf-8\">"));
}

#[test]
fn test_options() {
    let config = PrintConfig {
        hide_comments: true,
        upper_case_tags: true,
        ..PrintConfig::default()
    };
    let out = render_menu(&config);
    assert!(!out.contains("prices include tax"));
    assert!(out.contains("<TITLE>Sample page</TITLE>"));
    assert!(out.contains("<HTML lang=\"en\">"));
}

#[test]
fn test_crlf_line_endings() {
    let config = PrintConfig {
        newline: LineEnding::CrLf,
        ..PrintConfig::default()
    };
    let out = render_menu(&config);
    assert!(out.contains("\r\n"));
    assert!(!out.replace("\r\n", "").contains('\n'));
}

#[test]
fn test_ascii_output_uses_entities() {
    let config = PrintConfig::default().with_encoding(Charset::Ascii);
    let bytes = render_menu_bytes(&config);
    assert!(bytes.is_ascii());
    let out = String::from_utf8(bytes).unwrap();
    assert!(out.contains("Caf&eacute; hours: 11&ndash;22"), "{out}");
}

#[test]
fn test_numeric_entities() {
    let config = PrintConfig {
        num_entities: true,
        ..PrintConfig::default().with_encoding(Charset::Ascii)
    };
    let out = String::from_utf8(render_menu_bytes(&config)).unwrap();
    assert!(out.contains("Caf&#233; hours: 11&#8211;22"), "{out}");
}

#[test]
fn test_latin1_output() {
    let config = PrintConfig::default().with_encoding(Charset::Latin1);
    let bytes = render_menu_bytes(&config);
    let needle = b"Caf\xe9 hours: 11&ndash;22";
    assert!(bytes.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn test_body_only() {
    let doc = dom::parse_html(&fixture("menu.html"));
    let config = PrintConfig::default();
    let mut printer = Printer::new(&config);
    let mut out = StringSink::new(LineEnding::Lf);
    printer.print_body(&mut out, &doc).unwrap();
    printer.cond_flush_line(&mut out, 0).unwrap();
    let out = out.into_string();
    assert!(out.starts_with("<h1>Fish &amp; chips</h1>\n"), "{out}");
    assert!(!out.contains("<body>"));
    assert!(!out.contains("<title>"));
}

#[test]
fn test_rerender_is_stable() {
    let config = PrintConfig::default().with_wrap(0);
    let mut doc = dom::parse_html("<p>one <b>two</b> three</p><p>x &lt; y</p>");
    let first = render(&mut doc, &config).unwrap();
    let mut again = dom::parse_html(&first);
    assert_eq!(render(&mut again, &config).unwrap(), first);
}
