//! # kempt
//!
//! A pretty-printer for HTML and XML document trees.
//!
//! ## Features
//!
//! - Line wrapping at a configurable width, with language-aware limits
//! - Indentation driven by each element's content model, or by the shape of
//!   the tree for generic XML
//! - Charset-aware escaping: named or numeric entities for characters the
//!   output encoding cannot represent
//! - XHTML output, case folding, optional end-tag omission and cleanup
//! - Splitting a document into linked slides at each `<h2>`
//!
//! ## Quick Start
//!
//! ```
//! use kempt::{PrintConfig, dom, render};
//!
//! let mut doc = dom::parse_html("<ul><li>one<li>two</ul>");
//! let config = PrintConfig::default().with_smart_indent();
//! let html = render(&mut doc, &config).unwrap();
//! assert!(html.contains("<li>one</li>"));
//! ```
//!
//! ## Writing to a file
//!
//! [`EncodingSink`] encodes each finished line in the configured charset:
//!
//! ```no_run
//! use std::fs::File;
//! use kempt::{Charset, EncodingSink, PrintConfig, dom, render_to};
//!
//! let mut doc = dom::parse_xml("<doc><item>caf\u{e9}</item></doc>").unwrap();
//! let config = PrintConfig::default().xml().with_encoding(Charset::Latin1);
//! let mut sink = EncodingSink::new(File::create("out.xml").unwrap(), config.output_encoding, config.newline);
//! render_to(&mut doc, &config, &mut sink).unwrap();
//! sink.finish().unwrap();
//! ```

pub mod charset;
pub mod config;
pub mod dom;
pub mod entities;
pub mod error;
pub mod print;
pub mod sink;
pub mod util;

pub use charset::Charset;
pub use config::{LineEnding, PrintConfig};
pub use error::{Error, Result};
pub use print::{Mode, Printer, SlideSummary, render, render_to};
pub use sink::{EncodingSink, OutputSink, StringSink};
