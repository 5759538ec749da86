//! kempt - HTML/XML pretty-printer

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kempt::util::{decode_text, sniff_encoding};
use kempt::{Charset, EncodingSink, Error, PrintConfig, Printer, dom, print};

#[derive(Parser)]
#[command(name = "kempt")]
#[command(version, about = "HTML/XML pretty-printer", long_about = None)]
#[command(after_help = "EXAMPLES:
    kempt page.html                    Print page.html to stdout
    kempt --indent page.html out.html  Indent block content
    kempt --xml --wrap 0 feed.xml      Reformat XML without wrapping
    kempt --slides talk.html           Write slide001.html, slide002.html, ...")]
struct Cli {
    /// Input file (HTML, or XML with --xml)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// TOML file with printer options; flags override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Treat the input as generic XML
    #[arg(long)]
    xml: bool,

    /// Write XHTML
    #[arg(long, conflicts_with = "xml")]
    xhtml: bool,

    /// Wrap width in columns (0 disables wrapping)
    #[arg(short, long, value_name = "N")]
    wrap: Option<usize>,

    /// Indent block content
    #[arg(short, long)]
    indent: bool,

    /// Indent only where content is not plain text
    #[arg(long)]
    smart_indent: bool,

    /// Columns per indentation level
    #[arg(long, value_name = "N")]
    indent_spaces: Option<usize>,

    /// Put each attribute on its own line
    #[arg(long)]
    indent_attributes: bool,

    /// Output character encoding (utf-8, latin1, ascii, win1252, big5, ...)
    #[arg(short, long, value_name = "NAME")]
    encoding: Option<Charset>,

    /// Write numeric instead of named entities
    #[arg(long)]
    numeric_entities: bool,

    /// Escape quote marks in text
    #[arg(long)]
    quote_marks: bool,

    /// Write tag names in upper case
    #[arg(long)]
    upper_case_tags: bool,

    /// Drop comments
    #[arg(long)]
    hide_comments: bool,

    /// Drop presentational wrappers such as <font>
    #[arg(long)]
    clean: bool,

    /// Replace typographic quotes and dashes with ASCII
    #[arg(long)]
    bare: bool,

    /// Print only the content of <body>
    #[arg(long, conflicts_with = "slides")]
    body_only: bool,

    /// Split the document into one file per <h2>
    #[arg(long)]
    slides: bool,

    /// Directory for slide files
    #[arg(long, value_name = "DIR", requires = "slides")]
    slide_dir: Option<PathBuf>,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Options from the config file, overridden by command-line flags.
    fn print_config(&self) -> Result<PrintConfig, Error> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => PrintConfig::default(),
        };

        if self.xml {
            config = config.xml();
        }
        if self.xhtml {
            config = config.xhtml();
        }
        if let Some(wrap) = self.wrap {
            config.wrap_len = wrap;
        }
        if self.indent {
            config.indent_content = true;
        }
        if self.smart_indent {
            config = config.with_smart_indent();
        }
        if let Some(spaces) = self.indent_spaces {
            config.spaces = spaces;
        }
        if let Some(encoding) = self.encoding {
            config.output_encoding = encoding;
        }
        if self.slide_dir.is_some() {
            config.slide_dir = self.slide_dir.clone();
        }
        config.indent_attributes |= self.indent_attributes;
        config.num_entities |= self.numeric_entities;
        config.quote_marks |= self.quote_marks;
        config.upper_case_tags |= self.upper_case_tags;
        config.hide_comments |= self.hide_comments;
        config.make_clean |= self.clean;
        config.make_bare |= self.bare;
        config.burst_slides |= self.slides;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<PrintConfig, Error> {
    let text = fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}

fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let config = cli.print_config()?;

    let bytes = fs::read(&cli.input)?;
    let text = decode_text(&bytes, sniff_encoding(&bytes));
    let mut doc = if config.xml_tags {
        dom::parse_xml(&text)?
    } else {
        dom::parse_html(&text)
    };

    if config.burst_slides {
        let summary = Printer::new(&config).create_slides(&mut doc)?;
        info!(
            count = summary.count,
            written = summary.written,
            removed = summary.removed,
            "wrote slides"
        );
        if !cli.quiet {
            eprintln!("Wrote {} of {} slides", summary.written, summary.count);
        }
        return Ok(());
    }

    match &cli.output {
        Some(path) => {
            let file = File::create(path)?;
            write_document(&mut doc, &config, cli.body_only, BufWriter::new(file))
        }
        None => write_document(&mut doc, &config, cli.body_only, io::stdout().lock()),
    }
}

fn write_document<W: Write>(
    doc: &mut dom::Document,
    config: &PrintConfig,
    body_only: bool,
    writer: W,
) -> Result<(), Error> {
    let mut sink = EncodingSink::new(writer, config.output_encoding, config.newline);
    if body_only {
        print::prepare_document(doc, config);
        let mut printer = Printer::new(config);
        printer.print_body(&mut sink, doc)?;
        printer.cond_flush_line(&mut sink, 0)?;
    } else {
        kempt::render_to(doc, config, &mut sink)?;
    }
    sink.finish()?.flush()?;
    Ok(())
}
