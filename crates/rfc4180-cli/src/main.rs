use std::fs::{self, File};
use std::io::{BufWriter, IsTerminal, Read, Write, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rfc4180::json::{record_to_json, row_to_json};
use rfc4180::{BomStrip, ByteSource, IoSource, Options, Reader, RecordStream, Transcode};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "rfc4180-cli",
    about = "Convert RFC4180 CSV to JSON lines",
    version
)]
struct Args {
    /// Field delimiter (`\t` or `tab` for a tab)
    #[arg(long, value_parser = parse_char)]
    comma: Option<char>,

    /// Quote character
    #[arg(long, value_parser = parse_char)]
    quote: Option<char>,

    /// Skip lines starting with this character
    #[arg(long, value_parser = parse_char)]
    comment: Option<char>,

    /// Accept bare and unescaped quotes
    #[arg(long)]
    lazy_quotes: bool,

    /// Keep leading spaces in fields
    #[arg(long)]
    no_trim: bool,

    /// Required fields per record (default: taken from the first record)
    #[arg(long)]
    fields: Option<usize>,

    /// Fail on the first record with the wrong number of fields
    #[arg(long)]
    strict: bool,

    /// Emit objects keyed by the first record instead of arrays
    #[arg(long)]
    headers: bool,

    /// Source encoding label, e.g. windows-1252 (default: UTF-8)
    #[arg(long)]
    encoding: Option<String>,

    /// JSON file with reader options; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pretty-print each JSON value
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Exit with an error if any record was skipped
    #[arg(long)]
    fail_on_skipped: bool,

    /// Input file (defaults to stdin)
    input: Option<PathBuf>,
}

fn parse_char(s: &str) -> Result<char, String> {
    match s {
        "\\t" | "tab" => return Ok('\t'),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected a single character, got {s:?}")),
    }
}

fn options(args: &Args) -> Result<Options> {
    let mut opts = match &args.config {
        Some(path) => {
            let s = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Options::default(),
    };
    if let Some(c) = args.comma {
        opts.comma = c;
    }
    if let Some(q) = args.quote {
        opts.quote = q;
    }
    if args.comment.is_some() {
        opts.comment = args.comment;
    }
    if args.lazy_quotes {
        opts.lazy_quotes = true;
    }
    if args.no_trim {
        opts.trim_leading_space = false;
    }
    if let Some(n) = args.fields {
        opts.expected_fields = n;
    }
    if args.strict {
        opts.strict = true;
    }
    Ok(opts)
}

fn emit(out: &mut impl Write, value: &serde_json::Value, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

/// Writes every good record and returns (written, skipped, lines read).
fn run<S: ByteSource>(
    reader: Reader<S>,
    args: &Args,
    out: &mut impl Write,
) -> Result<(usize, usize, usize)> {
    let stream = RecordStream::new(reader);
    let mut written = 0usize;
    if args.headers {
        let mut rows = stream.with_headers();
        for row in rows.by_ref() {
            emit(out, &row_to_json(&row?), args.pretty)?;
            written += 1;
        }
        Ok((written, rows.errors().len(), rows.reader().line()))
    } else {
        let mut records = stream;
        for record in records.by_ref() {
            emit(out, &record_to_json(&record?), args.pretty)?;
            written += 1;
        }
        Ok((written, records.errors().len(), records.reader().line()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let args = Args::parse();
    let options = options(&args)?;

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        ),
        None => Box::new(stdin()),
    };
    let mut source: Box<dyn ByteSource> = Box::new(BomStrip::new(IoSource::new(input)));
    if let Some(label) = &args.encoding {
        source = Box::new(Transcode::new(source, label)?);
    }
    let reader = Reader::new(source, options)?;

    let stdout = stdout();
    let mut out = BufWriter::new(stdout.lock());
    let (written, skipped, lines) = run(reader, &args, &mut out)?;
    out.flush()?;

    info!(records = written, skipped, lines, "finished");
    if skipped > 0 {
        warn!(skipped, "records with the wrong number of fields were skipped");
        if args.fail_on_skipped {
            bail!("{skipped} record(s) skipped");
        }
    }
    Ok(())
}
