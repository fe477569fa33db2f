//! Content-MD5 digest converter entrypoint.

mod convert;
mod digest;
mod error;
mod extract;
mod reader;
mod transcript;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, IsTerminal, Write};

use crate::convert::convert;
use crate::reader::{read_bounded, DEFAULT_MAX_BYTES};
use crate::transcript::Transcript;

/// Output layout written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

/// CLI arguments for the converter. Input is always read from stdin.
#[derive(Parser, Debug)]
#[command(
    name = "md5conv",
    version,
    about = "Convert a digest between hex and Content-MD5 base64",
    long_about = "Reads a bare digest or an HTTP response from stdin, extracts the \
                  digest (from the Content-MD5 header for responses), and prints \
                  both its hex and base64 forms."
)]
struct Args {
    /// Maximum number of input bytes to read
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_MAX_BYTES as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    max_bytes: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print a transcript of input handling to stderr
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    run(args)
}

/// Read stdin, convert the digest, and print both encodings.
fn run(args: Args) -> Result<()> {
    let mut transcript = Transcript::stderr(args.verbose);

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("warning: reading digest from terminal; end input with Ctrl-D");
    }
    let max_bytes =
        usize::try_from(args.max_bytes).context("--max-bytes exceeds address space")?;
    let capture = read_bounded(stdin.lock(), max_bytes).context("read stdin")?;
    transcript.capture(&capture);

    let conversion = convert(&capture, &mut transcript)?;
    let rendered = match args.format {
        OutputFormat::Text => conversion.render_text(),
        OutputFormat::Json => conversion.render_json()?,
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("write stdout")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}
