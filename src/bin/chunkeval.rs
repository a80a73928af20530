//! chunkeval - bracketing evaluation CLI.
//!
//! Compares predicted chunkings/bracketings against gold standards and
//! renders the evaluation reports.
//!
//! # Usage
//!
//! ```bash
//! # Text summary on stdout
//! chunkeval compare gold.txt output.txt
//!
//! # With POS breakdowns and a CSV summary
//! chunkeval compare gold.txt output.txt --pos corpus.pos --csv results.csv
//!
//! # Per-span detail CSV with error classification
//! chunkeval detail gold.txt output.txt --out detail.csv
//!
//! # Echo a chunked file through the bracket structure (round-trip check)
//! chunkeval render output.txt
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use chunkeval::corpus::{self, DEFAULT_STOP_SYMBOL};
use chunkeval::eval::{
    compare_corpora, detail_rows, render_csv, render_detail_csv, render_summary, ReportOptions,
};
use chunkeval::Result;

#[derive(Parser)]
#[command(name = "chunkeval")]
#[command(
    author,
    version,
    about = "Bracketing evaluation for chunking and partial parsing",
    long_about = "\
Compares predicted chunkings/bracketings against gold standards.

Inputs are chunked text files: whitespace-tokenized sentences, one per
line, with '(' and ')' marker tokens delimiting spans and '##' comment
lines. POS files carry one tag sequence per line, aligned with the text
after stripping the stop symbol."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a predicted chunking against a gold standard
    Compare(CompareArgs),
    /// Write the per-span detail CSV with error classification
    Detail(DetailArgs),
    /// Parse a chunked file and echo its bracketed rendering
    Render {
        /// Chunked file to render
        file: PathBuf,
    },
}

#[derive(Args)]
struct CompareArgs {
    /// Gold-standard chunked file
    gold: PathBuf,
    /// Predicted chunked file
    pred: PathBuf,
    /// Token-aligned POS file enabling the POS breakdowns
    #[arg(long)]
    pos: Option<PathBuf>,
    /// Stop symbol stripped from POS lines
    #[arg(long, default_value = DEFAULT_STOP_SYMBOL)]
    stop_sym: String,
    /// POS sequences shown per category
    #[arg(long, default_value_t = 10)]
    top_n: usize,
    /// Write the CSV summary to this file
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Emit the raw results as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct DetailArgs {
    /// Gold-standard chunked file
    gold: PathBuf,
    /// Predicted chunked file
    pred: PathBuf,
    /// Output CSV file
    #[arg(long)]
    out: PathBuf,
    /// Token-aligned POS file for the PosSeq column
    #[arg(long)]
    pos: Option<PathBuf>,
    /// Stop symbol stripped from POS lines
    #[arg(long, default_value = DEFAULT_STOP_SYMBOL)]
    stop_sym: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compare(args) => run_compare(args),
        Commands::Detail(args) => run_detail(args),
        Commands::Render { file } => run_render(&file),
    }
}

fn read_pos(path: Option<&PathBuf>, stop_sym: &str) -> Result<Option<Vec<Vec<String>>>> {
    match path {
        Some(path) => Ok(Some(corpus::read_pos_file(path, stop_sym)?)),
        None => Ok(None),
    }
}

fn run_compare(args: CompareArgs) -> Result<()> {
    let gold = corpus::read_chunked_file(&args.gold)?;
    let pred = corpus::read_chunked_file(&args.pred)?;
    let pos = read_pos(args.pos.as_ref(), &args.stop_sym)?;

    // experiment descriptions travel as comments in the predicted file
    for comment in corpus::file_comments(&args.pred)? {
        println!("{comment}");
    }

    let results = compare_corpora(&gold, &pred, pos.as_deref())?;
    let options = ReportOptions { top_pos: args.top_n };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", render_summary(&results, &options));
    }
    if let Some(path) = &args.csv {
        fs::write(path, render_csv(&results, &options))?;
    }
    Ok(())
}

fn run_detail(args: DetailArgs) -> Result<()> {
    let gold = corpus::read_chunked_file(&args.gold)?;
    let pred = corpus::read_chunked_file(&args.pred)?;
    let pos = read_pos(args.pos.as_ref(), &args.stop_sym)?;

    let rows = detail_rows(&gold, &pred, pos.as_deref())?;
    fs::write(&args.out, render_detail_csv(&rows, None))?;
    log::info!("wrote {} detail rows to {}", rows.len(), args.out.display());
    Ok(())
}

fn run_render(file: &PathBuf) -> Result<()> {
    for sentence in corpus::read_chunked_file(file)? {
        println!("{}", sentence.bracket_set()?);
    }
    Ok(())
}
