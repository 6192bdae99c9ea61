//! Command line front end for the CAMELS rating engine

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use camels_rating::extraction::{JsonFileExtractor, StatementExtractor};
use camels_rating::loader::{load_record_json, load_records, load_scheme};
use camels_rating::report::write_ratings_csv;
use camels_rating::{analyze, analyze_batch, RatingScheme};

#[derive(Parser, Debug)]
#[command(name = "camels", version, about = "CAMELS ratios and ratings for bank statements")]
struct Cli {
    /// Rating scheme JSON (defaults to the canonical camels-v1 scheme)
    #[arg(short = 's', long = "scheme", global = true)]
    scheme: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rate a single statement given as JSON figures
    Analyze {
        /// Current-period statement
        input: PathBuf,

        /// Prior-period statement of the same bank
        #[arg(short = 'p', long = "previous")]
        previous: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Rate every statement in a CSV file
    Batch {
        /// CSV with one row per bank-period
        input: PathBuf,

        /// Output CSV (defaults to stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Rate a saved extraction model reply
    Extract {
        /// File holding the model's JSON reply
        input: PathBuf,

        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Print the active rating scheme as JSON
    Scheme,
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(
            File::create(p).with_context(|| format!("creating {}", p.display()))?,
        ),
        None => Box::new(io::stdout()),
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let scheme = match &cli.scheme {
        Some(path) => load_scheme(path).with_context(|| format!("loading scheme {}", path.display()))?,
        None => RatingScheme::default(),
    };

    match cli.command {
        Command::Analyze { input, previous, output } => {
            let current = load_record_json(&input)
                .with_context(|| format!("reading statement {}", input.display()))?;
            let previous = previous
                .map(|p| load_record_json(&p).with_context(|| format!("reading statement {}", p.display())))
                .transpose()?;

            let analysis = analyze(current, previous.as_ref(), &scheme);

            let mut out = open_output(output.as_deref())?;
            serde_json::to_writer_pretty(&mut out, &analysis)?;
            writeln!(out)?;
        }

        Command::Batch { input, output } => {
            let start = Instant::now();
            let records = load_records(&input)
                .with_context(|| format!("reading statements {}", input.display()))?;

            let analyses = analyze_batch(&records, &scheme);
            info!("Rated {} statements in {:?}", analyses.len(), start.elapsed());

            let out = open_output(output.as_deref())?;
            write_ratings_csv(out, &analyses)?;
        }

        Command::Extract { input, output } => {
            let extracted = JsonFileExtractor
                .extract(&input)
                .with_context(|| format!("parsing extraction reply {}", input.display()))?;
            let record = extracted.into_record(Some(input.display().to_string()));

            let analysis = analyze(record, None, &scheme);

            let mut out = open_output(output.as_deref())?;
            serde_json::to_writer_pretty(&mut out, &analysis)?;
            writeln!(out)?;
        }

        Command::Scheme => {
            let mut out = io::stdout();
            serde_json::to_writer_pretty(&mut out, &scheme)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
