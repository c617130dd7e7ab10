//! Parse product titles from a file (or stdin), one title per line.
//!
//! Usage:
//!   parse_titles [TITLES_FILE] [--harvest OUTPUT_DIR]
//!
//! Without `--harvest`, prints one JSON object per title with both the
//! current and the legacy field names plus the formatted display name.
//! With `--harvest`, writes `common_names.csv` and `cultivars.csv` built from
//! the parsed titles into OUTPUT_DIR instead.
//!
//! The parser data directory is taken from SEED_PARSER_DATA_DIR when set.

use anyhow::{bail, Context, Result};
use seed_title_parser::{SeedTitleParser, VocabularyHarvest};
use serde_json::json;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Args {
    input: Option<PathBuf>,
    harvest_dir: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut input = None;
    let mut harvest_dir = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--harvest" => {
                let dir = args.next().context("--harvest needs an output directory")?;
                harvest_dir = Some(PathBuf::from(dir));
            }
            "-h" | "--help" => {
                eprintln!("Usage: parse_titles [TITLES_FILE] [--harvest OUTPUT_DIR]");
                std::process::exit(0);
            }
            other if other.starts_with("--") => bail!("Unknown option: {}", other),
            other => {
                if input.is_some() {
                    bail!("Only one titles file may be given");
                }
                input = Some(PathBuf::from(other));
            }
        }
    }

    Ok(Args { input, harvest_dir })
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the JSON lines
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_title_parser=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = parse_args()?;

    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read titles from {:?}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read titles from stdin")?;
            buf
        }
    };
    let titles: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    let parser = SeedTitleParser::from_env();
    let results = parser.parse_many(&titles);
    tracing::info!("Parsed {} titles", results.len());

    if let Some(dir) = &args.harvest_dir {
        let mut harvest = VocabularyHarvest::new();
        let accepted = results.iter().filter(|r| harvest.add_result(r)).count();
        harvest
            .write_csvs(dir)
            .with_context(|| format!("Failed to write harvest into {:?}", dir))?;
        tracing::info!("Harvested {} of {} titles into {:?}", accepted, results.len(), dir);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (title, result) in titles.iter().zip(results) {
        let formatted = result.formatted();
        let record = seed_title_parser::LegacyRecord::new(result);
        let line = json!({
            "title": title,
            "record": record,
            "formatted": formatted,
        });
        writeln!(out, "{}", line)?;
    }
    out.flush()?;

    Ok(())
}
