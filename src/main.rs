//! prunebib command-line interface

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prunebib::{Bibliography, CitationSet, Writer};

#[derive(Parser)]
#[command(name = "prunebib")]
#[command(version)]
#[command(about = "Prune a BibTeX file down to the entries cited in LaTeX documents")]
struct Cli {
    /// BibTeX bibliography to prune
    bibliography: PathBuf,

    /// LaTeX document(s) to scan for citations
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// Write the pruned bibliography to FILE instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prunebib=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    // read and parse everything before opening the destination, so a
    // failing input never leaves a partial output file behind
    let cited = CitationSet::from_files(&cli.documents)?;
    tracing::info!(
        documents = cli.documents.len(),
        keys = cited.len(),
        wildcard = cited.cites_everything(),
        "collected citation keys"
    );

    let source = fs::read_to_string(&cli.bibliography).with_context(|| {
        format!(
            "cannot read bibliography '{}'",
            cli.bibliography.display()
        )
    })?;
    let bibliography = Bibliography::parse(&source)?;
    let total = bibliography.len();

    let pruned = bibliography.retain_cited(&cited);
    tracing::info!(total, retained = pruned.len(), "pruned bibliography");

    match &cli.output {
        Some(path) => prunebib::to_file(&pruned, path)
            .with_context(|| format!("cannot write '{}'", path.display()))?,
        None => {
            let mut writer = Writer::new(io::stdout().lock());
            writer
                .write_bibliography(&pruned)
                .context("cannot write to standard output")?;
        }
    }

    Ok(())
}
