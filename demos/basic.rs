//! Prune a bibliography against a LaTeX document and print the result

use prunebib::{Bibliography, CitationSet, Writer};
use std::env;
use std::fs;
use std::io;

fn main() -> prunebib::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <bibtex-file> <latex-file>", args[0]);
        std::process::exit(1);
    }

    let library = fs::read_to_string(&args[1])?;
    let bibliography = Bibliography::parse(&library)?;

    let cited = CitationSet::from_files([&args[2]])?;

    eprintln!(
        "{} of {} entries cited",
        bibliography
            .keys()
            .filter(|key| cited.contains(key))
            .count(),
        bibliography.len()
    );

    let pruned = bibliography.retain_cited(&cited);
    let mut writer = Writer::new(io::stdout().lock());
    writer.write_bibliography(&pruned)?;

    Ok(())
}
