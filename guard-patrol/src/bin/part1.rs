use std::path::PathBuf;

use clap::Parser;
use guard_patrol::map::Map;
use guard_patrol::part1::walk;
use miette::{Context, IntoDiagnostic};
use tracing_subscriber::EnvFilter;

/// Counts the tiles the guard visits before leaving the map.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Puzzle input
    input: PathBuf,

    /// Print the walked map to stderr
    #[arg(long)]
    dump: bool,
}

#[tracing::instrument]
fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let file = std::fs::read_to_string(&args.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", args.input.display()))?;

    let map = Map::parse(&file)?;
    let patrol = walk(&map).context("walk guard")?;
    if args.dump {
        eprintln!("{patrol}");
    }
    println!("{}", patrol.visited_count());
    Ok(())
}
