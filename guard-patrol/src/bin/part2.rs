use std::path::PathBuf;

use clap::Parser;
use guard_patrol::map::Map;
use guard_patrol::part2::process;
use guard_patrol::search::{SearchConfig, Strategy};
use miette::{Context, IntoDiagnostic};
use tracing_subscriber::EnvFilter;

/// Counts the single obstacle placements that trap the guard in a loop.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Puzzle input
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = Strategy::Resume)]
    strategy: Strategy,

    /// Run trials one after another instead of on the thread pool
    #[arg(long)]
    sequential: bool,

    /// Print the map with every loop-inducing obstacle marked to stderr
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

    let config = SearchConfig {
        strategy: args.strategy,
        parallel: !args.sequential,
    };
    let (locations, result) = process(&file, config).context("process part 2")?;

    if args.dump {
        let mut map = Map::parse(&file)?;
        for location in &locations {
            map.place_obstacle(*location);
        }
        eprintln!("{map}");
    }
    println!("{}", result);
    Ok(())
}
