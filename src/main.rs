use chrono::Utc;
use clap::Parser;
use golf_results::args::{Args, View};
use golf_results::score::{finalize_competition, load_leaderboard};
use golf_results::storage::MemoryStore;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let snapshot = args.snapshot()?;
    let competition_id = snapshot.competition_id;
    let store = MemoryStore::with_competitions([snapshot]);

    let output: Value = match args.view {
        View::Results => {
            let summary =
                finalize_competition(&store, competition_id, Utc::now().naive_utc()).await?;
            serde_json::to_value(&summary.results)?
        }
        View::Leaderboard => serde_json::to_value(load_leaderboard(&store, competition_id).await?)?,
        View::Teams => {
            let leaderboard = load_leaderboard(&store, competition_id).await?;
            serde_json::to_value(&leaderboard.teams)?
        }
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}
