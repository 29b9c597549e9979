use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use paddock::{scenario::ScenarioLoader, snapshot::FarmSnapshot};

#[derive(Debug, Parser)]
#[command(author, version, about = "Pasture scenario runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/homestead.yaml")]
    scenario: PathBuf,

    /// Log filter (overrides RUST_LOG and the scenario's logging level)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the event log after the snapshot
    #[arg(long)]
    events: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;

    let filter = match cli.log_level.as_deref() {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&scenario.config.logging.level))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut farm = scenario.build_farm()?;
    let snapshot = FarmSnapshot::capture(&scenario.name, &farm);
    println!("{}", snapshot.to_json()?);

    if cli.events {
        for event in farm.drain_events() {
            println!("{}", serde_json::to_string(&event)?);
        }
    }
    Ok(())
}
