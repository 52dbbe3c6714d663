use clap::Parser;
use tracing::Level;
use weather_etl::cli::{run, Cli};
use weather_etl::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    run(cli)
}
