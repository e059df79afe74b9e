use clap::Parser;
use commands::Cli;
use tracing_subscriber::EnvFilter;

mod commands;

fn main() -> anyhow::Result<()> {
    // .env next to the build may carry JANITOR_* settings
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    commands::run(cli)
}
