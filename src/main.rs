use clap::Parser;
use tracing_subscriber::EnvFilter;

use mc_forecast::{api, cli, config, forecast, schema};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mc_forecast=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Forecast(args) => forecast::run(&args),
        cli::Command::Serve(args) => {
            let config = config::ServerConfig::from_cli(&args)?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(api::serve(config))
        }
        cli::Command::Schema => schema::run(),
    }
}
