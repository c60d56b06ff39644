use sokoban_search::config::{Cli, Config};
use sokoban_search::experiment::{write_csv, Experiment};

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        Config::from_file(config_file)?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;
    debug!("Effective config:\n{}", serde_yaml::to_string(&config)?);

    let experiment = Experiment::from_config(&config);
    info!("Running {} searches", experiment.runs().len());
    let records = experiment.run()?;

    write_csv(&config.output_path, &records)?;
    info!("Results written to {}", config.output_path);

    Ok(())
}
