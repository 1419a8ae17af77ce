//! Main entry point for the tzgen CLI application.
//!
//! A plain `tzgen` downloads the dataset and rewrites `src/tz_data.rs`;
//! flags exist only to override those defaults.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use tzgen::{Cli, Rustfmt, SystemTzdb};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;

    let config = cli.config();
    let formatter = Rustfmt::new().with_edition(&cli.edition);
    let summary = match tzgen::run(&config, &SystemTzdb::new(), &formatter).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    info!(
        countries = summary.countries,
        zones = summary.zones,
        rejected = summary.rejected,
        orphaned = summary.orphaned,
        formatted = summary.formatted,
        output = %summary.output.display(),
        "done"
    );

    Ok(())
}
