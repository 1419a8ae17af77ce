use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use crate::format::{DEFAULT_EDITION, FormatPolicy};
use crate::io::DEFAULT_DATASET_URL;
use crate::pipeline::{Config, DEFAULT_OUTPUT, Source};

#[derive(Parser, Debug)]
#[command(name = "tzgen")]
#[command(version)]
#[command(about = "Generate the static country/time zone dataset", long_about = None)]
#[command(after_help = "Examples:\n  \
  tzgen                                   download TimeZoneDB and write src/tz_data.rs\n  \
  tzgen --archive timezonedb.csv.zip      regenerate from a saved archive\n  \
  tzgen -o ../tz_data.rs --format skip    write elsewhere, leave unformatted")]
pub struct Cli {
    /// Dataset archive URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_DATASET_URL)]
    pub url: String,

    /// Read a previously downloaded archive instead of fetching
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    pub archive: Option<PathBuf>,

    /// Generated source file (overwritten)
    #[arg(short = 'o', long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Whether rustfmt must succeed on the output
    #[arg(long, value_enum, default_value_t = FormatPolicy::Required)]
    pub format: FormatPolicy,

    /// Rust edition rustfmt formats the output for
    #[arg(
        long,
        value_name = "EDITION",
        default_value = DEFAULT_EDITION,
        value_parser = ["2015", "2018", "2021", "2024"]
    )]
    pub edition: String,

    /// More logging (-vv for trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Less logging (-qq => errors only)
    #[arg(short = 'q', action = clap::ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

impl Cli {
    pub fn config(&self) -> Config {
        let source = match &self.archive {
            Some(path) => Source::File(path.clone()),
            None => Source::Url(self.url.clone()),
        };
        Config {
            source,
            output: self.output.clone(),
            format: self.format,
        }
    }

    pub fn log_level(&self) -> Level {
        match (self.verbose, self.quiet) {
            (0, 0) => Level::INFO,
            (1, _) => Level::DEBUG,
            (v, _) if v > 1 => Level::TRACE,
            (_, 1) => Level::WARN,
            _ => Level::ERROR,
        }
    }
}
