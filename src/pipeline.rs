//! End-to-end generation: archive in, formatted source file out.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::dataset;
use crate::error::{Error, Result};
use crate::format::{self, FormatPolicy, Formatter};
use crate::io::{self, MemoryReader};
use crate::render::render;
use crate::table::{parse_countries, parse_zones};
use crate::validate::ZoneValidator;
use crate::zip::{COUNTRY_ENTRY, DatasetArchive, ZONE_ENTRY};

/// Where the generated module is written unless told otherwise
pub const DEFAULT_OUTPUT: &str = "src/tz_data.rs";

/// Where the archive comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    fn describe(&self) -> String {
        match self {
            Source::Url(url) => url.clone(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: Source,
    pub output: PathBuf,
    pub format: FormatPolicy,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub countries: usize,
    pub zones: usize,
    pub rejected: usize,
    pub orphaned: usize,
    pub formatted: bool,
    pub output: PathBuf,
}

/// Run every stage in order, stopping at the first fatal error.
pub async fn run(
    config: &Config,
    validator: &dyn ZoneValidator,
    formatter: &dyn Formatter,
) -> Result<Summary> {
    let reader = match &config.source {
        Source::Url(url) => MemoryReader::new(io::fetch(url).await?),
        Source::File(path) => {
            info!(path = %path.display(), "reading archive");
            MemoryReader::from_file(path).await?
        }
    };

    let archive = DatasetArchive::open(Arc::new(reader)).await?;
    let countries = parse_countries(COUNTRY_ENTRY, archive.countries.as_slice())?;
    let zones = parse_zones(ZONE_ENTRY, archive.zones.as_slice())?;
    info!(countries = countries.len(), zones = zones.len(), "parsed tables");

    let (mut countries, stats) = dataset::join(countries, zones, validator);
    dataset::sort(&mut countries);

    let source = render(&countries, &config.source.describe())?;
    write_output(&config.output, &source).await?;
    info!(path = %config.output.display(), bytes = source.len(), "wrote dataset");

    let formatted = format::apply(formatter, &config.output, config.format).await?;

    Ok(Summary {
        countries: stats.countries,
        zones: stats.zones,
        rejected: stats.rejected,
        orphaned: stats.orphaned,
        formatted,
        output: config.output.clone(),
    })
}

/// Create or truncate `path` and write `contents` to it.
async fn write_output(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| Error::Output {
            path: path.to_path_buf(),
            source,
        })
}
