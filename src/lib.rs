//! # tzgen
//!
//! Generates a static country/time zone dataset for inclusion in a larger
//! library.
//!
//! The generator downloads the TimeZoneDB CSV dump, reads `country.csv` and
//! `zone.csv` out of the ZIP archive, keeps only the zones the local time
//! zone database recognizes, attaches them to their countries, and writes a
//! Rust module exposing `get_countries()` and `get_country(code)`.
//!
//! ## Example
//!
//! ```no_run
//! use tzgen::{Config, FormatPolicy, Rustfmt, Source, SystemTzdb};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config {
//!         source: Source::Url(tzgen::io::DEFAULT_DATASET_URL.to_string()),
//!         output: "src/tz_data.rs".into(),
//!         format: FormatPolicy::BestEffort,
//!     };
//!
//!     let summary = tzgen::run(&config, &SystemTzdb::new(), &Rustfmt::new()).await?;
//!     println!("{} countries, {} zones", summary.countries, summary.zones);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod dataset;
pub mod error;
pub mod format;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod table;
pub mod validate;
pub mod zip;

pub use cli::Cli;
pub use error::{Error, Result};
pub use format::{FormatPolicy, Formatter, Rustfmt};
pub use io::{MemoryReader, ReadAt};
pub use model::{Country, Zone};
pub use pipeline::{Config, Source, Summary, run};
pub use validate::{SystemTzdb, ZoneValidator};
pub use zip::DatasetArchive;
