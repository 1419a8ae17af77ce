//! ZIP archive parsing and extraction.
//!
//! Reads the TimeZoneDB dump, which is a small, single-disk archive.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//! - [`archive`]: Locates and decompresses the two dataset tables
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - STORED (no compression) and DEFLATE methods, CRC-32 verified
//!
//! ## Limitations
//!
//! - No ZIP64, encryption or multi-disk archives

mod archive;
mod parser;
mod structures;
#[cfg(test)]
pub(crate) mod testing;

pub use archive::{COUNTRY_ENTRY, DatasetArchive, ZONE_ENTRY};
pub use parser::ZipParser;
pub use structures::*;
