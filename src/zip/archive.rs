use flate2::read::DeflateDecoder;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Name of the country table inside the TimeZoneDB archive
pub const COUNTRY_ENTRY: &str = "country.csv";
/// Name of the zone table inside the TimeZoneDB archive
pub const ZONE_ENTRY: &str = "zone.csv";

/// The two tables the generator needs, decompressed into memory
#[derive(Debug)]
pub struct DatasetArchive {
    pub countries: Vec<u8>,
    pub zones: Vec<u8>,
}

impl DatasetArchive {
    /// Locate and decompress the country and zone tables.
    ///
    /// Entries are matched by exact name; every other entry is ignored.
    pub async fn open<R: ReadAt>(reader: Arc<R>) -> Result<Self> {
        let parser = ZipParser::new(reader);
        let entries = parser.list_files().await?;

        let mut country_entry = None;
        let mut zone_entry = None;
        for entry in &entries {
            match entry.file_name.as_str() {
                COUNTRY_ENTRY => country_entry = Some(entry),
                ZONE_ENTRY => zone_entry = Some(entry),
                other => debug!(entry = other, "ignoring archive entry"),
            }
        }

        let country_entry = country_entry.ok_or(Error::MissingEntry {
            name: COUNTRY_ENTRY,
        })?;
        let zone_entry = zone_entry.ok_or(Error::MissingEntry { name: ZONE_ENTRY })?;

        Ok(Self {
            countries: extract(&parser, country_entry).await?,
            zones: extract(&parser, zone_entry).await?,
        })
    }
}

/// Read, decompress and CRC-check a single entry.
///
/// Sizes come from the Central Directory and are checked against the
/// archive before anything is allocated; inflation stops one byte past
/// the recorded uncompressed size.
async fn extract<R: ReadAt>(parser: &ZipParser<R>, entry: &ZipFileEntry) -> Result<Vec<u8>> {
    let data_offset = parser.get_data_offset(entry).await?;
    let data_end = data_offset + entry.compressed_size;
    if data_end > parser.size() {
        return Err(Error::Archive(format!(
            "{}: data ends at {data_end}, past end of archive ({} bytes)",
            entry.file_name,
            parser.size()
        )));
    }

    let mut compressed = vec![0u8; entry.compressed_size as usize];
    parser.read_exact_at(data_offset, &mut compressed).await?;

    let data = match entry.compression_method {
        CompressionMethod::Stored => compressed,
        CompressionMethod::Deflate => {
            let mut data = Vec::new();
            DeflateDecoder::new(compressed.as_slice())
                .take(entry.uncompressed_size + 1)
                .read_to_end(&mut data)
                .map_err(|e| {
                    Error::Archive(format!("cannot inflate {}: {e}", entry.file_name))
                })?;
            data
        }
        CompressionMethod::Unknown(method) => {
            return Err(Error::Archive(format!(
                "{} uses unsupported compression method {method}",
                entry.file_name
            )));
        }
    };

    if data.len() as u64 != entry.uncompressed_size {
        return Err(Error::Archive(format!(
            "{}: expected {} bytes, got {}",
            entry.file_name,
            entry.uncompressed_size,
            data.len()
        )));
    }

    let mut crc = flate2::Crc::new();
    crc.update(&data);
    if crc.sum() != entry.crc32 {
        return Err(Error::Archive(format!(
            "{}: CRC-32 mismatch (expected {:08x}, got {:08x})",
            entry.file_name,
            entry.crc32,
            crc.sum()
        )));
    }

    debug!(entry = %entry.file_name, bytes = data.len(), "extracted");
    Ok(data)
}
