//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures,
//! reading from any source that implements the [`ReadAt`] trait.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the file's end
//! 2. Read the Central Directory to get metadata for all files
//! 3. For extraction, read each file's Local File Header and data

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: u64 = 65535;

/// Low-level ZIP file parser.
///
/// Typically used through [`DatasetArchive`](super::DatasetArchive)
/// rather than directly.
pub struct ZipParser<R: ReadAt> {
    /// The underlying data source
    reader: Arc<R>,
    /// Total size of the archive in bytes
    size: u64,
}

impl<R: ReadAt> ZipParser<R> {
    pub fn new(reader: Arc<R>) -> Self {
        let size = reader.size();
        Self { reader, size }
    }

    /// Total size of the archive in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Fill `buf` from `offset`, failing if the archive ends first.
    pub async fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let n = self.reader.read_at(offset, buf).await?;
        if n < buf.len() {
            return Err(Error::Archive(format!(
                "unexpected end of archive: wanted {} bytes at offset {offset}, got {n}",
                buf.len()
            )));
        }
        Ok(())
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Handles both the simple case (no comment) and archives with
    /// comments by searching backwards for the signature.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid EOCD can be found, indicating
    /// the buffer is not a ZIP archive.
    pub async fn find_eocd(&self) -> Result<EndOfCentralDirectory> {
        if self.size < EndOfCentralDirectory::SIZE as u64 {
            return Err(Error::Archive(format!(
                "{} bytes is too small to be a ZIP archive",
                self.size
            )));
        }

        // Common case: no archive comment, EOCD is the last 22 bytes
        let offset = self.size - EndOfCentralDirectory::SIZE as u64;
        let mut buf = vec![0u8; EndOfCentralDirectory::SIZE];
        self.read_exact_at(offset, &mut buf).await?;

        if &buf[0..4] == EndOfCentralDirectory::SIGNATURE && &buf[20..22] == b"\x00\x00" {
            return EndOfCentralDirectory::from_bytes(&buf);
        }

        // Otherwise search backwards through the largest possible comment
        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE as u64).min(self.size);
        let search_start = self.size - search_size;

        let mut buf = vec![0u8; search_size as usize];
        self.read_exact_at(search_start, &mut buf).await?;

        for i in (0..=buf.len() - EndOfCentralDirectory::SIZE).rev() {
            if &buf[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                // The comment length must account for every trailing byte
                let comment_len = u16::from_le_bytes([buf[i + 20], buf[i + 21]]) as usize;

                if comment_len == buf.len() - i - EndOfCentralDirectory::SIZE {
                    return EndOfCentralDirectory::from_bytes(
                        &buf[i..i + EndOfCentralDirectory::SIZE],
                    );
                }
            }
        }

        Err(Error::Archive("not a valid ZIP file".to_string()))
    }

    /// List all entries in the Central Directory.
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        let eocd = self.find_eocd().await?;
        if eocd.is_zip64() {
            return Err(Error::Archive("ZIP64 archives are not supported".to_string()));
        }

        let cd_end = eocd.cd_offset as u64 + eocd.cd_size as u64;
        if cd_end > self.size {
            return Err(Error::Archive(format!(
                "central directory ends at {cd_end}, past end of archive ({} bytes)",
                self.size
            )));
        }

        let mut cd_data = vec![0u8; eocd.cd_size as usize];
        self.read_exact_at(eocd.cd_offset as u64, &mut cd_data).await?;

        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        let mut cursor = Cursor::new(cd_data.as_slice());

        for _ in 0..eocd.total_entries {
            entries.push(parse_cdfh(&mut cursor)?);
        }

        Ok(entries)
    }

    /// Get the offset where an entry's compressed data begins.
    ///
    /// The Local File Header has its own name and extra field lengths,
    /// which may differ from the Central Directory copy.
    pub async fn get_data_offset(&self, entry: &ZipFileEntry) -> Result<u64> {
        let mut lfh_buf = vec![0u8; LFH_SIZE];
        self.read_exact_at(entry.lfh_offset, &mut lfh_buf).await?;

        if &lfh_buf[0..4] != LFH_SIGNATURE {
            return Err(Error::Archive(format!(
                "invalid Local File Header for {}",
                entry.file_name
            )));
        }

        let file_name_length = u16::from_le_bytes([lfh_buf[26], lfh_buf[27]]) as u64;
        let extra_field_length = u16::from_le_bytes([lfh_buf[28], lfh_buf[29]]) as u64;

        Ok(entry.lfh_offset + LFH_SIZE as u64 + file_name_length + extra_field_length)
    }
}

/// Parse one Central Directory File Header and advance past it.
fn parse_cdfh(cursor: &mut Cursor<&[u8]>) -> Result<ZipFileEntry> {
    let remaining = cursor.get_ref().len() as u64 - cursor.position();
    if remaining < CDFH_MIN_SIZE as u64 {
        return Err(Error::Archive("truncated Central Directory".to_string()));
    }

    let mut sig = [0u8; 4];
    cursor.read_exact(&mut sig).map_err(truncated)?;
    if sig != CDFH_SIGNATURE {
        return Err(Error::Archive(
            "invalid Central Directory File Header".to_string(),
        ));
    }

    let entry = read_cdfh_fields(cursor).map_err(truncated)?;

    if entry.compressed_size == 0xFFFFFFFF
        || entry.uncompressed_size == 0xFFFFFFFF
        || entry.lfh_offset == 0xFFFFFFFF
    {
        return Err(Error::Archive(format!(
            "{} uses ZIP64 extensions, which are not supported",
            entry.file_name
        )));
    }

    Ok(entry)
}

fn read_cdfh_fields(cursor: &mut Cursor<&[u8]>) -> std::io::Result<ZipFileEntry> {
    let _version_made_by = cursor.read_u16::<LittleEndian>()?;
    let _version_needed = cursor.read_u16::<LittleEndian>()?;
    let _flags = cursor.read_u16::<LittleEndian>()?;
    let compression_method = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_time = cursor.read_u16::<LittleEndian>()?;
    let _last_mod_date = cursor.read_u16::<LittleEndian>()?;
    let crc32 = cursor.read_u32::<LittleEndian>()?;
    let compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
    let file_name_length = cursor.read_u16::<LittleEndian>()?;
    let extra_field_length = cursor.read_u16::<LittleEndian>()?;
    let file_comment_length = cursor.read_u16::<LittleEndian>()?;
    let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
    let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
    let _external_attrs = cursor.read_u32::<LittleEndian>()?;
    let lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

    let mut file_name_bytes = vec![0u8; file_name_length as usize];
    cursor.read_exact(&mut file_name_bytes)?;
    let file_name = String::from_utf8_lossy(&file_name_bytes).to_string();

    // Neither the extra field nor the comment is needed
    let skip = extra_field_length as u64 + file_comment_length as u64;
    cursor.set_position(cursor.position() + skip);

    Ok(ZipFileEntry {
        file_name,
        compression_method: CompressionMethod::from_u16(compression_method),
        compressed_size,
        uncompressed_size,
        crc32,
        lfh_offset,
    })
}
