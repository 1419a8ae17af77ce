use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};

/// ZIP compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    Stored,
    Deflate,
    Unknown(u16),
}

impl CompressionMethod {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CompressionMethod::Stored,
            8 => CompressionMethod::Deflate,
            _ => CompressionMethod::Unknown(value),
        }
    }
}

/// End of Central Directory (EOCD) - 22 bytes minimum
pub struct EndOfCentralDirectory {
    pub total_entries: u16,
    pub cd_size: u32,
    pub cd_offset: u32,
}

impl EndOfCentralDirectory {
    pub const SIGNATURE: &'static [u8] = b"PK\x05\x06";
    pub const SIZE: usize = 22;

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE || &data[0..4] != Self::SIGNATURE {
            return Err(Error::Archive(
                "invalid End of Central Directory record".to_string(),
            ));
        }

        Self::read_fields(&data[10..]).map_err(truncated)
    }

    // Disk numbers and the per-disk entry count are skipped; the
    // TimeZoneDB dump is never split across disks. The trailing comment
    // length is only needed while searching, see `ZipParser::find_eocd`.
    fn read_fields(data: &[u8]) -> std::io::Result<Self> {
        let mut cursor = Cursor::new(data);
        Ok(Self {
            total_entries: cursor.read_u16::<LittleEndian>()?,
            cd_size: cursor.read_u32::<LittleEndian>()?,
            cd_offset: cursor.read_u32::<LittleEndian>()?,
        })
    }

    pub fn is_zip64(&self) -> bool {
        self.total_entries == 0xFFFF || self.cd_size == 0xFFFFFFFF || self.cd_offset == 0xFFFFFFFF
    }
}

/// Central Directory File Header (CDFH) - 46 bytes minimum
pub const CDFH_SIGNATURE: &[u8] = b"PK\x01\x02";
pub const CDFH_MIN_SIZE: usize = 46;

/// Local File Header (LFH) - 30 bytes
pub const LFH_SIGNATURE: &[u8] = b"PK\x03\x04";
pub const LFH_SIZE: usize = 30;

/// Parsed ZIP file entry information
#[derive(Debug, Clone)]
pub struct ZipFileEntry {
    pub file_name: String,
    pub compression_method: CompressionMethod,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub crc32: u32,
    pub lfh_offset: u64,
}

/// Map a short read inside a fixed-size record to an archive error
pub(crate) fn truncated(e: std::io::Error) -> Error {
    Error::Archive(format!("truncated record: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eocd_bytes(total_entries: u16, cd_size: u32, cd_offset: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(EndOfCentralDirectory::SIGNATURE);
        buf.extend_from_slice(&[0; 4]);
        buf.extend_from_slice(&total_entries.to_le_bytes());
        buf.extend_from_slice(&total_entries.to_le_bytes());
        buf.extend_from_slice(&cd_size.to_le_bytes());
        buf.extend_from_slice(&cd_offset.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf
    }

    #[test]
    fn test_eocd_from_bytes() {
        let eocd = EndOfCentralDirectory::from_bytes(&eocd_bytes(2, 120, 4096)).unwrap();
        assert_eq!(eocd.total_entries, 2);
        assert_eq!(eocd.cd_size, 120);
        assert_eq!(eocd.cd_offset, 4096);
        assert!(!eocd.is_zip64());
    }

    #[test]
    fn test_eocd_zip64_markers() {
        let eocd = EndOfCentralDirectory::from_bytes(&eocd_bytes(2, 120, 0xFFFFFFFF)).unwrap();
        assert!(eocd.is_zip64());
    }

    #[test]
    fn test_eocd_bad_signature() {
        let mut buf = eocd_bytes(1, 0, 0);
        buf[0] = b'X';
        assert!(matches!(
            EndOfCentralDirectory::from_bytes(&buf),
            Err(Error::Archive(_))
        ));
        assert!(EndOfCentralDirectory::from_bytes(&buf[..10]).is_err());
    }

    #[test]
    fn test_compression_method_codes() {
        assert_eq!(CompressionMethod::from_u16(0), CompressionMethod::Stored);
        assert_eq!(CompressionMethod::from_u16(8), CompressionMethod::Deflate);
        assert_eq!(
            CompressionMethod::from_u16(12),
            CompressionMethod::Unknown(12)
        );
    }
}
