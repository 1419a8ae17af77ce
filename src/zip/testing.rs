//! In-memory ZIP writer used to build archive fixtures in tests.

use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

use super::structures::{CDFH_SIGNATURE, EndOfCentralDirectory, LFH_SIGNATURE};

struct Member {
    name: String,
    method: u16,
    crc32: u32,
    uncompressed_size: u32,
    /// Compressed size written to the Central Directory instead of the real one
    claimed_compressed_size: Option<u32>,
    data: Vec<u8>,
}

#[derive(Default)]
pub struct ZipBuilder {
    members: Vec<Member>,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &str, content: &[u8]) -> Self {
        self.push(name, 0, content, content.to_vec())
    }

    pub fn deflated(self, name: &str, content: &[u8]) -> Self {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        let data = encoder.finish().unwrap();
        self.push(name, 8, content, data)
    }

    /// Add an entry whose payload is stored as-is under an arbitrary method code
    pub fn raw(self, name: &str, method: u16, content: &[u8]) -> Self {
        self.push(name, method, content, content.to_vec())
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    /// Flip one bit of the named member's recorded CRC-32
    pub fn corrupt_crc(mut self, name: &str) -> Self {
        for member in self.members.iter_mut().filter(|m| m.name == name) {
            member.crc32 ^= 1;
        }
        self
    }

    /// Record different sizes for the named member in the Central Directory
    pub fn claim_sizes(mut self, name: &str, compressed: u32, uncompressed: u32) -> Self {
        for member in self.members.iter_mut().filter(|m| m.name == name) {
            member.claimed_compressed_size = Some(compressed);
            member.uncompressed_size = uncompressed;
        }
        self
    }

    fn push(mut self, name: &str, method: u16, content: &[u8], data: Vec<u8>) -> Self {
        let mut crc = flate2::Crc::new();
        crc.update(content);
        self.members.push(Member {
            name: name.to_string(),
            method,
            crc32: crc.sum(),
            uncompressed_size: content.len() as u32,
            claimed_compressed_size: None,
            data,
        });
        self
    }

    pub fn finish(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut offsets = Vec::with_capacity(self.members.len());

        for m in &self.members {
            offsets.push(out.len() as u32);
            out.extend_from_slice(LFH_SIGNATURE);
            out.extend_from_slice(&20u16.to_le_bytes()); // version needed
            out.extend_from_slice(&0u16.to_le_bytes()); // flags
            out.extend_from_slice(&m.method.to_le_bytes());
            out.extend_from_slice(&[0; 4]); // mod time + date
            out.extend_from_slice(&m.crc32.to_le_bytes());
            out.extend_from_slice(&(m.data.len() as u32).to_le_bytes());
            out.extend_from_slice(&m.uncompressed_size.to_le_bytes());
            out.extend_from_slice(&(m.name.len() as u16).to_le_bytes());
            out.extend_from_slice(&0u16.to_le_bytes()); // extra length
            out.extend_from_slice(m.name.as_bytes());
            out.extend_from_slice(&m.data);
        }

        let cd_offset = out.len() as u32;
        for (m, lfh_offset) in self.members.iter().zip(offsets) {
            out.extend_from_slice(CDFH_SIGNATURE);
            out.extend_from_slice(&20u16.to_le_bytes()); // version made by
            out.extend_from_slice(&20u16.to_le_bytes()); // version needed
            out.extend_from_slice(&0u16.to_le_bytes()); // flags
            out.extend_from_slice(&m.method.to_le_bytes());
            out.extend_from_slice(&[0; 4]); // mod time + date
            out.extend_from_slice(&m.crc32.to_le_bytes());
            let compressed = m.claimed_compressed_size.unwrap_or(m.data.len() as u32);
            out.extend_from_slice(&compressed.to_le_bytes());
            out.extend_from_slice(&m.uncompressed_size.to_le_bytes());
            out.extend_from_slice(&(m.name.len() as u16).to_le_bytes());
            out.extend_from_slice(&[0; 4]); // extra + comment length
            out.extend_from_slice(&[0; 4]); // disk start + internal attrs
            out.extend_from_slice(&[0; 4]); // external attrs
            out.extend_from_slice(&lfh_offset.to_le_bytes());
            out.extend_from_slice(m.name.as_bytes());
        }
        let cd_size = out.len() as u32 - cd_offset;

        let count = self.members.len() as u16;
        out.extend_from_slice(EndOfCentralDirectory::SIGNATURE);
        out.extend_from_slice(&[0; 4]); // disk numbers
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&cd_size.to_le_bytes());
        out.extend_from_slice(&cd_offset.to_le_bytes());
        out.extend_from_slice(&(self.comment.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.comment);
        out
    }
}
