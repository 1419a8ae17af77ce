use async_trait::async_trait;
use std::path::Path;

use super::ReadAt;
use crate::error::{Error, Result};

/// Random access over an archive that has been fully buffered in memory
pub struct MemoryReader {
    data: Vec<u8>,
}

impl MemoryReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Load a previously downloaded archive from disk
    pub async fn from_file(path: &Path) -> Result<Self> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::Archive(format!("cannot read {}: {e}", path.display())))?;
        Ok(Self::new(data))
    }
}

#[async_trait]
impl ReadAt for MemoryReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let start = usize::try_from(offset)
            .ok()
            .filter(|&start| start <= self.data.len())
            .ok_or_else(|| {
                Error::Archive(format!(
                    "read at offset {offset} past end of archive ({} bytes)",
                    self.data.len()
                ))
            })?;

        let available = &self.data[start..];
        let n = buf.len().min(available.len());
        buf[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}
