mod http;
mod memory;

pub use http::{DEFAULT_DATASET_URL, fetch};
pub use memory::MemoryReader;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for random access reading from a data source
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    ///
    /// Returns the number of bytes copied, which is less than `buf.len()`
    /// only when the read runs past the end of the source.
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;
}
