mod http;
mod local;
mod range;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;
pub use range::{MemoryReader, RangeReader};

use anyhow::Result;
use async_trait::async_trait;

/// Trait for positioned reads from a data source.
///
/// Every read names its own offset, so there is no shared cursor and
/// concurrent reads from multiple threads are safe without locking.
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;
}
