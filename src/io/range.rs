use std::sync::Arc;

use super::ReadAt;
use anyhow::{Result, bail};
use async_trait::async_trait;

/// A byte-range window over a shared reader.
///
/// This is how nested archives are opened in place: the nested archive's
/// reader is a `RangeReader` over the stored entry's span inside the parent's
/// backing storage. No bytes are copied; the window only translates offsets.
/// Holding the parent behind an [`Arc`] keeps the backing storage open for as
/// long as any nested view is alive.
pub struct RangeReader {
    parent: Arc<dyn ReadAt>,
    offset: u64,
    len: u64,
}

impl RangeReader {
    /// Create a window of `len` bytes starting at `offset` in `parent`.
    pub fn new(parent: Arc<dyn ReadAt>, offset: u64, len: u64) -> Result<Self> {
        if offset + len > parent.size() {
            bail!(
                "range {}..{} exceeds parent size {}",
                offset,
                offset + len,
                parent.size()
            );
        }
        Ok(Self {
            parent,
            offset,
            len,
        })
    }
}

#[async_trait]
impl ReadAt for RangeReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        if offset + buf.len() as u64 > self.len {
            bail!(
                "read of {} bytes at {} exceeds window of {} bytes",
                buf.len(),
                offset,
                self.len
            );
        }
        self.parent.read_at(self.offset + offset, buf).await
    }

    fn size(&self) -> u64 {
        self.len
    }
}

/// An owned in-memory reader.
///
/// Used when a compressed nested entry is materialized into a buffer, and by
/// tests that build synthetic archives without touching the filesystem.
pub struct MemoryReader {
    data: Vec<u8>,
}

impl MemoryReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl ReadAt for MemoryReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let start = offset as usize;
        let end = start + buf.len();
        if end > self.data.len() {
            bail!(
                "read of {} bytes at {} exceeds buffer of {} bytes",
                buf.len(),
                offset,
                self.data.len()
            );
        }
        buf.copy_from_slice(&self.data[start..end]);
        Ok(buf.len())
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn range_reader_translates_offsets() {
        let parent = Arc::new(MemoryReader::new(b"0123456789".to_vec()));
        let range = RangeReader::new(parent, 2, 5).unwrap();

        let mut buf = [0u8; 3];
        range.read_at(1, &mut buf).await.unwrap();
        assert_eq!(&buf, b"345");
        assert_eq!(range.size(), 5);
    }

    #[tokio::test]
    async fn range_reader_rejects_reads_past_window() {
        let parent = Arc::new(MemoryReader::new(b"0123456789".to_vec()));
        let range = RangeReader::new(parent, 2, 5).unwrap();

        let mut buf = [0u8; 5];
        assert!(range.read_at(1, &mut buf).await.is_err());
    }

    #[test]
    fn range_reader_rejects_window_past_parent() {
        let parent = Arc::new(MemoryReader::new(vec![0u8; 10]));
        assert!(RangeReader::new(parent, 8, 4).is_err());
    }
}
