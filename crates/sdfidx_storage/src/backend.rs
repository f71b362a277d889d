//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level byte store for record and index files.
///
/// Backends are **opaque byte stores**. They provide simple operations for
/// reading ranges, appending and flushing data. All interpretation of SDF
/// records, delimiters and index lines lives in `sdfidx_core`.
///
/// # Invariants
///
/// - `append` returns the byte offset where data was written
/// - `read_at` returns exactly the bytes previously written at that offset
/// - `size` is the offset the next `append` will write at
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For files on disk
pub trait StorageBackend: Send + Sync {
    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The offset is beyond the current size
    /// - The read would extend beyond the current size
    /// - An I/O error occurs
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>>;

    /// Appends data to the end of the storage.
    ///
    /// Returns the offset where the data was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is read-only or an I/O error occurs.
    fn append(&mut self, data: &[u8]) -> StorageResult<u64>;

    /// Flushes all pending writes to the OS.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Returns the current size of the storage in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Truncates the storage to the given size.
    ///
    /// Writers call `truncate(0)` to start an output file fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The truncation fails
    /// - `new_size` is greater than current size
    fn truncate(&mut self, new_size: u64) -> StorageResult<()>;

    /// Reads up to `max_len` bytes starting at `offset`.
    ///
    /// Unlike [`read_at`](Self::read_at), a short read at the end of the
    /// storage is not an error. An `offset` at or past the end yields an
    /// empty buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn read_available(&self, offset: u64, max_len: usize) -> StorageResult<Vec<u8>> {
        let size = self.size()?;
        if offset >= size {
            return Ok(Vec::new());
        }
        let remaining = size - offset;
        let len = usize::try_from(remaining).map_or(max_len, |r| r.min(max_len));
        self.read_at(offset, len)
    }
}
