//! Writing records to a fresh record file.

use crate::error::CoreResult;
use crate::record::Record;
use sdfidx_storage::{FileBackend, StorageBackend};
use std::path::Path;

/// Appends records to an initially empty backend and remembers where each
/// one starts.
pub struct RecordWriter<B: StorageBackend> {
    backend: B,
    offsets: Vec<u64>,
}

impl<B: StorageBackend> RecordWriter<B> {
    /// Wraps `backend`, discarding anything it already holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be truncated.
    pub fn new(mut backend: B) -> CoreResult<Self> {
        backend.truncate(0)?;
        Ok(Self {
            backend,
            offsets: Vec::new(),
        })
    }

    /// Writes a record verbatim and returns its offset.
    ///
    /// # Errors
    ///
    /// Returns an error if the append fails.
    pub fn write(&mut self, record: &Record) -> CoreResult<u64> {
        let offset = self.backend.size()?;
        self.backend.append(record.as_bytes())?;
        self.offsets.push(offset);
        Ok(offset)
    }

    /// Offsets of the records written so far.
    #[must_use]
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    /// Flushes the backend and returns the record offsets in write order.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn finish(mut self) -> CoreResult<Vec<u64>> {
        self.backend.flush()?;
        Ok(self.offsets)
    }

    /// Flushes and returns both the offsets and the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn into_parts(mut self) -> CoreResult<(Vec<u64>, B)> {
        self.backend.flush()?;
        Ok((self.offsets, self.backend))
    }
}

impl RecordWriter<FileBackend> {
    /// Creates (or truncates) the record file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path) -> CoreResult<Self> {
        Self::new(FileBackend::create(path)?)
    }
}

/// Writes `records` to a fresh file at `output_record_path` and returns the
/// offset of each record in the new file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_filtered(output_record_path: &Path, records: &[Record]) -> CoreResult<Vec<u64>> {
    let mut writer = RecordWriter::create(output_record_path)?;
    for record in records {
        writer.write(record)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::read_records_by_offset;
    use sdfidx_storage::InMemoryBackend;
    use tempfile::tempdir;

    #[test]
    fn offsets_follow_record_lengths() {
        let mut writer = RecordWriter::new(InMemoryBackend::new()).unwrap();

        assert_eq!(writer.write(&Record::from("a\n$$$$\n")).unwrap(), 0);
        assert_eq!(writer.write(&Record::from("bcd\n$$$$\n")).unwrap(), 7);
        assert_eq!(writer.offsets(), &[0, 7]);

        let (offsets, backend) = writer.into_parts().unwrap();
        assert_eq!(offsets, vec![0, 7]);
        assert_eq!(backend.data(), b"a\n$$$$\nbcd\n$$$$\n");
    }

    #[test]
    fn new_discards_existing_content() {
        let backend = InMemoryBackend::with_data(b"old\n$$$$\n".to_vec());
        let mut writer = RecordWriter::new(backend).unwrap();
        assert_eq!(writer.write(&Record::from("x\n$$$$\n")).unwrap(), 0);
    }

    #[test]
    fn written_records_read_back_at_offsets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.sdf");
        let records = vec![
            Record::from("first\nC\n$$$$\n"),
            Record::from("second\n$$$$\n"),
            Record::from("third\nCCN\n$$$$\n"),
        ];

        let offsets = write_filtered(&path, &records).unwrap();
        assert_eq!(offsets, vec![0, 13, 25]);

        let read = read_records_by_offset(&path, &offsets).unwrap();
        let bytes: Vec<&[u8]> = read.iter().map(Record::as_bytes).collect();
        let expected: Vec<&[u8]> = records.iter().map(Record::as_bytes).collect();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn write_filtered_truncates_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.sdf");
        std::fs::write(&path, "a much longer stale file\n$$$$\n").unwrap();

        write_filtered(&path, &[Record::from("x\n$$$$\n")]).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"x\n$$$$\n");
    }

    #[test]
    fn write_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.sdf");

        assert!(write_filtered(&path, &[]).unwrap().is_empty());
        assert!(path.exists());
    }
}
