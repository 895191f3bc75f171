//! In-memory row codec backing the splitter unit tests.
//!
//! The codec yields a scripted row stream regardless of the source file's
//! contents and records every write per child path, so orchestration tests
//! can assert chunk shapes and failure handling without parsing real files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::RowFormatError;
use crate::rowcodec::{Row, RowCodec, RowReader, RowWriter};

/// Rows captured per child path, in write order.
pub(crate) type WrittenFiles = Arc<Mutex<BTreeMap<PathBuf, Vec<Row>>>>;

pub(crate) struct MemoryCodec {
    rows: Vec<Row>,
    written: WrittenFiles,
    remaining_writes: Arc<Mutex<Option<usize>>>,
    discovery_failure: Option<String>,
}

impl MemoryCodec {
    pub(crate) fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            written: Arc::default(),
            remaining_writes: Arc::new(Mutex::new(None)),
            discovery_failure: None,
        }
    }

    /// Codec whose discovery step rejects the source with `message`.
    pub(crate) fn failing_discovery(message: &str) -> Self {
        Self {
            discovery_failure: Some(message.to_owned()),
            ..Self::new(Vec::new())
        }
    }

    /// Codec whose writers fail once `writes` rows have been accepted.
    pub(crate) fn failing_after_writes(rows: Vec<Row>, writes: usize) -> Self {
        Self {
            remaining_writes: Arc::new(Mutex::new(Some(writes))),
            ..Self::new(rows)
        }
    }

    pub(crate) fn written(&self) -> WrittenFiles {
        Arc::clone(&self.written)
    }
}

impl RowCodec for MemoryCodec {
    type Format = ();
    type Reader = MemoryReader;
    type Writer = MemoryWriter;

    fn discover(&self, _path: &Path) -> Result<(), RowFormatError> {
        match &self.discovery_failure {
            Some(message) => Err(RowFormatError::Unrecognized {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn open_reader(&self, _path: &Path, _format: &()) -> Result<MemoryReader, RowFormatError> {
        Ok(MemoryReader {
            rows: self.rows.clone().into_iter(),
        })
    }

    fn create_writer(&self, path: &Path, _format: &()) -> Result<MemoryWriter, RowFormatError> {
        self.written
            .lock()
            .expect("lock poisoned")
            .insert(path.to_path_buf(), Vec::new());
        Ok(MemoryWriter {
            path: path.to_path_buf(),
            written: Arc::clone(&self.written),
            remaining_writes: Arc::clone(&self.remaining_writes),
        })
    }
}

pub(crate) struct MemoryReader {
    rows: std::vec::IntoIter<Row>,
}

impl RowReader for MemoryReader {
    fn read_row(&mut self) -> Result<Option<Row>, RowFormatError> {
        Ok(self.rows.next())
    }
}

pub(crate) struct MemoryWriter {
    path: PathBuf,
    written: WrittenFiles,
    remaining_writes: Arc<Mutex<Option<usize>>>,
}

impl RowWriter for MemoryWriter {
    fn write_row(&mut self, row: &Row) -> Result<(), RowFormatError> {
        let mut budget = self.remaining_writes.lock().expect("lock poisoned");
        if let Some(remaining) = *budget {
            if remaining == 0 {
                return Err(RowFormatError::Write {
                    message: "synthetic write failure".to_owned(),
                });
            }
            *budget = Some(remaining - 1);
        }
        drop(budget);

        self.written
            .lock()
            .expect("lock poisoned")
            .entry(self.path.clone())
            .or_default()
            .push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RowFormatError> {
        Ok(())
    }
}

/// Builds `count` single-field rows labelled `row-1..=count`.
pub(crate) fn numbered_rows(count: usize) -> Vec<Row> {
    (1..=count)
        .map(|index| Row::from_fields([format!("row-{index}")]))
        .collect()
}
