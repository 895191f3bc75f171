//! Row codec abstractions for the kirimi core runtime.
//!
//! The splitter never parses delimited text itself; it consumes a
//! [`RowCodec`] that discovers the source's format once and then hands out
//! readers and writers bound to that format. The same discovered format value
//! is reused for every read and write of one split invocation.

use std::path::Path;

use crate::error::RowFormatError;

/// One record read from a delimited-text source, as raw field bytes.
///
/// Rows carry no identity beyond their position in the stream. Fields are
/// kept as bytes so values survive the read/write round trip untouched.
///
/// # Examples
/// ```
/// use kirimi_core::Row;
///
/// let row = Row::from_fields(["alpha", "beta"]);
/// assert_eq!(row.len(), 2);
/// assert_eq!(row.fields()[0], b"alpha");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row {
    fields: Vec<Vec<u8>>,
}

impl Row {
    /// Creates a row from owned field buffers.
    #[must_use]
    pub fn new(fields: Vec<Vec<u8>>) -> Self {
        Self { fields }
    }

    /// Creates a row by copying each field out of `fields`.
    ///
    /// # Examples
    /// ```
    /// use kirimi_core::Row;
    ///
    /// let row = Row::from_fields(["a", "b", "c"]);
    /// assert_eq!(row.len(), 3);
    /// ```
    pub fn from_fields<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: AsRef<[u8]>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|field| field.as_ref().to_vec())
                .collect(),
        }
    }

    /// Returns the fields in source order.
    #[must_use]
    pub fn fields(&self) -> &[Vec<u8>] {
        &self.fields
    }

    /// Returns the number of fields in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Format discovery plus reader/writer construction for one delimited-text
/// dialect.
///
/// [`discover`](Self::discover) validates that a source is recognizable
/// delimited text and captures whatever the codec needs (delimiter, quoting
/// convention) to read and write it consistently. Readers and writers are
/// then opened against that captured format.
pub trait RowCodec {
    /// Format captured by [`discover`](Self::discover) and reused for every
    /// read and write of one invocation.
    type Format;
    /// Reader yielding rows from a source file.
    type Reader: RowReader;
    /// Writer emitting rows into a child file.
    type Writer: RowWriter;

    /// Discovers the row format of the file at `path`.
    ///
    /// # Errors
    /// Returns [`RowFormatError::Unrecognized`] when the file is not
    /// recognizable as delimited text, carrying the parser's diagnostic.
    fn discover(&self, path: &Path) -> Result<Self::Format, RowFormatError>;

    /// Opens a reader over the file at `path` using a discovered format.
    ///
    /// # Errors
    /// Returns [`RowFormatError::Open`] when the file cannot be opened.
    fn open_reader(
        &self,
        path: &Path,
        format: &Self::Format,
    ) -> Result<Self::Reader, RowFormatError>;

    /// Creates (or truncates) the file at `path` and returns a writer over it.
    ///
    /// An existing file at `path` is silently overwritten.
    ///
    /// # Errors
    /// Returns [`RowFormatError::Open`] when the file cannot be created.
    fn create_writer(
        &self,
        path: &Path,
        format: &Self::Format,
    ) -> Result<Self::Writer, RowFormatError>;
}

/// Sequential row reader over one source file.
pub trait RowReader {
    /// Reads the next row, or `None` once the stream is exhausted.
    ///
    /// # Errors
    /// Returns [`RowFormatError::Read`] when the underlying reader fails
    /// mid-stream.
    fn read_row(&mut self) -> Result<Option<Row>, RowFormatError>;
}

/// Sequential row writer over one child file.
pub trait RowWriter {
    /// Appends one row to the child file.
    ///
    /// # Errors
    /// Returns [`RowFormatError::Write`] when the row cannot be written.
    fn write_row(&mut self, row: &Row) -> Result<(), RowFormatError>;

    /// Flushes any buffered rows to the underlying file.
    ///
    /// # Errors
    /// Returns [`RowFormatError::Write`] when buffered data cannot be
    /// flushed.
    fn finish(&mut self) -> Result<(), RowFormatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fields_copies_each_field() {
        let row = Row::from_fields([b"x".as_slice(), b"".as_slice(), b"yz".as_slice()]);
        assert_eq!(row.fields(), &[b"x".to_vec(), Vec::new(), b"yz".to_vec()]);
    }

    #[test]
    fn empty_row_reports_empty() {
        let row = Row::default();
        assert!(row.is_empty());
        assert_eq!(row.len(), 0);
    }
}
