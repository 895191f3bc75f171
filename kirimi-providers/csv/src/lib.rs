//! CSV row codec for kirimi, built on the `csv` crate.
//!
//! Discovery samples the head of the file, rejects binary data, sniffs the
//! delimiter from the first line, and trial-parses the first record. Rows
//! travel as raw byte records so field bytes survive the split untouched;
//! quoting and escaping are the `csv` crate's concern.

use std::fs::File;
use std::io::Read as _;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use kirimi_core::{Row, RowCodec, RowFormatError, RowReader, RowWriter};

const SNIFF_WINDOW_BYTES: u64 = 8 * 1024;

/// Candidate delimiters, probed in order; comma wins ties and empty input.
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Stateless CSV codec; per-invocation state lives in [`CsvFormat`].
///
/// # Examples
/// ```
/// use std::fs;
/// use kirimi_core::RowCodec;
/// use kirimi_providers_csv::CsvCodec;
///
/// let dir = tempfile::tempdir()?;
/// let path = dir.path().join("rows.csv");
/// fs::write(&path, "name;age\nayu;3\n")?;
/// let format = CsvCodec.discover(&path)?;
/// assert_eq!(format.delimiter(), b';');
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvCodec;

/// Delimiter convention discovered from one source file, reused for every
/// read and write of that invocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CsvFormat {
    delimiter: u8,
}

impl CsvFormat {
    /// Returns the field delimiter byte.
    #[must_use]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

/// Sequential byte-record reader over one source file.
pub struct CsvRowReader {
    reader: csv::Reader<File>,
    record: ByteRecord,
}

/// Buffered byte-record writer over one child file.
pub struct CsvRowWriter {
    writer: csv::Writer<File>,
}

impl RowCodec for CsvCodec {
    type Format = CsvFormat;
    type Reader = CsvRowReader;
    type Writer = CsvRowWriter;

    fn discover(&self, path: &Path) -> Result<CsvFormat, RowFormatError> {
        let sample = read_sample(path)?;
        if sample.contains(&0) {
            return Err(RowFormatError::Unrecognized {
                message: "binary data (NUL byte in sample)".to_owned(),
            });
        }
        let delimiter = sniff_delimiter(&sample);
        trial_parse(&sample, delimiter)?;
        Ok(CsvFormat { delimiter })
    }

    fn open_reader(&self, path: &Path, format: &CsvFormat) -> Result<CsvRowReader, RowFormatError> {
        let file = File::open(path).map_err(|err| open_failure(path, &err))?;
        let reader = ReaderBuilder::new()
            .delimiter(format.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(file);
        Ok(CsvRowReader {
            reader,
            record: ByteRecord::new(),
        })
    }

    fn create_writer(
        &self,
        path: &Path,
        format: &CsvFormat,
    ) -> Result<CsvRowWriter, RowFormatError> {
        let file = File::create(path).map_err(|err| open_failure(path, &err))?;
        let writer = WriterBuilder::new()
            .delimiter(format.delimiter)
            .flexible(true)
            .from_writer(file);
        Ok(CsvRowWriter { writer })
    }
}

impl RowReader for CsvRowReader {
    fn read_row(&mut self) -> Result<Option<Row>, RowFormatError> {
        match self.reader.read_byte_record(&mut self.record) {
            Ok(true) => Ok(Some(Row::from_fields(self.record.iter()))),
            Ok(false) => Ok(None),
            Err(err) => Err(RowFormatError::Read {
                message: err.to_string(),
            }),
        }
    }
}

impl RowWriter for CsvRowWriter {
    fn write_row(&mut self, row: &Row) -> Result<(), RowFormatError> {
        let mut record = ByteRecord::new();
        for field in row.fields() {
            record.push_field(field);
        }
        self.writer
            .write_byte_record(&record)
            .map_err(|err| RowFormatError::Write {
                message: err.to_string(),
            })
    }

    fn finish(&mut self) -> Result<(), RowFormatError> {
        self.writer.flush().map_err(|err| RowFormatError::Write {
            message: err.to_string(),
        })
    }
}

fn open_failure(path: &Path, err: &std::io::Error) -> RowFormatError {
    RowFormatError::Open {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn read_sample(path: &Path) -> Result<Vec<u8>, RowFormatError> {
    let file = File::open(path).map_err(|err| open_failure(path, &err))?;
    let mut sample = Vec::new();
    file.take(SNIFF_WINDOW_BYTES)
        .read_to_end(&mut sample)
        .map_err(|err| RowFormatError::Read {
            message: err.to_string(),
        })?;
    Ok(sample)
}

/// Picks the candidate delimiter occurring most often in the first line,
/// ignoring bytes inside double quotes.
fn sniff_delimiter(sample: &[u8]) -> u8 {
    let first_line = sample
        .split(|byte| *byte == b'\n')
        .next()
        .unwrap_or_default();

    let mut best = DELIMITER_CANDIDATES[0];
    let mut best_count = 0_usize;
    for candidate in DELIMITER_CANDIDATES {
        let mut count = 0_usize;
        let mut in_quotes = false;
        for byte in first_line {
            if *byte == b'"' {
                in_quotes = !in_quotes;
            } else if *byte == candidate && !in_quotes {
                count += 1;
            }
        }
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Parses the first record of the sample, surfacing the parser's diagnostic
/// when the head of the file is not readable as delimited text.
fn trial_parse(sample: &[u8], delimiter: u8) -> Result<(), RowFormatError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample);
    let mut record = ByteRecord::new();
    reader
        .read_byte_record(&mut record)
        .map(|_| ())
        .map_err(|err| RowFormatError::Unrecognized {
            message: err.to_string(),
        })
}
