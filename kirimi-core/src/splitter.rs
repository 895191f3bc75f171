//! Split orchestration for the kirimi core library.
//!
//! Provides the [`Splitter`] entry point: precondition checks, header
//! capture, and the row loop that distributes data rows across numbered
//! child files.

use std::fs::{self, File};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::{
    Result,
    error::{RowFormatError, SplitError},
    naming,
    report::SplitReport,
    rowcodec::{Row, RowCodec, RowReader, RowWriter},
};

/// Splits one delimited-text source into row-bounded child files.
///
/// Construct via [`crate::SplitterBuilder`]. One [`split`](Self::split) call
/// fully reads the source and writes every child before returning; the
/// instance may be reused sequentially across sources, but concurrent use
/// from multiple threads is unsupported.
///
/// # Examples
/// ```
/// use std::fs;
/// use std::io::Write as _;
/// use std::path::Path;
///
/// use kirimi_core::{Row, RowCodec, RowFormatError, RowReader, RowWriter, SplitterBuilder};
///
/// struct LineCodec;
/// struct LineReader(std::vec::IntoIter<String>);
/// struct LineWriter(fs::File);
///
/// impl RowCodec for LineCodec {
///     type Format = ();
///     type Reader = LineReader;
///     type Writer = LineWriter;
///
///     fn discover(&self, _path: &Path) -> Result<(), RowFormatError> {
///         Ok(())
///     }
///
///     fn open_reader(&self, path: &Path, _format: &()) -> Result<LineReader, RowFormatError> {
///         let text = fs::read_to_string(path).map_err(|err| RowFormatError::Open {
///             path: path.to_path_buf(),
///             message: err.to_string(),
///         })?;
///         let lines: Vec<String> = text.lines().map(str::to_owned).collect();
///         Ok(LineReader(lines.into_iter()))
///     }
///
///     fn create_writer(&self, path: &Path, _format: &()) -> Result<LineWriter, RowFormatError> {
///         fs::File::create(path)
///             .map(LineWriter)
///             .map_err(|err| RowFormatError::Open {
///                 path: path.to_path_buf(),
///                 message: err.to_string(),
///             })
///     }
/// }
///
/// impl RowReader for LineReader {
///     fn read_row(&mut self) -> Result<Option<Row>, RowFormatError> {
///         Ok(self.0.next().map(|line| Row::from_fields([line])))
///     }
/// }
///
/// impl RowWriter for LineWriter {
///     fn write_row(&mut self, row: &Row) -> Result<(), RowFormatError> {
///         for field in row.fields() {
///             self.0
///                 .write_all(field)
///                 .and_then(|()| self.0.write_all(b"\n"))
///                 .map_err(|err| RowFormatError::Write {
///                     message: err.to_string(),
///                 })?;
///         }
///         Ok(())
///     }
///
///     fn finish(&mut self) -> Result<(), RowFormatError> {
///         Ok(())
///     }
/// }
///
/// let dir = tempfile::tempdir()?;
/// let source = dir.path().join("rows.txt");
/// fs::write(&source, "a\nb\nc\n")?;
///
/// let splitter = SplitterBuilder::new()
///     .with_lines_per_file(2)
///     .with_output_directory(dir.path())
///     .build()?;
/// let report = splitter.split(&LineCodec, &source)?;
/// assert_eq!(report.child_count(), 2);
/// assert_eq!(report.data_rows(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Splitter {
    lines_per_file: NonZeroUsize,
    output_directory: PathBuf,
    file_has_header: bool,
}

impl Splitter {
    pub(crate) fn new(
        lines_per_file: NonZeroUsize,
        output_directory: PathBuf,
        file_has_header: bool,
    ) -> Self {
        Self {
            lines_per_file,
            output_directory,
            file_has_header,
        }
    }

    /// Returns the maximum number of data rows per child file.
    #[must_use]
    pub fn lines_per_file(&self) -> NonZeroUsize {
        self.lines_per_file
    }

    /// Returns the directory child files are written into.
    #[must_use]
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Returns whether the source's first row is duplicated into every
    /// child file.
    #[must_use]
    pub fn file_has_header(&self) -> bool {
        self.file_has_header
    }

    /// Splits `source` into child files of at most the configured number of
    /// data rows, returning the written paths in creation order.
    ///
    /// Preconditions are checked eagerly, in order: the source must be an
    /// existing readable file, the output directory must exist and be a
    /// writable directory, and the source must pass the codec's format
    /// discovery. Only then are rows read. An empty source succeeds with an
    /// empty report and writes nothing.
    ///
    /// Pre-existing files at colliding child paths are silently overwritten,
    /// and children fully written before a mid-stream failure remain on
    /// disk; callers wanting transactional output must arrange it
    /// themselves.
    ///
    /// # Errors
    /// Returns [`SplitError::InvalidSource`],
    /// [`SplitError::InvalidOutputDirectory`],
    /// [`SplitError::UnwritableOutputDirectory`], or
    /// [`SplitError::UnparsableSource`] when the corresponding precondition
    /// fails, [`SplitError::InvalidFileName`] when the source name yields no
    /// usable base name, and [`SplitError::Io`] when a row read or write
    /// fails mid-stream.
    #[instrument(
        name = "core.split",
        err,
        skip(self, codec),
        fields(
            source = %source.display(),
            lines_per_file = %self.lines_per_file,
            file_has_header = self.file_has_header,
        ),
    )]
    pub fn split<C: RowCodec>(&self, codec: &C, source: &Path) -> Result<SplitReport> {
        check_source(source)?;
        self.check_output_directory()?;

        let format = codec.discover(source).map_err(|error| match error {
            RowFormatError::Unrecognized { message } => SplitError::UnparsableSource {
                path: source.to_path_buf(),
                message,
            },
            other => stream_failure(source, &other),
        })?;

        let mut reader = codec
            .open_reader(source, &format)
            .map_err(|error| stream_failure(source, &error))?;

        let mut header: Option<Row> = None;
        if self.file_has_header {
            header = reader
                .read_row()
                .map_err(|error| stream_failure(source, &error))?;
        }

        let mut report = SplitReport::default();
        let mut writer: Option<C::Writer> = None;
        let mut rows_in_child = 0_usize;

        while let Some(row) = reader
            .read_row()
            .map_err(|error| stream_failure(source, &error))?
        {
            if writer.is_none() || rows_in_child == self.lines_per_file.get() {
                let next =
                    self.begin_child(codec, &format, source, &mut report, header.as_ref(), writer.take())?;
                writer = Some(next);
                rows_in_child = 0;
            }
            if let Some(current) = writer.as_mut() {
                current
                    .write_row(&row)
                    .map_err(|error| child_failure(&report, &error))?;
            }
            rows_in_child += 1;
            report.record_data_row();
        }

        if let Some(mut last) = writer.take() {
            last.finish()
                .map_err(|error| child_failure(&report, &error))?;
        }

        if report.is_empty() {
            info!("source contained no data rows, nothing written");
        } else {
            info!(
                children = report.child_count(),
                data_rows = report.data_rows(),
                "split completed"
            );
        }
        Ok(report)
    }

    /// Closes the previous child, allocates the next index, registers the
    /// child path, and writes the header row when one was captured.
    fn begin_child<C: RowCodec>(
        &self,
        codec: &C,
        format: &C::Format,
        source: &Path,
        report: &mut SplitReport,
        header: Option<&Row>,
        previous: Option<C::Writer>,
    ) -> Result<C::Writer> {
        if let Some(mut finished) = previous {
            finished
                .finish()
                .map_err(|error| child_failure(report, &error))?;
        }

        let index = report.child_count() + 1;
        let child = naming::child_path(source, &self.output_directory, index)?;
        let mut writer = codec
            .create_writer(&child, format)
            .map_err(|error| SplitError::Io {
                path: child.clone(),
                message: error.to_string(),
            })?;
        // The path is part of the result from this moment, before any row
        // lands in the file.
        report.push_child(child);

        if let Some(row) = header {
            writer
                .write_row(row)
                .map_err(|error| child_failure(report, &error))?;
        }
        Ok(writer)
    }

    fn check_output_directory(&self) -> Result<()> {
        let directory = &self.output_directory;
        let is_directory = fs::metadata(directory)
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_directory {
            return Err(SplitError::InvalidOutputDirectory {
                path: directory.clone(),
            });
        }
        // Probe with an unnamed temporary file; permission metadata alone is
        // not trustworthy across platforms.
        if tempfile::tempfile_in(directory).is_err() {
            return Err(SplitError::UnwritableOutputDirectory {
                path: directory.clone(),
            });
        }
        Ok(())
    }
}

fn check_source(source: &Path) -> Result<()> {
    let is_file = fs::metadata(source)
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file || File::open(source).is_err() {
        return Err(SplitError::InvalidSource {
            path: source.to_path_buf(),
        });
    }
    Ok(())
}

fn stream_failure(source: &Path, error: &RowFormatError) -> SplitError {
    SplitError::Io {
        path: source.to_path_buf(),
        message: error.to_string(),
    }
}

fn child_failure(report: &SplitReport, error: &RowFormatError) -> SplitError {
    SplitError::Io {
        path: report
            .last_child()
            .map_or_else(PathBuf::new, Path::to_path_buf),
        message: error.to_string(),
    }
}
