//! Builder utilities for configuring split operations.
//!
//! Exposes the fluent configuration surface and the validation performed
//! before constructing [`Splitter`] instances.

use std::num::NonZeroUsize;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::{Result, error::SplitError, splitter::Splitter};

pub(crate) const DEFAULT_LINES_PER_FILE: usize = 100;

/// Configures and constructs [`Splitter`] instances.
///
/// Configuration is mutable through the fluent `with_*` methods until
/// [`build`](Self::build) validates it; the resulting [`Splitter`] is
/// immutable for the duration of each split call.
///
/// # Examples
/// ```
/// use kirimi_core::SplitterBuilder;
///
/// let splitter = SplitterBuilder::new()
///     .with_lines_per_file(500)
///     .with_output_directory("chunks")
///     .with_file_has_header(true)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(splitter.lines_per_file().get(), 500);
/// assert!(splitter.file_has_header());
/// ```
#[derive(Debug, Clone)]
pub struct SplitterBuilder {
    lines_per_file: usize,
    output_directory: PathBuf,
    file_has_header: bool,
}

impl Default for SplitterBuilder {
    fn default() -> Self {
        Self {
            lines_per_file: DEFAULT_LINES_PER_FILE,
            output_directory: PathBuf::from("."),
            file_has_header: false,
        }
    }
}

impl SplitterBuilder {
    /// Creates a builder populated with default parameters: 100 lines per
    /// file, the current working directory as destination, no header row.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use kirimi_core::SplitterBuilder;
    ///
    /// let builder = SplitterBuilder::new();
    /// assert_eq!(builder.lines_per_file(), 100);
    /// assert_eq!(builder.output_directory(), Path::new("."));
    /// assert!(!builder.file_has_header());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the maximum number of data rows per child file.
    ///
    /// Zero is accepted here and rejected by [`build`](Self::build) so the
    /// failure carries the configured value.
    #[must_use]
    pub fn with_lines_per_file(mut self, lines: usize) -> Self {
        self.lines_per_file = lines;
        self
    }

    /// Returns the configured lines-per-file limit.
    #[must_use]
    pub fn lines_per_file(&self) -> usize {
        self.lines_per_file
    }

    /// Overrides the directory child files are written into.
    ///
    /// A single trailing path separator is stripped; the path is not checked
    /// for existence until the split runs.
    ///
    /// # Examples
    /// ```
    /// use std::path::Path;
    /// use kirimi_core::SplitterBuilder;
    ///
    /// let builder = SplitterBuilder::new().with_output_directory("out/");
    /// assert_eq!(builder.output_directory(), Path::new("out"));
    /// ```
    #[must_use]
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output_directory = strip_trailing_separator(directory.into());
        self
    }

    /// Returns the configured output directory.
    #[must_use]
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Declares whether the source's first row is a header to duplicate into
    /// every child file.
    #[must_use]
    pub fn with_file_has_header(mut self, has_header: bool) -> Self {
        self.file_has_header = has_header;
        self
    }

    /// Returns whether the source is treated as carrying a header row.
    #[must_use]
    pub fn file_has_header(&self) -> bool {
        self.file_has_header
    }

    /// Validates the configuration and constructs a [`Splitter`].
    ///
    /// # Errors
    /// Returns [`SplitError::InvalidLinesPerFile`] when the configured limit
    /// is zero.
    ///
    /// # Examples
    /// ```
    /// use kirimi_core::{SplitError, SplitterBuilder};
    ///
    /// let err = SplitterBuilder::new()
    ///     .with_lines_per_file(0)
    ///     .build()
    ///     .expect_err("zero rows per file is not a supported state");
    /// assert!(matches!(err, SplitError::InvalidLinesPerFile { got: 0 }));
    /// ```
    pub fn build(self) -> Result<Splitter> {
        let lines_per_file = NonZeroUsize::new(self.lines_per_file).ok_or(
            SplitError::InvalidLinesPerFile {
                got: self.lines_per_file,
            },
        )?;

        Ok(Splitter::new(
            lines_per_file,
            self.output_directory,
            self.file_has_header,
        ))
    }
}

/// Strips one trailing path separator, leaving a bare root untouched.
fn strip_trailing_separator(directory: PathBuf) -> PathBuf {
    match directory.to_str() {
        Some(text) if text.len() > 1 => {
            let trimmed = text.strip_suffix(MAIN_SEPARATOR).unwrap_or(text);
            PathBuf::from(trimmed)
        }
        _ => directory,
    }
}
