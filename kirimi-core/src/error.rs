//! Error types for the kirimi core library.
//!
//! Defines the split error taxonomy with stable machine-readable codes, the
//! codec collaborator error, and a convenient result alias.

use std::{fmt, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $Variant:ident => $code:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $Variant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$Variant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$Variant { .. } => $CodeTy::$Variant,)+
                }
            }
        }
    };
}

/// An error produced by a [`crate::RowCodec`] collaborator.
///
/// Codec implementations construct these directly; the splitter folds them
/// into the [`SplitError`] taxonomy with the relevant path attached.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RowFormatError {
    /// The source failed row-format discovery.
    #[error("not recognizable as delimited text: {message}")]
    Unrecognized {
        /// Diagnostic produced by the underlying parser.
        message: String,
    },
    /// A file could not be opened for reading or writing rows.
    #[error("failed to open `{}`: {message}", .path.display())]
    Open {
        /// Path that could not be opened.
        path: PathBuf,
        /// Underlying operating system diagnostic.
        message: String,
    },
    /// Reading the next row failed mid-stream.
    #[error("failed to read a row: {message}")]
    Read {
        /// Diagnostic produced by the underlying reader.
        message: String,
    },
    /// Writing a row failed mid-stream.
    #[error("failed to write a row: {message}")]
    Write {
        /// Diagnostic produced by the underlying writer.
        message: String,
    },
}

/// Error type produced when configuring or running a [`crate::Splitter`].
///
/// Every variant is locally fatal to the split call that raised it; none are
/// retried internally.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SplitError {
    /// The configured chunk size was not a positive integer.
    #[error("lines per file must be at least 1 (got {got})")]
    InvalidLinesPerFile {
        /// The invalid chunk size supplied by the caller.
        got: usize,
    },
    /// The source path does not name an existing readable file.
    #[error("source file `{}` does not exist or is not readable", .path.display())]
    InvalidSource {
        /// Source path supplied by the caller.
        path: PathBuf,
    },
    /// The output directory does not exist or is not a directory.
    #[error("output directory `{}` does not exist or is not a directory", .path.display())]
    InvalidOutputDirectory {
        /// Configured output directory.
        path: PathBuf,
    },
    /// The output directory exists but the process cannot write to it.
    #[error("output directory `{}` is not writable", .path.display())]
    UnwritableOutputDirectory {
        /// Configured output directory.
        path: PathBuf,
    },
    /// The source failed row-format discovery.
    #[error("source file `{}` is not delimited text: {message}", .path.display())]
    UnparsableSource {
        /// Source path that failed discovery.
        path: PathBuf,
        /// Diagnostic carried over from the codec.
        message: String,
    },
    /// The source file name yields no usable base name for child files.
    #[error("file name `{name}` yields no usable base name for child files")]
    InvalidFileName {
        /// Offending file name.
        name: String,
    },
    /// A row-level read or write failed after the split began.
    ///
    /// Child files fully written before the failure remain on disk; no
    /// cleanup is attempted.
    #[error("i/o failure on `{}`: {message}", .path.display())]
    Io {
        /// Path being read or written when the failure occurred.
        path: PathBuf,
        /// Underlying diagnostic.
        message: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`SplitError`] variants.
    enum SplitErrorCode for SplitError {
        /// The configured chunk size was not a positive integer.
        InvalidLinesPerFile => "SPLIT_INVALID_LINES_PER_FILE",
        /// The source path does not name an existing readable file.
        InvalidSource => "SPLIT_INVALID_SOURCE",
        /// The output directory does not exist or is not a directory.
        InvalidOutputDirectory => "SPLIT_INVALID_OUTPUT_DIRECTORY",
        /// The output directory exists but the process cannot write to it.
        UnwritableOutputDirectory => "SPLIT_UNWRITABLE_OUTPUT_DIRECTORY",
        /// The source failed row-format discovery.
        UnparsableSource => "SPLIT_UNPARSABLE_SOURCE",
        /// The source file name yields no usable base name for child files.
        InvalidFileName => "SPLIT_INVALID_FILE_NAME",
        /// A row-level read or write failed after the split began.
        Io => "SPLIT_IO",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case(SplitError::InvalidLinesPerFile { got: 0 }, "SPLIT_INVALID_LINES_PER_FILE")]
    #[case(
        SplitError::InvalidSource { path: PathBuf::from("x") },
        "SPLIT_INVALID_SOURCE"
    )]
    #[case(
        SplitError::UnparsableSource { path: PathBuf::from("x"), message: "bad".into() },
        "SPLIT_UNPARSABLE_SOURCE"
    )]
    #[case(
        SplitError::Io { path: PathBuf::from("x"), message: "disk full".into() },
        "SPLIT_IO"
    )]
    fn split_error_codes_are_stable(#[case] error: SplitError, #[case] expected: &str) {
        assert_eq!(error.code().as_str(), expected);
        assert_eq!(error.code().to_string(), expected);
    }

    #[test]
    fn unparsable_source_carries_the_parser_diagnostic() {
        let error = SplitError::UnparsableSource {
            path: PathBuf::from("input.csv"),
            message: "unterminated quote".into(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("input.csv"));
        assert!(rendered.contains("unterminated quote"));
    }
}
