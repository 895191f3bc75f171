//! Kirimi core library: splits a delimited-text file into row-bounded
//! child files, optionally repeating a shared header row in each.

mod builder;
mod error;
mod naming;
mod report;
mod rowcodec;
mod splitter;
#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::SplitterBuilder,
    error::{Result, RowFormatError, SplitError, SplitErrorCode},
    report::SplitReport,
    rowcodec::{Row, RowCodec, RowReader, RowWriter},
    splitter::Splitter,
};
