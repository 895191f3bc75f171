//! Command-line interface orchestration for the kirimi splitter.
//!
//! The CLI offers a single `split` command that partitions one delimited-text
//! source file into numbered child files bounded by a configurable number of
//! data rows.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, SplitCommand, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
