//! Small helpers shared across CLI tests.
//!
//! The CLI unit tests build temporary CSV inputs and assert both the
//! reported summary and the bytes that land on disk. These helpers keep the
//! test cases concise and consistent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::commands::run_split;
use super::{Cli, CliError, SplitCommand, run_cli};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_csv_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Builds `rows` CSV data rows shaped `item-N,N`.
pub(super) fn numbered_csv(rows: usize) -> String {
    (1..=rows)
        .map(|index| format!("item-{index},{index}\n"))
        .collect()
}

pub(super) fn split_command(
    source: PathBuf,
    dest: &TempDir,
    lines: usize,
    has_header: bool,
) -> SplitCommand {
    SplitCommand {
        source,
        lines,
        dest: dest.path().to_path_buf(),
        has_header,
    }
}

/// Counts the newline-terminated rows of a written child file.
pub(super) fn row_count(path: &Path) -> usize {
    fs::read_to_string(path)
        .map(|text| text.lines().count())
        .unwrap_or(0)
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn run_split_expecting_error(command: SplitCommand, panic_msg: &str) -> CliError {
    match run_split(command) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
