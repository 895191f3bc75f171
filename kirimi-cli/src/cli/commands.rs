//! Command implementations and argument parsing for the kirimi CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use kirimi_core::{SplitError, SplitReport, SplitterBuilder};
use kirimi_providers_csv::CsvCodec;
use thiserror::Error;
use tracing::{Span, field, info, instrument};

const DEFAULT_LINES_PER_FILE: usize = 100;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "kirimi",
    about = "Split a delimited-text file into row-bounded child files."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Split one source file into numbered child files.
    Split(SplitCommand),
}

/// Options accepted by the `split` command.
#[derive(Debug, Args, Clone)]
pub struct SplitCommand {
    /// Path to the delimited-text file to split.
    pub source: PathBuf,

    /// Maximum number of data rows per child file.
    #[arg(
        long = "lines",
        default_value_t = DEFAULT_LINES_PER_FILE,
        value_parser = clap::value_parser!(usize),
    )]
    pub lines: usize,

    /// Directory the child files are written into (must already exist).
    #[arg(long = "dest", default_value = ".")]
    pub dest: PathBuf,

    /// Treat the source's first row as a header and repeat it at the top of
    /// every child file.
    #[arg(long = "has-header")]
    pub has_header: bool,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration or split execution failed.
    #[error(transparent)]
    Split(#[from] SplitError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// File name of the source that was split.
    pub source: String,
    /// Child paths written by the split, in creation order.
    pub report: SplitReport,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when configuration validation or the split fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use kirimi_cli::cli::{Cli, Command, SplitCommand, run_cli};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = tempfile::tempdir()?;
/// let source = dir.path().join("rows.csv");
/// std::fs::write(&source, "a,b\nc,d\n")?;
/// let cli = Cli {
///     command: Command::Split(SplitCommand {
///         source,
///         lines: 1,
///         dest: dir.path().to_path_buf(),
///         has_header: false,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.report.child_count(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Split(split) => {
            Span::current().record("command", field::display("split"));
            run_split(split)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        source = field::Empty,
        lines = field::Empty,
        dest = field::Empty,
        has_header = field::Empty,
    ),
)]
pub(super) fn run_split(command: SplitCommand) -> Result<ExecutionSummary, CliError> {
    let SplitCommand {
        source,
        lines,
        dest,
        has_header,
    } = command;
    let span = Span::current();
    span.record("source", field::display(source.display()));
    span.record("lines", field::display(lines));
    span.record("dest", field::display(dest.display()));
    span.record("has_header", field::display(has_header));

    let splitter = SplitterBuilder::new()
        .with_lines_per_file(lines)
        .with_output_directory(dest)
        .with_file_has_header(has_header)
        .build()?;
    let report = splitter.split(&CsvCodec, &source)?;

    let summary = ExecutionSummary {
        source: source_display_name(&source),
        report,
    };
    info!(
        source = summary.source.as_str(),
        children = summary.report.child_count(),
        data_rows = summary.report.data_rows(),
        "command completed"
    );
    Ok(summary)
}

pub(super) fn source_display_name(source: &Path) -> String {
    source
        .file_name()
        .and_then(|name| name.to_str())
        .map_or_else(|| source.display().to_string(), ToOwned::to_owned)
}

/// Renders `summary` to `writer` in a human-readable text format: the source
/// name, the count of files written, then one child path per line.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::path::PathBuf;
/// # use kirimi_cli::cli::{ExecutionSummary, render_summary};
/// # use kirimi_core::SplitReport;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     source: "rows.csv".into(),
///     report: SplitReport::from_parts(vec![PathBuf::from("out/rows-1.csv")], 42),
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer)?;
/// assert!(text.contains("files written: 1"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "source: {}", summary.source)?;
    writeln!(writer, "files written: {}", summary.report.child_count())?;
    for child in summary.report.children() {
        writeln!(writer, "{}", child.display())?;
    }
    Ok(())
}
