//! Child-file naming for split output.
//!
//! Pure helpers, no I/O. The child path for index `N` is
//! `output_directory/base-N.ext`, where `base` is everything before the
//! source file name's last period and `ext` everything after it; a source
//! without an extension yields `base-N`.

use std::path::{Path, PathBuf};

use crate::error::SplitError;

/// Builds the child path for 1-based `index`, deterministic for a given
/// (source name, directory, index) triple.
pub(crate) fn child_path(
    source: &Path,
    directory: &Path,
    index: usize,
) -> Result<PathBuf, SplitError> {
    let name = source
        .file_name()
        .and_then(|raw| raw.to_str())
        .ok_or_else(|| SplitError::InvalidFileName {
            name: source.display().to_string(),
        })?;
    Ok(directory.join(child_file_name(name, index)?))
}

/// Splits `name` on its last period and formats `base-index[.ext]`.
fn child_file_name(name: &str, index: usize) -> Result<String, SplitError> {
    let (base, extension) = match name.rsplit_once('.') {
        Some((base, extension)) => (base, extension),
        None => (name, ""),
    };
    if base.is_empty() {
        return Err(SplitError::InvalidFileName {
            name: name.to_owned(),
        });
    }
    if extension.is_empty() {
        Ok(format!("{base}-{index}"))
    } else {
        Ok(format!("{base}-{index}.{extension}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::with_extension("example.csv", 1, "example-1.csv")]
    #[case::double_digit_index("example.csv", 10, "example-10.csv")]
    #[case::no_extension("data", 2, "data-2")]
    #[case::multiple_periods("archive.tar.gz", 3, "archive.tar-3.gz")]
    #[case::trailing_period("report.", 1, "report-1")]
    fn child_file_name_formats_base_index_extension(
        #[case] name: &str,
        #[case] index: usize,
        #[case] expected: &str,
    ) {
        let formatted = child_file_name(name, index).expect("name must be usable");
        assert_eq!(formatted, expected);
    }

    #[rstest]
    #[case::hidden_file(".env")]
    #[case::bare_period(".")]
    fn child_file_name_rejects_empty_base(#[case] name: &str) {
        let err = child_file_name(name, 1).expect_err("empty base must fail");
        assert!(matches!(err, SplitError::InvalidFileName { .. }));
    }

    #[test]
    fn child_path_joins_directory_and_formatted_name() {
        let path = child_path(Path::new("/in/example.csv"), Path::new("/out"), 4)
            .expect("name must be usable");
        assert_eq!(path, Path::new("/out/example-4.csv"));
    }

    #[test]
    fn child_path_reports_the_offending_name() {
        let err = child_path(Path::new("/in/.env"), Path::new("/out"), 1)
            .expect_err("hidden file has no base name");
        assert!(matches!(err, SplitError::InvalidFileName { name } if name == ".env"));
    }
}
