//! Manifest parsing (§6): a line-oriented text file naming the PDFs a
//! `build` or `score` run should process.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NabuError, Result};

/// Read a manifest file: one path per line, `#`-prefixed comments and blank
/// lines ignored. Order is preserved; duplicate lines are preserved too
/// (the driver is responsible for any deduplication it needs).
///
/// # Errors
/// Returns [`NabuError::Input`] if the manifest cannot be read — an
/// unrecoverable init failure per §6's exit-code table.
pub fn read_manifest(path: &Path) -> Result<Vec<PathBuf>> {
    let contents = fs::read_to_string(path).map_err(|source| NabuError::Input {
        message: format!("could not read manifest {}: {source}", path.display()),
    })?;
    Ok(contents
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::read_manifest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        #[expect(clippy::unwrap_used, reason = "test fixture setup")]
        let mut file = NamedTempFile::new().unwrap();
        #[expect(clippy::unwrap_used, reason = "test fixture setup")]
        writeln!(file, "# a comment\n\na.pdf\n\nb.pdf\n# trailing").unwrap();
        #[expect(clippy::unwrap_used, reason = "assert-only test path")]
        let paths = read_manifest(file.path()).unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn unreadable_manifest_is_an_input_error() {
        let err = read_manifest(std::path::Path::new("/does/not/exist")).unwrap_err();
        assert_eq!(err.code(), crate::error::NabuErrorCode::Input);
    }
}
