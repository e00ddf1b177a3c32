//! Text output writer for reports and Verilog snippets.

use super::json::{create_parent_dirs, validate_output_path};
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write rendered text to a file
///
/// **Public** - used for the report and the Verilog seed snippet
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is invalid
pub fn write_text(content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing text output to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_text_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");

        write_text("REGISTER TRACE ANALYSIS\n", &path).unwrap();

        let loaded = std::fs::read_to_string(&path).unwrap();
        assert_eq!(loaded, "REGISTER TRACE ANALYSIS\n");
    }

    #[test]
    fn test_write_text_rejects_directory() {
        let dir = tempdir().unwrap();
        assert!(write_text("x", dir.path()).is_err());
    }
}
