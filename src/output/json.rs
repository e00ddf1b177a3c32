//! JSON analysis document writer.
//!
//! Writes Analysis structs to JSON files with proper formatting.

use crate::analyzer::Analysis;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write an analysis document to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_analysis(analysis: &Analysis, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing analysis to: {}", output_path.display());

    validate_output_path(output_path)?;
    create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, analysis).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Read an analysis document from a JSON file
///
/// **Public** - used by validation and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_analysis(input_path: impl AsRef<Path>) -> Result<Analysis, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading analysis from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let analysis: Analysis = serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Analysis loaded: version {}, source {}",
        analysis.version, analysis.source
    );

    Ok(analysis)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
pub(super) fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create parent directories if needed
///
/// **Private** - shared with the text writer
pub(super) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{analyze_trace, to_analysis, AnalyzerConfig};
    use crate::parser::parse_trace;
    use tempfile::NamedTempFile;

    fn create_test_analysis() -> Analysis {
        let config = AnalyzerConfig::default();
        let events = parse_trace("Write 0x0 0x5 0x4\nWrite 0x4 0xa 0x4\nRead 0x8 0x1 0x4\n");
        to_analysis("test.txt", &analyze_trace(&events, &config), &config)
    }

    #[test]
    fn test_write_and_read_analysis() {
        let analysis = create_test_analysis();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_analysis(&analysis, path).unwrap();
        let loaded = read_analysis(path).unwrap();

        assert_eq!(loaded.version, analysis.version);
        assert_eq!(loaded.source, analysis.source);
        assert_eq!(loaded.total_events, analysis.total_events);
        assert_eq!(loaded.pairs.len(), analysis.pairs.len());
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/analysis.json");

        write_analysis(&create_test_analysis(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }
}
