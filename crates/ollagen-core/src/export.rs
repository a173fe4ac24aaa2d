//! History archive export

use crate::error::{GenError, Result};
use chrono::NaiveDateTime;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Download name for an archive built at `at`, e.g.
/// `ollama_history_20240501_093000.zip`
pub fn archive_file_name(at: NaiveDateTime) -> String {
    format!("ollama_history_{}.zip", at.format("%Y%m%d_%H%M%S"))
}

/// Pack `(name, bytes)` entries into an in-memory deflate zip archive.
pub fn write_history_archive(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let archive_error = |e: zip::result::ZipError| GenError::write_failed("history archive", e);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in entries {
        writer.start_file(name.as_str(), options).map_err(archive_error)?;
        writer
            .write_all(bytes)
            .map_err(|e| GenError::write_failed("history archive", e))?;
    }

    let cursor = writer.finish().map_err(archive_error)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Read;

    #[test]
    fn test_archive_file_name() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(archive_file_name(at), "ollama_history_20240501_093000.zip");
    }

    #[test]
    fn test_archive_contains_entries() {
        let entries = vec![
            ("a.json".to_string(), b"{\"id\":\"a\"}".to_vec()),
            ("b.json".to_string(), b"{\"id\":\"b\"}".to_vec()),
        ];

        let bytes = write_history_archive(&entries).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("b.json")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "{\"id\":\"b\"}");
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = write_history_archive(&[]).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
