//! Export: writes the records of the current view as a pretty JSON array.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::ExportError;
use crate::types::LogRecord;

/// `logs-export-<ISO timestamp to the second, colons as hyphens>.json`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("logs-export-{}.json", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Pretty-printed JSON array of `records`, in the order given.
pub fn export_json<'a>(records: impl IntoIterator<Item = &'a LogRecord>) -> Result<String, ExportError> {
    let records: Vec<&LogRecord> = records.into_iter().collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Write `records` into `dir` under [`export_filename`] and return the path.
pub fn write_export<'a>(
    dir: &Path,
    records: impl IntoIterator<Item = &'a LogRecord>,
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let body = export_json(records)?;
    let path = dir.join(export_filename(now));
    std::fs::write(&path, body).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordFormat;
    use chrono::TimeZone;

    #[test]
    fn filename_replaces_colons() {
        let now = Utc.with_ymd_and_hms(2025, 10, 15, 7, 33, 22).unwrap();
        assert_eq!(export_filename(now), "logs-export-2025-10-15T07-33-22.json");
    }

    #[test]
    fn empty_export_is_empty_array() {
        assert_eq!(export_json(std::iter::empty::<&LogRecord>()).unwrap(), "[]");
    }

    #[test]
    fn writes_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let record = LogRecord::new("2025-01-02T03:04:05", now, RecordFormat::FormatB);
        let path = write_export(dir.path(), [&record], now).unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with("[\n"));
        assert!(body.contains("\"format\": \"FORMAT_B\""));
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = write_export(&missing, std::iter::empty::<&LogRecord>(), Utc::now()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
