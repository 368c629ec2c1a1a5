//! CSV export of session history.

use crate::types::SessionRecord;
use crate::Result;
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: String,
    date: String,
    week: u8,
    pain_shoulder: u8,
    pain_hip: u8,
    notes: &'a str,
}

impl<'a> From<&'a SessionRecord> for CsvRow<'a> {
    fn from(record: &'a SessionRecord) -> Self {
        CsvRow {
            id: record.id.to_string(),
            date: record.date.format("%Y-%m-%d").to_string(),
            week: record.week,
            pain_shoulder: record.pain_shoulder,
            pain_hip: record.pain_hip,
            notes: record.notes.as_deref().unwrap_or(""),
        }
    }
}

/// Write the full history to `csv_path`, replacing any existing file
///
/// The header row is always written, even for an empty history. The file is
/// synced to disk before returning. Returns the number of rows written.
pub fn export_csv(records: &[SessionRecord], csv_path: &Path) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(["id", "date", "week", "pain_shoulder", "pain_hip", "notes"])?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sessions to {:?}", records.len(), csv_path);
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PainReadings;
    use chrono::NaiveDate;

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out").join("history.csv");

        let records = vec![
            SessionRecord::new(
                NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
                1,
                PainReadings { shoulder: 4, hip: 2 },
                None,
            ),
            SessionRecord::new(
                NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
                2,
                PainReadings { shoulder: 3, hip: 2 },
                Some("no flare, rolled light".into()),
            ),
        ];

        let count = export_csv(&records, &csv_path).unwrap();
        assert_eq!(count, 2);

        let content = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,date,week,pain_shoulder,pain_hip,notes");
        assert!(lines[1].ends_with(",2025-01-06,1,4,2,"));
        assert!(lines[2].ends_with(",2025-01-08,2,3,2,\"no flare, rolled light\""));
    }

    #[test]
    fn test_export_empty_history() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        assert_eq!(export_csv(&[], &csv_path).unwrap(), 0);
        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.trim(), "id,date,week,pain_shoulder,pain_hip,notes");
    }
}
