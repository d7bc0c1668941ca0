//! CSV export of report rows.

use webgis_source_models::{REPORT_COLUMNS, ReportRecord};

/// Errors that can occur while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `rows` as CSV with a header of the declared columns. Absent
/// values are written as empty fields.
///
/// # Errors
///
/// Returns [`ExportError`] if writing fails.
pub fn write_csv<W: std::io::Write>(rows: &[ReportRecord], writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(REPORT_COLUMNS)?;
    for row in rows {
        csv.write_record(row.values().map(Option::unwrap_or_default))?;
    }
    csv.flush()?;
    Ok(())
}

/// Renders `rows` as a CSV document.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization fails.
pub fn to_csv_bytes(rows: &[ReportRecord]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let rows = vec![ReportRecord {
            id: Some("7".to_string()),
            report_name: Some("Pérez, Juan".to_string()),
            issue_type: Some("structural".to_string()),
            ..ReportRecord::default()
        }];
        let text = String::from_utf8(to_csv_bytes(&rows).unwrap()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "_id,report_name,contact_info,location,issue_type,location_desc,\
             urgency_level,issue_description,detection_date,photo_evidence"
        );
        assert_eq!(lines.next().unwrap(), "7,\"Pérez, Juan\",,,structural,,,,,");
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_export_has_only_header() {
        let text = String::from_utf8(to_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
