//! Report export: document model, report builder, HTML formatter and the
//! `.doc` file writer

mod document;
mod filename;
mod html;
mod report;

pub use document::{Align, Block, Cell, Document, Inline, Row, Table};
pub use filename::{export_file_name, sanitize};
pub use html::{escape_html, render_html};
pub use report::{build_report, REPORT_TITLE};

use crate::persistence::Snapshot;
use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Byte order mark Word uses to detect UTF-8
pub const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("the form has no field `{0}`")]
    MissingField(String),
    #[error("export directory {} does not exist", .0.display())]
    NoExportDir(PathBuf),
    #[error("could not write the report: {0}")]
    Io(#[from] io::Error),
}

/// Build, render and write the report into `dir`; returns the written path
pub fn write_report(dir: &Path, snapshot: &Snapshot, date: NaiveDate) -> Result<PathBuf, ExportError> {
    if !dir.is_dir() {
        return Err(ExportError::NoExportDir(dir.to_path_buf()));
    }
    let document = build_report(snapshot)?;
    let html = render_html(&document);
    let path = dir.join(export_file_name(snapshot, date));
    fs::write(&path, format!("{UTF8_BOM}{html}"))?;
    let filled = document
        .inlines()
        .filter(|i| matches!(i, Inline::Value(v) if !v.is_empty()))
        .count();
    tracing::info!("Exported report to {} ({filled} filled values)", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::capture;
    use crate::state::monitoring::monitoring_schema;
    use crate::state::{FieldValue, MonitoringForm};
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[test]
    fn test_written_file_starts_with_bom() {
        let tmp = TempDir::new().unwrap();
        let mut form = MonitoringForm::new(monitoring_schema()).unwrap();
        form.set_value("sdo", FieldValue::text("Makati")).unwrap();
        form.set_value("schoolNameDeped", FieldValue::text("Bright <Future> School"))
            .unwrap();
        let path = write_report(tmp.path(), &capture(&form), date()).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("Makati_Bright_Future_School_2024-06-03.doc")
        );
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(UTF8_BOM));
        assert!(content.contains("MONITORING TOOL FOR PRIVATE SCHOOLS"));
        assert!(content.contains("Bright &lt;Future&gt; School"));
    }

    #[test]
    fn test_missing_dir_is_reported() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("does-not-exist");
        let snapshot = capture(&MonitoringForm::new(monitoring_schema()).unwrap());
        assert!(matches!(
            write_report(&dir, &snapshot, date()),
            Err(ExportError::NoExportDir(_))
        ));
    }

    #[test]
    fn test_missing_field_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let result = write_report(tmp.path(), &Snapshot::new(), date());
        assert!(matches!(result, Err(ExportError::MissingField(_))));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
