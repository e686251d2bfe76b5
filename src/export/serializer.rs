// ==========================================
// Daily Works Exchange - Format Serializers
// ==========================================
// Responsibility: the uniform serialize(rows, headers, options) ->
// Blob contract, one implementation per output format. The crate
// ships the CSV serializer; spreadsheet and PDF byte layouts are
// owned by injected collaborators behind the same trait.
// ==========================================

use crate::domain::types::{OutputFormat, PerformanceMode};
use chrono::NaiveDateTime;
use std::error::Error;

// ==========================================
// Blob - generated file content
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ==========================================
// Metadata payload (optional second sheet / appended section)
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataPayload {
    pub generated_at: NaiveDateTime,
    pub record_count: usize,
    pub column_count: usize,
    pub format: OutputFormat,
    pub mode: PerformanceMode,
}

impl MetadataPayload {
    /// Key/value rows for serializers that render metadata tabularly
    pub fn as_rows(&self) -> Vec<(String, String)> {
        vec![
            (
                "Generated At".to_string(),
                self.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
            ("Record Count".to_string(), self.record_count.to_string()),
            ("Column Count".to_string(), self.column_count.to_string()),
            ("Format".to_string(), self.format.to_string()),
            ("Performance Mode".to_string(), self.mode.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SerializeOptions {
    pub metadata: Option<MetadataPayload>,
}

// ==========================================
// FormatSerializer trait
// ==========================================
// Implementations are not preemptible: once `serialize` starts it
// runs to completion; the pipeline checks cancellation beforehand.
pub trait FormatSerializer: Send + Sync {
    fn format(&self) -> OutputFormat;

    fn serialize(
        &self,
        rows: &[Vec<String>],
        headers: &[String],
        options: &SerializeOptions,
    ) -> Result<Blob, Box<dyn Error + Send + Sync>>;
}

// ==========================================
// CsvSerializer - built-in CSV implementation
// ==========================================
pub struct CsvSerializer;

impl FormatSerializer for CsvSerializer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn serialize(
        &self,
        rows: &[Vec<String>],
        headers: &[String],
        options: &SerializeOptions,
    ) -> Result<Blob, Box<dyn Error + Send + Sync>> {
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }

        // Metadata goes into an appended section after one blank row;
        // CSV has no second sheet to put it on.
        if let Some(metadata) = &options.metadata {
            let blank = vec![""; headers.len().max(2)];
            writer.write_record(&blank)?;
            for (key, value) in metadata.as_rows() {
                let mut record = vec![key, value];
                record.resize(headers.len().max(2), String::new());
                writer.write_record(&record)?;
            }
        }

        let bytes = writer.into_inner().map_err(|e| e.to_string())?;
        Ok(Blob {
            bytes,
            mime_type: OutputFormat::Csv.mime_type(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn headers() -> Vec<String> {
        vec!["Date".to_string(), "RFI Number".to_string()]
    }

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["2026-03-14".to_string(), "RFI-0001".to_string()],
            vec!["2026-03-15".to_string(), "RFI-0002".to_string()],
        ]
    }

    #[test]
    fn test_csv_serializer_basic() {
        let blob = CsvSerializer
            .serialize(&rows(), &headers(), &SerializeOptions::default())
            .unwrap();
        let text = String::from_utf8(blob.bytes).unwrap();
        assert!(text.starts_with("Date,RFI Number\n"));
        assert!(text.contains("2026-03-14,RFI-0001"));
        assert_eq!(blob.mime_type, "text/csv");
    }

    #[test]
    fn test_csv_serializer_quotes_embedded_commas() {
        let rows = vec![vec![
            "2026-03-14".to_string(),
            "pour, cure and strip".to_string(),
        ]];
        let blob = CsvSerializer
            .serialize(&rows, &headers(), &SerializeOptions::default())
            .unwrap();
        let text = String::from_utf8(blob.bytes).unwrap();
        assert!(text.contains("\"pour, cure and strip\""));
    }

    #[test]
    fn test_csv_serializer_appends_metadata_section() {
        let options = SerializeOptions {
            metadata: Some(MetadataPayload {
                generated_at: NaiveDate::from_ymd_opt(2026, 3, 14)
                    .unwrap()
                    .and_hms_opt(9, 30, 0)
                    .unwrap(),
                record_count: 2,
                column_count: 2,
                format: OutputFormat::Csv,
                mode: PerformanceMode::Balanced,
            }),
        };
        let blob = CsvSerializer.serialize(&rows(), &headers(), &options).unwrap();
        let text = String::from_utf8(blob.bytes).unwrap();
        assert!(text.contains("Generated At,2026-03-14 09:30:00"));
        assert!(text.contains("Record Count,2"));
        assert!(text.contains("Performance Mode,balanced"));
    }
}
