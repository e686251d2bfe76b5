// ==========================================
// Daily Works Exchange - Upload File Acceptance
// ==========================================
// Responsibility: the accepted-type table. Extension and MIME are
// matched against the table; size ceilings differ per type. PDFs are
// accepted as reference material but carry no importable rows.
// ==========================================

use crate::domain::work_record::UploadedFile;
use crate::import::error::{ImportError, ImportStepResult};

const MB: u64 = 1024 * 1024;

// ==========================================
// UploadKind - resolved file class
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Spreadsheet,
    Csv,
    Pdf,
}

struct AcceptedType {
    kind: UploadKind,
    extensions: &'static [&'static str],
    mime_types: &'static [&'static str],
    max_size_bytes: u64,
    data_importable: bool,
}

const ACCEPTED_TYPES: &[AcceptedType] = &[
    AcceptedType {
        kind: UploadKind::Spreadsheet,
        extensions: &["xlsx", "xls"],
        mime_types: &[
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "application/vnd.ms-excel",
        ],
        max_size_bytes: 10 * MB,
        data_importable: true,
    },
    AcceptedType {
        kind: UploadKind::Csv,
        extensions: &["csv"],
        mime_types: &["text/csv", "application/csv", "text/plain"],
        max_size_bytes: 5 * MB,
        data_importable: true,
    },
    AcceptedType {
        kind: UploadKind::Pdf,
        extensions: &["pdf"],
        mime_types: &["application/pdf"],
        max_size_bytes: 15 * MB,
        data_importable: false,
    },
];

impl UploadKind {
    pub fn is_data_importable(&self) -> bool {
        entry_for(*self).data_importable
    }

    pub fn max_size_bytes(&self) -> u64 {
        entry_for(*self).max_size_bytes
    }
}

fn entry_for(kind: UploadKind) -> &'static AcceptedType {
    ACCEPTED_TYPES
        .iter()
        .find(|t| t.kind == kind)
        .expect("every UploadKind has a table entry")
}

/// Resolve and check one uploaded file against the accepted-type
/// table. Extension wins; MIME is accepted as a fallback for files
/// without a usable extension.
pub fn check_file(file: &UploadedFile) -> ImportStepResult<UploadKind> {
    let extension = file.extension();
    let mime = file.mime_type.to_lowercase();

    let entry = ACCEPTED_TYPES
        .iter()
        .find(|t| t.extensions.contains(&extension.as_str()))
        .or_else(|| {
            ACCEPTED_TYPES
                .iter()
                .find(|t| t.mime_types.contains(&mime.as_str()))
        })
        .ok_or_else(|| {
            ImportError::UnsupportedFormat(if extension.is_empty() {
                mime.clone()
            } else {
                format!(".{}", extension)
            })
        })?;

    if file.size_bytes > entry.max_size_bytes {
        return Err(ImportError::FileTooLarge {
            file_name: file.file_name.clone(),
            size_bytes: file.size_bytes,
            limit_bytes: entry.max_size_bytes,
        });
    }

    Ok(entry.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str, size: u64) -> UploadedFile {
        let mut f = UploadedFile::new(name, mime, vec![]);
        f.size_bytes = size;
        f
    }

    #[test]
    fn test_accepts_by_extension() {
        assert_eq!(
            check_file(&file("works.xlsx", "application/octet-stream", 100)).unwrap(),
            UploadKind::Spreadsheet
        );
        assert_eq!(
            check_file(&file("works.csv", "text/csv", 100)).unwrap(),
            UploadKind::Csv
        );
        assert_eq!(
            check_file(&file("drawing.pdf", "application/pdf", 100)).unwrap(),
            UploadKind::Pdf
        );
    }

    #[test]
    fn test_accepts_by_mime_without_extension() {
        assert_eq!(
            check_file(&file("export", "text/csv", 100)).unwrap(),
            UploadKind::Csv
        );
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = check_file(&file("notes.docx", "application/msword", 100)).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_size_ceilings_per_type() {
        // CSV limit is 5MB; the same size is fine for a spreadsheet
        let big = 6 * MB;
        assert!(matches!(
            check_file(&file("works.csv", "text/csv", big)).unwrap_err(),
            ImportError::FileTooLarge { limit_bytes, .. } if limit_bytes == 5 * MB
        ));
        assert!(check_file(&file("works.xlsx", "", big)).is_ok());
    }

    #[test]
    fn test_pdf_is_not_data_importable() {
        assert!(!UploadKind::Pdf.is_data_importable());
        assert!(UploadKind::Csv.is_data_importable());
        assert_eq!(UploadKind::Pdf.max_size_bytes(), 15 * MB);
    }
}
