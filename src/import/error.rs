// ==========================================
// Daily Works Exchange - Import Error Types
// ==========================================
// Tool: thiserror derive macro
// Per-file failures are recorded on the batch, not thrown; these
// variants cross the parser collaborator boundary with the original
// message preserved.
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== file acceptance =====
    #[error("unsupported file type '{0}' (accepted: .xlsx/.xls/.csv/.pdf)")]
    UnsupportedFormat(String),

    #[error("file '{file_name}' is {size_bytes} bytes, over the {limit_bytes} byte limit")]
    FileTooLarge {
        file_name: String,
        size_bytes: u64,
        limit_bytes: u64,
    },

    #[error("file '{0}' contains no data rows")]
    EmptyFile(String),

    #[error("PDF '{0}' is reference-only; its rows cannot be imported")]
    PdfNotImportable(String),

    // ===== parse boundary =====
    #[error("spreadsheet parse failed: {0}")]
    SpreadsheetParse(String),

    #[error("CSV parse failed: {0}")]
    CsvParse(String),

    // ===== generic =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParse(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::SpreadsheetParse(err.to_string())
    }
}

pub type ImportStepResult<T> = Result<T, ImportError>;
