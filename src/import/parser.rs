// ==========================================
// Daily Works Exchange - Upload File Parsers
// ==========================================
// Responsibility: byte-level parsing of uploaded files into raw
// header-keyed rows. One parser per accepted type; PDF refuses.
// Blank rows are skipped; header cells are trimmed and lowercased.
// ==========================================

use crate::domain::work_record::{RawRow, UploadedFile};
use crate::import::error::{ImportError, ImportStepResult};
use crate::import::file_check::UploadKind;
use calamine::{Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;

// ==========================================
// ParsedFile - parser output
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// Header row, trimmed and lowercased
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

// ==========================================
// FileParser trait
// ==========================================
pub trait FileParser: Send + Sync {
    fn parse(&self, file: &UploadedFile) -> ImportStepResult<ParsedFile>;
}

/// Parser for a resolved upload kind; `None` only if a new kind is
/// added to the table without a parser (programmer error upstream).
pub fn parser_for(kind: UploadKind) -> Box<dyn FileParser> {
    match kind {
        UploadKind::Csv => Box::new(CsvParser),
        UploadKind::Spreadsheet => Box::new(SpreadsheetParser),
        UploadKind::Pdf => Box::new(PdfParser),
    }
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse(&self, file: &UploadedFile) -> ImportStepResult<ParsedFile> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // tolerate ragged row lengths
            .from_reader(file.data.as_slice());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = RawRow::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row.insert(header.clone(), value.trim().to_string());
                }
            }

            // Skip fully blank rows
            if row.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(ImportError::EmptyFile(file.file_name.clone()));
        }
        Ok(ParsedFile { headers, rows })
    }
}

// ==========================================
// Spreadsheet Parser (first worksheet only)
// ==========================================
pub struct SpreadsheetParser;

impl FileParser for SpreadsheetParser {
    fn parse(&self, file: &UploadedFile) -> ImportStepResult<ParsedFile> {
        let cursor = Cursor::new(file.data.as_slice());
        let mut workbook: Xlsx<_> = Xlsx::new(cursor)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::SpreadsheetParse("workbook has no worksheets".into()))?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::SpreadsheetParse(e.to_string()))?;

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows.next().ok_or_else(|| {
            ImportError::SpreadsheetParse("worksheet has no header row".into())
        })?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_lowercase())
            .collect();

        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let mut row = RawRow::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }
            if row.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(ImportError::EmptyFile(file.file_name.clone()));
        }
        Ok(ParsedFile { headers, rows })
    }
}

// ==========================================
// PDF Parser - reference-only, never yields rows
// ==========================================
pub struct PdfParser;

impl FileParser for PdfParser {
    fn parse(&self, file: &UploadedFile) -> ImportStepResult<ParsedFile> {
        Err(ImportError::PdfNotImportable(file.file_name.clone()))
    }
}
