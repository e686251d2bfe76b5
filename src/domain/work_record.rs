// ==========================================
// Daily Works Exchange - Work Record
// ==========================================
// Responsibility: the daily-work row type plus the upload-side
// containers (UploadedFile, UploadBatch)
// Invariants on WorkRecord are enforced by validation::business,
// never by constructors.
// ==========================================

use crate::domain::types::{RoadSide, WorkStatus, WorkType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw header-keyed row as produced by the file parsers
pub type RawRow = HashMap<String, String>;

// ==========================================
// WorkRecord - one construction daily-work row
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub date: NaiveDate,
    pub rfi_number: String,
    pub status: WorkStatus,
    pub assigned_user_id: Option<String>,
    pub incharge_user_id: Option<String>,
    pub work_type: WorkType,
    pub description: String,
    pub location: String,
    pub side: Option<RoadSide>,
    /// Quantity / layer annotation, free text ("120 m3 / layer 2")
    pub qty_layer: Option<String>,
    pub planned_time: Option<NaiveDateTime>,
    pub completion_time: Option<NaiveDateTime>,
    pub inspection_details: Option<String>,
    pub resubmission_count: u32,
    pub rfi_submission_date: Option<NaiveDate>,
}

// ==========================================
// FieldValue - typed view of a single record field
// ==========================================
// Used by the export projector (rendering) and the integrity
// validator (emptiness / completeness checks).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Empty,
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl WorkRecord {
    /// Typed value of the field named by a registry key.
    ///
    /// Returns `None` for a key the registry does not declare; callers
    /// treat that as a programmer error, not a data error.
    pub fn field_value(&self, key: &str) -> Option<FieldValue> {
        let value = match key {
            "date" => FieldValue::Date(self.date),
            "rfi_number" => FieldValue::Text(self.rfi_number.clone()),
            "status" => FieldValue::Text(self.status.as_str().to_string()),
            "assigned_user_id" => opt_text(self.assigned_user_id.as_deref()),
            "incharge_user_id" => opt_text(self.incharge_user_id.as_deref()),
            "work_type" => FieldValue::Text(self.work_type.as_str().to_string()),
            "description" => FieldValue::Text(self.description.clone()),
            "location" => FieldValue::Text(self.location.clone()),
            "side" => match self.side {
                Some(side) => FieldValue::Text(side.as_str().to_string()),
                None => FieldValue::Empty,
            },
            "qty_layer" => opt_text(self.qty_layer.as_deref()),
            "planned_time" => match self.planned_time {
                Some(t) => FieldValue::DateTime(t),
                None => FieldValue::Empty,
            },
            "completion_time" => match self.completion_time {
                Some(t) => FieldValue::DateTime(t),
                None => FieldValue::Empty,
            },
            "inspection_details" => opt_text(self.inspection_details.as_deref()),
            "resubmission_count" => FieldValue::Number(f64::from(self.resubmission_count)),
            "rfi_submission_date" => match self.rfi_submission_date {
                Some(d) => FieldValue::Date(d),
                None => FieldValue::Empty,
            },
            _ => return None,
        };
        Some(value)
    }
}

fn opt_text(value: Option<&str>) -> FieldValue {
    match value {
        Some(s) if !s.trim().is_empty() => FieldValue::Text(s.to_string()),
        _ => FieldValue::Empty,
    }
}

// ==========================================
// FieldError - one field-level problem on a row or file
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ==========================================
// UploadedFile - one user-supplied file, held in memory
// ==========================================
// Byte-level parsing is delegated to the per-type FileParser; this
// struct only carries identity and payload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        let size_bytes = data.len() as u64;
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            data,
        }
    }

    /// Lowercased filename extension, empty when absent
    pub fn extension(&self) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }
}

// ==========================================
// UploadBatch - the mutable state of one import session
// ==========================================
// Created on file selection, filled through parse -> validate stages,
// discarded on reset / cancel / success.
#[derive(Debug, Default)]
pub struct UploadBatch {
    pub files: Vec<UploadedFile>,
    /// Parsed rows per file, indexed like `files`
    pub parsed_rows: Vec<Vec<WorkRecord>>,
    /// File-level failures (type check, parse error), keyed by file index
    pub file_errors: HashMap<usize, Vec<FieldError>>,
    /// Row-level failures, keyed by global row index across all files
    pub row_errors: HashMap<usize, Vec<FieldError>>,
}

impl UploadBatch {
    pub fn new(files: Vec<UploadedFile>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }

    /// Total number of successfully parsed rows across all files
    pub fn total_rows(&self) -> usize {
        self.parsed_rows.iter().map(Vec::len).sum()
    }
}
