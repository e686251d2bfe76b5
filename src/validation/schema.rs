// ==========================================
// Daily Works Exchange - Schema Validator
// ==========================================
// Responsibility: structural contract on the ExportConfig / upload
// batch shape itself. Unknown registry keys are NOT handled here; the
// engine treats those as programmer errors before dispatch.
// ==========================================

use crate::domain::config::ExportConfig;
use crate::domain::types::Severity;
use crate::registry::{FieldRegistry, MAX_SELECTED_COLUMNS};
use crate::validation::{PerformanceThresholds, ValidationIssue};
use std::collections::HashSet;

/// Header columns every upload file must carry
pub const REQUIRED_UPLOAD_COLUMNS: &[&str] = &["date", "work_type", "description", "quantity", "unit"];

/// Structural checks on an export configuration.
///
/// Always returns the complete issue list; nothing short-circuits.
pub fn validate_export_schema(
    config: &ExportConfig,
    record_count: usize,
    registry: &FieldRegistry,
    thresholds: &PerformanceThresholds,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    // Column count bounds
    if config.selected_columns.is_empty() {
        issues.push(
            ValidationIssue::critical("at least 1 column must be selected")
                .with_field("selected_columns"),
        );
    } else if config.selected_columns.len() > MAX_SELECTED_COLUMNS {
        issues.push(
            ValidationIssue::critical(format!(
                "at most {} columns may be selected, got {}",
                MAX_SELECTED_COLUMNS,
                config.selected_columns.len()
            ))
            .with_field("selected_columns"),
        );
    }

    // Duplicate selections
    let mut seen = HashSet::new();
    for key in &config.selected_columns {
        if !seen.insert(key.as_str()) {
            issues.push(
                ValidationIssue::critical(format!("column '{}' selected more than once", key))
                    .with_field(key.clone()),
            );
        }
    }

    // Required-column membership; the error names each missing key
    for field in registry.required_fields() {
        if !config.selected_columns.iter().any(|k| k == field.key) {
            issues.push(
                ValidationIssue::critical(format!(
                    "required columns missing: '{}' must be selected",
                    field.key
                ))
                .with_field(field.key),
            );
        }
    }

    // Filename: ^[A-Za-z0-9_-]{1,100}$
    if !filename_is_valid(&config.file_name_base) {
        issues.push(
            ValidationIssue::critical(
                "file name must be 1-100 characters of letters, digits, '_' or '-'",
            )
            .with_field("file_name_base"),
        );
    }

    // Hard record ceiling (the upper performance tier is a schema
    // error, not a performance warning)
    if record_count > thresholds.max_record_count {
        issues.push(
            ValidationIssue::critical(format!(
                "record count {} exceeds the maximum of {}",
                record_count, thresholds.max_record_count
            ))
            .with_field("record_count"),
        );
    }

    issues
}

/// Ingest-mode structural check: the upload header row must carry the
/// required columns.
pub fn validate_upload_schema(headers: &[String]) -> Vec<ValidationIssue> {
    let present: HashSet<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    REQUIRED_UPLOAD_COLUMNS
        .iter()
        .filter(|required| !present.contains(**required))
        .map(|required| {
            ValidationIssue {
                severity: Severity::Critical,
                field: Some((*required).to_string()),
                row: None,
                message: format!("required upload column '{}' is missing", required),
            }
        })
        .collect()
}

fn filename_is_valid(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 100
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
