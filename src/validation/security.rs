// ==========================================
// Daily Works Exchange - Security Validator
// ==========================================
// Responsibility: permission checks, record-limit enforcement and the
// sensitive-field heuristic. The privacy flag is advisory only; the
// engine never blocks purely on it.
// ==========================================

use crate::domain::types::Severity;
use crate::registry::FieldDescriptor;
use crate::validation::{SecurityChecks, ValidationIssue};
use serde::{Deserialize, Serialize};

/// Substrings that mark a field as potentially sensitive
const SENSITIVE_MARKERS: &[&str] = &["phone", "email", "ssn", "personal"];

// ==========================================
// UserPermissions - caller-supplied capability set
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPermissions {
    pub can_export: bool,
    pub can_access_data: bool,
    pub max_records: usize,
}

impl Default for UserPermissions {
    fn default() -> Self {
        Self {
            can_export: true,
            can_access_data: true,
            max_records: 50_000,
        }
    }
}

/// Run the security checks over a candidate export.
///
/// Returns the boolean check set plus display issues. Denials are
/// Critical; the privacy advisory is Info.
pub fn validate_security(
    selected: &[&FieldDescriptor],
    record_count: usize,
    permissions: &UserPermissions,
) -> (SecurityChecks, Vec<ValidationIssue>) {
    let mut issues = Vec::new();

    let data_access = permissions.can_export && permissions.can_access_data;
    if !data_access {
        issues.push(ValidationIssue {
            severity: Severity::Critical,
            field: None,
            row: None,
            message: "export denied: missing export or data-access permission".to_string(),
        });
    }

    let file_generation = record_count <= permissions.max_records;
    if !file_generation {
        issues.push(ValidationIssue {
            severity: Severity::Critical,
            field: None,
            row: None,
            message: format!(
                "export denied: {} records exceed the permitted maximum of {}",
                record_count, permissions.max_records
            ),
        });
    }

    let sensitive: Vec<&str> = selected
        .iter()
        .filter(|f| is_sensitive(f))
        .map(|f| f.key)
        .collect();
    let data_privacy = sensitive.is_empty();
    if !data_privacy {
        issues.push(ValidationIssue {
            severity: Severity::Info,
            field: Some(sensitive.join(", ")),
            row: None,
            message: format!(
                "selected columns may contain personal data ({}); manual review advised",
                sensitive.join(", ")
            ),
        });
    }

    (
        SecurityChecks {
            data_access,
            file_generation,
            data_privacy,
        },
        issues,
    )
}

fn is_sensitive(field: &FieldDescriptor) -> bool {
    let key = field.key.to_lowercase();
    let label = field.label.to_lowercase();
    SENSITIVE_MARKERS
        .iter()
        .any(|marker| key.contains(marker) || label.contains(marker))
}
