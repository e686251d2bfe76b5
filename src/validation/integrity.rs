// ==========================================
// Daily Works Exchange - Data Integrity Validator
// ==========================================
// Responsibility: completeness of required columns (reported as a
// count, not per row), type checks on raw ingest values, and
// duplicate detection. Duplicate reports carry the duplicate VALUES
// so the user can recognize them, not just indices.
// ==========================================

use crate::domain::types::{RoadSide, Severity, WorkStatus, WorkType};
use crate::domain::work_record::{RawRow, WorkRecord};
use crate::registry::{FieldDescriptor, FieldRegistry, FieldType};
use crate::validation::ValidationIssue;
use chrono::NaiveDate;
use std::collections::HashMap;

// ==========================================
// DuplicateGroup - one natural-key collision
// ==========================================
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DuplicateGroup {
    /// Human-recognizable rendering of the duplicated key
    pub key: String,
    /// 1-based row numbers of every member, in encounter order
    pub rows: Vec<usize>,
}

/// Group row keys and keep only keys occurring more than once.
/// Groups come out in first-encounter order of their key.
pub fn group_duplicates<I>(keys: I) -> Vec<DuplicateGroup>
where
    I: IntoIterator<Item = (usize, String)>,
{
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<usize>> = HashMap::new();

    for (row, key) in keys {
        let entry = members.entry(key.clone()).or_default();
        if entry.is_empty() {
            order.push(key);
        }
        entry.push(row);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let rows = members.remove(&key)?;
            (rows.len() > 1).then(|| DuplicateGroup { key, rows })
        })
        .collect()
}

/// Export-mode duplicate detection: collisions on rfi_number.
pub fn detect_rfi_duplicates(records: &[WorkRecord]) -> Vec<DuplicateGroup> {
    group_duplicates(
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.rfi_number.trim().is_empty())
            .map(|(idx, r)| (idx + 1, r.rfi_number.trim().to_string())),
    )
}

/// Completeness check: each selected REQUIRED column is scanned for
/// empty values; one issue per column carrying the empty-value count.
pub fn validate_completeness(
    records: &[WorkRecord],
    selected: &[&FieldDescriptor],
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for field in selected.iter().filter(|f| f.required) {
        let empty = records
            .iter()
            .filter(|r| {
                r.field_value(field.key)
                    .map(|v| v.is_empty())
                    .unwrap_or(true)
            })
            .count();
        if empty > 0 {
            issues.push(
                ValidationIssue {
                    severity: Severity::Critical,
                    field: Some(field.key.to_string()),
                    row: None,
                    message: format!(
                        "required column '{}' has {} empty value(s)",
                        field.key, empty
                    ),
                },
            );
        }
    }

    issues
}

/// Merge duplicate groups into integrity issues.
pub fn duplicate_issues(groups: &[DuplicateGroup], key_label: &str) -> Vec<ValidationIssue> {
    groups
        .iter()
        .map(|g| {
            ValidationIssue {
                severity: Severity::Warning,
                field: None,
                row: None,
                message: format!(
                    "duplicate {} '{}' on rows {}",
                    key_label,
                    g.key,
                    g.rows
                        .iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }
        })
        .collect()
}

/// Ingest-mode type check: every raw value is checked against its
/// field descriptor (date parseability, numeric parseability, enum
/// membership). Unknown headers are ignored; they are not errors.
pub fn validate_types_raw(rows: &[RawRow], registry: &FieldRegistry) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let row_number = idx + 1;
        for (header, value) in row {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let Some(field) = registry.describe(&header.trim().to_lowercase()) else {
                continue;
            };

            let problem = match field.field_type {
                FieldType::Date => parse_flexible_date(value)
                    .is_none()
                    .then(|| format!("'{}' is not a valid date", value)),
                FieldType::DateTime => parse_flexible_datetime(value)
                    .is_none()
                    .then(|| format!("'{}' is not a valid date-time", value)),
                FieldType::Number => value
                    .parse::<f64>()
                    .is_err()
                    .then(|| format!("'{}' is not numeric", value)),
                FieldType::Enum => (!enum_value_recognized(field, value)).then(|| {
                    format!(
                        "'{}' is not one of [{}]",
                        value,
                        field.allowed_values.join(", ")
                    )
                }),
                FieldType::String | FieldType::Text | FieldType::UserRef => None,
            };

            if let Some(message) = problem {
                issues.push(ValidationIssue {
                    severity: Severity::Warning,
                    field: Some(field.key.to_string()),
                    row: Some(row_number),
                    message: format!("Row {}: {}: {}", row_number, field.key, message),
                });
            }
        }
    }

    issues
}

/// Every spelling the row mapper accepts must pass the type check, so
/// enum recognition goes through the same parse functions the mapper
/// uses (which take aliases like "LHS" or "In Progress"), not raw
/// membership in the canonical value list.
fn enum_value_recognized(field: &FieldDescriptor, value: &str) -> bool {
    match field.key {
        "status" => WorkStatus::parse(value).is_some(),
        "work_type" => WorkType::parse(value).is_some(),
        "side" => RoadSide::parse(value).is_some(),
        _ => {
            let canonical = value.to_lowercase().replace(' ', "_");
            field.allowed_values.contains(&canonical.as_str())
        }
    }
}

/// Tolerant date parsing shared by the type checker and the import
/// mapper: ISO first, then compact, then day-first.
pub fn parse_flexible_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
}

pub fn parse_flexible_datetime(value: &str) -> Option<chrono::NaiveDateTime> {
    chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{WorkStatus, WorkType};
    use chrono::NaiveDate;

    fn record(rfi: &str) -> WorkRecord {
        WorkRecord {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            rfi_number: rfi.to_string(),
            status: WorkStatus::Pending,
            assigned_user_id: None,
            incharge_user_id: None,
            work_type: WorkType::Paving,
            description: "Wearing course".to_string(),
            location: "CH 7+000".to_string(),
            side: None,
            qty_layer: None,
            planned_time: None,
            completion_time: None,
            inspection_details: None,
            resubmission_count: 0,
            rfi_submission_date: None,
        }
    }

    #[test]
    fn test_duplicate_pair_one_group_both_rows() {
        let records = vec![record("RFI-1"), record("RFI-2"), record("RFI-1")];
        let groups = detect_rfi_duplicates(&records);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "RFI-1");
        assert_eq!(groups[0].rows, vec![1, 3]);
    }

    #[test]
    fn test_duplicate_detection_order_independent() {
        let forward = vec![record("A"), record("B"), record("A")];
        let reordered = vec![record("B"), record("A"), record("A")];
        let g1 = detect_rfi_duplicates(&forward);
        let g2 = detect_rfi_duplicates(&reordered);
        assert_eq!(g1.len(), 1);
        assert_eq!(g2.len(), 1);
        assert_eq!(g1[0].key, "A");
        assert_eq!(g2[0].key, "A");
        assert_eq!(g1[0].rows, vec![1, 3]);
        assert_eq!(g2[0].rows, vec![2, 3]);
    }

    #[test]
    fn test_blank_rfi_not_a_duplicate() {
        let records = vec![record(""), record(""), record("RFI-1")];
        assert!(detect_rfi_duplicates(&records).is_empty());
    }

    #[test]
    fn test_completeness_counts_not_rows() {
        let registry = FieldRegistry::new();
        let mut bad1 = record("");
        bad1.rfi_number = "".to_string();
        let bad2 = record("");
        let good = record("RFI-9");
        let selected: Vec<&FieldDescriptor> =
            vec![registry.describe("rfi_number").unwrap(), registry.describe("date").unwrap()];

        let issues = validate_completeness(&[bad1, bad2, good], &selected);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("'rfi_number' has 2 empty value(s)"));
    }

    #[test]
    fn test_type_check_raw_rows() {
        let registry = FieldRegistry::new();
        let mut row = RawRow::new();
        row.insert("date".to_string(), "not-a-date".to_string());
        row.insert("status".to_string(), "nonsense".to_string());
        row.insert("resubmission_count".to_string(), "two".to_string());
        row.insert("description".to_string(), "free text is fine".to_string());

        let issues = validate_types_raw(&[row], &registry);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.row == Some(1)));
    }

    #[test]
    fn test_type_check_accepts_valid_values() {
        let registry = FieldRegistry::new();
        let mut row = RawRow::new();
        row.insert("date".to_string(), "2026-03-14".to_string());
        row.insert("status".to_string(), "In Progress".to_string());
        row.insert("resubmission_count".to_string(), "2".to_string());
        assert!(validate_types_raw(&[row], &registry).is_empty());
    }

    #[test]
    fn test_type_check_accepts_mapper_alias_spellings() {
        let registry = FieldRegistry::new();
        let mut row = RawRow::new();
        row.insert("side".to_string(), "LHS".to_string());
        row.insert("status".to_string(), "In Progress".to_string());
        row.insert("work_type".to_string(), "PAVING".to_string());
        assert!(validate_types_raw(&[row], &registry).is_empty());
    }

    #[test]
    fn test_flexible_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(parse_flexible_date("2026-03-14"), Some(expected));
        assert_eq!(parse_flexible_date("20260314"), Some(expected));
        assert_eq!(parse_flexible_date("14/03/2026"), Some(expected));
        assert_eq!(parse_flexible_date("03/14/2026"), None);
    }
}
