// ==========================================
// Daily Works Exchange - Export Projector
// ==========================================
// Responsibility: project records onto the selected columns and apply
// per-field transforms (user-id lookup, enum capitalization, date
// formatting per target format). Pure except for the user-directory
// collaborator.
// ==========================================

use crate::domain::types::OutputFormat;
use crate::domain::work_record::{FieldValue, WorkRecord};
use crate::registry::{FieldDescriptor, FieldType};

// ==========================================
// UserDirectory - user-ref resolution collaborator
// ==========================================
pub trait UserDirectory: Send + Sync {
    /// Display name for a user id; "N/A" when unknown.
    fn resolve_user_name(&self, user_id: &str) -> String;
}

/// Directory that knows nobody; every lookup yields "N/A".
#[derive(Debug, Clone, Default)]
pub struct NullUserDirectory;

impl UserDirectory for NullUserDirectory {
    fn resolve_user_name(&self, _user_id: &str) -> String {
        "N/A".to_string()
    }
}

/// Project every record onto the selected columns, in column order.
pub fn project_records(
    records: &[WorkRecord],
    columns: &[&FieldDescriptor],
    format: OutputFormat,
    users: &dyn UserDirectory,
) -> Vec<Vec<String>> {
    records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|field| render_field(record, field, format, users))
                .collect()
        })
        .collect()
}

/// Column headers for the selected columns, in selection order.
pub fn project_headers(columns: &[&FieldDescriptor]) -> Vec<String> {
    columns.iter().map(|f| f.label.to_string()).collect()
}

fn render_field(
    record: &WorkRecord,
    field: &FieldDescriptor,
    format: OutputFormat,
    users: &dyn UserDirectory,
) -> String {
    let value = match record.field_value(field.key) {
        Some(v) => v,
        // Undeclared keys are filtered out by the engine before the
        // pipeline runs; an empty cell is the safe rendering here.
        None => return String::new(),
    };

    let rule = field.format_rule(format);
    match value {
        FieldValue::Empty => String::new(),
        FieldValue::Date(d) => d.format(rule.date_pattern).to_string(),
        FieldValue::DateTime(t) => t.format(rule.datetime_pattern).to_string(),
        FieldValue::Number(n) => {
            if n.fract() == 0.0 {
                format!("{}", n as i64)
            } else {
                format!("{}", n)
            }
        }
        FieldValue::Text(s) => match field.field_type {
            FieldType::UserRef => users.resolve_user_name(&s),
            FieldType::Enum if rule.capitalize_enums => capitalize_words(&s),
            _ => s,
        },
    }
}

/// "in_progress" -> "In Progress"
fn capitalize_words(value: &str) -> String {
    value
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{RoadSide, WorkStatus, WorkType};
    use crate::registry::FieldRegistry;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    struct MapDirectory(HashMap<String, String>);

    impl UserDirectory for MapDirectory {
        fn resolve_user_name(&self, user_id: &str) -> String {
            self.0
                .get(user_id)
                .cloned()
                .unwrap_or_else(|| "N/A".to_string())
        }
    }

    fn record() -> WorkRecord {
        WorkRecord {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            rfi_number: "RFI-0042".to_string(),
            status: WorkStatus::InProgress,
            assigned_user_id: Some("u-17".to_string()),
            incharge_user_id: Some("u-99".to_string()),
            work_type: WorkType::Embankment,
            description: "Layer 3 fill".to_string(),
            location: "CH 12+400".to_string(),
            side: Some(RoadSide::Left),
            qty_layer: Some("120 m3".to_string()),
            planned_time: None,
            completion_time: None,
            inspection_details: None,
            resubmission_count: 2,
            rfi_submission_date: None,
        }
    }

    #[test]
    fn test_projection_order_and_transforms() {
        let registry = FieldRegistry::new();
        let columns = vec![
            registry.describe("status").unwrap(),
            registry.describe("assigned_user_id").unwrap(),
            registry.describe("date").unwrap(),
            registry.describe("resubmission_count").unwrap(),
        ];
        let mut users = HashMap::new();
        users.insert("u-17".to_string(), "A. Mason".to_string());
        let directory = MapDirectory(users);

        let rows = project_records(&[record()], &columns, OutputFormat::Csv, &directory);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["In Progress", "A. Mason", "2026-03-14", "2"]);
    }

    #[test]
    fn test_unknown_user_renders_na() {
        let registry = FieldRegistry::new();
        let columns = vec![registry.describe("incharge_user_id").unwrap()];
        let rows = project_records(
            &[record()],
            &columns,
            OutputFormat::Csv,
            &NullUserDirectory,
        );
        assert_eq!(rows[0], vec!["N/A"]);
    }

    #[test]
    fn test_pdf_date_pattern() {
        let registry = FieldRegistry::new();
        let columns = vec![registry.describe("date").unwrap()];
        let rows = project_records(
            &[record()],
            &columns,
            OutputFormat::Pdf,
            &NullUserDirectory,
        );
        assert_eq!(rows[0], vec!["14 Mar 2026"]);
    }

    #[test]
    fn test_empty_optionals_render_blank() {
        let registry = FieldRegistry::new();
        let columns = vec![
            registry.describe("planned_time").unwrap(),
            registry.describe("inspection_details").unwrap(),
        ];
        let rows = project_records(
            &[record()],
            &columns,
            OutputFormat::Csv,
            &NullUserDirectory,
        );
        assert_eq!(rows[0], vec!["", ""]);
    }

    #[test]
    fn test_headers_use_labels() {
        let registry = FieldRegistry::new();
        let columns = vec![
            registry.describe("rfi_number").unwrap(),
            registry.describe("qty_layer").unwrap(),
        ];
        assert_eq!(project_headers(&columns), vec!["RFI Number", "Qty / Layer"]);
    }
}
