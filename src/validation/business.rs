// ==========================================
// Daily Works Exchange - Business Rule Validator
// ==========================================
// Responsibility: the WorkRecord cross-field invariants, checked on
// every row. All violations for a row are reported; nothing stops at
// the first failure.
// ==========================================

use crate::domain::types::{Severity, WorkStatus};
use crate::domain::work_record::WorkRecord;
use crate::validation::ValidationIssue;

/// Run every business-rule invariant against every row.
///
/// Messages carry a `Row N:` prefix with N 1-based over the slice.
pub fn validate_business_rules(records: &[WorkRecord]) -> Vec<ValidationIssue> {
    records
        .iter()
        .enumerate()
        .flat_map(|(idx, record)| validate_record(idx + 1, record))
        .collect()
}

/// Invariants for a single record under a caller-supplied row number.
/// Ingest uses this directly so row numbers stay aligned with the raw
/// upload rows even when earlier rows were dropped by the mapper.
pub fn validate_record(row: usize, record: &WorkRecord) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    // completed => completion_time present
    if record.status == WorkStatus::Completed && record.completion_time.is_none() {
        issues.push(row_issue(
            row,
            "completion_time",
            format!("Row {}: completed work has no completion time", row),
        ));
    }

    // resubmission_count > 0 => status in {resubmission, completed}
    if record.resubmission_count > 0
        && !matches!(
            record.status,
            WorkStatus::Resubmission | WorkStatus::Completed
        )
    {
        issues.push(row_issue(
            row,
            "resubmission_count",
            format!(
                "Row {}: resubmission count {} is inconsistent with status '{}'",
                row, record.resubmission_count, record.status
            ),
        ));
    }

    // completion_time >= planned_time when both present
    if let (Some(planned), Some(completed)) = (record.planned_time, record.completion_time) {
        if completed < planned {
            issues.push(row_issue(
                row,
                "completion_time",
                format!(
                    "Row {}: completion time {} is earlier than planned time {}",
                    row, completed, planned
                ),
            ));
        }
    }

    // in_progress => someone is assigned or in charge
    if record.status == WorkStatus::InProgress
        && record.assigned_user_id.is_none()
        && record.incharge_user_id.is_none()
    {
        issues.push(row_issue(
            row,
            "assigned_user_id",
            format!(
                "Row {}: in-progress work has neither an assigned nor an in-charge user",
                row
            ),
        ));
    }

    issues
}

fn row_issue(row: usize, field: &str, message: String) -> ValidationIssue {
    ValidationIssue {
        severity: Severity::Warning,
        field: Some(field.to_string()),
        row: Some(row),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{RoadSide, WorkType};
    use chrono::{NaiveDate, NaiveDateTime};

    fn record(status: WorkStatus) -> WorkRecord {
        WorkRecord {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            rfi_number: "RFI-0001".to_string(),
            status,
            assigned_user_id: Some("u-1".to_string()),
            incharge_user_id: None,
            work_type: WorkType::Drainage,
            description: "Culvert outlet protection".to_string(),
            location: "CH 3+120".to_string(),
            side: Some(RoadSide::Right),
            qty_layer: None,
            planned_time: None,
            completion_time: None,
            inspection_details: None,
            resubmission_count: 0,
            rfi_submission_date: None,
        }
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_completed_without_completion_time_exactly_one_error() {
        let records = vec![record(WorkStatus::Completed)];
        let issues = validate_business_rules(&records);

        let mentioning: Vec<_> = issues
            .iter()
            .filter(|i| i.message.contains("completion time"))
            .collect();
        assert_eq!(mentioning.len(), 1);
        assert_eq!(mentioning[0].row, Some(1));
    }

    #[test]
    fn test_completed_with_completion_time_passes() {
        let mut rec = record(WorkStatus::Completed);
        rec.completion_time = Some(dt("2026-03-14 16:00"));
        assert!(validate_business_rules(&[rec]).is_empty());
    }

    #[test]
    fn test_resubmission_count_with_pending_status() {
        let mut rec = record(WorkStatus::Pending);
        rec.resubmission_count = 2;
        let issues = validate_business_rules(&[rec]);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("resubmission count 2"));
        assert!(issues[0].message.contains("pending"));
    }

    #[test]
    fn test_resubmission_count_with_completed_status_ok() {
        let mut rec = record(WorkStatus::Completed);
        rec.resubmission_count = 1;
        rec.completion_time = Some(dt("2026-03-14 16:00"));
        assert!(validate_business_rules(&[rec]).is_empty());
    }

    #[test]
    fn test_completion_before_planned() {
        let mut rec = record(WorkStatus::Completed);
        rec.planned_time = Some(dt("2026-03-14 10:00"));
        rec.completion_time = Some(dt("2026-03-14 08:00"));
        let issues = validate_business_rules(&[rec]);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("earlier than planned"));
    }

    #[test]
    fn test_in_progress_without_users() {
        let mut rec = record(WorkStatus::InProgress);
        rec.assigned_user_id = None;
        rec.incharge_user_id = None;
        let issues = validate_business_rules(&[rec]);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("neither an assigned"));
    }

    #[test]
    fn test_multiple_violations_on_one_row_all_reported() {
        let mut rec = record(WorkStatus::Completed);
        rec.resubmission_count = 0;
        rec.planned_time = Some(dt("2026-03-14 10:00"));
        // no completion_time: violates both the completed rule only
        let mut second = record(WorkStatus::InProgress);
        second.assigned_user_id = None;
        second.resubmission_count = 3;

        let issues = validate_business_rules(&[rec, second]);
        // row 1: missing completion time; row 2: resubmission + no user
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.row == Some(1)));
        assert_eq!(issues.iter().filter(|i| i.row == Some(2)).count(), 2);
    }
}
