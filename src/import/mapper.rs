// ==========================================
// Daily Works Exchange - Row Mapper
// ==========================================
// Responsibility: raw header-keyed rows into typed WorkRecord values.
// Mapping is best-effort per row: a row with a bad required field is
// dropped and its errors recorded; optional fields degrade to None.
// ==========================================

use crate::domain::types::{RoadSide, WorkStatus, WorkType};
use crate::domain::work_record::{FieldError, RawRow, WorkRecord};
use crate::validation::integrity::{parse_flexible_date, parse_flexible_datetime};

// ==========================================
// MappedRow - outcome for one raw row
// ==========================================
#[derive(Debug)]
pub struct MappedRow {
    pub record: Option<WorkRecord>,
    pub errors: Vec<FieldError>,
}

fn raw<'a>(row: &'a RawRow, key: &str) -> Option<&'a str> {
    row.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Map one raw row. Required fields that fail to parse produce a
/// FieldError and suppress the record; everything else is tolerant.
pub fn map_row(row: &RawRow) -> MappedRow {
    let mut errors = Vec::new();

    let date = match raw(row, "date") {
        Some(value) => match parse_flexible_date(value) {
            Some(d) => Some(d),
            None => {
                errors.push(FieldError::new(
                    "date",
                    format!("'{}' is not a valid date", value),
                ));
                None
            }
        },
        None => {
            errors.push(FieldError::new("date", "date is required"));
            None
        }
    };

    let work_type = match raw(row, "work_type") {
        Some(value) => match WorkType::parse(value) {
            Some(t) => Some(t),
            None => {
                errors.push(FieldError::new(
                    "work_type",
                    format!("'{}' is not a recognized work type", value),
                ));
                None
            }
        },
        None => {
            errors.push(FieldError::new("work_type", "work_type is required"));
            None
        }
    };

    let description = match raw(row, "description") {
        Some(value) => Some(value.to_string()),
        None => {
            errors.push(FieldError::new("description", "description is required"));
            None
        }
    };

    // Optional fields: parse failures degrade to None, silently for
    // free-text and with an error for typed values.
    let status = match raw(row, "status") {
        Some(value) => match WorkStatus::parse(value) {
            Some(s) => s,
            None => {
                errors.push(FieldError::new(
                    "status",
                    format!("'{}' is not a recognized status", value),
                ));
                WorkStatus::Pending
            }
        },
        None => WorkStatus::Pending,
    };

    let side = raw(row, "side").and_then(RoadSide::parse);

    let resubmission_count = match raw(row, "resubmission_count") {
        Some(value) => match value.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                errors.push(FieldError::new(
                    "resubmission_count",
                    format!("'{}' is not a whole number", value),
                ));
                0
            }
        },
        None => 0,
    };

    let planned_time = raw(row, "planned_time").and_then(parse_flexible_datetime);
    let completion_time = raw(row, "completion_time").and_then(parse_flexible_datetime);
    let rfi_submission_date = raw(row, "rfi_submission_date").and_then(parse_flexible_date);

    let record = match (date, work_type, description) {
        (Some(date), Some(work_type), Some(description)) => Some(WorkRecord {
            date,
            rfi_number: raw(row, "rfi_number").unwrap_or_default().to_string(),
            status,
            assigned_user_id: raw(row, "assigned_user_id").map(str::to_string),
            incharge_user_id: raw(row, "incharge_user_id").map(str::to_string),
            work_type,
            description,
            location: raw(row, "location").unwrap_or_default().to_string(),
            side,
            qty_layer: compose_qty_layer(row),
            planned_time,
            completion_time,
            inspection_details: raw(row, "inspection_details").map(str::to_string),
            resubmission_count,
            rfi_submission_date,
        }),
        _ => None,
    };

    MappedRow { record, errors }
}

/// Upload sheets carry quantity and unit as separate columns; the
/// record keeps them as one annotation. An explicit qty_layer column
/// wins when present.
fn compose_qty_layer(row: &RawRow) -> Option<String> {
    if let Some(direct) = raw(row, "qty_layer") {
        return Some(direct.to_string());
    }
    match (raw(row, "quantity"), raw(row, "unit")) {
        (Some(qty), Some(unit)) => Some(format!("{} {}", qty, unit)),
        (Some(qty), None) => Some(qty.to_string()),
        _ => None,
    }
}
