// ==========================================
// Daily Works Exchange - Field Registry
// ==========================================
// Responsibility: the static table of exportable/importable fields.
// Pure lookup, no side effects, built once at construction.
// The column-selection ceiling equals the registry size (15).
// ==========================================

use crate::domain::types::{OutputFormat, RoadSide, WorkStatus, WorkType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hard ceiling on the number of selectable export columns
pub const MAX_SELECTED_COLUMNS: usize = 15;

// ==========================================
// FieldType
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Date,
    DateTime,
    Enum,
    Text,
    /// User reference, resolved to a display name at export time
    UserRef,
}

// ==========================================
// FormatRule - per-output-format rendering rules
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRule {
    pub date_pattern: &'static str,
    pub datetime_pattern: &'static str,
    /// Render enum values as capitalized words ("in_progress" -> "In Progress")
    pub capitalize_enums: bool,
}

impl FormatRule {
    fn for_format(format: OutputFormat) -> Self {
        match format {
            // Tabular targets keep ISO ordering so re-import round-trips
            OutputFormat::Spreadsheet | OutputFormat::Csv => Self {
                date_pattern: "%Y-%m-%d",
                datetime_pattern: "%Y-%m-%d %H:%M",
                capitalize_enums: true,
            },
            OutputFormat::Pdf => Self {
                date_pattern: "%d %b %Y",
                datetime_pattern: "%d %b %Y %H:%M",
                capitalize_enums: true,
            },
        }
    }
}

// ==========================================
// FieldDescriptor
// ==========================================
// Immutable, defined once per field at registry construction.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub field_type: FieldType,
    /// Canonical spellings for Enum fields, empty otherwise
    pub allowed_values: Vec<&'static str>,
    pub category: &'static str,
    pub format_rules: HashMap<OutputFormat, FormatRule>,
}

impl FieldDescriptor {
    pub fn format_rule(&self, format: OutputFormat) -> FormatRule {
        self.format_rules
            .get(&format)
            .copied()
            .unwrap_or_else(|| FormatRule::for_format(format))
    }
}

// ==========================================
// FieldRegistry
// ==========================================
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    by_key: HashMap<&'static str, usize>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        let fields = build_fields();
        let by_key = fields
            .iter()
            .enumerate()
            .map(|(idx, f)| (f.key, idx))
            .collect();
        Self { fields, by_key }
    }

    /// Descriptor of one field, `None` for an undeclared key
    pub fn describe(&self, key: &str) -> Option<&FieldDescriptor> {
        self.by_key.get(key).map(|&idx| &self.fields[idx])
    }

    /// All fields, in declaration order
    pub fn all(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fields of one category, in declaration order
    pub fn by_category(&self, category: &str) -> Vec<&FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }

    /// Distinct categories, first-seen order
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen = Vec::new();
        for field in &self.fields {
            if !seen.contains(&field.category) {
                seen.push(field.category);
            }
        }
        seen
    }

    /// Fields that must be part of every export column selection
    pub fn required_fields(&self) -> Vec<&FieldDescriptor> {
        self.fields.iter().filter(|f| f.required).collect()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn build_fields() -> Vec<FieldDescriptor> {
    let rules = |_key: &str| {
        [
            OutputFormat::Spreadsheet,
            OutputFormat::Csv,
            OutputFormat::Pdf,
        ]
        .into_iter()
        .map(|fmt| (fmt, FormatRule::for_format(fmt)))
        .collect::<HashMap<_, _>>()
    };

    let field = |key: &'static str,
                 label: &'static str,
                 required: bool,
                 field_type: FieldType,
                 allowed_values: Vec<&'static str>,
                 category: &'static str| FieldDescriptor {
        key,
        label,
        required,
        field_type,
        allowed_values,
        category,
        format_rules: rules(key),
    };

    vec![
        // --- basic ---
        field("date", "Date", true, FieldType::Date, vec![], "basic"),
        field(
            "rfi_number",
            "RFI Number",
            true,
            FieldType::String,
            vec![],
            "basic",
        ),
        field(
            "status",
            "Status",
            true,
            FieldType::Enum,
            WorkStatus::allowed_values().to_vec(),
            "basic",
        ),
        // --- assignment ---
        field(
            "assigned_user_id",
            "Assigned To",
            false,
            FieldType::UserRef,
            vec![],
            "assignment",
        ),
        field(
            "incharge_user_id",
            "In Charge",
            false,
            FieldType::UserRef,
            vec![],
            "assignment",
        ),
        // --- work ---
        field(
            "work_type",
            "Work Type",
            false,
            FieldType::Enum,
            WorkType::allowed_values().to_vec(),
            "work",
        ),
        field(
            "description",
            "Description",
            false,
            FieldType::Text,
            vec![],
            "work",
        ),
        field(
            "location",
            "Location",
            false,
            FieldType::String,
            vec![],
            "work",
        ),
        field(
            "side",
            "Side",
            false,
            FieldType::Enum,
            RoadSide::allowed_values().to_vec(),
            "work",
        ),
        field(
            "qty_layer",
            "Qty / Layer",
            false,
            FieldType::String,
            vec![],
            "work",
        ),
        // --- timing ---
        field(
            "planned_time",
            "Planned Time",
            false,
            FieldType::DateTime,
            vec![],
            "timing",
        ),
        field(
            "completion_time",
            "Completion Time",
            false,
            FieldType::DateTime,
            vec![],
            "timing",
        ),
        field(
            "rfi_submission_date",
            "RFI Submission Date",
            false,
            FieldType::Date,
            vec![],
            "timing",
        ),
        // --- quality ---
        field(
            "inspection_details",
            "Inspection Details",
            false,
            FieldType::Text,
            vec![],
            "quality",
        ),
        field(
            "resubmission_count",
            "Resubmission Count",
            false,
            FieldType::Number,
            vec![],
            "quality",
        ),
    ]
}
