// ==========================================
// Daily Works Exchange - Domain Types
// ==========================================
// Responsibility: shared enumerations for the export/import pipeline
// Serialization format: snake_case (matches on-disk / on-wire spellings)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Output Format
// ==========================================
// The three bulk-export targets. Byte layouts are owned by the
// serializer collaborators, not by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Spreadsheet,
    Csv,
    Pdf,
}

impl OutputFormat {
    /// File extension used when composing the export filename
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Spreadsheet => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// MIME type of the generated blob
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            OutputFormat::Csv => "text/csv",
            OutputFormat::Pdf => "application/pdf",
        }
    }

    /// Parse from a string key (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spreadsheet" | "xlsx" | "excel" => Some(OutputFormat::Spreadsheet),
            "csv" => Some(OutputFormat::Csv),
            "pdf" => Some(OutputFormat::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Spreadsheet => write!(f, "spreadsheet"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Pdf => write!(f, "pdf"),
        }
    }
}

// ==========================================
// Performance Mode
// ==========================================
// Named tradeoff preset. The timeout is advisory metadata for the
// surrounding UI; the core never enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceMode {
    Fast,
    Balanced,
    Quality,
}

impl PerformanceMode {
    /// Whether this mode enables rich output formatting
    pub fn enables_formatting(&self) -> bool {
        matches!(self, PerformanceMode::Quality)
    }

    /// Advisory timeout budget in seconds (UI metadata, not enforced)
    pub fn advisory_timeout_secs(&self) -> u64 {
        match self {
            PerformanceMode::Fast => 15,
            PerformanceMode::Balanced => 30,
            PerformanceMode::Quality => 60,
        }
    }
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformanceMode::Fast => write!(f, "fast"),
            PerformanceMode::Balanced => write!(f, "balanced"),
            PerformanceMode::Quality => write!(f, "quality"),
        }
    }
}

// ==========================================
// Work Status
// ==========================================
// Daily-work lifecycle state. Business-rule invariants in the
// validation layer key off this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Pending,
    InProgress,
    Completed,
    Resubmission,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "pending",
            WorkStatus::InProgress => "in_progress",
            WorkStatus::Completed => "completed",
            WorkStatus::Resubmission => "resubmission",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "pending" => Some(WorkStatus::Pending),
            "in_progress" => Some(WorkStatus::InProgress),
            "completed" => Some(WorkStatus::Completed),
            "resubmission" => Some(WorkStatus::Resubmission),
            _ => None,
        }
    }

    /// All canonical spellings, in declaration order
    pub fn allowed_values() -> &'static [&'static str] {
        &["pending", "in_progress", "completed", "resubmission"]
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Work Type
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Excavation,
    Embankment,
    Subgrade,
    Drainage,
    Structure,
    Paving,
    Other,
}

impl WorkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Excavation => "excavation",
            WorkType::Embankment => "embankment",
            WorkType::Subgrade => "subgrade",
            WorkType::Drainage => "drainage",
            WorkType::Structure => "structure",
            WorkType::Paving => "paving",
            WorkType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "excavation" => Some(WorkType::Excavation),
            "embankment" => Some(WorkType::Embankment),
            "subgrade" => Some(WorkType::Subgrade),
            "drainage" => Some(WorkType::Drainage),
            "structure" => Some(WorkType::Structure),
            "paving" => Some(WorkType::Paving),
            "other" => Some(WorkType::Other),
            _ => None,
        }
    }

    pub fn allowed_values() -> &'static [&'static str] {
        &[
            "excavation",
            "embankment",
            "subgrade",
            "drainage",
            "structure",
            "paving",
            "other",
        ]
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Road Side
// ==========================================
// Carriageway side of the work location (optional on a record)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadSide {
    Left,
    Right,
    Both,
}

impl RoadSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoadSide::Left => "left",
            RoadSide::Right => "right",
            RoadSide::Both => "both",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "lhs" | "l" => Some(RoadSide::Left),
            "right" | "rhs" | "r" => Some(RoadSide::Right),
            "both" | "b" => Some(RoadSide::Both),
            _ => None,
        }
    }

    pub fn allowed_values() -> &'static [&'static str] {
        &["left", "right", "both"]
    }
}

impl fmt::Display for RoadSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// Duplicate Handling Policy
// ==========================================
// Applied downstream by the persistence layer; the import pipeline
// only flags duplicate groups and records the chosen policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateHandling {
    Skip,
    Replace,
    Merge,
}

impl fmt::Display for DuplicateHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateHandling::Skip => write!(f, "skip"),
            DuplicateHandling::Replace => write!(f, "replace"),
            DuplicateHandling::Merge => write!(f, "merge"),
        }
    }
}

// ==========================================
// Complexity Tier
// ==========================================
// Step function of the estimator output.
// Order: Low < Medium < High < VeryHigh
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexityTier::Low => write!(f, "low"),
            ComplexityTier::Medium => write!(f, "medium"),
            ComplexityTier::High => write!(f, "high"),
            ComplexityTier::VeryHigh => write!(f, "very_high"),
        }
    }
}

// ==========================================
// Issue Severity
// ==========================================
// Display category for a validation issue.
// Critical blocks progression; Performance and Info never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Performance,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Performance => write!(f, "performance"),
            Severity::Info => write!(f, "info"),
        }
    }
}
