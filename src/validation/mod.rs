// ==========================================
// Daily Works Exchange - Validation Layer
// ==========================================
// Four independent validators (schema, business rules, data
// integrity, security) composed by the engine. Expected validation
// failures are returned as structured results, never as Err.
// ==========================================

use crate::domain::types::Severity;
use serde::{Deserialize, Serialize};

pub mod business;
pub mod engine;
pub mod integrity;
pub mod schema;
pub mod security;

pub use engine::{EngineError, ValidationEngine};
pub use integrity::DuplicateGroup;
pub use security::UserPermissions;

// ==========================================
// ValidationIssue - one reported problem
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Registry key or config field path the issue concerns, if any
    pub field: Option<String>,
    /// 1-based row number for per-row issues
    pub row: Option<usize>,
    pub message: String,
}

impl ValidationIssue {
    pub fn critical(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Critical,
            field: None,
            row: None,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: None,
            row: None,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            field: None,
            row: None,
            message: message.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

// ==========================================
// SecurityChecks - boolean outcome of the security validator
// ==========================================
// `data_privacy` is advisory only; the engine never blocks on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityChecks {
    pub data_access: bool,
    pub file_generation: bool,
    pub data_privacy: bool,
}

impl Default for SecurityChecks {
    fn default() -> Self {
        Self {
            data_access: true,
            file_generation: true,
            data_privacy: true,
        }
    }
}

// ==========================================
// PerformanceThresholds - warn / hard tiers
// ==========================================
// First tier produces warnings; the second tier's record ceiling is
// enforced by the schema validator as a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceThresholds {
    pub warn_time_seconds: u64,
    pub warn_size_bytes: u64,
    pub warn_record_count: usize,
    pub max_time_seconds: u64,
    pub max_size_bytes: u64,
    pub max_record_count: usize,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            warn_time_seconds: 30,
            warn_size_bytes: 25 * 1024 * 1024,
            warn_record_count: 10_000,
            max_time_seconds: 120,
            max_size_bytes: 100 * 1024 * 1024,
            max_record_count: 50_000,
        }
    }
}

// ==========================================
// ValidationResult - merged output of all validators
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub schema_errors: Vec<ValidationIssue>,
    pub business_rule_errors: Vec<ValidationIssue>,
    pub data_integrity_errors: Vec<ValidationIssue>,
    pub performance_warnings: Vec<ValidationIssue>,
    pub security_checks: SecurityChecks,
    /// Security issues in display form (denials and advisories)
    pub security_issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Assemble the merged result; `is_valid` is derived, never set
    /// directly. Performance warnings and the privacy advisory do not
    /// affect validity.
    pub fn assemble(
        schema_errors: Vec<ValidationIssue>,
        business_rule_errors: Vec<ValidationIssue>,
        data_integrity_errors: Vec<ValidationIssue>,
        performance_warnings: Vec<ValidationIssue>,
        security_checks: SecurityChecks,
        security_issues: Vec<ValidationIssue>,
    ) -> Self {
        let is_valid = schema_errors.is_empty()
            && business_rule_errors.is_empty()
            && data_integrity_errors.is_empty()
            && security_checks.data_access
            && security_checks.file_generation;
        Self {
            is_valid,
            schema_errors,
            business_rule_errors,
            data_integrity_errors,
            performance_warnings,
            security_checks,
            security_issues,
        }
    }

    /// Every blocking issue, in validator order
    pub fn blocking_issues(&self) -> Vec<&ValidationIssue> {
        self.schema_errors
            .iter()
            .chain(self.business_rule_errors.iter())
            .chain(self.data_integrity_errors.iter())
            .chain(
                self.security_issues
                    .iter()
                    .filter(|i| i.severity == Severity::Critical),
            )
            .collect()
    }

    /// One-line summary for error display / logging
    pub fn summary(&self) -> String {
        if self.is_valid {
            return "valid".to_string();
        }
        match self.blocking_issues().first() {
            Some(first) => format!(
                "{} blocking issue(s), first: {}",
                self.blocking_issues().len(),
                first.message
            ),
            None => "invalid".to_string(),
        }
    }
}
