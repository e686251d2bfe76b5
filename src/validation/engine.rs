// ==========================================
// Daily Works Exchange - Validation Engine
// ==========================================
// Responsibility: compose the four validators over a candidate
// configuration + dataset, merging all results (never
// short-circuiting), with a fingerprint-keyed result cache.
// Err is reserved for programmer errors; expected validation
// failures come back as a structured ValidationResult.
// ==========================================

use crate::domain::config::ExportConfig;
use crate::domain::types::{OutputFormat, PerformanceMode, Severity};
use crate::domain::work_record::{RawRow, WorkRecord};
use crate::estimator::{self, EstimatorParams};
use crate::registry::{FieldDescriptor, FieldRegistry};
use crate::validation::{
    business, integrity, schema, security, PerformanceThresholds, SecurityChecks,
    UserPermissions, ValidationIssue, ValidationResult,
};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Bound on the fingerprint cache
const CACHE_CAPACITY: usize = 50;

// ==========================================
// EngineError - programmer errors only
// ==========================================
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("selected column '{0}' is not declared in the field registry")]
    UnknownField(String),
}

// ==========================================
// Fingerprint - stable cache key
// ==========================================
// Serialized with serde_json; struct field order makes it stable.
#[derive(Serialize)]
struct Fingerprint<'a> {
    columns: &'a [String],
    format: OutputFormat,
    mode: PerformanceMode,
    record_count: usize,
    dataset_token: &'a str,
}

// ==========================================
// Bounded LRU over fingerprints
// ==========================================
// The teacher of this cache is a plain VecDeque: the bound is tiny
// and per-session, so no caching crate is warranted.
struct FingerprintCache {
    entries: VecDeque<(String, ValidationResult)>,
    last_mode: Option<(OutputFormat, PerformanceMode)>,
}

impl FingerprintCache {
    fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            last_mode: None,
        }
    }

    /// Clear everything when format or performance mode changed;
    /// those feed the downstream estimates.
    fn note_mode(&mut self, format: OutputFormat, mode: PerformanceMode) {
        if let Some(last) = self.last_mode {
            if last != (format, mode) {
                debug!("format/mode changed, invalidating validation cache");
                self.entries.clear();
            }
        }
        self.last_mode = Some((format, mode));
    }

    fn get(&mut self, fingerprint: &str) -> Option<ValidationResult> {
        let pos = self.entries.iter().position(|(k, _)| k == fingerprint)?;
        let entry = self.entries.remove(pos)?;
        let result = entry.1.clone();
        self.entries.push_back(entry);
        Some(result)
    }

    fn insert(&mut self, fingerprint: String, result: ValidationResult) {
        if self.entries.len() >= CACHE_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back((fingerprint, result));
    }
}

// ==========================================
// ValidationEngine
// ==========================================
pub struct ValidationEngine {
    registry: Arc<FieldRegistry>,
    thresholds: PerformanceThresholds,
    estimator_params: EstimatorParams,
    cache: Mutex<FingerprintCache>,
}

impl ValidationEngine {
    pub fn new(registry: Arc<FieldRegistry>) -> Self {
        Self::with_thresholds(registry, PerformanceThresholds::default())
    }

    pub fn with_thresholds(
        registry: Arc<FieldRegistry>,
        thresholds: PerformanceThresholds,
    ) -> Self {
        Self {
            registry,
            thresholds,
            estimator_params: EstimatorParams::default(),
            cache: Mutex::new(FingerprintCache::new()),
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn thresholds(&self) -> &PerformanceThresholds {
        &self.thresholds
    }

    /// Validate an export candidate.
    ///
    /// `dataset_token` identifies the record set (session/batch id);
    /// together with the config and record count it forms the cache
    /// fingerprint. Identical fingerprints return the cached result.
    pub fn validate_export(
        &self,
        config: &ExportConfig,
        records: &[WorkRecord],
        permissions: &UserPermissions,
        dataset_token: &str,
    ) -> Result<ValidationResult, EngineError> {
        // Unknown registry keys are a programmer error, checked before
        // any validator runs.
        let selected = self.resolve_columns(config)?;

        let fingerprint = fingerprint_of(config, records.len(), dataset_token);
        {
            let mut cache = self.cache.lock().expect("validation cache poisoned");
            cache.note_mode(config.output_format, config.performance_mode);
            if let Some(cached) = cache.get(&fingerprint) {
                debug!(fingerprint = %fingerprint, "validation cache hit");
                return Ok(cached);
            }
        }

        // All four validators always run; results are merged.
        let schema_errors = schema::validate_export_schema(
            config,
            records.len(),
            &self.registry,
            &self.thresholds,
        );
        let business_rule_errors = business::validate_business_rules(records);

        let mut data_integrity_errors = integrity::validate_completeness(records, &selected);
        let rfi_duplicates = integrity::detect_rfi_duplicates(records);
        data_integrity_errors.extend(integrity::duplicate_issues(&rfi_duplicates, "RFI number"));

        let performance_warnings = self.performance_warnings(
            records.len(),
            config.selected_columns.len(),
            config.output_format,
            config.performance_mode,
        );

        let (security_checks, security_issues) =
            security::validate_security(&selected, records.len(), permissions);

        let result = ValidationResult::assemble(
            schema_errors,
            business_rule_errors,
            data_integrity_errors,
            performance_warnings,
            security_checks,
            security_issues,
        );

        self.cache
            .lock()
            .expect("validation cache poisoned")
            .insert(fingerprint, result.clone());
        Ok(result)
    }

    /// Ingest-mode validation over parsed upload rows.
    ///
    /// Schema errors come from the required upload-column table, one
    /// header set per file. Header sets and records carry their
    /// original batch positions (file index, raw row number) so that
    /// messages still name the right file and row after earlier files
    /// or rows failed and were dropped. Duplicate detection uses the
    /// import natural key (date, work_type, description) across all
    /// rows.
    pub fn validate_ingest(
        &self,
        headers_per_file: &[(usize, Vec<String>)],
        raw_rows: &[RawRow],
        records: &[(usize, WorkRecord)],
    ) -> ValidationResult {
        let mut schema_errors = Vec::new();
        for (file_idx, headers) in headers_per_file {
            for mut issue in schema::validate_upload_schema(headers) {
                issue.message = format!("file {}: {}", file_idx + 1, issue.message);
                schema_errors.push(issue);
            }
        }

        let business_rule_errors = records
            .iter()
            .flat_map(|(row, record)| business::validate_record(*row, record))
            .collect();

        let mut data_integrity_errors = integrity::validate_types_raw(raw_rows, &self.registry);
        let duplicates = crate::import::duplicates::detect_import_duplicates(records);
        data_integrity_errors.extend(integrity::duplicate_issues(
            &duplicates,
            "(date, work_type, description)",
        ));

        // Security and performance tiers do not apply on ingest.
        ValidationResult::assemble(
            schema_errors,
            business_rule_errors,
            data_integrity_errors,
            Vec::new(),
            SecurityChecks::default(),
            Vec::new(),
        )
    }

    fn resolve_columns<'a>(
        &'a self,
        config: &ExportConfig,
    ) -> Result<Vec<&'a FieldDescriptor>, EngineError> {
        config
            .selected_columns
            .iter()
            .map(|key| {
                self.registry
                    .describe(key)
                    .ok_or_else(|| EngineError::UnknownField(key.clone()))
            })
            .collect()
    }

    fn performance_warnings(
        &self,
        record_count: usize,
        column_count: usize,
        format: OutputFormat,
        mode: PerformanceMode,
    ) -> Vec<ValidationIssue> {
        let estimate = estimator::estimate(
            record_count,
            column_count,
            format,
            mode,
            &self.estimator_params,
        );
        let mut warnings = Vec::new();

        if estimate.time_seconds > self.thresholds.warn_time_seconds {
            warnings.push(perf_warning(format!(
                "estimated duration {}s exceeds the {}s guideline",
                estimate.time_seconds, self.thresholds.warn_time_seconds
            )));
        }
        if estimate.size_bytes > self.thresholds.warn_size_bytes {
            warnings.push(perf_warning(format!(
                "estimated output size {} bytes exceeds the {} byte guideline",
                estimate.size_bytes, self.thresholds.warn_size_bytes
            )));
        }
        if record_count > self.thresholds.warn_record_count {
            warnings.push(perf_warning(format!(
                "{} records exceed the {} record guideline",
                record_count, self.thresholds.warn_record_count
            )));
        }

        warnings
    }
}

fn perf_warning(message: String) -> ValidationIssue {
    ValidationIssue {
        severity: Severity::Performance,
        field: None,
        row: None,
        message,
    }
}

fn fingerprint_of(config: &ExportConfig, record_count: usize, dataset_token: &str) -> String {
    let fingerprint = Fingerprint {
        columns: &config.selected_columns,
        format: config.output_format,
        mode: config.performance_mode,
        record_count,
        dataset_token,
    };
    serde_json::to_string(&fingerprint).expect("fingerprint serialization cannot fail")
}
