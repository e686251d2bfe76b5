// ==========================================
// Daily Works Exchange - Performance Estimator
// ==========================================
// Responsibility: deterministic duration/size/complexity estimate for
// an export request. No I/O. The estimate drives UI warnings and the
// performance validator; it never blocks an export on its own.
// Constants are heuristic and kept configurable via EstimatorParams.
// ==========================================

use crate::domain::types::{ComplexityTier, OutputFormat, PerformanceMode};
use serde::{Deserialize, Serialize};

// ==========================================
// EstimatorParams - heuristic constants
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorParams {
    /// Seconds per (record x column) cell before multipliers
    pub per_cell_seconds: f64,
    /// Time multiplier for spreadsheet output
    pub spreadsheet_time_multiplier: f64,
    /// Time multiplier when the mode enables rich formatting
    pub formatting_multiplier: f64,
    /// Estimated bytes per cell before overhead
    pub bytes_per_cell: f64,
    /// Size overhead factor for spreadsheet output
    pub spreadsheet_overhead: f64,
    /// Size overhead factor for all other formats
    pub base_overhead: f64,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            per_cell_seconds: 0.001,
            spreadsheet_time_multiplier: 2.0,
            formatting_multiplier: 1.5,
            bytes_per_cell: 50.0,
            spreadsheet_overhead: 1.8,
            base_overhead: 1.1,
        }
    }
}

// ==========================================
// Estimate
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub time_seconds: u64,
    pub size_bytes: u64,
    pub complexity_tier: ComplexityTier,
}

/// Estimate duration, output size and complexity of an export.
///
/// time    = max(1, round(records x columns x per_cell_seconds x fmt x mode))
/// size    = round(records x columns x bytes_per_cell x overhead)
/// tier    = worse of the record-count and column-count step functions
pub fn estimate(
    record_count: usize,
    column_count: usize,
    format: OutputFormat,
    mode: PerformanceMode,
    params: &EstimatorParams,
) -> Estimate {
    let cells = record_count as f64 * column_count as f64;

    let format_multiplier = if format == OutputFormat::Spreadsheet {
        params.spreadsheet_time_multiplier
    } else {
        1.0
    };
    let mode_multiplier = if mode.enables_formatting() {
        params.formatting_multiplier
    } else {
        1.0
    };

    let raw_seconds = cells * params.per_cell_seconds * format_multiplier * mode_multiplier;
    let time_seconds = (raw_seconds.round() as u64).max(1);

    let overhead = if format == OutputFormat::Spreadsheet {
        params.spreadsheet_overhead
    } else {
        params.base_overhead
    };
    let size_bytes = (cells * params.bytes_per_cell * overhead).round() as u64;

    Estimate {
        time_seconds,
        size_bytes,
        complexity_tier: complexity_tier(record_count, column_count),
    }
}

/// Step function over record and column counts; the worse axis wins.
pub fn complexity_tier(record_count: usize, column_count: usize) -> ComplexityTier {
    let by_records = if record_count <= 1_000 {
        ComplexityTier::Low
    } else if record_count <= 5_000 {
        ComplexityTier::Medium
    } else if record_count <= 20_000 {
        ComplexityTier::High
    } else {
        ComplexityTier::VeryHigh
    };

    let by_columns = if column_count <= 8 {
        ComplexityTier::Low
    } else if column_count <= 12 {
        ComplexityTier::Medium
    } else if column_count <= 15 {
        ComplexityTier::High
    } else {
        ComplexityTier::VeryHigh
    };

    by_records.max(by_columns)
}
