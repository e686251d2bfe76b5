// ==========================================
// Daily Works Exchange - Export / Import Configuration
// ==========================================
// Responsibility: user-tunable pipeline configuration plus the pure
// serialize/deserialize pair consumed by the preference store.
// The config is session-local; it is never persisted by this crate.
// ==========================================

use crate::domain::types::{DuplicateHandling, OutputFormat, PerformanceMode};
use serde::{Deserialize, Serialize};

// ==========================================
// ExportConfig
// ==========================================
// Mutated by user interaction, validated before every export attempt.
// `selected_columns` holds registry keys; order is significant and
// drives the output column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub selected_columns: Vec<String>,
    pub output_format: OutputFormat,
    pub performance_mode: PerformanceMode,
    pub file_name_base: String,
    pub include_metadata_sheet: bool,
    pub include_timestamp: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            selected_columns: vec![
                "date".to_string(),
                "rfi_number".to_string(),
                "status".to_string(),
            ],
            output_format: OutputFormat::Csv,
            performance_mode: PerformanceMode::Balanced,
            file_name_base: "daily_works".to_string(),
            include_metadata_sheet: false,
            include_timestamp: true,
        }
    }
}

// ==========================================
// ImportConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Downstream policy for flagged duplicates; the pipeline records
    /// it on the outcome but never applies it itself.
    pub duplicate_handling: DuplicateHandling,
    /// Partition size hint for downstream consumers
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            duplicate_handling: DuplicateHandling::Skip,
            batch_size: 100,
        }
    }
}

// ==========================================
// Preference-store helpers (pure)
// ==========================================

/// Serialize an export config for the preference store.
pub fn serialize_config(config: &ExportConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string(config)
}

/// Inverse of [`serialize_config`]; round-trips any valid config.
pub fn deserialize_config(payload: &str) -> Result<ExportConfig, serde_json::Error> {
    serde_json::from_str(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let config = ExportConfig {
            selected_columns: vec![
                "date".to_string(),
                "rfi_number".to_string(),
                "status".to_string(),
                "work_type".to_string(),
                "location".to_string(),
            ],
            output_format: OutputFormat::Spreadsheet,
            performance_mode: PerformanceMode::Quality,
            file_name_base: "site_a_works".to_string(),
            include_metadata_sheet: true,
            include_timestamp: false,
        };

        let payload = serialize_config(&config).unwrap();
        let restored = deserialize_config(&payload).unwrap();

        assert_eq!(restored, config);
    }

    #[test]
    fn test_default_config_round_trip() {
        let config = ExportConfig::default();
        let restored = deserialize_config(&serialize_config(&config).unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(deserialize_config("not json").is_err());
        assert!(deserialize_config("{\"output_format\":\"docx\"}").is_err());
    }

    #[test]
    fn test_import_config_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.duplicate_handling, DuplicateHandling::Skip);
    }
}
