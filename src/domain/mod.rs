// ==========================================
// Daily Works Exchange - Domain Layer
// ==========================================

pub mod config;
pub mod types;
pub mod work_record;

pub use config::{deserialize_config, serialize_config, ExportConfig, ImportConfig};
pub use types::{
    ComplexityTier, DuplicateHandling, OutputFormat, PerformanceMode, RoadSide, Severity,
    WorkStatus, WorkType,
};
pub use work_record::{FieldError, FieldValue, RawRow, UploadBatch, UploadedFile, WorkRecord};
