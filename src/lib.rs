// ==========================================
// Daily Works Exchange - Core Library
// ==========================================
// Bidirectional data pipeline for construction daily-work records:
// field registry, validation engine, export/import pipelines and the
// session workflow controller. Byte layouts and persistence live in
// collaborators behind the trait seams, never here.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer: record, configs, shared enums
pub mod domain;

// Field registry: the 15 exportable columns and their format rules
pub mod registry;

// Performance estimator: advisory time/size/complexity figures
pub mod estimator;

// Validation layer: four validators behind one engine
pub mod validation;

// Export layer: validate -> project -> serialize
pub mod export;

// Import layer: check -> parse -> map -> validate
pub mod import;

// Session state machine over the two pipelines
pub mod workflow;

// Cooperative cancellation token
pub mod cancel;

// Pipeline lifecycle events and the analytics seam
pub mod events;

// Logging setup
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

pub use cancel::CancelToken;
pub use domain::config::{deserialize_config, serialize_config, ExportConfig, ImportConfig};
pub use domain::types::{
    ComplexityTier, DuplicateHandling, OutputFormat, PerformanceMode, RoadSide, Severity,
    WorkStatus, WorkType,
};
pub use domain::work_record::{FieldError, FieldValue, RawRow, UploadBatch, UploadedFile, WorkRecord};
pub use estimator::{Estimate, EstimatorParams};
pub use events::{AnalyticsSink, NoOpSink, OptionalSink, PipelineEvent, PipelineKind};
pub use export::{
    Blob, CsvSerializer, ExportError, ExportOutcome, ExportPipeline, FormatSerializer,
    NullUserDirectory, UserDirectory,
};
pub use import::{ImportError, ImportOutcome, ImportPipeline, ImportSummary};
pub use registry::{FieldDescriptor, FieldRegistry, FieldType, MAX_SELECTED_COLUMNS};
pub use validation::{
    PerformanceThresholds, SecurityChecks, UserPermissions, ValidationEngine, ValidationIssue,
    ValidationResult,
};
pub use workflow::{ConfigStore, WorkflowController, WorkflowError, WorkflowStep};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Daily Works Exchange";
