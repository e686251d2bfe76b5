// ==========================================
// Daily Works Exchange - Export Error Types
// ==========================================
// Tool: thiserror derive macro
// Expected validation failures surface as ExportError::Invalid with
// the structured result attached; collaborator failures are wrapped
// with the original message preserved.
// ==========================================

use crate::validation::ValidationResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    // ===== configuration =====
    #[error("invalid export configuration: {summary}")]
    Invalid {
        summary: String,
        result: Box<ValidationResult>,
    },

    #[error("nothing to export: the record set is empty")]
    NoData,

    // ===== collaborator boundary =====
    #[error("serialization failed ({format}): {message}")]
    SerializationFailed { format: String, message: String },

    #[error("no serializer registered for format '{0}'")]
    MissingSerializer(String),

    // ===== terminal, not a failure =====
    #[error("export cancelled by the user")]
    Cancelled,

    // ===== generic =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExportError {
    /// Cancellation is a normal terminal state, not a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ExportError::Cancelled)
    }
}

pub type ExportPipelineResult<T> = Result<T, ExportError>;
