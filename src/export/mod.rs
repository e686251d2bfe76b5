// ==========================================
// Daily Works Exchange - Export Layer
// ==========================================

pub mod error;
pub mod pipeline;
pub mod projector;
pub mod serializer;

pub use error::ExportError;
pub use pipeline::{ExportOutcome, ExportPipeline};
pub use projector::{NullUserDirectory, UserDirectory};
pub use serializer::{Blob, CsvSerializer, FormatSerializer, MetadataPayload, SerializeOptions};
