// ==========================================
// Daily Works Exchange - Import Layer
// ==========================================

pub mod duplicates;
pub mod error;
pub mod file_check;
pub mod mapper;
pub mod parser;
pub mod pipeline;

pub use error::ImportError;
pub use file_check::UploadKind;
pub use parser::{CsvParser, FileParser, ParsedFile, SpreadsheetParser};
pub use pipeline::{ImportOutcome, ImportPipeline, ImportSummary};
