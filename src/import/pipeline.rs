// ==========================================
// Daily Works Exchange - Import Pipeline
// ==========================================
// Flow per file: acceptance check -> parse -> map; then across the
// whole batch: ingest validation -> duplicate flagging -> chunking.
// A failing file is recorded on the batch and never aborts the rest;
// the pipeline always returns an outcome.
// ==========================================

use crate::domain::config::ImportConfig;
use crate::domain::types::DuplicateHandling;
use crate::domain::work_record::{FieldError, RawRow, UploadBatch, UploadedFile, WorkRecord};
use crate::events::{OptionalSink, PipelineEvent, PipelineKind};
use crate::import::duplicates::detect_import_duplicates;
use crate::import::file_check;
use crate::import::mapper;
use crate::import::parser;
use crate::validation::integrity::DuplicateGroup;
use crate::validation::{ValidationEngine, ValidationResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ==========================================
// ImportSummary - per-batch counts
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportSummary {
    pub total_files: usize,
    pub parsed_files: usize,
    pub total_rows: usize,
    pub valid_rows: usize,
    pub error_rows: usize,
    pub duplicate_rows: usize,
}

// ==========================================
// ImportOutcome - result descriptor
// ==========================================
#[derive(Debug)]
pub struct ImportOutcome {
    pub batch_id: String,
    /// All successfully mapped records, in batch order
    pub records: Vec<WorkRecord>,
    /// Records partitioned into batch_size chunks (downstream hint)
    pub batches: Vec<Vec<WorkRecord>>,
    pub validation: ValidationResult,
    /// Flagged collisions; applying the policy is downstream's job
    pub duplicates: Vec<DuplicateGroup>,
    pub duplicate_handling: DuplicateHandling,
    /// File-level failures keyed by file index
    pub file_errors: HashMap<usize, Vec<FieldError>>,
    /// Row-level failures keyed by 1-based row number across the batch
    pub row_errors: HashMap<usize, Vec<FieldError>>,
    pub summary: ImportSummary,
    pub elapsed_ms: u64,
}

// ==========================================
// ImportPipeline
// ==========================================
pub struct ImportPipeline {
    engine: Arc<ValidationEngine>,
    sink: OptionalSink,
}

impl ImportPipeline {
    pub fn new(engine: Arc<ValidationEngine>, sink: OptionalSink) -> Self {
        Self { engine, sink }
    }

    /// Process one upload batch end to end. File failures are recorded
    /// per file; the outcome is always produced.
    pub async fn run(&self, files: Vec<UploadedFile>, config: &ImportConfig) -> ImportOutcome {
        let batch_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        info!(batch_id = %batch_id, files = files.len(), "import started");
        self.sink.record(PipelineEvent::Started {
            run_id: batch_id.clone(),
            pipeline: PipelineKind::Import,
        });

        let mut batch = UploadBatch::new(files);
        // Headers keep their file index and records their raw row
        // number, so validation messages stay attributed correctly
        // after a failing file or a dropped row.
        let mut headers_per_file: Vec<(usize, Vec<String>)> = Vec::new();
        let mut raw_rows: Vec<RawRow> = Vec::new();
        let mut numbered: Vec<(usize, WorkRecord)> = Vec::new();
        let mut parsed_files = 0usize;
        let mut total_rows = 0usize;

        // === steps 1-3, per file in array order ===
        for file_idx in 0..batch.files.len() {
            let file = &batch.files[file_idx];
            debug!(file = %file.file_name, "step 1: acceptance check");

            let kind = match file_check::check_file(file) {
                Ok(kind) if kind.is_data_importable() => kind,
                Ok(_) => {
                    warn!(file = %file.file_name, "reference-only file skipped");
                    record_file_error(
                        &mut batch,
                        file_idx,
                        "file",
                        "reference-only file type; rows were not imported",
                    );
                    continue;
                }
                Err(err) => {
                    warn!(file = %file.file_name, error = %err, "file rejected");
                    record_file_error(&mut batch, file_idx, "file", err.to_string());
                    continue;
                }
            };

            debug!(file = %batch.files[file_idx].file_name, "step 2: parse");
            let parsed = match parser::parser_for(kind).parse(&batch.files[file_idx]) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(file = %batch.files[file_idx].file_name, error = %err, "parse failed");
                    record_file_error(&mut batch, file_idx, "file", err.to_string());
                    continue;
                }
            };
            parsed_files += 1;
            headers_per_file.push((file_idx, parsed.headers));

            debug!(rows = parsed.rows.len(), "step 3: map rows");
            let mut file_records = Vec::new();
            for row in parsed.rows {
                total_rows += 1;
                let row_number = total_rows;
                let mapped = mapper::map_row(&row);
                if !mapped.errors.is_empty() {
                    batch.row_errors.insert(row_number, mapped.errors);
                }
                if let Some(record) = mapped.record {
                    numbered.push((row_number, record.clone()));
                    file_records.push(record);
                }
                raw_rows.push(row);
            }
            batch.parsed_rows.push(file_records);
        }

        // === step 4: ingest validation across the whole batch ===
        debug!("step 4: ingest validation");
        let validation = self
            .engine
            .validate_ingest(&headers_per_file, &raw_rows, &numbered);

        // === step 5: cross-file duplicate flagging ===
        debug!("step 5: duplicate detection");
        let duplicates = detect_import_duplicates(&numbered);
        let duplicate_rows: usize = duplicates.iter().map(|g| g.rows.len()).sum();

        let records: Vec<WorkRecord> = numbered.into_iter().map(|(_, r)| r).collect();

        // === step 6: partition into downstream chunks ===
        let chunk = config.batch_size.max(1);
        let batches: Vec<Vec<WorkRecord>> =
            records.chunks(chunk).map(<[WorkRecord]>::to_vec).collect();

        let summary = ImportSummary {
            total_files: batch.files.len(),
            parsed_files,
            total_rows,
            valid_rows: records.len(),
            error_rows: batch.row_errors.len(),
            duplicate_rows,
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            batch_id = %batch_id,
            total_rows = summary.total_rows,
            valid_rows = summary.valid_rows,
            error_rows = summary.error_rows,
            duplicates = summary.duplicate_rows,
            elapsed_ms,
            "import completed"
        );
        self.sink.record(PipelineEvent::Completed {
            run_id: batch_id.clone(),
            elapsed_ms,
        });

        ImportOutcome {
            batch_id,
            records,
            batches,
            validation,
            duplicates,
            duplicate_handling: config.duplicate_handling,
            file_errors: batch.file_errors,
            row_errors: batch.row_errors,
            summary,
            elapsed_ms,
        }
    }
}

fn record_file_error(
    batch: &mut UploadBatch,
    file_idx: usize,
    field: &str,
    message: impl Into<String>,
) {
    batch
        .file_errors
        .entry(file_idx)
        .or_default()
        .push(FieldError::new(field, message));
}
