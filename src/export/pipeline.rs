// ==========================================
// Daily Works Exchange - Export Pipeline
// ==========================================
// Flow: validate -> project -> serialize -> metadata -> filename
// Each step reports a progress percentage and checks the shared
// cancellation token; serializers are not preemptible, so the token
// is checked before serialization begins.
// ==========================================

use crate::cancel::CancelToken;
use crate::domain::config::ExportConfig;
use crate::domain::types::OutputFormat;
use crate::domain::work_record::WorkRecord;
use crate::events::{OptionalSink, PipelineEvent, PipelineKind};
use crate::export::error::{ExportError, ExportPipelineResult};
use crate::export::projector::{self, UserDirectory};
use crate::export::serializer::{Blob, FormatSerializer, MetadataPayload, SerializeOptions};
use crate::validation::{EngineError, UserPermissions, ValidationEngine};
use chrono::Local;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

// ==========================================
// ExportOutcome - result descriptor
// ==========================================
#[derive(Debug)]
pub struct ExportOutcome {
    pub run_id: String,
    pub file_name: String,
    pub blob: Blob,
    pub record_count: usize,
    pub column_count: usize,
    pub elapsed_ms: u64,
}

// ==========================================
// ExportPipeline
// ==========================================
pub struct ExportPipeline {
    engine: Arc<ValidationEngine>,
    serializers: HashMap<OutputFormat, Box<dyn FormatSerializer>>,
    users: Arc<dyn UserDirectory>,
    sink: OptionalSink,
}

impl ExportPipeline {
    pub fn new(
        engine: Arc<ValidationEngine>,
        serializers: Vec<Box<dyn FormatSerializer>>,
        users: Arc<dyn UserDirectory>,
        sink: OptionalSink,
    ) -> Self {
        let serializers = serializers
            .into_iter()
            .map(|s| (s.format(), s))
            .collect();
        Self {
            engine,
            serializers,
            users,
            sink,
        }
    }

    /// Run one export end to end.
    ///
    /// `progress` receives monotonically non-decreasing percentages,
    /// ending at 100 on success. The validation fingerprint uses
    /// `dataset_token` to identify the record set.
    pub async fn run(
        &self,
        records: &[WorkRecord],
        config: &ExportConfig,
        permissions: &UserPermissions,
        dataset_token: &str,
        progress: &(dyn Fn(u8) + Send + Sync),
        cancel: &CancelToken,
    ) -> ExportPipelineResult<ExportOutcome> {
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, format = %config.output_format, records = records.len(), "export started");
        self.sink.record(PipelineEvent::Started {
            run_id: run_id.clone(),
            pipeline: PipelineKind::Export,
        });

        let result = self
            .run_inner(records, config, permissions, dataset_token, progress, cancel, &run_id)
            .await;

        match &result {
            Ok(outcome) => {
                info!(
                    run_id = %run_id,
                    file_name = %outcome.file_name,
                    bytes = outcome.blob.len(),
                    elapsed_ms = outcome.elapsed_ms,
                    "export completed"
                );
                self.sink.record(PipelineEvent::Completed {
                    run_id: run_id.clone(),
                    elapsed_ms: outcome.elapsed_ms,
                });
            }
            Err(err) if err.is_cancellation() => {
                warn!(run_id = %run_id, "export cancelled");
                self.sink.record(PipelineEvent::Cancelled {
                    run_id: run_id.clone(),
                });
            }
            Err(err) => {
                error!(run_id = %run_id, error = %err, "export failed");
                self.sink.record(PipelineEvent::Failed {
                    run_id: run_id.clone(),
                    message: err.to_string(),
                });
            }
        }

        result
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_inner(
        &self,
        records: &[WorkRecord],
        config: &ExportConfig,
        permissions: &UserPermissions,
        dataset_token: &str,
        progress: &(dyn Fn(u8) + Send + Sync),
        cancel: &CancelToken,
        run_id: &str,
    ) -> ExportPipelineResult<ExportOutcome> {
        let start = Instant::now();
        let report = |pct: u8| {
            progress(pct);
            self.sink.record(PipelineEvent::Progress {
                run_id: run_id.to_string(),
                percent: pct,
            });
        };

        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }

        // === step 1: validate ===
        debug!("step 1: validate configuration");
        report(5);
        if records.is_empty() {
            return Err(ExportError::NoData);
        }
        let validation = self
            .engine
            .validate_export(config, records, permissions, dataset_token)
            .map_err(|e: EngineError| ExportError::Other(e.into()))?;
        if !validation.is_valid {
            return Err(ExportError::Invalid {
                summary: validation.summary(),
                result: Box::new(validation),
            });
        }
        report(20);

        // === step 2: project rows onto selected columns ===
        debug!("step 2: project rows");
        let columns: Vec<_> = config
            .selected_columns
            .iter()
            .filter_map(|key| self.engine.registry().describe(key))
            .collect();
        let headers = projector::project_headers(&columns);
        let rows = projector::project_records(
            records,
            &columns,
            config.output_format,
            self.users.as_ref(),
        );
        report(45);

        // === step 3: serialize (not preemptible once started) ===
        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }
        debug!("step 3: serialize");
        let serializer = self
            .serializers
            .get(&config.output_format)
            .ok_or_else(|| ExportError::MissingSerializer(config.output_format.to_string()))?;

        let options = SerializeOptions {
            metadata: config.include_metadata_sheet.then(|| MetadataPayload {
                generated_at: Local::now().naive_local(),
                record_count: records.len(),
                column_count: columns.len(),
                format: config.output_format,
                mode: config.performance_mode,
            }),
        };
        let blob = serializer
            .serialize(&rows, &headers, &options)
            .map_err(|e| ExportError::SerializationFailed {
                format: config.output_format.to_string(),
                message: e.to_string(),
            })?;
        report(85);

        // === step 4: compose filename ===
        debug!("step 4: compose filename");
        let file_name = compose_file_name(config);
        report(95);

        let outcome = ExportOutcome {
            run_id: run_id.to_string(),
            file_name,
            blob,
            record_count: records.len(),
            column_count: columns.len(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        report(100);
        Ok(outcome)
    }
}

/// `base[_YYYYMMDD_HHMMSS].ext`
fn compose_file_name(config: &ExportConfig) -> String {
    let extension = config.output_format.extension();
    if config.include_timestamp {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("{}_{}.{}", config.file_name_base, stamp, extension)
    } else {
        format!("{}.{}", config.file_name_base, extension)
    }
}
