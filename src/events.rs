// ==========================================
// Daily Works Exchange - Pipeline Lifecycle Events
// ==========================================
// Responsibility: the analytics-sink seam. The core emits plain-data
// events and never blocks on, or fails because of, the sink. The sink
// trait is defined here and implemented by the surrounding app.
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// Event types
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    Export,
    Import,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    Started {
        run_id: String,
        pipeline: PipelineKind,
    },
    Progress {
        run_id: String,
        percent: u8,
    },
    Completed {
        run_id: String,
        elapsed_ms: u64,
    },
    Failed {
        run_id: String,
        message: String,
    },
    Cancelled {
        run_id: String,
    },
}

// ==========================================
// AnalyticsSink trait
// ==========================================
// Pure observer. Implementations must not panic; the pipelines call
// `record` on a best-effort basis and ignore the sink thereafter.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: PipelineEvent);
}

/// Sink that drops every event; used when analytics is not wired up.
#[derive(Debug, Clone, Default)]
pub struct NoOpSink;

impl AnalyticsSink for NoOpSink {
    fn record(&self, event: PipelineEvent) {
        tracing::trace!(?event, "NoOpSink: event dropped");
    }
}

// ==========================================
// OptionalSink - simplifies Option<Arc<dyn AnalyticsSink>>
// ==========================================
#[derive(Clone, Default)]
pub struct OptionalSink {
    inner: Option<Arc<dyn AnalyticsSink>>,
}

impl OptionalSink {
    pub fn with_sink(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { inner: Some(sink) }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }

    pub fn record(&self, event: PipelineEvent) {
        if let Some(sink) = &self.inner {
            sink.record(event);
        }
    }
}
