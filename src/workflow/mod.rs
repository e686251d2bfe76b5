// ==========================================
// Daily Works Exchange - Workflow Controller
// ==========================================
// Responsibility: the four-step session state machine that owns the
// export configuration and the upload batch. Forward movement past a
// required step is gated on that step's validation having passed;
// backward movement is always free. The controller is UI-agnostic:
// it tracks state, the surrounding app renders it.
// ==========================================

use crate::domain::config::ExportConfig;
use crate::domain::work_record::UploadBatch;
use crate::events::{OptionalSink, PipelineEvent};
use chrono::{Local, NaiveDateTime};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

// ==========================================
// WorkflowStep - the fixed step sequence
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    FileSelection,
    DataPreview,
    Configuration,
    Confirmation,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 4] = [
        WorkflowStep::FileSelection,
        WorkflowStep::DataPreview,
        WorkflowStep::Configuration,
        WorkflowStep::Confirmation,
    ];

    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// Required steps gate forward movement until validated.
    pub fn is_required(&self) -> bool {
        !matches!(self, WorkflowStep::DataPreview)
    }

    /// Preview is informational and may be skipped.
    pub fn can_skip(&self) -> bool {
        matches!(self, WorkflowStep::DataPreview)
    }

    pub fn next(&self) -> Option<WorkflowStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<WorkflowStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WorkflowStep::FileSelection => "file_selection",
            WorkflowStep::DataPreview => "data_preview",
            WorkflowStep::Configuration => "configuration",
            WorkflowStep::Confirmation => "confirmation",
        };
        write!(f, "{}", name)
    }
}

// ==========================================
// WorkflowError
// ==========================================
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("step '{0}' has not passed validation")]
    StepNotValidated(WorkflowStep),

    #[error("already at the last step")]
    AtLastStep,

    #[error("session already terminated")]
    Terminated,
}

impl std::fmt::Debug for WorkflowController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowController")
            .field("session_id", &self.session_id)
            .field("current", &self.current)
            .field("terminated", &self.terminated)
            .finish()
    }
}

// ==========================================
// ConfigStore - preference persistence seam
// ==========================================
// Only the controller touches the store; pipelines receive the config
// by reference and never persist it themselves.
pub trait ConfigStore: Send + Sync {
    fn load(&self) -> Option<ExportConfig>;
    fn save(&self, config: &ExportConfig);
}

/// Store that remembers nothing; sessions start from defaults.
#[derive(Debug, Clone, Default)]
pub struct NullConfigStore;

impl ConfigStore for NullConfigStore {
    fn load(&self) -> Option<ExportConfig> {
        None
    }

    fn save(&self, _config: &ExportConfig) {}
}

// ==========================================
// Abandonment - terminal failure/cancel marker
// ==========================================
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Abandonment {
    pub step: WorkflowStep,
    pub timestamp: NaiveDateTime,
}

// ==========================================
// WorkflowController
// ==========================================
pub struct WorkflowController {
    session_id: String,
    current: WorkflowStep,
    validated: HashSet<WorkflowStep>,
    completed_steps: Vec<WorkflowStep>,
    terminated: bool,
    pub config: ExportConfig,
    pub batch: Option<UploadBatch>,
    store: Arc<dyn ConfigStore>,
    sink: OptionalSink,
}

impl WorkflowController {
    /// Start a session at FileSelection, restoring the last saved
    /// configuration when the store has one.
    pub fn new(store: Arc<dyn ConfigStore>, sink: OptionalSink) -> Self {
        let config = store.load().unwrap_or_default();
        let session_id = Uuid::new_v4().to_string();
        info!(session_id = %session_id, "workflow session started");
        Self {
            session_id,
            current: WorkflowStep::FileSelection,
            validated: HashSet::new(),
            completed_steps: Vec::new(),
            terminated: false,
            config,
            batch: None,
            store,
            sink,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn current_step(&self) -> WorkflowStep {
        self.current
    }

    pub fn completed_steps(&self) -> &[WorkflowStep] {
        &self.completed_steps
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Record that a step's validation gate has passed.
    pub fn mark_validated(&mut self, step: WorkflowStep) {
        debug!(step = %step, "step validated");
        self.validated.insert(step);
    }

    /// Mutating the session invalidates the current step's gate.
    pub fn invalidate(&mut self, step: WorkflowStep) {
        self.validated.remove(&step);
    }

    fn gate(&self, step: WorkflowStep) -> Result<(), WorkflowError> {
        if step.is_required() && !self.validated.contains(&step) {
            return Err(WorkflowError::StepNotValidated(step));
        }
        Ok(())
    }

    /// Move one step forward. Requires the current step's gate.
    pub fn advance(&mut self) -> Result<WorkflowStep, WorkflowError> {
        self.ensure_active()?;
        let next = self.current.next().ok_or(WorkflowError::AtLastStep)?;
        self.gate(self.current)?;
        if !self.completed_steps.contains(&self.current) {
            self.completed_steps.push(self.current);
        }
        debug!(from = %self.current, to = %next, "workflow advance");
        self.current = next;
        Ok(next)
    }

    /// Move one step back. Always allowed while the session is live.
    pub fn back(&mut self) -> Result<Option<WorkflowStep>, WorkflowError> {
        self.ensure_active()?;
        if let Some(previous) = self.current.previous() {
            debug!(from = %self.current, to = %previous, "workflow back");
            self.current = previous;
            return Ok(Some(previous));
        }
        Ok(None)
    }

    /// Jump directly to a step. Backward jumps are free; forward jumps
    /// require every intermediate required step's gate.
    pub fn jump_to(&mut self, target: WorkflowStep) -> Result<WorkflowStep, WorkflowError> {
        self.ensure_active()?;
        let from = self.current.index();
        let to = target.index();
        if to > from {
            for step in &WorkflowStep::ALL[from..to] {
                self.gate(*step)?;
            }
            for step in &WorkflowStep::ALL[from..to] {
                if !self.completed_steps.contains(step) {
                    self.completed_steps.push(*step);
                }
            }
        }
        debug!(from = %self.current, to = %target, "workflow jump");
        self.current = target;
        Ok(target)
    }

    /// Terminal success: the session's steps are recorded and the
    /// configuration is persisted for the next session.
    pub fn complete(&mut self) -> Result<(), WorkflowError> {
        self.ensure_active()?;
        self.gate(self.current)?;
        if !self.completed_steps.contains(&self.current) {
            self.completed_steps.push(self.current);
        }
        self.terminated = true;
        self.store.save(&self.config);
        info!(session_id = %self.session_id, steps = self.completed_steps.len(), "workflow completed");
        Ok(())
    }

    /// Terminal failure or user cancel. The abandonment marker is
    /// handed to the analytics sink and returned to the caller.
    pub fn abandon(&mut self) -> Abandonment {
        self.terminated = true;
        self.batch = None;
        let abandonment = Abandonment {
            step: self.current,
            timestamp: Local::now().naive_local(),
        };
        warn!(session_id = %self.session_id, step = %abandonment.step, "workflow abandoned");
        self.sink.record(PipelineEvent::Cancelled {
            run_id: self.session_id.clone(),
        });
        abandonment
    }

    fn ensure_active(&self) -> Result<(), WorkflowError> {
        if self.terminated {
            return Err(WorkflowError::Terminated);
        }
        Ok(())
    }
}
