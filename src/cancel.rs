// ==========================================
// Daily Works Exchange - Cooperative Cancellation
// ==========================================
// A shared flag checked between pipeline steps. No step is forcibly
// interrupted mid-execution; serializers in particular are not
// preemptible and run to completion once started.
// ==========================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation; idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
