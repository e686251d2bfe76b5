// ==========================================
// Daily Works Exchange - Import Duplicate Detection
// ==========================================
// Ingest-side natural key: (date, work_type, description). Detection
// runs over the combined rows of ALL files in the batch, so the same
// work appearing in two uploads is still flagged.
// ==========================================

use crate::domain::work_record::WorkRecord;
use crate::validation::integrity::{group_duplicates, DuplicateGroup};

/// Flag records sharing the ingest natural key. Each record carries
/// its 1-based raw row number across the batch, so the reported rows
/// match the per-row error keys even when earlier rows failed to map.
pub fn detect_import_duplicates(records: &[(usize, WorkRecord)]) -> Vec<DuplicateGroup> {
    group_duplicates(records.iter().map(|(row, r)| {
        let key = format!(
            "{} / {} / {}",
            r.date.format("%Y-%m-%d"),
            r.work_type,
            r.description.trim()
        );
        (*row, key)
    }))
}
