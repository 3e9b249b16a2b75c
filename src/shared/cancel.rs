//! Per-job cancellation token

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Best-effort cancellation flag for one billing job.
///
/// The engine polls it between apartments only, so no broadcast channel
/// is needed — the write-at-end-of-apartment semantics make stopping at
/// an apartment boundary safe without rollback.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ── Tests ──────────────────────────────────────────────────────
