use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{AppError, AppResult};

/// Tracks which request generation is current for one logical query stream
///
/// `begin` invalidates every previously issued handle before the new network
/// call starts. Aborting the superseded request's transport is the caller's
/// job (dropping or aborting its task); the handle exists so a result that
/// completes anyway can be recognized and discarded instead of touching
/// visible state.
#[derive(Clone, Default)]
pub struct RequestCanceller {
    current: Arc<AtomicU64>,
}

/// Handle tied to one issued request
#[derive(Debug, Clone)]
pub struct CancelHandle {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RequestCanceller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request generation, invalidating all prior handles.
    pub fn begin(&self) -> CancelHandle {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        CancelHandle {
            generation,
            current: Arc::clone(&self.current),
        }
    }
}

impl CancelHandle {
    /// True once a newer request has superseded this one.
    pub fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.generation
    }

    /// Errors with [`AppError::Cancelled`] when superseded, for use with `?`
    /// between the stages of a multi-step fetch.
    pub fn ensure_current(&self) -> AppResult<()> {
        if self.is_cancelled() {
            Err(AppError::Cancelled)
        } else {
            Ok(())
        }
    }
}
