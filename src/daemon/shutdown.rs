//! Shutdown flag shared between the signal listener and the worker loop

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One-way cancellation token
///
/// Set once by the signal listener, read by the loop at its check points.
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    requested: Arc<AtomicBool>,
}

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown; returns true only for the call that set the flag
    pub fn request(&self) -> bool {
        !self.requested.swap(true, Ordering::SeqCst)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}
