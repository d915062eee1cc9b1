//! Tick observation and run control
//!
//! The engine stays silent. Anything that wants to watch the run (a
//! console frontend, a test, a tracer) registers a [`TickObserver`].

use crate::timeline::TickRecord;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback invoked after every completed tick
pub trait TickObserver {
    fn on_tick(&mut self, record: &TickRecord);
}

impl<F> TickObserver for F
where
    F: FnMut(&TickRecord),
{
    fn on_tick(&mut self, record: &TickRecord) {
        self(record)
    }
}

/// Shared stop request for a run in progress
///
/// Cloning yields another handle to the same flag. The simulator only
/// checks it between ticks.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the run to stop before its next tick
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Clears a previous stop request
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
