use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::clock::{signed_between, Nanos};

static NEXT_TID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static TID: u64 = NEXT_TID.fetch_add(1, Ordering::Relaxed);
}

/// Stable logical id of the calling OS thread (1, 2, 3, ... in order of
/// first use). Trace viewers need an integer `tid`.
pub fn thread_id() -> u64 {
    TID.with(|t| *t)
}

/// One completed scope.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRecord {
    /// Scope duration in microseconds
    pub duration_us: f64,
    /// Function or block name
    pub name: String,
    /// Logical id of the thread that ran the scope
    pub thread_id: u64,
    /// When the scope was entered
    pub start: Instant,
}

impl TraceRecord {
    pub fn new(name: impl Into<String>, duration: Nanos, thread_id: u64, start: Instant) -> Self {
        Self {
            duration_us: duration.as_micros_f64(),
            name: name.into(),
            thread_id,
            start,
        }
    }

    /// Start time in microseconds relative to `origin`; negative when the
    /// scope was entered before it.
    pub fn ts_us(&self, origin: Instant) -> f64 {
        signed_between(origin, self.start).as_micros_f64()
    }
}
