use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::marker::ScopeMarker;
use super::record::TraceRecord;

/// FIFO of completed scopes waiting to be written.
///
/// Owned explicitly and shared through an `Arc`; markers on any thread
/// push into it, a [`TraceSession`](super::TraceSession) drains it.
#[derive(Debug, Default)]
pub struct TraceQueue {
    records: Mutex<VecDeque<TraceRecord>>,
}

impl TraceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for the common `Arc<TraceQueue>` construction.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn push(&self, record: TraceRecord) {
        tracing::trace!(name = %record.name, tid = record.thread_id, dur_us = record.duration_us, "trace record");
        self.records.lock().push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Take every queued record in FIFO order, leaving the queue empty.
    pub fn drain(&self) -> Vec<TraceRecord> {
        let taken = std::mem::take(&mut *self.records.lock());
        taken.into()
    }

    /// Open a marker that pushes into this queue when released.
    pub fn marker(self: &Arc<Self>, name: impl Into<String>) -> ScopeMarker {
        ScopeMarker::new(Arc::clone(self), name)
    }

    /// Run `f` inside a named scope. The record is pushed when `f`
    /// returns, and also if it unwinds.
    pub fn in_scope<F, R>(self: &Arc<Self>, name: impl Into<String>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _marker = self.marker(name);
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Nanos;
    use std::panic::{self, AssertUnwindSafe};
    use std::time::Instant;

    #[test]
    fn drain_preserves_order_and_empties() {
        let q = TraceQueue::new();
        let now = Instant::now();
        for name in ["a", "b", "c"] {
            q.push(TraceRecord::new(name, Nanos(1), 1, now));
        }
        assert_eq!(q.len(), 3);

        let names: Vec<_> = q.drain().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert!(q.is_empty());
        assert!(q.drain().is_empty());
    }

    #[test]
    fn in_scope_returns_value_and_records() {
        let q = TraceQueue::shared();
        let v = q.in_scope("work", || 6 * 7);
        assert_eq!(v, 42);
        assert_eq!(q.len(), 1);
        assert_eq!(q.drain()[0].name, "work");
    }

    #[test]
    fn in_scope_records_on_panic() {
        let q = TraceQueue::shared();
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            q.in_scope("boom", || panic!("inside scope"));
        }));
        assert!(result.is_err());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn nested_scopes_close_inner_first() {
        let q = TraceQueue::shared();
        q.in_scope("outer", || {
            q.in_scope("inner", || {});
        });
        let recs = q.drain();
        assert_eq!(recs[0].name, "inner");
        assert_eq!(recs[1].name, "outer");
        assert!(recs[1].duration_us >= recs[0].duration_us);
        assert!(recs[1].start <= recs[0].start);
    }
}
