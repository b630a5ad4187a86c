use std::sync::Arc;

use super::queue::TraceQueue;
use super::record::{thread_id, TraceRecord};
use crate::clock::Clock;

/// RAII guard bracketing one measured scope.
///
/// Created on scope entry; on release (explicit [`finish`](Self::finish)
/// or drop, including during unwinding) it pushes exactly one
/// [`TraceRecord`] into its queue.
#[must_use = "a marker measures the scope it lives in; binding it to `_` drops it immediately"]
pub struct ScopeMarker {
    queue: Arc<TraceQueue>,
    name: String,
    clock: Clock,
    thread_id: u64,
    released: bool,
}

impl ScopeMarker {
    pub fn new(queue: Arc<TraceQueue>, name: impl Into<String>) -> Self {
        Self {
            queue,
            name: name.into(),
            thread_id: thread_id(),
            clock: Clock::start(),
            released: false,
        }
    }

    /// The clock started when this marker was created.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Release now instead of at end of scope.
    pub fn finish(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let duration = self.clock.elapsed();
        self.queue.push(TraceRecord::new(
            std::mem::take(&mut self.name),
            duration,
            self.thread_id,
            self.clock.instant(),
        ));
    }
}

impl Drop for ScopeMarker {
    fn drop(&mut self) {
        self.release();
    }
}

/// Path of the enclosing function, e.g. `my_crate::worker::step`.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = name.strip_suffix("::f").unwrap_or(name);
        name.trim_end_matches("::{{closure}}")
    }};
}

/// Open a [`ScopeMarker`] that lives until the end of the enclosing block.
///
/// ```no_run
/// use scope_profiler::{trace_scope, TraceQueue};
///
/// fn step(queue: &std::sync::Arc<TraceQueue>) {
///     trace_scope!(queue);             // named after `step`'s path
///     trace_scope!(queue, "inner");    // explicit name
/// }
/// ```
#[macro_export]
macro_rules! trace_scope {
    ($queue:expr) => {
        let _scope_marker = $crate::trace::TraceQueue::marker(&$queue, $crate::__function_name!());
    };
    ($queue:expr, $name:expr) => {
        let _scope_marker = $crate::trace::TraceQueue::marker(&$queue, $name);
    };
}
