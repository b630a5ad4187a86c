//! # scope-profiler
//!
//! In-process instrumentation with two independent halves:
//!
//! - [`bench`] — time a closure a fixed number of times and report
//!   average / min / max / percentiles.
//! - [`trace`] — bracket scopes with RAII markers and dump them as a
//!   Chrome Trace Event JSON file when the session ends.

pub mod bench;
pub mod clock;
pub mod config;
pub mod error;
pub mod trace;

pub use bench::{SampleCollector, SampleSummary, SharedCollector};
pub use clock::{Clock, Nanos};
pub use config::TraceConfig;
pub use error::{ProfilerError, Result};
pub use trace::{ScopeMarker, TraceQueue, TraceRecord, TraceSession};
