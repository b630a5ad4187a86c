//! Scope-based execution tracing in Chrome Trace Event format.
//!
//! ```no_run
//! use scope_profiler::{trace_scope, TraceConfig, TraceSession};
//!
//! let session = TraceSession::new(TraceConfig::default());
//! let queue = session.queue().clone();
//! {
//!     trace_scope!(queue, "load");
//!     // ...
//! }
//! let path = session.finish()?;
//! println!("open {} in chrome://tracing", path.display());
//! # Ok::<(), scope_profiler::ProfilerError>(())
//! ```
//!
//! - Markers are RAII guards; each pushes exactly one record on release
//! - The queue is an explicit `Arc<TraceQueue>`, never a global
//! - Each OS thread gets a small stable integer thread id

pub mod marker;
pub mod queue;
pub mod record;
pub mod session;
pub mod writer;

pub use marker::ScopeMarker;
pub use queue::TraceQueue;
pub use record::{thread_id, TraceRecord};
pub use session::TraceSession;
pub use writer::{write_trace, CompleteEvent, EmptyEvent, TraceDocument, TraceEvent};
