//! Manual micro-benchmarking: time a closure a fixed number of times and
//! aggregate the results.

pub mod collector;
pub mod runner;
pub mod summary;

pub use collector::{SampleCollector, SharedCollector, DEFAULT_RUNS};
pub use runner::{run, run_for};
pub use summary::SampleSummary;
