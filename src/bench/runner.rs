use std::time::{Duration, Instant};

use super::collector::SampleCollector;
use crate::clock::Clock;
use crate::error::{ProfilerError, Result};

// ─── Drivers ─────────────────────────────────────────────────────

/// Call `f` once per remaining slot, timing each call, until the
/// collector is full.
pub fn run<F, R>(collector: &mut SampleCollector, mut f: F)
where
    F: FnMut() -> R,
{
    while !collector.is_full() {
        let clock = Clock::start();
        std::hint::black_box(f());
        // Cannot fail: the loop condition guarantees a free slot
        let _ = collector.record(clock.elapsed());
    }
}

/// Like [`run`], but give up once `budget` of wall time has passed.
///
/// Returns `Incomplete` when the deadline hits before the collector is
/// full; the samples gathered so far stay in the collector.
pub fn run_for<F, R>(collector: &mut SampleCollector, budget: Duration, mut f: F) -> Result<()>
where
    F: FnMut() -> R,
{
    let deadline = Instant::now() + budget;

    while !collector.is_full() {
        if Instant::now() >= deadline {
            tracing::debug!(
                recorded = collector.len(),
                capacity = collector.capacity(),
                "benchmark budget exhausted"
            );
            return Err(ProfilerError::Incomplete {
                recorded: collector.len(),
                capacity: collector.capacity(),
            });
        }
        let clock = Clock::start();
        std::hint::black_box(f());
        collector.record(clock.elapsed())?;
    }
    Ok(())
}

// ─── Macro ───────────────────────────────────────────────────────

/// Benchmark an expression and print its CSV line to stdout.
///
/// `benchmark!(expr)` runs it [`DEFAULT_RUNS`](crate::bench::DEFAULT_RUNS)
/// times, `benchmark!(runs, expr)` a given number of times. Evaluates to
/// the filled [`SampleCollector`].
#[macro_export]
macro_rules! benchmark {
    ($runs:expr, $body:expr) => {{
        let mut collector = $crate::bench::SampleCollector::with_capacity($runs);
        $crate::bench::run(&mut collector, || $body);
        match collector.csv_line() {
            Ok(line) => print!("{line}"),
            Err(e) => eprintln!("benchmark: {e}"),
        }
        collector
    }};
    ($body:expr) => {
        $crate::benchmark!($crate::bench::DEFAULT_RUNS, $body)
    };
}
