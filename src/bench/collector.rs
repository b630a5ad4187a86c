use std::fmt::Write as _;
use std::io;

use parking_lot::Mutex;

use super::summary::SampleSummary;
use crate::clock::Nanos;
use crate::error::{ProfilerError, Result};

// ─── Configuration ───────────────────────────────────────────────

/// Number of runs a collector accepts when no capacity is given
pub const DEFAULT_RUNS: usize = 32;

// ─── SampleCollector ─────────────────────────────────────────────

/// Fixed-capacity, insertion-ordered list of run durations.
///
/// Min and max are kept up to date on every `record()`. The total is
/// only recomputed when an aggregate is read after new samples arrived.
#[derive(Debug, Clone)]
pub struct SampleCollector {
    samples: Vec<Nanos>,
    capacity: usize,

    min: Option<Nanos>,
    max: Option<Nanos>,

    // Valid only while `total_dirty` is false
    total: i128,
    total_dirty: bool,
}

impl SampleCollector {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RUNS)
    }

    /// Collector that becomes full after exactly `runs` samples.
    pub fn with_capacity(runs: usize) -> Self {
        Self {
            samples: Vec::with_capacity(runs),
            capacity: runs,
            min: None,
            max: None,
            total: 0,
            total_dirty: false,
        }
    }

    /// Append one run. Fails once the collector is full.
    pub fn record(&mut self, d: impl Into<Nanos>) -> Result<()> {
        if self.is_full() {
            return Err(ProfilerError::CollectorFull {
                capacity: self.capacity,
            });
        }
        let d = d.into();
        self.total_dirty = true;
        self.min = Some(self.min.map_or(d, |m| m.min(d)));
        self.max = Some(self.max.map_or(d, |m| m.max(d)));
        self.samples.push(d);
        Ok(())
    }

    /// Loop-termination signal for benchmark drivers.
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Recorded durations in call order.
    pub fn samples(&self) -> &[Nanos] {
        &self.samples
    }

    /// Fastest run so far.
    pub fn min(&self) -> Option<Nanos> {
        self.min
    }

    /// Slowest run so far.
    pub fn max(&self) -> Option<Nanos> {
        self.max
    }

    /// Sum of all samples in nanoseconds.
    pub fn total(&mut self) -> i128 {
        self.update_total();
        self.total
    }

    /// Integer mean (truncating toward zero).
    pub fn average(&mut self) -> Result<Nanos> {
        if self.samples.is_empty() {
            return Err(ProfilerError::EmptyCollector);
        }
        self.update_total();
        let avg = self.total / self.samples.len() as i128;
        // The mean of i64 values always fits back into an i64
        Ok(Nanos(avg as i64))
    }

    /// Forget every sample but keep the configured capacity.
    pub fn clear(&mut self) {
        *self = Self::with_capacity(self.capacity);
    }

    /// Percentile breakdown of the recorded samples.
    pub fn summary(&self) -> Result<SampleSummary> {
        SampleSummary::from_samples(&self.samples)
    }

    /// `Average,<ns>, Min,<ns>, Max,<ns>, Complete Data, <d1>, ...\n`
    ///
    /// Values are bare integer nanoseconds with no `ns` suffix so every
    /// field parses as a number.
    pub fn csv_line(&mut self) -> Result<String> {
        let avg = self.average()?;
        let (min, max) = match (self.min, self.max) {
            (Some(min), Some(max)) => (min, max),
            _ => return Err(ProfilerError::EmptyCollector),
        };

        let mut line = format!("Average,{avg}, Min,{min}, Max,{max}, Complete Data");
        for d in &self.samples {
            // Writing into a String cannot fail
            let _ = write!(line, ", {d}");
        }
        line.push('\n');
        Ok(line)
    }

    /// Stream the CSV line into any text sink.
    pub fn write_csv<W: io::Write>(&mut self, w: &mut W) -> Result<()> {
        let line = self.csv_line()?;
        w.write_all(line.as_bytes())
            .map_err(|e| ProfilerError::io("<csv sink>", e))
    }

    fn update_total(&mut self) {
        if !self.total_dirty {
            return;
        }
        self.total = self.samples.iter().map(|d| d.0 as i128).sum();
        self.total_dirty = false;
    }
}

impl Default for SampleCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ─── SharedCollector ─────────────────────────────────────────────

/// Thread-safe wrapper around a [`SampleCollector`].
/// Worker threads call `record()`, the reporting side reads a snapshot.
#[derive(Debug, Default)]
pub struct SharedCollector {
    inner: Mutex<SampleCollector>,
}

impl SharedCollector {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RUNS)
    }

    pub fn with_capacity(runs: usize) -> Self {
        Self {
            inner: Mutex::new(SampleCollector::with_capacity(runs)),
        }
    }

    pub fn record(&self, d: impl Into<Nanos>) -> Result<()> {
        self.inner.lock().record(d)
    }

    pub fn is_full(&self) -> bool {
        self.inner.lock().is_full()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn average(&self) -> Result<Nanos> {
        self.inner.lock().average()
    }

    pub fn csv_line(&self) -> Result<String> {
        self.inner.lock().csv_line()
    }

    /// Wipe all samples, e.g. before a fresh run.
    pub fn reset(&self) {
        self.inner.lock().clear();
    }

    /// Copy of the collector as it stands right now.
    pub fn snapshot(&self) -> SampleCollector {
        self.inner.lock().clone()
    }

    pub fn into_inner(self) -> SampleCollector {
        self.inner.into_inner()
    }
}
