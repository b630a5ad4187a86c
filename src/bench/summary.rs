use hdrhistogram::Histogram;
use serde::Serialize;

use crate::clock::Nanos;
use crate::error::{ProfilerError, Result};

/// HdrHistogram precision: 3 significant figures
const HIST_SIGFIG: u8 = 3;

/// A complete percentile breakdown of one benchmark, in nanoseconds.
/// Min, max and mean are exact; the percentiles come from the histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSummary {
    pub min_ns: i64,
    pub max_ns: i64,
    pub mean_ns: f64,
    pub p50_ns: u64,
    pub p95_ns: u64,
    pub p99_ns: u64,
    pub p999_ns: u64,
    pub count: u64,
}

impl SampleSummary {
    /// Build a summary from raw samples. Negative samples are counted as
    /// zero in the histogram; the exact min keeps their true value.
    pub fn from_samples(samples: &[Nanos]) -> Result<Self> {
        let (first, rest) = samples.split_first().ok_or(ProfilerError::EmptyCollector)?;

        // Auto-resizing, so no upper bound needs guessing
        let mut hist = Histogram::<u64>::new(HIST_SIGFIG)
            .map_err(|e| ProfilerError::Histogram(format!("{e:?}")))?;

        let mut min = *first;
        let mut max = *first;
        let mut sum: i128 = 0;
        for d in std::iter::once(first).chain(rest) {
            min = min.min(*d);
            max = max.max(*d);
            sum += d.0 as i128;
            hist.record(d.0.max(0) as u64)
                .map_err(|e| ProfilerError::Histogram(format!("{e:?}")))?;
        }

        Ok(Self {
            min_ns: min.0,
            max_ns: max.0,
            mean_ns: sum as f64 / samples.len() as f64,
            p50_ns: hist.value_at_percentile(50.0),
            p95_ns: hist.value_at_percentile(95.0),
            p99_ns: hist.value_at_percentile(99.0),
            p999_ns: hist.value_at_percentile(99.9),
            count: hist.len(),
        })
    }
}
