use std::fmt;
use std::ops::Sub;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

// ─── Duration ────────────────────────────────────────────────────

/// Signed count of nanoseconds.
///
/// Signed so that the difference of two captures taken in either order
/// is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Nanos(pub i64);

impl Nanos {
    pub const ZERO: Nanos = Nanos(0);

    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Microseconds as a float, the unit trace events use.
    pub fn as_micros_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Saturates at `i64::MAX` (~292 years).
    pub fn from_std(d: Duration) -> Self {
        Nanos(i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
    }
}

impl From<Duration> for Nanos {
    fn from(d: Duration) -> Self {
        Nanos::from_std(d)
    }
}

impl fmt::Display for Nanos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Clock ───────────────────────────────────────────────────────

/// Start-time formatting (`2026_10_18_09_30_00`)
const START_STAMP_FMT: &str = "%Y_%m_%d_%H_%M_%S";
/// Current-time formatting (`2026_10_18-09_30_00`), used in file names
const CURRENT_STAMP_FMT: &str = "%Y_%m_%d-%H_%M_%S";

/// A captured point in time.
///
/// Durations are measured on the monotonic clock; the wall-clock capture
/// taken alongside it is only used for human-readable stamps.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    instant: Instant,
    wall: DateTime<Local>,
}

impl Clock {
    /// Capture "now".
    pub fn start() -> Self {
        Self {
            instant: Instant::now(),
            wall: Local::now(),
        }
    }

    /// Re-capture "now", discarding the previous start.
    pub fn reset(&mut self) {
        *self = Self::start();
    }

    /// Time since capture.
    pub fn elapsed(&self) -> Nanos {
        Nanos::from_std(self.instant.elapsed())
    }

    /// Signed duration from `earlier` to `self`; negative when `self`
    /// was captured first.
    pub fn since(&self, earlier: &Clock) -> Nanos {
        signed_between(earlier.instant, self.instant)
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }

    pub fn wall(&self) -> DateTime<Local> {
        self.wall
    }

    /// Local start time, `YYYY_MM_DD_HH_MM_SS`.
    pub fn start_stamp(&self) -> String {
        self.wall.format(START_STAMP_FMT).to_string()
    }

    /// Local current time, `YYYY_MM_DD-HH_MM_SS`.
    pub fn current_stamp() -> String {
        Local::now().format(CURRENT_STAMP_FMT).to_string()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

impl Sub for &Clock {
    type Output = Nanos;

    fn sub(self, rhs: &Clock) -> Nanos {
        self.since(rhs)
    }
}

/// Signed nanoseconds from `from` to `to`.
pub(crate) fn signed_between(from: Instant, to: Instant) -> Nanos {
    if to >= from {
        Nanos::from_std(to - from)
    } else {
        Nanos(-Nanos::from_std(from - to).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn elapsed_is_non_negative_and_grows() {
        let c = Clock::start();
        let a = c.elapsed();
        thread::sleep(Duration::from_millis(2));
        let b = c.elapsed();
        assert!(a.0 >= 0);
        assert!(b >= a);
        assert!(b.0 >= 2_000_000);
    }

    #[test]
    fn subtraction_is_signed() {
        let first = Clock::start();
        thread::sleep(Duration::from_millis(1));
        let second = Clock::start();

        let forward = &second - &first;
        let backward = &first - &second;
        assert!(forward.0 > 0);
        assert_eq!(backward.0, -forward.0);
    }

    #[test]
    fn reset_moves_start_forward() {
        let mut c = Clock::start();
        let before = c.instant();
        thread::sleep(Duration::from_millis(1));
        c.reset();
        assert!(c.instant() > before);
    }

    #[test]
    fn stamps_have_expected_shape() {
        let c = Clock::start();
        let start = c.start_stamp();
        assert_eq!(start.len(), "2026_10_18_09_30_00".len());
        assert_eq!(start.matches('_').count(), 5);

        let now = Clock::current_stamp();
        assert_eq!(now.len(), "2026_10_18-09_30_00".len());
        assert_eq!(now.as_bytes()[10], b'-');
    }

    #[test]
    fn micros_conversion() {
        assert_eq!(Nanos(1_500).as_micros_f64(), 1.5);
        assert_eq!(Nanos::from(Duration::from_micros(3)), Nanos(3_000));
    }
}
