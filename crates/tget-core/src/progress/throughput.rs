//! Instantaneous throughput from periodic byte-count samples.

use indicatif::HumanBytes;
use std::time::{Duration, Instant};

/// Samples closer together than this leave the previous rate in place.
pub const MIN_SAMPLE_SPACING: Duration = Duration::from_millis(100);

/// Point-in-time snapshot of completed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSample {
    pub bytes_completed: u64,
    pub at: Instant,
}

impl ProgressSample {
    pub fn new(bytes_completed: u64, at: Instant) -> Self {
        Self { bytes_completed, at }
    }
}

/// Keeps the last accepted sample and the rate derived from it.
#[derive(Debug, Clone)]
pub struct ThroughputMeter {
    last: ProgressSample,
    bytes_per_sec: f64,
}

impl ThroughputMeter {
    pub fn new(origin: ProgressSample) -> Self {
        Self {
            last: origin,
            bytes_per_sec: 0.0,
        }
    }

    /// Record a sample and return the current rate. The rate is recomputed only
    /// when more than [`MIN_SAMPLE_SPACING`] has passed since the last accepted sample.
    pub fn record(&mut self, sample: ProgressSample) -> f64 {
        let elapsed = sample.at.saturating_duration_since(self.last.at);
        if elapsed > MIN_SAMPLE_SPACING {
            let delta = sample.bytes_completed.saturating_sub(self.last.bytes_completed);
            self.bytes_per_sec = delta as f64 / elapsed.as_secs_f64();
            self.last = sample;
        }
        self.bytes_per_sec
    }

    pub fn bytes_per_sec(&self) -> f64 {
        self.bytes_per_sec
    }

    pub fn last_sample(&self) -> ProgressSample {
        self.last
    }
}

/// Human-scaled rate with binary units, e.g. `1.95 KiB/s`.
pub fn format_rate(bytes_per_sec: f64) -> String {
    let bytes = if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
        bytes_per_sec as u64
    } else {
        0
    };
    format!("{}/s", HumanBytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_from_two_samples() {
        let t0 = Instant::now();
        let mut meter = ThroughputMeter::new(ProgressSample::new(1000, t0));
        let rate = meter.record(ProgressSample::new(3000, t0 + Duration::from_secs(1)));
        assert!((rate - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn close_sample_does_not_update_rate() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);
        let mut meter = ThroughputMeter::new(ProgressSample::new(1000, t0));
        meter.record(ProgressSample::new(3000, t1));

        let rate = meter.record(ProgressSample::new(9000, t1 + Duration::from_millis(50)));
        assert!((rate - 2000.0).abs() < 1e-6);
        assert_eq!(meter.last_sample(), ProgressSample::new(3000, t1));
    }

    #[test]
    fn exactly_threshold_is_still_too_close() {
        let t0 = Instant::now();
        let mut meter = ThroughputMeter::new(ProgressSample::new(0, t0));
        let rate = meter.record(ProgressSample::new(500, t0 + MIN_SAMPLE_SPACING));
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn shrinking_counter_reads_as_zero() {
        let t0 = Instant::now();
        let mut meter = ThroughputMeter::new(ProgressSample::new(5000, t0));
        let rate = meter.record(ProgressSample::new(4000, t0 + Duration::from_secs(2)));
        assert_eq!(rate, 0.0);
    }

    #[test]
    fn format_rate_scales_units() {
        assert_eq!(format_rate(0.0), "0 B/s");
        assert_eq!(format_rate(512.0), "512 B/s");
        assert_eq!(format_rate(2048.0), "2.00 KiB/s");
        assert_eq!(format_rate(3.0 * 1024.0 * 1024.0), "3.00 MiB/s");
        assert_eq!(format_rate(f64::NAN), "0 B/s");
    }
}
