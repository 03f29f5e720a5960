// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Angular speed estimation from a wrapping absolute angle sensor.
//!
//! Speed is the position difference between two samples taken at least `interval_ms` apart. A
//! difference larger than half the sensor range is taken to be a crossing of the
//! `degree_max`/`degree_min` seam, which assumes the shaft never turns more than half a range
//! within one interval.

use micromath::F32Ext;

/// Default sampling interval.
pub const DEFAULT_INTERVAL_MS: u32 = 200;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Sample {
    position: i32,
    at_ms: u32,
}

/// Fold a raw position difference across the wrap seam of a sensor spanning `span` degrees.
///
/// Result lies within `[-span/2, span/2]`.
pub fn unwrap_delta(delta: i32, span: i32) -> i32 {
    let half = span / 2;
    if delta > half {
        delta - span
    } else if delta < -half {
        delta + span
    } else {
        delta
    }
}

/// Interval-gated speed estimator.
#[derive(Copy, Clone, Debug)]
pub struct SpeedEstimator {
    interval_ms: u32,
    span: i32,
    last: Option<Sample>,
    /// Magnitude of the last measured speed, deg/s
    speed: f32,
}

impl SpeedEstimator {
    /// `span` is the width of the sensor's degree range.
    pub fn new(interval_ms: u32, span: i32) -> Self {
        Self {
            interval_ms,
            span,
            last: None,
            speed: 0.0,
        }
    }

    /// Forget the previous sample; the next poll only records a baseline.
    #[inline]
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Last measured speed magnitude in deg/s. Stale between samples.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// True if a poll at `now_ms` would take a sample.
    pub fn is_due(&self, now_ms: u32) -> bool {
        match self.last {
            None => true,
            Some(last) => now_ms.wrapping_sub(last.at_ms) >= self.interval_ms,
        }
    }

    /// Sample if due.
    ///
    /// `read_position` is only called when a sample is taken. Returns the signed speed in deg/s
    /// for a measurement, `None` when not due or when the sample only set a baseline.
    pub fn poll<F>(&mut self, now_ms: u32, read_position: F) -> Option<f32>
    where
        F: FnOnce() -> i32,
    {
        if !self.is_due(now_ms) {
            return None;
        }

        let sample = Sample {
            position: read_position(),
            at_ms: now_ms,
        };
        let previous = self.last.replace(sample)?;

        let elapsed_ms = now_ms.wrapping_sub(previous.at_ms);
        if elapsed_ms == 0 {
            return None;
        }

        let delta = unwrap_delta(sample.position - previous.position, self.span);
        let speed = delta as f32 * 1_000.0 / elapsed_ms as f32;
        self.speed = F32Ext::abs(speed);
        Some(speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use micromath::F32Ext;

    fn approx(a: f32, b: f32) -> bool {
        F32Ext::abs(a - b) < 1e-3
    }

    #[test]
    fn unwrap_folds_across_seam() {
        assert_eq!(unwrap_delta(10 - 350, 360), 20);
        assert_eq!(unwrap_delta(350 - 10, 360), -20);
        assert_eq!(unwrap_delta(90, 360), 90);
        assert_eq!(unwrap_delta(-180, 360), -180);
        assert_eq!(unwrap_delta(0, 360), 0);
    }

    #[test]
    fn first_poll_is_baseline_only() {
        let mut est = SpeedEstimator::new(200, 360);
        assert_eq!(est.poll(5_000, || 123), None);
        assert_eq!(est.speed(), 0.0);
        assert!(!est.is_due(5_199));
        assert!(est.is_due(5_200));
    }

    #[test]
    fn reads_only_when_due() {
        let mut est = SpeedEstimator::new(200, 360);
        let mut reads = 0;

        est.poll(0, || {
            reads += 1;
            0
        });
        for t in (10..200).step_by(10) {
            assert_eq!(
                est.poll(t, || {
                    reads += 1;
                    0
                }),
                None
            );
        }
        assert_eq!(reads, 1);
    }

    #[test]
    fn measures_speed_across_wrap() {
        let mut est = SpeedEstimator::new(200, 360);
        est.poll(0, || 350);

        let speed = est.poll(200, || 10).unwrap();
        // +20 deg in 0.2 s
        assert!(approx(speed, 100.0));
        assert!(approx(est.speed(), 100.0));
    }

    #[test]
    fn speed_is_stored_as_magnitude() {
        let mut est = SpeedEstimator::new(200, 360);
        est.poll(1_000, || 100);

        let speed = est.poll(1_250, || 80).unwrap();
        assert!(approx(speed, -80.0));
        assert!(approx(est.speed(), 80.0));
    }

    #[test]
    fn tolerates_millisecond_wrap() {
        let mut est = SpeedEstimator::new(200, 360);
        est.poll(u32::MAX - 99, || 0);
        assert!(!est.is_due(50));

        let speed = est.poll(100, || 18).unwrap();
        assert!(approx(speed, 90.0));
    }

    #[test]
    fn reset_discards_stale_sample() {
        let mut est = SpeedEstimator::new(200, 360);
        est.poll(0, || 0);
        est.poll(200, || 18);

        est.reset();
        assert_eq!(est.poll(10_000, || 300), None);
        assert!(approx(est.speed(), 90.0));
    }
}
