// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Software PWM on a plain GPIO line.
//!
//! There is no timer behind this: the caller polls [`SoftPwm::level`] with the current
//! microsecond timestamp and drives the pin with the result. Waveform resolution is therefore
//! bounded by the polling rate.
//!
//! The cycle start only ever moves forward by whole periods. A late poll does not re-stamp the
//! cycle to "now", so jitter in the polling rate never accumulates into phase drift.

/// Default PWM period (50 Hz).
pub const DEFAULT_PERIOD_US: u32 = 20_000;

#[derive(Copy, Clone, Debug)]
pub struct SoftPwm {
    period_us: u32,
    cycle_start_us: u32,
}

impl SoftPwm {
    /// `period_us` must be non-zero.
    pub fn new(period_us: u32, now_us: u32) -> Self {
        debug_assert!(period_us > 0);
        Self {
            period_us: period_us.max(1),
            cycle_start_us: now_us,
        }
    }

    /// Start a fresh cycle at `now_us`.
    #[inline]
    pub fn restart(&mut self, now_us: u32) {
        self.cycle_start_us = now_us;
    }

    #[inline]
    pub fn period_us(&self) -> u32 {
        self.period_us
    }

    #[inline]
    pub fn cycle_start_us(&self) -> u32 {
        self.cycle_start_us
    }

    /// Catch the cycle start up to the period containing `now_us` and return the offset into it.
    fn advance(&mut self, now_us: u32) -> u32 {
        let elapsed = now_us.wrapping_sub(self.cycle_start_us);
        if elapsed < self.period_us {
            return elapsed;
        }

        let whole = elapsed / self.period_us * self.period_us;
        self.cycle_start_us = self.cycle_start_us.wrapping_add(whole);
        elapsed - whole
    }

    /// Output level for `duty` at `now_us`.
    pub fn level(&mut self, now_us: u32, duty: f32) -> bool {
        let elapsed = self.advance(now_us);

        let on_us = (duty.clamp(0.0, 1.0) * self.period_us as f32) as u32;
        if on_us == 0 {
            false
        } else if on_us >= self.period_us {
            true
        } else {
            elapsed < on_us
        }
    }
}
