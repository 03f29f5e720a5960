// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Rotary potentiometer used as an absolute angle sensor.
//!
//! A raw converter sample goes through two stages:
//!
//! 1. [`CorrectionTable`] - compensates the track's non-linearity (raw → corrected raw).
//! 2. [`Calibration`] - affine map from `[raw_min, raw_max]` to `[degree_min, degree_max]`.
//!
//! Samples outside the calibrated raw range extrapolate linearly; they are not clamped.

use crate::hw::adc::ADC_FULL_SCALE;

/// Affine raw → degree mapping, fixed at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    raw_min: i32,
    raw_max: i32,
    degree_min: i32,
    degree_max: i32,
}

impl Calibration {
    /// # Panics
    ///
    /// `raw_min == raw_max` is a degenerate mapping and makes [`map`](Self::map) divide by zero.
    pub fn new(raw_min: u16, raw_max: u16, degree_min: i32, degree_max: i32) -> Self {
        debug_assert_ne!(raw_min, raw_max, "degenerate potentiometer calibration");
        Self {
            raw_min: raw_min as i32,
            raw_max: raw_max as i32,
            degree_min,
            degree_max,
        }
    }

    /// Full 12-bit travel spanning one turn, 0..360 degrees.
    pub fn full_turn() -> Self {
        Self::new(0, ADC_FULL_SCALE, 0, 360)
    }

    /// Map a corrected raw sample to degrees (integer, truncating).
    #[inline]
    pub fn map(&self, raw: u16) -> i32 {
        (raw as i32 - self.raw_min) * (self.degree_max - self.degree_min)
            / (self.raw_max - self.raw_min)
            + self.degree_min
    }

    /// Width of the degree range; one full wrap of the sensor.
    #[inline]
    pub fn span(&self) -> i32 {
        (self.degree_max - self.degree_min).abs()
    }

    #[inline]
    pub fn degree_min(&self) -> i32 {
        self.degree_min
    }

    #[inline]
    pub fn degree_max(&self) -> i32 {
        self.degree_max
    }
}

/// Non-linearity correction for raw samples.
///
/// Breakpoints are spaced uniformly over `0..=ADC_FULL_SCALE` and linearly interpolated. A table
/// with `ADC_FULL_SCALE + 1` entries is a plain per-code lookup.
#[derive(Copy, Clone, Debug)]
pub struct CorrectionTable<'a> {
    points: &'a [u16],
}

impl<'a> CorrectionTable<'a> {
    /// Pass samples through unchanged.
    pub const IDENTITY: CorrectionTable<'static> = CorrectionTable { points: &[] };

    pub const fn new(points: &'a [u16]) -> Self {
        Self { points }
    }

    pub fn correct(&self, raw: u16) -> u16 {
        let points = self.points;
        match points.len() {
            0 => raw,
            1 => points[0],
            n => {
                let full = ADC_FULL_SCALE as u64;
                let scaled = raw.min(ADC_FULL_SCALE) as u64 * (n as u64 - 1);
                let idx = (scaled / full) as usize;
                if idx >= n - 1 {
                    return points[n - 1];
                }

                let frac = (scaled % full) as i64;
                let lo = points[idx] as i64;
                let hi = points[idx + 1] as i64;
                (lo + (hi - lo) * frac / full as i64) as u16
            }
        }
    }
}

/// Potentiometer on an analog input.
///
/// `ReadPos` is a closure that returns the raw 12-bit ADC reading (0..4095).
pub struct Potentiometer<ReadPos> {
    read_position: ReadPos,
    calibration: Calibration,
    table: CorrectionTable<'static>,
}

impl<ReadPos> Potentiometer<ReadPos>
where
    ReadPos: FnMut() -> u16,
{
    pub fn new(read_position: ReadPos, calibration: Calibration) -> Self {
        Self {
            read_position,
            calibration,
            table: CorrectionTable::IDENTITY,
        }
    }

    /// Use a non-linearity correction table.
    pub fn with_correction(mut self, table: CorrectionTable<'static>) -> Self {
        self.table = table;
        self
    }

    /// Unfiltered converter sample.
    #[inline]
    pub fn raw(&mut self) -> u16 {
        (self.read_position)()
    }

    /// Current angle in degrees.
    pub fn bearing(&mut self) -> i32 {
        let raw = self.raw();
        self.calibration.map(self.table.correct(raw))
    }

    #[inline]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }
}
