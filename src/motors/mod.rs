// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Abstractions
//!
//! Motor-level wrappers that sit above the device-level drivers in `drivers`.
//!
//! ## Modules
//!
//! - [`actuator`] - DC actuator built on an H-bridge and a potentiometer.

pub mod actuator;

pub use actuator::Actuator;

/// Pan/tilt pointing direction in degrees, as reported by a two-axis head.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bearing {
    pub azimuth: i32,
    pub elevation: i32,
}
