// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the `hw` capabilities and below the
//! actuator and control logic.
//!
//! ## Existing drivers
//!
//! - [`hbridge`] – two direction pins plus a shared enable line
//! - [`pot`] – rotary potentiometer angle sensor with calibration and non-linearity correction

pub mod hbridge;
pub mod pot;

pub use hbridge::{Direction, HBridge};
pub use pot::{Calibration, CorrectionTable, Potentiometer};
