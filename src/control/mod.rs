// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Building blocks for the closed-loop slew-rate controller.
//!
//! ## Modules
//!
//! - [`speed`] - Interval-gated speed estimator for a wrapping angle sensor.
//! - [`duty`] - Proportional duty-cycle controller.
//! - [`pwm`] - Drift-free software PWM for the enable line.
//! - [`slew`] - Closed-loop slew-rate controller tying the above to an actuator.

pub mod duty;
pub mod pwm;
pub mod slew;
pub mod speed;

pub use duty::DutyController;
pub use pwm::SoftPwm;
pub use slew::{SlewConfig, SlewController, SlewMode};
pub use speed::SpeedEstimator;
