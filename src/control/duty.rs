// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Proportional duty-cycle controller.
//!
//! `duty += kp * (setpoint - measurement)`, clamped to `[0, 1]`. There is no integral or derivative
//! term and no anti-windup beyond the clamp; the loop is meant for approximate slew limiting.

/// Duty cycle that fully enables the motor.
pub const FULL_DUTY: f32 = 1.0;

/// Single-gain incremental controller driving a PWM duty cycle.
#[derive(Copy, Clone, Debug)]
pub struct DutyController {
    /// Proportional gain (duty per deg/s of error)
    kp: f32,
    /// Current output, always within [0, 1]
    duty: f32,
}

impl DutyController {
    /// Create a controller at full duty.
    pub fn new(kp: f32) -> Self {
        Self {
            kp,
            duty: FULL_DUTY,
        }
    }

    /// Back to full drive.
    #[inline]
    pub fn reset(&mut self) {
        self.duty = FULL_DUTY;
    }

    #[inline]
    pub fn duty(&self) -> f32 {
        self.duty
    }

    #[inline]
    pub fn kp(&self) -> f32 {
        self.kp
    }

    /// Apply one correction step and return the new duty.
    ///
    /// `setpoint` — desired speed
    /// `measurement` — measured speed
    pub fn update(&mut self, setpoint: f32, measurement: f32) -> f32 {
        let error = setpoint - measurement;
        let duty = self.duty + self.kp * error;

        // NaN from a bad measurement keeps the previous duty
        if !duty.is_nan() {
            self.duty = duty.clamp(0.0, FULL_DUTY);
        }
        self.duty
    }
}
