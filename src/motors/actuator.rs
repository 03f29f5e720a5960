// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Potentiometer-feedback DC actuator.
//!
//! Combines an [`HBridge`] with a [`Potentiometer`] on the output shaft. This layer is open loop:
//! it sets a direction and reports a bearing. Slew-rate regulation lives in
//! [`control::slew`](crate::control::slew).

use embedded_hal::digital::OutputPin;

use crate::drivers::{Calibration, Direction, HBridge, Potentiometer};

/// One DC actuator: H-bridge direction/enable plus potentiometer feedback.
pub struct Actuator<IN1, IN2, EN, ReadPos> {
    bridge: HBridge<IN1, IN2, EN>,
    pot: Potentiometer<ReadPos>,
}

impl<IN1, IN2, EN, ReadPos> Actuator<IN1, IN2, EN, ReadPos>
where
    IN1: OutputPin,
    IN2: OutputPin,
    EN: OutputPin,
    ReadPos: FnMut() -> u16,
{
    /// Build an actuator from its pins, an ADC reader closure and the pot calibration.
    pub fn new(in1: IN1, in2: IN2, enable: EN, read_position: ReadPos, calibration: Calibration) -> Self {
        Self::from_parts(HBridge::new(in1, in2, enable), Potentiometer::new(read_position, calibration))
    }

    /// Build from already-configured drivers (e.g. a potentiometer with a correction table).
    pub fn from_parts(bridge: HBridge<IN1, IN2, EN>, pot: Potentiometer<ReadPos>) -> Self {
        let mut actuator = Self { bridge, pot };
        actuator.begin();
        actuator
    }

    /// Put the outputs in their default state: full-drive enable requested, bridge stopped.
    ///
    /// Safe to call again at any time.
    pub fn begin(&mut self) {
        self.bridge.set_enable(true);
        self.bridge.stop();
    }

    #[inline]
    pub fn set_direction(&mut self, direction: Direction) {
        self.bridge.set_direction(direction);
    }

    #[inline]
    pub fn forward(&mut self) {
        self.bridge.forward();
    }

    #[inline]
    pub fn backward(&mut self) {
        self.bridge.backward();
    }

    /// Hard stop: direction pins and enable low.
    #[inline]
    pub fn stop(&mut self) {
        self.bridge.stop();
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.bridge.direction()
    }

    /// Current shaft angle in degrees.
    #[inline]
    pub fn bearing(&mut self) -> i32 {
        self.pot.bearing()
    }

    #[inline]
    pub fn calibration(&self) -> &Calibration {
        self.pot.calibration()
    }

    /// Drive the shared enable line (held low while stopped).
    #[inline]
    pub fn set_enable(&mut self, on: bool) {
        self.bridge.set_enable(on);
    }

    #[inline]
    pub fn enable_level(&self) -> bool {
        self.bridge.enable_level()
    }

    /// Expose the underlying H-bridge.
    pub fn inner_bridge(&mut self) -> &mut HBridge<IN1, IN2, EN> {
        &mut self.bridge
    }
}
