// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-pin H-bridge with a shared enable line (L298N-style wiring).
//!
//! | IN1 | IN2 | EN  | Motor                |
//! |-----|-----|-----|----------------------|
//! | H   | L   | H   | Forward              |
//! | L   | H   | H   | Backward             |
//! | L   | L   | L   | Stop (outputs off)   |
//!
//! The enable line is shared between full on/off drive and the software PWM in
//! [`control::pwm`](crate::control::pwm). A stop latches it low: PWM requests are remembered but
//! not applied until a drive direction is selected again.

use embedded_hal::digital::OutputPin;

/// Logical drive direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Backward,
    Stop,
}

/// Direction pins plus enable line of one H-bridge channel.
pub struct HBridge<IN1, IN2, EN> {
    in1: IN1,
    in2: IN2,
    enable: EN,
    direction: Direction,
    /// Last enable level asked for by the controller
    enable_request: bool,
}

impl<IN1, IN2, EN> HBridge<IN1, IN2, EN>
where
    IN1: OutputPin,
    IN2: OutputPin,
    EN: OutputPin,
{
    /// Wrap the three outputs. The bridge starts stopped with all lines low.
    pub fn new(in1: IN1, in2: IN2, enable: EN) -> Self {
        let mut bridge = Self {
            in1,
            in2,
            enable,
            direction: Direction::Stop,
            enable_request: true,
        };
        bridge.stop();
        bridge
    }

    /// Drive the direction pins for `direction`.
    ///
    /// `Direction::Stop` is a hard stop, see [`stop`](Self::stop).
    pub fn set_direction(&mut self, direction: Direction) {
        match direction {
            Direction::Forward => {
                self.in1.set_high().ok();
                self.in2.set_low().ok();
            }
            Direction::Backward => {
                self.in1.set_low().ok();
                self.in2.set_high().ok();
            }
            Direction::Stop => {
                self.in1.set_low().ok();
                self.in2.set_low().ok();
            }
        }
        self.direction = direction;
        self.write_enable();
    }

    #[inline]
    pub fn forward(&mut self) {
        self.set_direction(Direction::Forward);
    }

    #[inline]
    pub fn backward(&mut self) {
        self.set_direction(Direction::Backward);
    }

    /// Both direction pins low and the enable line forced low, overriding any PWM phase.
    #[inline]
    pub fn stop(&mut self) {
        self.set_direction(Direction::Stop);
    }

    /// Request an enable level. Ignored (held low) while stopped.
    #[inline]
    pub fn set_enable(&mut self, on: bool) {
        self.enable_request = on;
        self.write_enable();
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.direction == Direction::Stop
    }

    /// Level currently driven on the enable line.
    #[inline]
    pub fn enable_level(&self) -> bool {
        self.enable_request && !self.is_stopped()
    }

    fn write_enable(&mut self) {
        if self.enable_level() {
            self.enable.set_high().ok();
        } else {
            self.enable.set_low().ok();
        }
    }

    pub fn free(self) -> (IN1, IN2, EN) {
        (self.in1, self.in2, self.enable)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    /// Output pin that mirrors its level into a shared cell.
    pub(crate) struct FakePin<'a>(pub &'a Cell<bool>);

    impl ErrorType for FakePin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for FakePin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.set(true);
            Ok(())
        }
    }

    fn levels(in1: &Cell<bool>, in2: &Cell<bool>, en: &Cell<bool>) -> (bool, bool, bool) {
        (in1.get(), in2.get(), en.get())
    }

    #[test]
    fn starts_stopped_with_all_lines_low() {
        let (in1, in2, en) = (Cell::new(true), Cell::new(true), Cell::new(true));
        let bridge = HBridge::new(FakePin(&in1), FakePin(&in2), FakePin(&en));

        assert_eq!(bridge.direction(), Direction::Stop);
        assert_eq!(levels(&in1, &in2, &en), (false, false, false));
    }

    #[test]
    fn direction_truth_table() {
        let (in1, in2, en) = (Cell::new(false), Cell::new(false), Cell::new(false));
        let mut bridge = HBridge::new(FakePin(&in1), FakePin(&in2), FakePin(&en));

        bridge.set_direction(Direction::Forward);
        assert_eq!(levels(&in1, &in2, &en), (true, false, true));

        bridge.set_direction(Direction::Backward);
        assert_eq!(levels(&in1, &in2, &en), (false, true, true));

        bridge.set_direction(Direction::Stop);
        assert_eq!(levels(&in1, &in2, &en), (false, false, false));
    }

    #[test]
    fn stop_latches_enable_low() {
        let (in1, in2, en) = (Cell::new(false), Cell::new(false), Cell::new(false));
        let mut bridge = HBridge::new(FakePin(&in1), FakePin(&in2), FakePin(&en));

        bridge.forward();
        bridge.set_enable(true);
        assert!(en.get());

        bridge.stop();
        assert!(!en.get());

        bridge.set_enable(true);
        assert!(!en.get());
        assert!(!bridge.enable_level());

        // Leaving stop restores the last requested level
        bridge.backward();
        assert!(en.get());

        bridge.set_enable(false);
        bridge.forward();
        assert!(!en.get());
    }
}
