// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop slew-rate controller.
//!
//! Wraps an [`Actuator`] and regulates its angular speed by software-PWMing the H-bridge enable
//! line. Call [`update`](SlewController::update) from the main loop, well inside one PWM period:
//!
//! ```ignore
//! slew.actuator().forward();
//! slew.set_slew(90.0);
//!
//! loop {
//!     slew.update();
//! }
//! ```
//!
//! Each update:
//!
//! 1. every `sample_interval_ms`, measures speed from the potentiometer,
//! 2. on a measurement, nudges the duty cycle by `kp * (desired - measured)`,
//! 3. always, sets the enable line from the software PWM at the current duty.
//!
//! When idle (no slew rate set) the duty is 1 and the enable line is held fully on, unless the
//! actuator has been stopped.

use embedded_hal::digital::OutputPin;
use micromath::F32Ext;

use crate::control::duty::DutyController;
use crate::control::pwm::{SoftPwm, DEFAULT_PERIOD_US};
use crate::control::speed::{SpeedEstimator, DEFAULT_INTERVAL_MS};
use crate::drivers::Direction;
use crate::hw::Clock;
use crate::motors::Actuator;

/// Default proportional gain, duty per deg/s of error.
pub const DEFAULT_KP: f32 = 0.005;

/// Loop tuning, fixed for the lifetime of a controller.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlewConfig {
    pub kp: f32,
    pub sample_interval_ms: u32,
    pub pwm_period_us: u32,
}

impl Default for SlewConfig {
    fn default() -> Self {
        Self {
            kp: DEFAULT_KP,
            sample_interval_ms: DEFAULT_INTERVAL_MS,
            pwm_period_us: DEFAULT_PERIOD_US,
        }
    }
}

impl SlewConfig {
    pub fn with_kp(mut self, kp: f32) -> Self {
        self.kp = kp;
        self
    }

    pub fn with_sample_interval_ms(mut self, ms: u32) -> Self {
        self.sample_interval_ms = ms;
        self
    }

    pub fn with_pwm_period_us(mut self, us: u32) -> Self {
        self.pwm_period_us = us;
        self
    }
}

/// Operating mode of the slew controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlewMode {
    /// Enable line fully on (or off while stopped).
    Idle,

    /// Enable line PWMed to track the desired speed.
    Slewing,
}

/// Controller state and configuration.
pub struct SlewController<IN1, IN2, EN, ReadPos, C> {
    actuator: Actuator<IN1, IN2, EN, ReadPos>,
    clock: C,

    estimator: SpeedEstimator,
    duty: DutyController,
    pwm: SoftPwm,

    mode: SlewMode,

    /// Commanded speed (deg/s), 0 when idle
    desired_speed: f32,
}

impl<IN1, IN2, EN, ReadPos, C> SlewController<IN1, IN2, EN, ReadPos, C>
where
    IN1: OutputPin,
    IN2: OutputPin,
    EN: OutputPin,
    ReadPos: FnMut() -> u16,
    C: Clock,
{
    /// Create an idle controller at full duty.
    pub fn new(actuator: Actuator<IN1, IN2, EN, ReadPos>, clock: C, config: SlewConfig) -> Self {
        let span = actuator.calibration().span();
        let now_us = clock.micros();

        Self {
            actuator,
            clock,
            estimator: SpeedEstimator::new(config.sample_interval_ms, span),
            duty: DutyController::new(config.kp),
            pwm: SoftPwm::new(config.pwm_period_us, now_us),
            mode: SlewMode::Idle,
            desired_speed: 0.0,
        }
    }

    /// Track `rate` deg/s. A non-positive rate is the same as [`clear_slew`](Self::clear_slew).
    ///
    /// Entering slew mode restarts speed measurement (the first sample is a baseline only) and the
    /// PWM cycle. Changing the rate while already slewing keeps both running.
    pub fn set_slew(&mut self, rate: f32) {
        if rate.is_nan() || rate <= 0.0 {
            self.clear_slew();
            return;
        }

        self.desired_speed = rate;
        if self.mode == SlewMode::Idle {
            self.mode = SlewMode::Slewing;
            self.estimator.reset();
            self.pwm.restart(self.clock.micros());
            debug!("slew: tracking {} deg/s", rate);
        }
    }

    /// Leave slew mode and return to full-drive enable.
    pub fn clear_slew(&mut self) {
        if self.mode == SlewMode::Slewing {
            debug!("slew: cleared");
        }
        self.mode = SlewMode::Idle;
        self.desired_speed = 0.0;
        self.duty.reset();
        self.actuator.set_enable(true);
    }

    /// Run one control step. Constant time; never blocks.
    pub fn update(&mut self) {
        let now_ms = self.clock.millis();
        let actuator = &mut self.actuator;

        if let Some(speed) = self.estimator.poll(now_ms, || actuator.bearing()) {
            if self.mode == SlewMode::Slewing {
                let measured = F32Ext::abs(speed);
                let duty = self.duty.update(self.desired_speed, measured);
                trace!(
                    "slew: speed {} error {} duty {}",
                    measured,
                    self.desired_speed - measured,
                    duty
                );
            }
        }

        let level = self.pwm.level(self.clock.micros(), self.duty.duty());
        self.actuator.set_enable(level);
    }

    #[inline]
    pub fn set_direction(&mut self, direction: Direction) {
        if direction == Direction::Stop {
            self.stop();
        } else {
            self.actuator.set_direction(direction);
        }
    }

    /// Hard stop: direction pins and enable low, regardless of duty or mode.
    ///
    /// The slew setpoint is kept; PWM output resumes once a direction is selected again.
    pub fn stop(&mut self) {
        self.actuator.stop();
        debug!("slew: stop");
    }

    /// Current shaft angle in degrees.
    #[inline]
    pub fn bearing(&mut self) -> i32 {
        self.actuator.bearing()
    }

    /// Last measured speed magnitude (deg/s), refreshed every sampling interval.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.estimator.speed()
    }

    #[inline]
    pub fn duty(&self) -> f32 {
        self.duty.duty()
    }

    #[inline]
    pub fn mode(&self) -> SlewMode {
        self.mode
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.mode == SlewMode::Slewing
    }

    #[inline]
    pub fn desired_speed(&self) -> f32 {
        self.desired_speed
    }

    /// Start of the current PWM cycle (us).
    #[inline]
    pub fn pwm_cycle_start_us(&self) -> u32 {
        self.pwm.cycle_start_us()
    }

    /// Expose the underlying actuator.
    pub fn actuator(&mut self) -> &mut Actuator<IN1, IN2, EN, ReadPos> {
        &mut self.actuator
    }

    pub fn free(self) -> (Actuator<IN1, IN2, EN, ReadPos>, C) {
        (self.actuator, self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::hbridge::tests::FakePin;
    use crate::drivers::Calibration;
    use core::cell::Cell;

    fn approx(a: f32, b: f32) -> bool {
        F32Ext::abs(a - b) < 1e-3
    }

    struct FakeClock {
        us: Cell<u64>,
    }

    impl FakeClock {
        fn new(us: u64) -> Self {
            Self { us: Cell::new(us) }
        }

        fn advance_ms(&self, ms: u64) {
            self.us.set(self.us.get() + ms * 1_000);
        }
    }

    impl Clock for FakeClock {
        fn millis(&self) -> u32 {
            (self.us.get() / 1_000) as u32
        }

        fn micros(&self) -> u32 {
            self.us.get() as u32
        }
    }

    struct Rig {
        in1: Cell<bool>,
        in2: Cell<bool>,
        en: Cell<bool>,
        /// Shaft angle fed to the pot, degrees
        angle: Cell<i32>,
        clock: FakeClock,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                in1: Cell::new(false),
                in2: Cell::new(false),
                en: Cell::new(false),
                angle: Cell::new(0),
                clock: FakeClock::new(5_000_000),
            }
        }

        fn controller(
            &self,
            config: SlewConfig,
        ) -> SlewController<FakePin<'_>, FakePin<'_>, FakePin<'_>, impl FnMut() -> u16 + '_, &FakeClock>
        {
            // 1 raw count per tenth of a degree
            let read = move || (self.angle.get().rem_euclid(360) * 10) as u16;
            let actuator = Actuator::new(
                FakePin(&self.in1),
                FakePin(&self.in2),
                FakePin(&self.en),
                read,
                Calibration::new(0, 3600, 0, 360),
            );
            SlewController::new(actuator, &self.clock, config)
        }
    }

    #[test]
    fn starts_idle_at_full_duty() {
        let rig = Rig::new();
        let mut slew = rig.controller(SlewConfig::default());

        assert_eq!(slew.mode(), SlewMode::Idle);
        assert_eq!(slew.duty(), 1.0);

        slew.set_direction(Direction::Forward);
        for _ in 0..50 {
            slew.update();
            assert!(rig.en.get());
            rig.clock.advance_ms(1);
        }
    }

    #[test]
    fn clear_slew_is_idempotent() {
        let rig = Rig::new();
        let mut slew = rig.controller(SlewConfig::default().with_kp(0.05));
        slew.actuator().forward();

        slew.set_slew(90.0);
        slew.update();
        // Twice the target speed
        rig.clock.advance_ms(200);
        rig.angle.set(36);
        slew.update();
        assert!(slew.duty() < 1.0);

        for _ in 0..3 {
            slew.clear_slew();
            assert!(!slew.is_active());
            assert_eq!(slew.duty(), 1.0);
            assert_eq!(slew.desired_speed(), 0.0);
            assert!(rig.en.get());
        }
    }

    #[test]
    fn non_positive_rate_clears() {
        let rig = Rig::new();
        let mut slew = rig.controller(SlewConfig::default());

        slew.set_slew(45.0);
        assert!(slew.is_active());
        slew.set_slew(0.0);
        assert!(!slew.is_active());

        slew.set_slew(45.0);
        slew.set_slew(-10.0);
        assert!(!slew.is_active());
        assert_eq!(slew.duty(), 1.0);
    }

    #[test]
    fn first_update_after_set_slew_is_baseline() {
        let rig = Rig::new();
        let mut slew = rig.controller(SlewConfig::default().with_kp(0.05));
        slew.actuator().forward();

        // Stale sample far from where the shaft will be
        rig.angle.set(10);
        slew.update();
        rig.clock.advance_ms(1_000);

        rig.angle.set(200);
        slew.set_slew(90.0);
        slew.update();
        assert_eq!(slew.duty(), 1.0);

        // Next sample is a real measurement: 18 deg in 200 ms
        rig.clock.advance_ms(200);
        rig.angle.set(218);
        slew.update();
        assert!(approx(slew.speed(), 90.0));
        assert_eq!(slew.duty(), 1.0);
    }

    #[test]
    fn samples_only_every_interval() {
        let rig = Rig::new();
        let mut slew = rig.controller(SlewConfig::default().with_kp(0.01));
        slew.actuator().forward();
        slew.set_slew(50.0);

        slew.update();
        for _ in 0..199 {
            rig.clock.advance_ms(1);
            slew.update();
            assert_eq!(slew.duty(), 1.0);
        }

        // 100 deg in 200 ms
        rig.clock.advance_ms(1);
        rig.angle.set(100);
        slew.update();
        assert!(approx(slew.speed(), 500.0));
        assert_eq!(slew.duty(), 0.0);
    }

    #[test]
    fn stop_overrides_pwm_on_phase() {
        let rig = Rig::new();
        let mut slew = rig.controller(SlewConfig::default());
        slew.actuator().forward();
        slew.set_slew(90.0);

        // Start of the cycle at full duty: on phase
        slew.update();
        assert!(rig.en.get());

        slew.stop();
        assert!(!rig.en.get());
        assert_eq!((rig.in1.get(), rig.in2.get()), (false, false));

        for _ in 0..40 {
            rig.clock.advance_ms(1);
            slew.update();
            assert!(!rig.en.get());
        }

        // Idle stop is just as hard
        slew.clear_slew();
        assert!(!rig.en.get());
        slew.set_direction(Direction::Stop);
        slew.update();
        assert!(!rig.en.get());

        slew.set_direction(Direction::Backward);
        slew.update();
        assert!(rig.en.get());
    }

    #[test]
    fn duty_stays_clamped_under_any_motion() {
        let rig = Rig::new();
        let mut slew = rig.controller(SlewConfig::default().with_kp(0.2));
        slew.actuator().forward();
        slew.set_slew(60.0);

        let mut seed: u32 = 99;
        for _ in 0..3_000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let jump = ((seed >> 16) % 120) as i32 - 60;
            rig.angle.set(rig.angle.get() + jump);
            rig.clock.advance_ms(7);
            slew.update();

            let duty = slew.duty();
            assert!((0.0..=1.0).contains(&duty));
            assert!(slew.speed() >= 0.0);
        }
    }

    #[test]
    fn retarget_while_slewing_keeps_baseline_and_duty() {
        let rig = Rig::new();
        let mut slew = rig.controller(SlewConfig::default().with_kp(0.005));
        slew.actuator().forward();

        slew.set_slew(90.0);
        slew.update();
        rig.clock.advance_ms(200);
        rig.angle.set(18);
        slew.update();
        assert_eq!(slew.duty(), 1.0);
        let cycle_start = slew.pwm_cycle_start_us();

        // Shaft jumps far away between samples, then the rate changes mid-slew
        rig.clock.advance_ms(100);
        rig.angle.set(200);
        slew.set_slew(45.0);
        assert!(slew.is_active());
        assert_eq!(slew.desired_speed(), 45.0);
        assert_eq!(slew.duty(), 1.0);
        assert_eq!(slew.pwm_cycle_start_us(), cycle_start);

        // Not due yet: the sample from 100 ms ago is still the baseline
        slew.update();
        assert_eq!(slew.duty(), 1.0);

        // 36 deg since the kept baseline, measured against the new target
        rig.clock.advance_ms(100);
        rig.angle.set(54);
        slew.update();
        assert!(approx(slew.speed(), 180.0));
        assert!(approx(slew.duty(), 1.0 + 0.005 * (45.0 - 180.0)));
    }

    #[test]
    fn pwm_restarts_on_entering_slew() {
        let rig = Rig::new();
        let mut slew = rig.controller(SlewConfig::default());

        rig.clock.advance_ms(37);
        slew.set_slew(30.0);
        assert_eq!(slew.pwm_cycle_start_us(), rig.clock.micros());

        // Retargeting does not restart the cycle
        let start = slew.pwm_cycle_start_us();
        rig.clock.advance_ms(5);
        slew.set_slew(60.0);
        assert_eq!(slew.pwm_cycle_start_us(), start);
        assert_eq!(slew.desired_speed(), 60.0);
    }
}
