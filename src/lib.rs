// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # slewdrive
//!
//! Closed-loop slew-rate control for a potentiometer-feedback DC actuator driven through an
//! H-bridge, written in Rust, targeting an STM32F777 MCU.
//!
//! The motor is commanded through two direction pins and one enable pin. The enable pin is either
//! held fully on, or software-PWMed so that the measured angular speed tracks a desired slew rate.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Clock/ADC capabilities and MCU-level wrappers (TIM2 clock, ADC, USART) |
//! | [`drivers`] | Device-level drivers (H-bridge direction pins, potentiometer mapping) |
//! | [`motors`] | Actuator glue combining the H-bridge and the potentiometer |
//! | [`control`] | Slew-rate loop (speed estimator, duty controller, software PWM) |
//!
//! ## Getting Started
//!
//! ```ignore
//! let actuator = Actuator::new(in1, in2, enable, adc_reader, Calibration::full_turn());
//! let mut slew = SlewController::new(actuator, clock, SlewConfig::default());
//!
//! slew.actuator().forward();
//! slew.set_slew(90.0);
//!
//! loop {
//!     slew.update();
//! }
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

#[macro_use]
mod log;

pub mod control;
pub mod drivers;
pub mod hw;
pub mod motors;
