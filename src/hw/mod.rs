// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Capabilities
//!
//! The control code only ever talks to hardware through three narrow capabilities:
//!
//! - [`Clock`] - monotonic millisecond and microsecond timestamps
//! - [`AdcRead`] - single-channel analog reads
//! - [`embedded_hal::digital::OutputPin`] - direction and enable lines
//!
//! On the STM32F777 target this module also provides the MCU-level implementations (TIM2 clock,
//! ADC1, GPIO adapter, USART debug terminal).

pub mod adc;
pub mod clock;

#[cfg(target_os = "none")]
pub mod pin;
#[cfg(target_os = "none")]
pub mod usart;

pub use adc::AdcRead;
pub use clock::{Clock, TickExtender};

#[cfg(target_os = "none")]
pub use adc::Adc;
#[cfg(target_os = "none")]
pub use clock::Tim2Clock;
#[cfg(target_os = "none")]
pub use pin::BoardPin;
#[cfg(target_os = "none")]
pub use usart::Usart;
