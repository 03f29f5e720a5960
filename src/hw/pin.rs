// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! GPIO adapter exposing HAL push-pull outputs through `embedded_hal::digital::OutputPin`.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use stm32f7xx_hal::gpio::{self, Output, PushPull};

/// Push-pull output owned by a driver (direction or enable line).
pub struct BoardPin<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> BoardPin<P, N> {
    /// Take any pin, reconfigure it as a push-pull output and drive it low.
    pub fn new<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut pin = pin.into_push_pull_output();
        let _ = pin.set_low();
        Self { pin }
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}

impl<const P: char, const N: u8> ErrorType for BoardPin<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> OutputPin for BoardPin<P, N> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let _ = self.pin.set_low();
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        let _ = self.pin.set_high();
        Ok(())
    }
}
