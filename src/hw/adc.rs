// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Analog input.
//!
//! Drivers consume analog inputs as `FnMut() -> u16` reader closures, so a potentiometer can be
//! fed from a real converter channel or from a simulation in tests. [`AdcRead`] is the
//! channel-addressed side that produces those readers.
//!
//! On target, ADC1 is wrapped with blocking single-channel reads (12-bit, right aligned):
//!
//! ```ignore
//! let adc1 = RefCell::new(Adc::adc1(dp.ADC1));
//! let read_pot = Adc::make_reader(&adc1, 3);
//! ```

use core::cell::RefCell;

/// Full-scale value of the 12-bit converter.
pub const ADC_FULL_SCALE: u16 = 4095;

/// Trait for reading a single channel from an ADC peripheral.
pub trait AdcRead {
    fn read_channel(&mut self, ch: u8) -> u16;
}

/// Create a closure that reads one channel from a shared converter.
pub fn make_reader<'a, A: AdcRead>(adc_ref: &'a RefCell<A>, channel: u8) -> impl FnMut() -> u16 + 'a {
    move || adc_ref.borrow_mut().read_channel(channel)
}

#[cfg(target_os = "none")]
pub use self::adc1::Adc;

#[cfg(target_os = "none")]
mod adc1 {
    use core::cell::RefCell;

    use super::AdcRead;
    use stm32f7xx_hal::pac;

    /// ADC1 with software-triggered single conversions.
    pub struct Adc {
        adc: pac::ADC1,
    }

    impl Adc {
        /// Power up and configure ADC1.
        pub fn adc1(adc1: pac::ADC1) -> Self {
            let rcc = unsafe { &*pac::RCC::ptr() };
            rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

            // ADC prescaler: PCLK2 / 4
            let common = unsafe { &*pac::ADC_COMMON::ptr() };
            common.ccr.modify(|_, w| w.adcpre().div4());

            // Power off to configure
            adc1.cr2.modify(|_, w| w.adon().clear_bit());

            // 12-bit, right-aligned, software trigger
            adc1.cr1.modify(|_, w| w.res().bits(0b00));
            adc1.cr2.modify(|_, w| {
                w.cont().clear_bit();
                w.align().right();
                w.exten().disabled();
                w
            });

            adc1.cr2.modify(|_, w| w.adon().set_bit());

            Self { adc: adc1 }
        }

        /// Blocking conversion of one channel.
        pub fn read(&self, channel: u8) -> u16 {
            let adc = &self.adc;

            // Longest sample time; the wiper is a high-impedance source
            if channel <= 9 {
                let shift = u32::from(channel) * 3;
                adc.smpr2
                    .modify(|r, w| unsafe { w.bits(r.bits() | (0b111 << shift)) });
            }

            // One conversion in the regular sequence
            adc.sqr1.modify(|_, w| w.l().bits(0));
            adc.sqr3
                .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });

            adc.cr2.modify(|_, w| w.swstart().set_bit());
            while adc.sr.read().eoc().bit_is_clear() {}

            adc.dr.read().data().bits() as u16
        }

        #[inline]
        pub fn free(self) -> pac::ADC1 {
            self.adc
        }

        /// Create a closure that reads the given channel from the ADC reference.
        pub fn make_reader<'a>(
            adc_ref: &'a RefCell<Self>,
            channel: u8,
        ) -> impl FnMut() -> u16 + 'a {
            super::make_reader(adc_ref, channel)
        }
    }

    impl AdcRead for Adc {
        fn read_channel(&mut self, ch: u8) -> u16 {
            self.read(ch)
        }
    }
}
