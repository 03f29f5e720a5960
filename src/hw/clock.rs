// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Monotonic time sources.
//!
//! Both timestamps wrap around at `u32::MAX`. Consumers must only ever compare them through
//! `wrapping_sub`, never with `<` or plain subtraction.

use core::cell::Cell;

/// Monotonic clock pair used by the control loop.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch, wrapping.
    fn millis(&self) -> u32;

    /// Microseconds since an arbitrary epoch, wrapping.
    fn micros(&self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &T {
    #[inline]
    fn millis(&self) -> u32 {
        (**self).millis()
    }

    #[inline]
    fn micros(&self) -> u32 {
        (**self).micros()
    }
}

/// Extends a free-running 32-bit microsecond counter to 64 bits.
///
/// The counter must be observed at least once per wrap (about 71 minutes at 1 MHz), which any
/// polling loop does trivially.
pub struct TickExtender {
    last_raw: Cell<u32>,
    total: Cell<u64>,
}

impl TickExtender {
    pub const fn new(initial_raw: u32) -> Self {
        Self {
            last_raw: Cell::new(initial_raw),
            total: Cell::new(0),
        }
    }

    /// Account for a fresh counter reading and return the extended tick count.
    pub fn observe(&self, raw: u32) -> u64 {
        let delta = raw.wrapping_sub(self.last_raw.get());
        self.last_raw.set(raw);

        let total = self.total.get() + delta as u64;
        self.total.set(total);
        total
    }

    #[inline]
    pub fn millis(&self, raw: u32) -> u32 {
        (self.observe(raw) / 1_000) as u32
    }

    #[inline]
    pub fn micros(&self, raw: u32) -> u32 {
        self.observe(raw) as u32
    }
}

#[cfg(target_os = "none")]
pub use self::tim2::Tim2Clock;

#[cfg(target_os = "none")]
mod tim2 {
    use super::{Clock, TickExtender};
    use stm32f7xx_hal::pac;

    /// TIM2 configured as a free-running 32-bit up-counter at 1 MHz.
    pub struct Tim2Clock {
        tim: pac::TIM2,
        ticks: TickExtender,
    }

    impl Tim2Clock {
        /// Configure TIM2. `timer_clk_hz` is the APB1 timer kernel clock.
        pub fn new(tim2: pac::TIM2, timer_clk_hz: u32) -> Self {
            let rcc = unsafe { &*pac::RCC::ptr() };
            rcc.apb1enr.modify(|_, w| w.tim2en().set_bit());

            let tim = tim2;

            // Disable counter while configuring
            tim.cr1.modify(|_, w| w.cen().clear_bit());

            // 1 tick = 1 us
            let psc = (timer_clk_hz / 1_000_000).saturating_sub(1);
            tim.psc.write(|w| unsafe { w.bits(psc) });

            // Auto-reload: max 32-bit
            tim.arr.write(|w| unsafe { w.bits(0xFFFF_FFFF) });

            // Latch the prescaler, then start from zero
            tim.egr.write(|w| w.ug().set_bit());
            tim.cnt.write(|w| unsafe { w.bits(0) });

            tim.cr1.modify(|_, w| w.cen().set_bit());

            Self {
                tim,
                ticks: TickExtender::new(0),
            }
        }

        #[inline]
        fn raw(&self) -> u32 {
            self.tim.cnt.read().cnt().bits()
        }

        /// Consume the clock and return the underlying timer peripheral.
        #[inline]
        pub fn free(self) -> pac::TIM2 {
            self.tim
        }
    }

    impl Clock for Tim2Clock {
        fn millis(&self) -> u32 {
            self.ticks.millis(self.raw())
        }

        fn micros(&self) -> u32 {
            self.ticks.micros(self.raw())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extender_counts_across_counter_wrap() {
        let ext = TickExtender::new(u32::MAX - 499);
        assert_eq!(ext.observe(u32::MAX), 499);
        assert_eq!(ext.observe(500), 1_000);
        assert_eq!(ext.millis(2_500), 3);
    }

    #[test]
    fn millis_and_micros_share_one_timeline() {
        let ext = TickExtender::new(0);
        assert_eq!(ext.micros(1_234_567), 1_234_567);
        assert_eq!(ext.millis(1_234_567), 1_234);
    }

    #[test]
    fn micros_wrap_like_the_raw_counter() {
        let ext = TickExtender::new(0);
        ext.observe(u32::MAX);
        assert_eq!(ext.micros(9), 9);
        // 2^32 + 9 us
        assert_eq!(ext.millis(9), 4_294_967);
    }
}
