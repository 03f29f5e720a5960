// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Board firmware: one slew-limited actuator on the STM32F777.
//!
//! Host builds compile to an empty `main` so the library and its tests build anywhere.

#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use core::cell::RefCell;
    use core::fmt::Write;

    use cortex_m_rt::entry;
    #[cfg(feature = "defmt")]
    use defmt_rtt as _;
    use panic_halt as _;

    use stm32f7xx_hal::{
        pac,
        prelude::*,
        serial::{Config, Serial},
    };

    use slewdrive::control::{SlewConfig, SlewController};
    use slewdrive::drivers::Calibration;
    use slewdrive::hw::{Adc, BoardPin, Clock, Tim2Clock, Usart};
    use slewdrive::motors::{Actuator, Bearing};

    /// APB1 timer clock with the default (HSI) clock tree.
    const TIM2_CLK_HZ: u32 = 16_000_000;

    /// Pot wiper on PA3 (ADC123_IN3).
    const POT_ADC_CHANNEL: u8 = 3;

    const SLEW_RATE_DEG_S: f32 = 30.0;
    const TELEMETRY_INTERVAL_MS: u32 = 500;

    #[entry]
    fn main() -> ! {
        // Peripherals
        let dp = pac::Peripherals::take().unwrap();

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.freeze();

        // GPIO
        let gpioa = dp.GPIOA.split();
        let gpiod = dp.GPIOD.split();

        // USART1 (DBG)
        let tx = gpioa.pa9.into_alternate::<7>();
        let rx = gpioa.pa10.into_alternate::<7>();
        let usart_cfg = Config {
            baud_rate: 115_200.bps(),
            ..Default::default()
        };
        let serial = Serial::new(dp.USART1, (tx, rx), &clocks, usart_cfg);
        let mut usart = Usart::new(serial);
        usart.println("slewdrive: boot");

        // Time base
        let clock = Tim2Clock::new(dp.TIM2, TIM2_CLK_HZ);

        // Potentiometer
        let _pot = gpioa.pa3.into_analog();
        let adc1 = RefCell::new(Adc::adc1(dp.ADC1));
        let read_pot = Adc::make_reader(&adc1, POT_ADC_CHANNEL);

        // H-bridge: IN1 = PD12, IN2 = PD13, EN = PA4
        let actuator = Actuator::new(
            BoardPin::new(gpiod.pd12),
            BoardPin::new(gpiod.pd13),
            BoardPin::new(gpioa.pa4),
            read_pot,
            Calibration::full_turn(),
        );
        let mut slew = SlewController::new(actuator, &clock, SlewConfig::default());

        slew.actuator().forward();
        slew.set_slew(SLEW_RATE_DEG_S);
        usart.println("slewdrive: slewing");

        let mut last_report = clock.millis();
        loop {
            slew.update();

            let now = clock.millis();
            if now.wrapping_sub(last_report) >= TELEMETRY_INTERVAL_MS {
                last_report = now;

                let bearing = Bearing {
                    azimuth: slew.bearing(),
                    elevation: 0,
                };
                let _ = write!(
                    usart,
                    "az={} el={} speed={} duty={}%\r\n",
                    bearing.azimuth,
                    bearing.elevation,
                    slew.speed() as i32,
                    (slew.duty() * 100.0) as u32,
                );
            }
        }
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
