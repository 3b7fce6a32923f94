//! Resistive soil-moisture probe driver.
//!
//! Wet soil conducts better, so a lower resistance (higher ADC voltage on
//! the divider) means wetter ground.  The probe delivers a 10-bit raw
//! reading; conversion to a percentage happens in the domain core via
//! [`units::moisture_raw_to_percent`](crate::control::units::moisture_raw_to_percent).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the ADC1 moisture channel via the oneshot API.
//! On host/test: reads from a static `AtomicU16` for injection.

use core::sync::atomic::{AtomicU16, Ordering};

static SIM_MOISTURE_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_moisture_adc(raw: u16) {
    SIM_MOISTURE_ADC.store(raw, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
pub struct MoistureReading {
    /// Raw 10-bit ADC value (0–1023).
    pub raw: u16,
}

pub struct MoistureSensor {
    _adc_gpio: i32,
    total_reads: u32,
}

impl MoistureSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            _adc_gpio: adc_gpio,
            total_reads: 0,
        }
    }

    pub fn read(&mut self) -> MoistureReading {
        self.total_reads = self.total_reads.saturating_add(1);
        MoistureReading {
            raw: self.read_adc(),
        }
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        use crate::drivers::hw_init;
        // The ESP32 ADC is 12-bit; scale down to the probe's 10-bit range
        // so the conversion math matches the calibrated divider.
        hw_init::adc1_read(hw_init::ADC1_CH_MOISTURE) >> 2
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_MOISTURE_ADC.load(Ordering::Relaxed)
    }
}
