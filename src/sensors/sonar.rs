//! HC-SR04 ultrasonic distance sensor for the water reservoir.
//!
//! A 10 µs trigger pulse starts a measurement; the echo pin then goes HIGH
//! for as long as the sound takes to return.  The pulse width is converted
//! to centimetres by [`units::echo_round_trip_to_cm`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the trigger GPIO and times the echo pulse.
//! On host/test: reads a static `AtomicU32` echo duration for injection.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::control::units;
use crate::pins;

static SIM_ECHO_US: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(duration_us: u32) {
    SIM_ECHO_US.store(duration_us, Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
pub struct DistanceReading {
    /// Raw echo round-trip time in µs (0 = timeout, no reflection).
    pub echo_us: u32,
    /// One-way distance to the water surface in cm.
    pub distance_cm: f64,
}

pub struct SonarSensor {
    _trigger_gpio: i32,
    _echo_gpio: i32,
    last_cm: f64,
}

impl SonarSensor {
    pub fn new(trigger_gpio: i32, echo_gpio: i32) -> Self {
        Self {
            _trigger_gpio: trigger_gpio,
            _echo_gpio: echo_gpio,
            last_cm: 0.0,
        }
    }

    /// Trigger a ping and time the returning echo.
    ///
    /// A timed-out echo (sensor unplugged, surface out of range) yields
    /// `echo_us == 0`; the previous good distance is retained so one missed
    /// ping does not spike the reservoir reading.
    pub fn read(&mut self) -> DistanceReading {
        let echo_us = self.measure_echo_us();
        if echo_us > 0 {
            self.last_cm = units::echo_round_trip_to_cm(echo_us);
        }
        DistanceReading {
            echo_us,
            distance_cm: self.last_cm,
        }
    }

    /// The most recent good distance, in cm.
    pub fn last_distance_cm(&self) -> f64 {
        self.last_cm
    }

    #[cfg(target_os = "espidf")]
    fn measure_echo_us(&self) -> u32 {
        use crate::drivers::hw_init;

        // 2 µs settle LOW, 10 µs trigger HIGH, then LOW again.
        hw_init::gpio_write(pins::SONAR_TRIGGER_GPIO, false);
        hw_init::busy_wait_us(2);
        hw_init::gpio_write(pins::SONAR_TRIGGER_GPIO, true);
        hw_init::busy_wait_us(10);
        hw_init::gpio_write(pins::SONAR_TRIGGER_GPIO, false);

        hw_init::pulse_in_us(pins::SONAR_ECHO_GPIO, true, pins::SONAR_ECHO_TIMEOUT_US)
    }

    #[cfg(not(target_os = "espidf"))]
    fn measure_echo_us(&self) -> u32 {
        SIM_ECHO_US.load(Ordering::Relaxed)
    }
}
