//! Water pump driver (transistor-switched 12 V pump).
//!
//! Plain on/off control: a GPIO drives the transistor base, the transistor
//! switches the 12 V rail through the pump.
//!
//! ## Safety contract
//!
//! The pump is only ever held on for one bounded pulse per watering event;
//! the care service enforces the pulse duration and the cooldown.  This
//! driver is a dumb actuator.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpState {
    Off,
    On,
}

pub struct PumpDriver {
    state: PumpState,
}

impl PumpDriver {
    pub fn new() -> Self {
        // Don't drown the plant on boot: drive the pin low immediately.
        hw_init::gpio_write(pins::PUMP_GPIO, false);
        Self {
            state: PumpState::Off,
        }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::PUMP_GPIO, on);
        self.state = if on { PumpState::On } else { PumpState::Off };
    }

    pub fn stop(&mut self) {
        self.set(false);
    }

    pub fn state(&self) -> PumpState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PumpState::On
    }
}
