//! System configuration parameters
//!
//! All tunable parameters for the WaterUp pot.  Values can be overridden
//! via NVS (non-volatile storage) or a config message from the broker.

use serde::{Deserialize, Serialize};

use crate::control::units::ReservoirGeometry;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Plant care ---
    /// Master enable: false = pot has no plant, loop takes no action
    pub contains_plant: bool,
    /// Target soil moisture (0-100%); watering triggers below this
    pub moisture_optimal_percent: u8,
    /// Minimum time between moisture/reservoir measurements (milliseconds)
    pub measurement_interval_ms: u32,
    /// Minimum time after a watering pulse before watering again (milliseconds)
    pub water_cooldown_ms: u32,
    /// Duration the pump is held on per watering event (milliseconds)
    pub pump_pulse_ms: u32,

    // --- Broker reporting ---
    /// Statistic publish interval (milliseconds)
    pub statistic_publish_interval_ms: u32,
    /// Warning republish interval (milliseconds)
    pub warning_republish_interval_ms: u32,
    /// Broker keep-alive ping interval (milliseconds)
    pub ping_interval_ms: u32,
    /// Reservoir fill (0-100%) below which warnings are raised
    pub reservoir_warning_threshold_percent: u8,

    // --- Reservoir geometry ---
    /// Water surface area of the reservoir (cm²)
    pub reservoir_surface_cm2: f64,
    /// Height of the reservoir (cm)
    pub reservoir_height_cm: f64,

    // --- Status LED ---
    /// Reservoir LED luminosity, red channel (0-255)
    pub led_red: u8,
    /// Reservoir LED luminosity, green channel (0-255)
    pub led_green: u8,
    /// Reservoir LED luminosity, blue channel (0-255)
    pub led_blue: u8,

    // --- Timing ---
    /// Host control loop pacing (milliseconds)
    pub control_loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Plant care
            contains_plant: true,
            moisture_optimal_percent: 30,
            measurement_interval_ms: 60_000,    // 1/min
            water_cooldown_ms: 1_800_000,       // 30 min soak time
            pump_pulse_ms: 5_000,

            // Broker reporting
            statistic_publish_interval_ms: 60_000,
            warning_republish_interval_ms: 7_400_000, // ~2 h between nag messages
            ping_interval_ms: 60_000,
            reservoir_warning_threshold_percent: 30,

            // Reservoir geometry (400 cm² × 40 cm = 16 L production pot)
            reservoir_surface_cm2: 400.0,
            reservoir_height_cm: 40.0,

            // Status LED
            led_red: 255,
            led_green: 255,
            led_blue: 255,

            // Timing
            control_loop_interval_ms: 1_000, // 1 Hz
        }
    }
}

impl SystemConfig {
    /// Reservoir geometry as the typed value the unit converter expects.
    pub fn reservoir_geometry(&self) -> ReservoirGeometry {
        ReservoirGeometry {
            surface_cm2: self.reservoir_surface_cm2,
            height_cm: self.reservoir_height_cm,
        }
    }
}
