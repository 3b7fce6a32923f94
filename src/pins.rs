//! GPIO / peripheral pin assignments for the WaterUp pot board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Ultrasonic reservoir sensor (HC-SR04)
// ---------------------------------------------------------------------------

/// Digital output: 10 µs trigger pulse starts a measurement.
pub const SONAR_TRIGGER_GPIO: i32 = 13;
/// Digital input: echo pulse whose width encodes the round-trip time.
pub const SONAR_ECHO_GPIO: i32 = 12;

/// Abort the echo wait after this long (no reflection / sensor unplugged).
/// 30 ms corresponds to roughly 5 m of range — far beyond any reservoir.
pub const SONAR_ECHO_TIMEOUT_US: u32 = 30_000;

// ---------------------------------------------------------------------------
// Soil moisture probe — Analog (ADC1)
// ---------------------------------------------------------------------------

/// Resistive soil-moisture probe via voltage divider.
/// ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const MOISTURE_ADC_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Water pump (transistor-switched 12 V pump)
// ---------------------------------------------------------------------------

/// Digital output: HIGH opens the transistor and powers the pump.
pub const PUMP_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Reservoir status LED (discrete RGB)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 14;
pub const LED_B_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
