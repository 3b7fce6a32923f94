//! Conversions from raw sensor readings to engineering units.
//!
//! All conversions favour silent clamping over error propagation: a noisy
//! ultrasonic echo or an ADC glitch must degrade into a saturated reading,
//! never into a fault that stalls the care loop.

/// Centimetres sound travels per microsecond (at ~20 °C).
const SOUND_SPEED_CM_PER_US: f64 = 0.034;

/// Full scale of the soil-moisture ADC (10-bit).
const MOISTURE_RAW_MAX: u16 = 1023;

// ---------------------------------------------------------------------------
// Reservoir geometry
// ---------------------------------------------------------------------------

/// Fixed geometry of the water reservoir.
///
/// The reservoir is the gap between the outer pot and the inner plant pot;
/// its water surface area is constant over the full height, so volume is
/// simply `surface × water column height`.
#[derive(Debug, Clone, Copy)]
pub struct ReservoirGeometry {
    /// Water surface area in cm².
    pub surface_cm2: f64,
    /// Height of the reservoir in cm (sensor sits at the top).
    pub height_cm: f64,
}

impl Default for ReservoirGeometry {
    fn default() -> Self {
        // 400 cm² × 40 cm = 16 L, the production pot.
        Self {
            surface_cm2: 400.0,
            height_cm: 40.0,
        }
    }
}

impl ReservoirGeometry {
    /// Total capacity in cm³.
    pub fn capacity_cm3(&self) -> f64 {
        self.surface_cm2 * self.height_cm
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Convert an ultrasonic echo round-trip time to a one-way distance in cm.
pub fn echo_round_trip_to_cm(duration_us: u32) -> f64 {
    f64::from(duration_us) * SOUND_SPEED_CM_PER_US / 2.0
}

/// Convert the measured air-gap distance to "percent of reservoir full".
///
/// The sensor looks down at the water surface, so the water column is
/// `height − distance`.  Readings beyond the physical height (noise, dry
/// reservoir overshoot) clamp to 0 %, readings shorter than zero gap clamp
/// to 100 %.
pub fn distance_to_reservoir_percent(distance_cm: f64, geometry: ReservoirGeometry) -> u8 {
    let water_column_cm = geometry.height_cm - distance_cm;
    let water_cm3 = geometry.surface_cm2 * water_column_cm;
    let percent = water_cm3 / geometry.capacity_cm3() * 100.0;
    percent.clamp(0.0, 100.0).round() as u8
}

/// Convert a raw soil-moisture ADC reading (0–1023) to a 0–100 percentage.
///
/// Out-of-range raw values clamp to full scale.  The divisor is a
/// compile-time constant, so no runtime divide-by-zero is possible.
pub fn moisture_raw_to_percent(raw: u16) -> u8 {
    let raw = raw.min(MOISTURE_RAW_MAX);
    (u32::from(raw) * 100 / u32::from(MOISTURE_RAW_MAX)) as u8
}

/// Inverse of [`distance_to_reservoir_percent`] for a given fill percentage.
///
/// Used by calibration helpers and tests to synthesise a distance that a
/// given fill level would produce.
pub fn reservoir_percent_to_distance(percent_full: u8, geometry: ReservoirGeometry) -> f64 {
    let fraction = f64::from(percent_full.min(100)) / 100.0;
    geometry.height_cm * (1.0 - fraction)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
