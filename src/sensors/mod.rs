//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns both pot sensors and answers the domain's
//! [`SensorPort`](crate::app::ports::SensorPort) queries through the
//! hardware adapter.

pub mod moisture;
pub mod sonar;

use moisture::MoistureSensor;
use sonar::SonarSensor;

/// Aggregates the reservoir and soil sensors.
pub struct SensorHub {
    pub sonar: SonarSensor,
    pub moisture: MoistureSensor,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(sonar: SonarSensor, moisture: MoistureSensor) -> Self {
        Self { sonar, moisture }
    }

    /// Distance down to the water surface, in cm.
    pub fn reservoir_distance_cm(&mut self) -> f64 {
        self.sonar.read().distance_cm
    }

    /// Raw soil-moisture ADC value (0–1023).
    pub fn moisture_raw(&mut self) -> u16 {
        self.moisture.read().raw
    }
}
