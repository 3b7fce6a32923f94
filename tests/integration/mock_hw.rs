//! Mock hardware and broker adapters for integration tests.
//!
//! Records every actuator and publisher call so tests can assert on the
//! full command history without touching real GPIO or a real broker.

use waterup::app::events::AppEvent;
use waterup::app::ports::{
    ActuatorPort, EventSink, PublishError, PublisherPort, SensorPort,
};
use waterup::control::threshold::WarningLevel;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetPump(bool),
    Delay(u32),
    SetLed { r: u8, g: u8, b: u8 },
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    /// Distance the sonar will report, in cm.
    pub distance_cm: f64,
    /// Raw value the moisture probe will report (0–1023).
    pub moisture_raw: u16,
    /// Number of sensor queries (distance + moisture pairs count once each).
    pub sensor_reads: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            distance_cm: 0.0, // full reservoir
            moisture_raw: 1023, // soaked soil
            sensor_reads: 0,
        }
    }

    pub fn pump_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetPump(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Number of completed watering pulses (on → off transitions).
    pub fn pulse_count(&self) -> usize {
        self.calls
            .windows(3)
            .filter(|w| {
                matches!(
                    w,
                    [
                        ActuatorCall::SetPump(true),
                        ActuatorCall::Delay(_),
                        ActuatorCall::SetPump(false)
                    ]
                )
            })
            .count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn measure_reservoir_distance_cm(&mut self) -> f64 {
        self.sensor_reads += 1;
        self.distance_cm
    }

    fn read_moisture_raw(&mut self) -> u16 {
        self.moisture_raw
    }
}

impl ActuatorPort for MockHardware {
    fn set_pump(&mut self, on: bool) {
        self.calls.push(ActuatorCall::SetPump(on));
    }

    fn delay_ms(&mut self, ms: u32) {
        // No real sleeping in tests — just record the hold.
        self.calls.push(ActuatorCall::Delay(ms));
    }

    fn set_led(&mut self, r: u8, g: u8, b: u8) {
        self.calls.push(ActuatorCall::SetLed { r, g, b });
    }
}

// ── MockPublisher ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishCall {
    Statistic { moisture: u8, reservoir: u8 },
    Warning(WarningLevel),
    Ping,
}

pub struct MockPublisher {
    pub calls: Vec<PublishCall>,
    /// Attempts that were rejected (recorded separately from `calls`).
    pub failed_attempts: usize,
    pub fail_statistic: bool,
    pub fail_warning: bool,
    pub fail_ping: bool,
}

#[allow(dead_code)]
impl MockPublisher {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            failed_attempts: 0,
            fail_statistic: false,
            fail_warning: false,
            fail_ping: false,
        }
    }

    pub fn statistic_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PublishCall::Statistic { .. }))
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, PublishCall::Warning(_)))
            .count()
    }

    pub fn ping_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, PublishCall::Ping)).count()
    }
}

impl Default for MockPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl PublisherPort for MockPublisher {
    fn publish_statistic(
        &mut self,
        moisture_percent: u8,
        reservoir_percent: u8,
    ) -> Result<(), PublishError> {
        if self.fail_statistic {
            self.failed_attempts += 1;
            return Err(PublishError::NotConnected);
        }
        self.calls.push(PublishCall::Statistic {
            moisture: moisture_percent,
            reservoir: reservoir_percent,
        });
        Ok(())
    }

    fn publish_warning(&mut self, level: WarningLevel) -> Result<(), PublishError> {
        if self.fail_warning {
            self.failed_attempts += 1;
            return Err(PublishError::NotConnected);
        }
        self.calls.push(PublishCall::Warning(level));
        Ok(())
    }

    fn ping(&mut self) -> Result<(), PublishError> {
        if self.fail_ping {
            self.failed_attempts += 1;
            return Err(PublishError::NotConnected);
        }
        self.calls.push(PublishCall::Ping);
        Ok(())
    }
}

// ── LogSink ──────────────────────────────────────────────────

pub struct LogSink {
    pub events: Vec<String>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.contains(needle))
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}
