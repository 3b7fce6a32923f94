//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ CareService (domain)
//! ```
//!
//! Driven adapters (sensors, the pump, the broker connection, config
//! storage) implement these traits.  The
//! [`CareService`](super::service::CareService) consumes them via generics,
//! so the domain core never touches hardware or sockets directly.

use crate::config::SystemConfig;
use crate::control::threshold::WarningLevel;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain raw sensor data.
///
/// Conversions to engineering units happen inside the domain
/// ([`control::units`](crate::control::units)); adapters return what the
/// hardware gives them.
pub trait SensorPort {
    /// Distance from the ultrasonic sensor down to the water surface, in cm.
    fn measure_reservoir_distance_cm(&mut self) -> f64;

    /// Raw soil-moisture ADC reading (0–1023).
    fn read_moisture_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Switch the water pump on or off.
    fn set_pump(&mut self, on: bool);

    /// Synchronous hold, used for the watering pulse.
    ///
    /// The control loop is single-threaded and nothing else runs during the
    /// hold, so a blocking wait is acceptable here (and is what the target
    /// hardware does).  Test adapters record the duration and return
    /// immediately.
    fn delay_ms(&mut self, ms: u32);

    /// Set the reservoir status LED colour.
    fn set_led(&mut self, r: u8, g: u8, b: u8);
}

// ───────────────────────────────────────────────────────────────
// Publisher port (driven adapter: domain → broker)
// ───────────────────────────────────────────────────────────────

/// Outbound reporting to the MQTT broker.
///
/// On failure the caller leaves the corresponding interval gate unarmed so
/// the message is retried on a later tick — adapters must not retry
/// internally.
pub trait PublisherPort {
    /// Publish a pot statistic (soil moisture %, reservoir fill %).
    fn publish_statistic(
        &mut self,
        moisture_percent: u8,
        reservoir_percent: u8,
    ) -> Result<(), PublishError>;

    /// Publish a reservoir warning.
    fn publish_warning(&mut self, level: WarningLevel) -> Result<(), PublishError>;

    /// Keep-alive ping so the broker does not drop the session.
    fn ping(&mut self) -> Result<(), PublishError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, a debug
/// topic, a display).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.  Invalid
/// ranges are rejected with [`ConfigError::ValidationFailed`], not silently
/// clamped — a compromised broker channel must not be able to inject
/// dangerous operating parameters (e.g. a zero watering cooldown).
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`PublisherPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// No session with the broker (offline, mid-reconnect).
    NotConnected,
    /// The broker refused the message.
    BrokerRejected,
    /// The message could not be serialised or exceeds the buffer.
    PayloadTooLarge,
    /// Generic transport I/O error.
    IoError,
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for PublishError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected to broker"),
            Self::BrokerRejected => write!(f, "broker rejected message"),
            Self::PayloadTooLarge => write!(f, "payload too large"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
