//! Outbound application events.
//!
//! The [`CareService`](super::service::CareService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them — log to serial, mirror to a debug topic,
//! drive a display.

use crate::control::threshold::WarningLevel;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The care service has started.
    Started,

    /// A fresh measurement was taken.
    MeasurementTaken {
        moisture_percent: u8,
        reservoir_percent: u8,
    },

    /// The pump ran a watering pulse.
    WateringPulse { duration_ms: u32 },

    /// A statistic was delivered to the broker.
    StatisticPublished {
        moisture_percent: u8,
        reservoir_percent: u8,
    },

    /// The reservoir warning level changed.
    WarningChanged {
        from: WarningLevel,
        to: WarningLevel,
    },

    /// A warning was (re)delivered to the broker.
    WarningPublished(WarningLevel),

    /// A broker publish or ping failed; it will be retried on a later tick.
    PublishFailed(crate::app::ports::PublishError),

    /// Keep-alive ping delivered.
    PingSent,
}
