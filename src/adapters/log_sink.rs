//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future display adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | care loop running");
            }
            AppEvent::MeasurementTaken {
                moisture_percent,
                reservoir_percent,
            } => {
                info!(
                    "MEASURE | moisture={}% | reservoir={}%",
                    moisture_percent, reservoir_percent
                );
            }
            AppEvent::WateringPulse { duration_ms } => {
                info!("WATER | pump pulsed for {} ms", duration_ms);
            }
            AppEvent::StatisticPublished {
                moisture_percent,
                reservoir_percent,
            } => {
                info!(
                    "STAT | published moisture={}% reservoir={}%",
                    moisture_percent, reservoir_percent
                );
            }
            AppEvent::WarningChanged { from, to } => {
                info!("WARN | level {} -> {}", from, to);
            }
            AppEvent::WarningPublished(level) => {
                info!("WARN | published '{}'", level);
            }
            AppEvent::PublishFailed(e) => {
                warn!("PUBLISH | failed: {} (will retry)", e);
            }
            AppEvent::PingSent => {
                info!("PING | broker keep-alive sent");
            }
        }
    }
}
