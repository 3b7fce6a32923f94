//! Care service — the hexagonal core.
//!
//! [`CareService`] owns the loop state (interval gates, latched warning,
//! pump state) and exposes a clean, hardware-agnostic `tick` API.  All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ ActuatorPort
//!                 │      CareService        │
//!  Clock (ms) ──▶ │  gates · policy · units │ ──▶ PublisherPort
//!                 └────────────────────────┘ ──▶ EventSink
//! ```
//!
//! One `tick` evaluates, in order: measurement, watering, statistic
//! reporting, warning republish, broker keep-alive.  Each action is paced
//! by its own [`IntervalGate`] against the current timestamp only — gates
//! are never compared against each other, which keeps a slow or skipped
//! tick from coupling unrelated timers.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::interval::{IntervalGate, Millis};
use crate::control::threshold::{self, WarningLevel};
use crate::control::units;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, PublisherPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// CareService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all plant-care logic.
pub struct CareService {
    /// Paces sensor measurements.
    measurement_gate: IntervalGate,
    /// Paces watering; armed at the *end* of a pump pulse.
    water_gate: IntervalGate,
    /// Paces statistic publishes; armed only on delivery.
    statistic_gate: IntervalGate,
    /// Paces warning republishes; armed only on delivery.
    warning_gate: IntervalGate,
    /// Paces broker keep-alive pings; armed only on delivery.
    ping_gate: IntervalGate,

    /// Latched reservoir warning, overwritten by every Reporting
    /// classification (self-healing once the reservoir recovers).
    current_warning: WarningLevel,
    /// Mirrors the last commanded pump state; true only for the duration
    /// of a watering pulse.
    pump_active: bool,

    /// Last converted readings, for telemetry queries.
    last_moisture_percent: u8,
    last_reservoir_percent: u8,

    tick_count: u64,
}

impl CareService {
    /// Construct the service with every gate armed at the startup time.
    ///
    /// Nothing fires on the first tick; each action waits out one full
    /// interval from boot, exactly like a fresh pot that was just plugged in.
    pub fn new(now: Millis) -> Self {
        Self {
            measurement_gate: IntervalGate::new(now),
            water_gate: IntervalGate::new(now),
            statistic_gate: IntervalGate::new(now),
            warning_gate: IntervalGate::new(now),
            ping_gate: IntervalGate::new(now),
            current_warning: WarningLevel::None,
            pump_active: false,
            last_moisture_percent: 0,
            last_reservoir_percent: 0,
            tick_count: 0,
        }
    }

    /// Announce startup through the event sink.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!("CareService started");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full care cycle.
    ///
    /// `now` is the wrapping millisecond counter read by the host loop;
    /// `cfg` is re-read from the config store every tick so broker-pushed
    /// changes take effect immediately.  The `hw` parameter satisfies
    /// **both** [`SensorPort`] and [`ActuatorPort`] — this avoids a double
    /// mutable borrow while keeping the port boundary explicit.
    ///
    /// Never blocks except for the watering pulse hold, and always returns
    /// control to the caller regardless of collaborator failures.
    pub fn tick(
        &mut self,
        now: Millis,
        cfg: &SystemConfig,
        hw: &mut (impl SensorPort + ActuatorPort),
        publisher: &mut impl PublisherPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // "No plant installed" mode: the pot is powered but inert.
        if !cfg.contains_plant {
            return;
        }

        // 1. Measuring — refresh readings on the measurement cadence.
        let mut measured = None;
        if self.measurement_gate.ready(now, cfg.measurement_interval_ms) {
            let (moisture, reservoir) = self.measure(cfg, hw);
            self.measurement_gate.arm(now);
            sink.emit(&AppEvent::MeasurementTaken {
                moisture_percent: moisture,
                reservoir_percent: reservoir,
            });
            measured = Some((moisture, reservoir));
        }

        // 2. Watering — only on a tick that just measured, and only once
        //    the soak cooldown from the previous pulse has passed.
        if let Some((moisture, _)) = measured {
            if threshold::should_water(moisture, cfg.moisture_optimal_percent)
                && self.water_gate.ready(now, cfg.water_cooldown_ms)
            {
                self.run_pump_pulse(now, cfg, hw, sink);
            }
        }

        // 3. Reporting — fresh readings, reclassify, publish.
        if self
            .statistic_gate
            .ready(now, cfg.statistic_publish_interval_ms)
        {
            let (moisture, reservoir) = self.measure(cfg, hw);
            self.update_warning(reservoir, cfg, sink);

            match publisher.publish_statistic(moisture, reservoir) {
                Ok(()) => {
                    self.statistic_gate.arm(now);
                    sink.emit(&AppEvent::StatisticPublished {
                        moisture_percent: moisture,
                        reservoir_percent: reservoir,
                    });
                }
                Err(e) => {
                    // Gate stays unarmed: retried on a later tick.
                    warn!("statistic publish failed: {e}");
                    sink.emit(&AppEvent::PublishFailed(e));
                }
            }
        }

        // 4. Warning republish — nag while the warning is latched.
        if self.current_warning != WarningLevel::None
            && self
                .warning_gate
                .ready(now, cfg.warning_republish_interval_ms)
        {
            match publisher.publish_warning(self.current_warning) {
                Ok(()) => {
                    self.warning_gate.arm(now);
                    sink.emit(&AppEvent::WarningPublished(self.current_warning));
                }
                Err(e) => {
                    warn!("warning publish failed: {e}");
                    sink.emit(&AppEvent::PublishFailed(e));
                }
            }
        }

        // 5. Broker keep-alive.
        if self.ping_gate.ready(now, cfg.ping_interval_ms) {
            match publisher.ping() {
                Ok(()) => {
                    self.ping_gate.arm(now);
                    sink.emit(&AppEvent::PingSent);
                }
                Err(e) => {
                    debug!("broker ping failed: {e}");
                    sink.emit(&AppEvent::PublishFailed(e));
                }
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from the broker, serial console, etc.).
    ///
    /// `UpdateConfig`/`SaveConfig` are interpreted by the host loop, which
    /// owns the live config value and the storage port; they are no-ops
    /// here.
    pub fn handle_command(
        &mut self,
        cmd: &AppCommand,
        now: Millis,
        cfg: &SystemConfig,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::WaterNow => {
                if !cfg.contains_plant {
                    info!("WaterNow ignored: no plant installed");
                    return;
                }
                if self.water_gate.ready(now, cfg.water_cooldown_ms) {
                    self.run_pump_pulse(now, cfg, hw, sink);
                } else {
                    info!("WaterNow ignored: cooldown active");
                }
            }
            AppCommand::UpdateConfig(_) | AppCommand::SaveConfig => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// The currently latched reservoir warning.
    pub fn current_warning(&self) -> WarningLevel {
        self.current_warning
    }

    /// Whether a watering pulse is in progress.
    pub fn pump_active(&self) -> bool {
        self.pump_active
    }

    /// Last converted readings (moisture %, reservoir %).
    pub fn last_readings(&self) -> (u8, u8) {
        (self.last_moisture_percent, self.last_reservoir_percent)
    }

    /// Total care ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Query both sensors and convert to engineering units.
    fn measure(&mut self, cfg: &SystemConfig, hw: &mut impl SensorPort) -> (u8, u8) {
        let distance_cm = hw.measure_reservoir_distance_cm();
        let raw = hw.read_moisture_raw();

        let moisture = units::moisture_raw_to_percent(raw);
        let reservoir =
            units::distance_to_reservoir_percent(distance_cm, cfg.reservoir_geometry());

        self.last_moisture_percent = moisture;
        self.last_reservoir_percent = reservoir;
        (moisture, reservoir)
    }

    /// Reclassify the reservoir and latch the result.
    ///
    /// The classifier output *replaces* the latched warning on every
    /// Reporting tick, so a refilled reservoir clears itself without an
    /// explicit reset path.
    fn update_warning(&mut self, reservoir_percent: u8, cfg: &SystemConfig, sink: &mut impl EventSink) {
        let level = threshold::classify_reservoir(
            reservoir_percent,
            cfg.reservoir_warning_threshold_percent,
        );
        if level != self.current_warning {
            info!("reservoir warning: {} -> {}", self.current_warning, level);
            sink.emit(&AppEvent::WarningChanged {
                from: self.current_warning,
                to: level,
            });
        }
        self.current_warning = level;
    }

    /// Run one watering pulse: pump on, hold, pump off.
    ///
    /// The cooldown gate is armed at `now + pulse duration` so the soak
    /// window counts from the end of the pulse, not its start.
    fn run_pump_pulse(
        &mut self,
        now: Millis,
        cfg: &SystemConfig,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        info!("watering: pump on for {} ms", cfg.pump_pulse_ms);
        hw.set_pump(true);
        self.pump_active = true;

        hw.delay_ms(cfg.pump_pulse_ms);

        hw.set_pump(false);
        self.pump_active = false;

        self.water_gate.arm_at(now.wrapping_add(cfg.pump_pulse_ms));
        sink.emit(&AppEvent::WateringPulse {
            duration_ms: cfg.pump_pulse_ms,
        });
    }
}
