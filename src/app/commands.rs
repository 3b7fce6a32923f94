//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (broker config
//! topic, serial console) that the host loop and the
//! [`CareService`](super::service::CareService) interpret and act upon.

use crate::config::SystemConfig;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Run a watering pulse now, bypassing the measurement gate.
    /// The cooldown gate still applies — a flood of commands must not
    /// drown the plant.
    WaterNow,

    /// Hot-reload configuration (e.g. from the broker config topic).
    /// Interpreted by the host loop, which owns the live config value.
    UpdateConfig(SystemConfig),

    /// Explicitly persist the current config to NVS immediately.
    SaveConfig,
}
