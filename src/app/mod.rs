//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the WaterUp pot: interval
//! gating, threshold policy, watering, and broker reporting.  All
//! interaction with hardware and the network happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
