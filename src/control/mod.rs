//! Pure control-logic building blocks.
//!
//! Everything in here is side-effect free and host-testable: unit
//! conversions from raw sensor readings, threshold classification, and the
//! interval gates that pace every periodic action of the care loop.

pub mod interval;
pub mod threshold;
pub mod units;
