//! Integration tests for the CareService → ports pipeline.
//!
//! These run on the host (x86_64) and verify that the full decision chain
//! from a tick down to pump and broker calls works correctly without any
//! real hardware.  Time is driven explicitly, so every gate boundary can
//! be hit exactly.

use crate::mock_hw::{ActuatorCall, LogSink, MockHardware, MockPublisher, PublishCall};

use waterup::app::commands::AppCommand;
use waterup::app::service::CareService;
use waterup::config::SystemConfig;
use waterup::control::threshold::WarningLevel;
use waterup::control::units;

/// Short intervals so scenarios stay readable in milliseconds.
fn test_cfg() -> SystemConfig {
    SystemConfig {
        measurement_interval_ms: 1_000,
        water_cooldown_ms: 30_000,
        pump_pulse_ms: 5_000,
        statistic_publish_interval_ms: 10_000,
        warning_republish_interval_ms: 20_000,
        ping_interval_ms: 60_000,
        ..SystemConfig::default()
    }
}

fn make_world() -> (CareService, MockHardware, MockPublisher, LogSink) {
    let mut svc = CareService::new(0);
    let hw = MockHardware::new();
    let publisher = MockPublisher::new();
    let mut sink = LogSink::new();
    svc.start(&mut sink);
    (svc, hw, publisher, sink)
}

/// Smallest raw ADC value that converts to the given moisture percentage.
fn raw_for_moisture(percent: u8) -> u16 {
    ((u32::from(percent) * 1023).div_ceil(100)) as u16
}

/// Sonar distance that converts to the given reservoir fill percentage.
fn distance_for_reservoir(percent: u8, cfg: &SystemConfig) -> f64 {
    units::reservoir_percent_to_distance(percent, cfg.reservoir_geometry())
}

// ── Gate initialisation ───────────────────────────────────────

#[test]
fn first_tick_after_boot_does_nothing() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();

    svc.tick(0, &cfg, &mut hw, &mut publisher, &mut sink);

    assert_eq!(hw.sensor_reads, 0, "no gate has elapsed yet");
    assert!(hw.calls.is_empty());
    assert!(publisher.calls.is_empty());
}

// ── Watering scenario ─────────────────────────────────────────

#[test]
fn dry_soil_triggers_one_bounded_pump_pulse() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.moisture_raw = raw_for_moisture(20); // below optimal 30

    svc.tick(30_000, &cfg, &mut hw, &mut publisher, &mut sink);

    assert_eq!(
        hw.calls,
        vec![
            ActuatorCall::SetPump(true),
            ActuatorCall::Delay(5_000),
            ActuatorCall::SetPump(false),
        ]
    );
    assert!(!svc.pump_active(), "pulse completes within the tick");
    assert!(sink.contains("WateringPulse"));
}

#[test]
fn wet_soil_never_runs_the_pump() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.moisture_raw = raw_for_moisture(80);

    for now in (1_000..=120_000).step_by(1_000) {
        svc.tick(now, &cfg, &mut hw, &mut publisher, &mut sink);
    }

    assert_eq!(hw.pulse_count(), 0);
}

#[test]
fn moisture_at_optimal_is_not_watered() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    // Exactly the optimal level: `<` comparison, so no watering.
    hw.moisture_raw = raw_for_moisture(30);
    assert_eq!(units::moisture_raw_to_percent(hw.moisture_raw), 30);

    svc.tick(30_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(hw.pulse_count(), 0);
}

#[test]
fn cooldown_blocks_watering_until_it_elapses() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.moisture_raw = raw_for_moisture(10);

    // First pulse at t=30s; cooldown counts from pulse end (35s).
    svc.tick(30_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(hw.pulse_count(), 1);

    // Still dry on the following measurement ticks, but inside cooldown.
    svc.tick(40_000, &cfg, &mut hw, &mut publisher, &mut sink);
    svc.tick(60_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(hw.pulse_count(), 1, "cooldown must suppress watering");

    // 35s + 30s cooldown = 65s: eligible again.
    svc.tick(65_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(hw.pulse_count(), 2);
}

#[test]
fn watering_only_happens_on_a_measurement_tick() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.moisture_raw = raw_for_moisture(10);

    svc.tick(31_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(hw.pulse_count(), 1);
    let reads_after_first = hw.sensor_reads;

    // 500 ms later the measurement gate is closed; even though the soil is
    // dry, no measurement happens and therefore no watering decision.
    svc.tick(31_500, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(hw.sensor_reads, reads_after_first);
    assert_eq!(hw.pulse_count(), 1);
}

// ── Frozen clock idempotence ──────────────────────────────────

#[test]
fn frozen_clock_performs_each_action_at_most_once() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.moisture_raw = raw_for_moisture(10);

    // At t=60s every gate is open: measurement, watering, statistic,
    // warning (reservoir is full so none is raised), ping.
    for _ in 0..10 {
        svc.tick(60_000, &cfg, &mut hw, &mut publisher, &mut sink);
    }

    assert_eq!(hw.pulse_count(), 1, "one watering despite 10 frozen ticks");
    assert_eq!(publisher.statistic_count(), 1);
    assert_eq!(publisher.ping_count(), 1);
    assert_eq!(publisher.warning_count(), 0);
}

// ── Reporting scenario ────────────────────────────────────────

#[test]
fn statistic_reports_converted_percentages() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.moisture_raw = raw_for_moisture(50);
    hw.distance_cm = distance_for_reservoir(75, &cfg);

    svc.tick(10_000, &cfg, &mut hw, &mut publisher, &mut sink);

    assert_eq!(
        publisher.calls.first(),
        Some(&PublishCall::Statistic {
            moisture: 50,
            reservoir: 75
        })
    );
    assert_eq!(svc.last_readings(), (50, 75));
}

#[test]
fn reporting_and_measuring_can_fire_on_the_same_tick() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();

    // t=10s: measurement (1s gate), statistic (10s gate) both elapsed.
    svc.tick(10_000, &cfg, &mut hw, &mut publisher, &mut sink);

    assert!(sink.contains("MeasurementTaken"));
    assert_eq!(publisher.statistic_count(), 1);
    // Measuring reads once, Reporting reads again.
    assert_eq!(hw.sensor_reads, 2);
}

#[test]
fn publish_failure_leaves_gate_unarmed_for_retry() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    publisher.fail_statistic = true;

    svc.tick(10_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.statistic_count(), 0);
    assert_eq!(publisher.failed_attempts, 1);
    assert!(sink.contains("PublishFailed"));

    // Next tick retries immediately because the gate was never armed.
    svc.tick(11_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.failed_attempts, 2);

    // Broker back: delivery succeeds and the gate re-arms.
    publisher.fail_statistic = false;
    svc.tick(12_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.statistic_count(), 1);

    svc.tick(13_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.statistic_count(), 1, "paced again after success");
}

// ── Warning scenario ──────────────────────────────────────────

#[test]
fn empty_reservoir_latches_and_republishes_on_its_own_interval() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.distance_cm = distance_for_reservoir(3, &cfg); // 3% — empty

    // First reporting tick classifies and latches the warning, but the
    // republish gate (armed at boot) has not elapsed yet.
    svc.tick(10_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(svc.current_warning(), WarningLevel::EmptyReservoir);
    assert_eq!(publisher.warning_count(), 0);
    assert!(sink.contains("WarningChanged"));

    // t=20s: republish gate opens — warning goes out.
    svc.tick(20_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(
        publisher
            .calls
            .iter()
            .filter(|c| matches!(c, PublishCall::Warning(WarningLevel::EmptyReservoir)))
            .count(),
        1
    );

    // Before the republish interval elapses again: no duplicate.
    svc.tick(25_000, &cfg, &mut hw, &mut publisher, &mut sink);
    svc.tick(30_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.warning_count(), 1);

    // t=40s: 20s after the last delivery — republished.
    svc.tick(40_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.warning_count(), 2);
}

#[test]
fn low_reservoir_classifies_between_cutoff_and_threshold() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.distance_cm = distance_for_reservoir(20, &cfg); // 20% < threshold 30

    svc.tick(10_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(svc.current_warning(), WarningLevel::LowReservoir);
}

#[test]
fn warning_self_heals_when_reservoir_recovers() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.distance_cm = distance_for_reservoir(3, &cfg);

    svc.tick(10_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(svc.current_warning(), WarningLevel::EmptyReservoir);

    // Someone refilled the reservoir.
    hw.distance_cm = distance_for_reservoir(90, &cfg);
    svc.tick(20_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(svc.current_warning(), WarningLevel::None);

    // No warning traffic afterwards, even with the republish gate open.
    svc.tick(45_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.warning_count(), 0);
}

// ── "No plant installed" mode ─────────────────────────────────

#[test]
fn contains_plant_false_suppresses_all_side_effects() {
    let mut cfg = test_cfg();
    cfg.contains_plant = false;

    let (mut svc, mut hw, mut publisher, mut sink) = make_world();
    hw.moisture_raw = raw_for_moisture(0); // bone dry
    hw.distance_cm = distance_for_reservoir(0, &cfg); // and empty

    for now in (1_000..=300_000).step_by(1_000) {
        svc.tick(now, &cfg, &mut hw, &mut publisher, &mut sink);
    }

    assert_eq!(hw.sensor_reads, 0);
    assert!(hw.calls.is_empty());
    assert!(publisher.calls.is_empty());
}

// ── Keep-alive ping ───────────────────────────────────────────

#[test]
fn ping_is_paced_by_its_own_gate() {
    let cfg = test_cfg();
    let (mut svc, mut hw, mut publisher, mut sink) = make_world();

    svc.tick(59_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.ping_count(), 0);

    svc.tick(60_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.ping_count(), 1);

    svc.tick(90_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.ping_count(), 1);

    svc.tick(120_000, &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(publisher.ping_count(), 2);
}

// ── Manual watering command ───────────────────────────────────

#[test]
fn water_now_pulses_but_honors_the_cooldown() {
    let cfg = test_cfg();
    let (mut svc, mut hw, _publisher, mut sink) = make_world();

    // Cooldown gate is armed at boot, so an immediate request is ignored.
    svc.handle_command(&AppCommand::WaterNow, 1_000, &cfg, &mut hw, &mut sink);
    assert_eq!(hw.pulse_count(), 0);

    svc.handle_command(&AppCommand::WaterNow, 30_000, &cfg, &mut hw, &mut sink);
    assert_eq!(hw.pulse_count(), 1);

    // Cooldown from pulse end (35s): a request at 50s is still blocked.
    svc.handle_command(&AppCommand::WaterNow, 50_000, &cfg, &mut hw, &mut sink);
    assert_eq!(hw.pulse_count(), 1);

    svc.handle_command(&AppCommand::WaterNow, 65_000, &cfg, &mut hw, &mut sink);
    assert_eq!(hw.pulse_count(), 2);
}

#[test]
fn water_now_ignored_without_a_plant() {
    let mut cfg = test_cfg();
    cfg.contains_plant = false;
    let (mut svc, mut hw, _publisher, mut sink) = make_world();

    svc.handle_command(&AppCommand::WaterNow, 60_000, &cfg, &mut hw, &mut sink);
    assert!(hw.calls.is_empty());
}

// ── Clock wraparound ──────────────────────────────────────────

#[test]
fn gates_stay_correct_across_the_millis_wrap() {
    let cfg = test_cfg();
    let boot = u32::MAX - 500;
    let mut svc = CareService::new(boot);
    let mut hw = MockHardware::new();
    let mut publisher = MockPublisher::new();
    let mut sink = LogSink::new();

    // 400 ms after boot, still pre-wrap: nothing is due.
    svc.tick(boot.wrapping_add(400), &cfg, &mut hw, &mut publisher, &mut sink);
    assert_eq!(hw.sensor_reads, 0);

    // 1.1 s after boot the counter has wrapped to 599; the measurement
    // gate (1 s) must fire anyway.
    svc.tick(boot.wrapping_add(1_100), &cfg, &mut hw, &mut publisher, &mut sink);
    assert!(hw.sensor_reads > 0, "gate must fire across the wrap");
}
