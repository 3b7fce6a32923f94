//! WaterUp Firmware — Main Entry Point
//!
//! Hexagonal architecture with an event-driven control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   Esp32Time       │
//! │  (Sensor+Actuator) (EventSink)    (ConfigPort) (clock)         │
//! │  MqttPublisher                                                 │
//! │  (PublisherPort + inbound config)                              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              CareService (pure logic)                  │    │
//! │  │  gates · thresholds · unit conversion                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod events;
mod pins;

pub mod app;
mod adapters;
mod control;
mod drivers;
mod sensors;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::mqtt::MqttPublisher;
use adapters::nvs::NvsAdapter;
use adapters::time::Esp32TimeAdapter;
use app::commands::AppCommand;
use app::ports::{ActuatorPort, ConfigPort};
use app::service::CareService;
use config::SystemConfig;
use control::interval::elapsed;
use drivers::pump::PumpDriver;
use drivers::status_led::StatusLed;
use events::Event;
use sensors::moisture::MoistureSensor;
use sensors::sonar::SonarSensor;
use sensors::SensorHub;

// ── Broker session parameters ─────────────────────────────────
//
// The broker account is baked into the firmware image; per-device
// identity comes from the WiFi MAC.

const MQTT_BROKER_URL: &str = "mqtts://mqtt.inf1i.ga:8883";
const MQTT_BROKER_USERNAME: &str = "inf1i-plantpot";
const MQTT_BROKER_PASSWORD: &str = "password";

/// Unsaved config changes are flushed to NVS after this quiet period.
const CONFIG_AUTOSAVE_DELAY_MS: u32 = 5_000;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  WaterUp v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            None
        }
    };
    let mut cfg = match nvs.as_ref().map(ConfigPort::load) {
        Some(Ok(stored)) => {
            info!("Config loaded from NVS");
            stored
        }
        Some(Err(e)) => {
            warn!("NVS config load failed ({}), using defaults", e);
            SystemConfig::default()
        }
        None => SystemConfig::default(),
    };

    // ── 4. Construct adapters ─────────────────────────────────
    let sensor_hub = SensorHub::new(
        SonarSensor::new(pins::SONAR_TRIGGER_GPIO, pins::SONAR_ECHO_GPIO),
        MoistureSensor::new(pins::MOISTURE_ADC_GPIO),
    );
    let mut hw = HardwareAdapter::new(sensor_hub, PumpDriver::new(), StatusLed::new());
    hw.set_led(cfg.led_red, cfg.led_green, cfg.led_blue);

    let time_adapter = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();

    let device_mac = read_mac_string();
    info!("Device MAC: {}", device_mac);

    // The pot is useless without its broker session: keep trying.
    let mut mqtt = loop {
        match MqttPublisher::new(
            MQTT_BROKER_URL,
            MQTT_BROKER_USERNAME,
            MQTT_BROKER_PASSWORD,
            device_mac.as_str(),
        ) {
            Ok(client) => break client,
            Err(e) => {
                warn!("Broker connect failed ({}), retrying in 5 s", e);
                esp_idf_hal::delay::FreeRtos::delay_ms(5_000);
            }
        }
    };

    // ── 5. Construct the care service ─────────────────────────
    let mut care = CareService::new(time_adapter.now_ms());
    care.start(&mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    let mut config_dirty = false;
    let mut dirty_since = time_adapter.now_ms();

    loop {
        esp_idf_hal::delay::FreeRtos::delay_ms(cfg.control_loop_interval_ms);
        events::push_event(Event::ControlTick);

        events::drain_events(|event| match event {
            Event::ControlTick => {
                care.tick(
                    time_adapter.now_ms(),
                    &cfg,
                    &mut hw,
                    &mut mqtt,
                    &mut log_sink,
                );
            }

            Event::ConfigReceived => {
                if let Some(new_cfg) = mqtt.take_pending_config() {
                    info!("Configuration updated from broker");
                    cfg = new_cfg;
                    hw.set_led(cfg.led_red, cfg.led_green, cfg.led_blue);
                    config_dirty = true;
                    dirty_since = time_adapter.now_ms();
                }
            }

            Event::WaterRequested => {
                care.handle_command(
                    &AppCommand::WaterNow,
                    time_adapter.now_ms(),
                    &cfg,
                    &mut hw,
                    &mut log_sink,
                );
            }
        });

        // Flush broker-pushed config once the dust settles.
        if config_dirty
            && elapsed(time_adapter.now_ms(), dirty_since, CONFIG_AUTOSAVE_DELAY_MS)
        {
            match nvs.as_ref().map(|n| n.save(&cfg)) {
                Some(Ok(())) => {
                    info!("Config auto-saved to NVS");
                    config_dirty = false;
                }
                Some(Err(e)) => warn!("Config auto-save failed: {}", e),
                None => config_dirty = false, // No persistence this session.
            }
        }
    }
}

/// Format the station MAC as the device identity string.
fn read_mac_string() -> heapless::String<24> {
    use core::fmt::Write;

    let mut mac = [0u8; 6];
    // SAFETY: esp_read_mac writes exactly 6 bytes for the WIFI_STA type.
    unsafe {
        esp_idf_svc::sys::esp_read_mac(
            mac.as_mut_ptr(),
            esp_idf_svc::sys::esp_mac_type_t_ESP_MAC_WIFI_STA,
        );
    }

    let mut out = heapless::String::new();
    write!(
        out,
        "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    )
    .ok();
    out
}
