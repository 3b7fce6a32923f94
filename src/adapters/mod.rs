//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to                |
//! |------------|-----------------|----------------------------|
//! | `hardware` | SensorPort      | ESP32 ADC, GPIO            |
//! |            | ActuatorPort    | ESP32 GPIO, LEDC PWM       |
//! | `log_sink` | EventSink       | Serial log output          |
//! | `mqtt`     | PublisherPort   | MQTT broker session        |
//! | `nvs`      | ConfigPort      | NVS / in-memory store      |
//! | `time`     | (clock source)  | ESP32 system timer         |

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod nvs;
pub mod time;
