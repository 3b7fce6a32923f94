//! MQTT publisher adapter.
//!
//! Implements [`PublisherPort`] against the broker the pot reports to.
//! Topics are prefixed with the broker username so one broker can serve a
//! whole fleet of pots:
//!
//! | Topic                        | Direction | Payload                      |
//! |------------------------------|-----------|------------------------------|
//! | `<user>/publish/statistic`   | out       | mac, message id, moisture %, reservoir % |
//! | `<user>/publish/warning`     | out       | mac, message id, warning code |
//! | `<user>/publish/ping`        | out       | empty keep-alive             |
//! | `<user>/subscribe/config`    | in        | full `SystemConfig` as JSON  |
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps `EspMqttClient`; inbound config messages are parsed in
//! the connection callback and handed to the main loop via
//! [`take_pending_config`](MqttPublisher::take_pending_config).
//! On host/test: records outbound messages in memory and lets tests inject
//! inbound config.

#[cfg(target_os = "espidf")]
use log::{info, warn};
use serde::Serialize;

use crate::app::ports::{PublishError, PublisherPort};
use crate::config::SystemConfig;
use crate::control::threshold::WarningLevel;

pub const TOPIC_STATISTIC: &str = "/publish/statistic";
pub const TOPIC_WARNING: &str = "/publish/warning";
pub const TOPIC_PING: &str = "/publish/ping";
pub const TOPIC_CONFIG: &str = "/subscribe/config";
pub const TOPIC_WATER: &str = "/subscribe/water";

/// Longest `<username><topic suffix>` the adapter composes.
type Topic = heapless::String<64>;

// ───────────────────────────────────────────────────────────────
// Payloads
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct StatisticMessage<'a> {
    mac: &'a str,
    message_id: u32,
    moisture: u8,
    reservoir: u8,
}

#[derive(Debug, Serialize)]
struct WarningMessage<'a> {
    mac: &'a str,
    message_id: u32,
    warning: u8,
}

fn make_topic(username: &str, suffix: &str) -> Result<Topic, PublishError> {
    let mut topic = Topic::new();
    topic
        .push_str(username)
        .map_err(|()| PublishError::PayloadTooLarge)?;
    topic
        .push_str(suffix)
        .map_err(|()| PublishError::PayloadTooLarge)?;
    Ok(topic)
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

/// A message captured by the simulation backend.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

pub struct MqttPublisher {
    username: heapless::String<32>,
    device_mac: heapless::String<24>,
    statistic_counter: u32,
    warning_counter: u32,

    #[cfg(target_os = "espidf")]
    client: esp_idf_svc::mqtt::client::EspMqttClient<'static>,
    #[cfg(target_os = "espidf")]
    pending_config: std::sync::Arc<std::sync::Mutex<Option<SystemConfig>>>,

    #[cfg(not(target_os = "espidf"))]
    pub sent: Vec<RecordedMessage>,
    #[cfg(not(target_os = "espidf"))]
    pending_config: Option<SystemConfig>,
}

impl MqttPublisher {
    /// Connect to the broker and subscribe to the config topic.
    #[cfg(target_os = "espidf")]
    pub fn new(
        broker_url: &str,
        username: &str,
        password: &str,
        device_mac: &str,
    ) -> Result<Self, PublishError> {
        use esp_idf_svc::mqtt::client::{
            EspMqttClient, EspMqttEvent, EventPayload, MqttClientConfiguration,
        };

        let pending_config: std::sync::Arc<std::sync::Mutex<Option<SystemConfig>>> =
            std::sync::Arc::new(std::sync::Mutex::new(None));
        let pending = std::sync::Arc::clone(&pending_config);

        let conf = MqttClientConfiguration {
            client_id: Some(device_mac),
            username: Some(username),
            password: Some(password),
            ..Default::default()
        };

        let client = EspMqttClient::new_cb(broker_url, &conf, move |event: EspMqttEvent<'_>| {
            if let EventPayload::Received { topic, data, .. } = event.payload() {
                if topic.is_some_and(|t| t.ends_with(TOPIC_WATER)) {
                    crate::events::push_event(crate::events::Event::WaterRequested);
                    return;
                }
                match serde_json::from_slice::<SystemConfig>(data) {
                    Ok(cfg) => {
                        info!("mqtt: config update received");
                        *pending.lock().unwrap() = Some(cfg);
                        crate::events::push_event(crate::events::Event::ConfigReceived);
                    }
                    Err(e) => warn!("mqtt: ignoring malformed config message: {e}"),
                }
            }
        })
        .map_err(|_| PublishError::NotConnected)?;

        let mut publisher = Self {
            username: heapless::String::try_from(username)
                .map_err(|()| PublishError::PayloadTooLarge)?,
            device_mac: heapless::String::try_from(device_mac)
                .map_err(|()| PublishError::PayloadTooLarge)?,
            statistic_counter: 0,
            warning_counter: 0,
            client,
            pending_config,
        };

        for suffix in [TOPIC_CONFIG, TOPIC_WATER] {
            let topic = make_topic(&publisher.username, suffix)?;
            publisher
                .client
                .subscribe(&topic, esp_idf_svc::mqtt::client::QoS::AtLeastOnce)
                .map_err(|_| PublishError::NotConnected)?;
        }

        info!("mqtt: connected to {broker_url} as {username}");
        Ok(publisher)
    }

    /// Simulation backend: no broker, messages are recorded in memory.
    #[cfg(not(target_os = "espidf"))]
    pub fn new(username: &str, device_mac: &str) -> Result<Self, PublishError> {
        Ok(Self {
            username: heapless::String::try_from(username)
                .map_err(|()| PublishError::PayloadTooLarge)?,
            device_mac: heapless::String::try_from(device_mac)
                .map_err(|()| PublishError::PayloadTooLarge)?,
            statistic_counter: 0,
            warning_counter: 0,
            sent: Vec::new(),
            pending_config: None,
        })
    }

    /// Config pushed from the broker since the last call, if any.
    pub fn take_pending_config(&mut self) -> Option<SystemConfig> {
        #[cfg(target_os = "espidf")]
        {
            self.pending_config.lock().unwrap().take()
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.pending_config.take()
        }
    }

    /// Inject an inbound config message (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_push_config(&mut self, cfg: SystemConfig) {
        self.pending_config = Some(cfg);
    }

    fn publish(&mut self, suffix: &str, payload: &[u8]) -> Result<(), PublishError> {
        let topic = make_topic(&self.username, suffix)?;

        #[cfg(target_os = "espidf")]
        {
            self.client
                .publish(
                    &topic,
                    esp_idf_svc::mqtt::client::QoS::AtLeastOnce,
                    false,
                    payload,
                )
                .map(|_| ())
                .map_err(|_| PublishError::IoError)
        }

        #[cfg(not(target_os = "espidf"))]
        {
            self.sent.push(RecordedMessage {
                topic: topic.as_str().to_string(),
                payload: payload.to_vec(),
            });
            Ok(())
        }
    }
}

impl PublisherPort for MqttPublisher {
    fn publish_statistic(
        &mut self,
        moisture_percent: u8,
        reservoir_percent: u8,
    ) -> Result<(), PublishError> {
        let message = StatisticMessage {
            mac: self.device_mac.as_str(),
            message_id: self.statistic_counter,
            moisture: moisture_percent,
            reservoir: reservoir_percent,
        };
        let payload =
            serde_json::to_vec(&message).map_err(|_| PublishError::PayloadTooLarge)?;
        self.publish(TOPIC_STATISTIC, &payload)?;
        self.statistic_counter = self.statistic_counter.wrapping_add(1);
        Ok(())
    }

    fn publish_warning(&mut self, level: WarningLevel) -> Result<(), PublishError> {
        let message = WarningMessage {
            mac: self.device_mac.as_str(),
            message_id: self.warning_counter,
            warning: level.code(),
        };
        let payload =
            serde_json::to_vec(&message).map_err(|_| PublishError::PayloadTooLarge)?;
        self.publish(TOPIC_WARNING, &payload)?;
        self.warning_counter = self.warning_counter.wrapping_add(1);
        Ok(())
    }

    fn ping(&mut self) -> Result<(), PublishError> {
        self.publish(TOPIC_PING, &[])
    }
}
