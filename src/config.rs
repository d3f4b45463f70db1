use core::fmt;
use heapless::String;
use log::{info, warn};

use crate::constants::{MQTT_PORT_PLAINTEXT, PLACEHOLDER, TOPIC_MAX, URL_MAX};
use crate::endpoint;
use crate::validate::{self, Key};

// Fields follow cfg.toml order, as does `entries()`
pub struct Config {
    // Node identifier (used as MQTT client id and in backend routes)
    pub node_id: &'static str,

    // Token the node presents to the backend to authenticate
    pub node_secret_token: &'static str,

    // Wi-Fi SSID to connect to
    pub wifi_ssid: &'static str,

    // Wi-Fi pre-shared key (password)
    pub wifi_password: &'static str,

    // MQTT broker hostname or IP address
    pub mqtt_server: &'static str,

    // MQTT port (usually 1883, or 8883 for TLS)
    pub mqtt_port: u16,

    // MQTT username for authentication
    pub mqtt_username: &'static str,

    // MQTT password for authentication
    pub mqtt_password: &'static str,

    // Backend HTTP API root, e.g. http://172.20.10.2:5000/api
    pub api_base_url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MqttTransport {
    Plain,
    Tls,
}

impl Config {
    /// String-valued keys with their values, in field order (`mqtt_port` excluded).
    pub fn entries(&self) -> [(Key, &'static str); 8] {
        [
            (Key::NodeId, self.node_id),
            (Key::NodeSecretToken, self.node_secret_token),
            (Key::WifiSsid, self.wifi_ssid),
            (Key::WifiPassword, self.wifi_password),
            (Key::MqttServer, self.mqtt_server),
            (Key::MqttUsername, self.mqtt_username),
            (Key::MqttPassword, self.mqtt_password),
            (Key::ApiBaseUrl, self.api_base_url),
        ]
    }

    /// Returns the first problem found, placeholders included.
    pub fn validate(&self) -> Result<(), validate::Error> {
        for (key, value) in self.entries() {
            validate::check(key, value)?;
        }
        validate::check_port(self.mqtt_port.into())?;

        Ok(())
    }

    pub fn placeholders(&self) -> impl Iterator<Item = Key> {
        self.entries()
            .into_iter()
            .filter(|(_, value)| validate::is_placeholder(value))
            .map(|(key, _)| key)
    }

    pub fn is_deployable(&self) -> bool {
        self.validate().is_ok()
    }

    // Any port other than the plaintext convention is assumed to be TLS
    pub fn mqtt_transport(&self) -> MqttTransport {
        if self.mqtt_port == MQTT_PORT_PLAINTEXT {
            MqttTransport::Plain
        } else {
            MqttTransport::Tls
        }
    }

    pub fn mqtt_client_id(&self) -> &'static str {
        self.node_id
    }

    pub fn api_url(&self, path: &str) -> Result<String<URL_MAX>, endpoint::Error> {
        endpoint::join_url(self.api_base_url, path)
    }

    pub fn node_url(&self) -> Result<String<URL_MAX>, endpoint::Error> {
        endpoint::node_url(self.api_base_url, self.node_id)
    }

    pub fn node_topic(&self) -> Result<String<TOPIC_MAX>, endpoint::Error> {
        endpoint::node_topic(self.node_id)
    }

    pub fn log_summary(&self) {
        for (key, value) in self.entries() {
            info!("{} = {}", key, Shown { key, value });
        }
        info!(
            "{} = {} ({:?})",
            Key::MqttPort,
            self.mqtt_port,
            self.mqtt_transport()
        );

        let pending = self.placeholders().count();
        if pending > 0 {
            warn!(
                "{} value(s) still set to \"{}\", copy cfg.toml.example to cfg.toml and fill it in",
                pending, PLACEHOLDER
            );
        }
    }
}

/// Display form of a value: placeholders are flagged, secrets are masked.
struct Shown {
    key: Key,
    value: &'static str,
}

impl fmt::Display for Shown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if validate::is_placeholder(self.value) {
            f.write_str("<unset>")
        } else if self.key.is_secret() {
            f.write_str("********")
        } else {
            write!(f, "{:?}", self.value)
        }
    }
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));
