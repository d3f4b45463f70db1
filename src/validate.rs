//! Structural checks on configuration values.
//!
//! Compiled twice: into the library, and into `build.rs` so a bad `cfg.toml`
//! fails the build before any firmware gets flashed.

use core::fmt;

use crate::constants::{
    API_BASE_URL_MAX, CONFIG_FILE, NODE_ID_MAX, PLACEHOLDER, TEMPLATE_FILE, VALUE_MAX,
    WIFI_PASSWORD_MAX, WIFI_SSID_MAX,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    NodeId,
    NodeSecretToken,
    WifiSsid,
    WifiPassword,
    MqttServer,
    MqttPort,
    MqttUsername,
    MqttPassword,
    ApiBaseUrl,
}

impl Key {
    /// Name of the key in `cfg.toml`
    pub fn name(self) -> &'static str {
        match self {
            Key::NodeId => "node_id",
            Key::NodeSecretToken => "node_secret_token",
            Key::WifiSsid => "wifi_ssid",
            Key::WifiPassword => "wifi_password",
            Key::MqttServer => "mqtt_server",
            Key::MqttPort => "mqtt_port",
            Key::MqttUsername => "mqtt_username",
            Key::MqttPassword => "mqtt_password",
            Key::ApiBaseUrl => "api_base_url",
        }
    }

    /// Secret values are never logged or echoed in build errors.
    pub fn is_secret(self) -> bool {
        matches!(
            self,
            Key::NodeSecretToken | Key::WifiPassword | Key::MqttPassword
        )
    }

    pub fn max_len(self) -> usize {
        match self {
            Key::NodeId => NODE_ID_MAX,
            Key::WifiSsid => WIFI_SSID_MAX,
            Key::WifiPassword => WIFI_PASSWORD_MAX,
            Key::ApiBaseUrl => API_BASE_URL_MAX,
            _ => VALUE_MAX,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Empty(Key),
    Placeholder(Key),
    TooLong { key: Key, max: usize },
    InvalidNodeId,
    InvalidPort(i64),
    InvalidUrlScheme,
}

impl Error {
    pub fn key(&self) -> Key {
        match *self {
            Error::Empty(key) | Error::Placeholder(key) | Error::TooLong { key, .. } => key,
            Error::InvalidNodeId => Key::NodeId,
            Error::InvalidPort(_) => Key::MqttPort,
            Error::InvalidUrlScheme => Key::ApiBaseUrl,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Error::Placeholder(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Empty(key) => write!(f, "`{}` is empty", key),
            Error::Placeholder(key) => {
                write!(f, "`{}` is still set to \"{}\"", key, PLACEHOLDER)
            }
            Error::TooLong { key, max } => write!(f, "`{}` exceeds {} bytes", key, max),
            Error::InvalidNodeId => {
                f.write_str("`node_id` may only contain ASCII letters, digits, '_' and '-'")
            }
            Error::InvalidPort(port) => {
                write!(f, "`mqtt_port` {} is outside 1..=65535", port)
            }
            Error::InvalidUrlScheme => {
                f.write_str("`api_base_url` must start with http:// or https://")
            }
        }
    }
}

pub fn is_placeholder(value: &str) -> bool {
    value.trim() == PLACEHOLDER
}

/// Checks a string value: emptiness first, then placeholder, length and
/// the per-key format (node id characters, API base URL scheme).
pub fn check(key: Key, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::Empty(key));
    }

    if is_placeholder(value) {
        return Err(Error::Placeholder(key));
    }

    let max = key.max_len();
    if value.len() > max {
        return Err(Error::TooLong { key, max });
    }

    // node_id ends up in MQTT topics, URL paths and the DHCP hostname
    if key == Key::NodeId && !value.bytes().all(is_node_id_byte) {
        return Err(Error::InvalidNodeId);
    }

    if key == Key::ApiBaseUrl && !has_http_scheme(value) {
        return Err(Error::InvalidUrlScheme);
    }

    Ok(())
}

pub fn check_port(raw: i64) -> Result<u16, Error> {
    match u16::try_from(raw) {
        Ok(0) | Err(_) => Err(Error::InvalidPort(raw)),
        Ok(port) => Ok(port),
    }
}

/// Placeholders left in the configuration: tolerated with a warning, or an
/// error under `strict`. Returns whether a warning is due.
pub fn placeholder_policy(pending: &[Key], strict: bool) -> Result<bool, Error> {
    match pending.first() {
        None => Ok(false),
        Some(&key) if strict => Err(Error::Placeholder(key)),
        Some(_) => Ok(true),
    }
}

/// Where the build reads its configuration from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    Override(&'a str),
    PerDevice,
    Template,
}

impl<'a> Source<'a> {
    pub fn select(override_path: Option<&'a str>, per_device_exists: bool) -> Self {
        match override_path {
            Some(path) => Source::Override(path),
            None if per_device_exists => Source::PerDevice,
            None => Source::Template,
        }
    }

    pub fn file_name(&self) -> &'a str {
        match *self {
            Source::Override(path) => path,
            Source::PerDevice => CONFIG_FILE,
            Source::Template => TEMPLATE_FILE,
        }
    }
}

fn is_node_id_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn has_http_scheme(url: &str) -> bool {
    let url = url.trim();
    ["http://", "https://"].iter().any(|scheme| {
        url.len() > scheme.len()
            && url.as_bytes()[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_wins_over_everything() {
        assert_eq!(check(Key::WifiSsid, ""), Err(Error::Empty(Key::WifiSsid)));
        assert_eq!(check(Key::ApiBaseUrl, "   "), Err(Error::Empty(Key::ApiBaseUrl)));
    }

    #[test]
    fn placeholder_is_detected_before_url_scheme() {
        assert_eq!(
            check(Key::ApiBaseUrl, "change-me"),
            Err(Error::Placeholder(Key::ApiBaseUrl))
        );
        assert!(is_placeholder(" change-me\n"));
        assert!(!is_placeholder("change-me-too"));
    }

    #[test]
    fn ssid_longer_than_32_bytes_is_rejected() {
        let ssid = "a".repeat(33);
        assert_eq!(
            check(Key::WifiSsid, &ssid),
            Err(Error::TooLong {
                key: Key::WifiSsid,
                max: 32
            })
        );
        assert!(check(Key::WifiSsid, &ssid[..32]).is_ok());
    }

    #[test]
    fn api_base_url_needs_http_scheme() {
        assert!(check(Key::ApiBaseUrl, "http://172.20.10.2:5000/api").is_ok());
        assert!(check(Key::ApiBaseUrl, "HTTPS://backend.example.org/api").is_ok());
        assert_eq!(
            check(Key::ApiBaseUrl, "172.20.10.2:5000/api"),
            Err(Error::InvalidUrlScheme)
        );
        assert_eq!(check(Key::ApiBaseUrl, "http://"), Err(Error::InvalidUrlScheme));
    }

    #[test]
    fn node_id_is_restricted_to_hostname_safe_ascii() {
        assert!(check(Key::NodeId, "node_0").is_ok());
        assert!(check(Key::NodeId, "Lab-Node-12").is_ok());
        for bad in ["a/#", "a+", "a#", "node 0", "nodé"] {
            assert_eq!(check(Key::NodeId, bad), Err(Error::InvalidNodeId), "{bad}");
        }
    }

    #[test]
    fn api_base_url_leaves_room_for_node_route() {
        let base = format!("http://{}", "a".repeat(API_BASE_URL_MAX - 7));
        assert!(check(Key::ApiBaseUrl, &base).is_ok());
        let longer = format!("{}a", base);
        assert_eq!(
            check(Key::ApiBaseUrl, &longer),
            Err(Error::TooLong {
                key: Key::ApiBaseUrl,
                max: API_BASE_URL_MAX
            })
        );
    }

    #[test]
    fn placeholders_warn_unless_strict() {
        assert_eq!(placeholder_policy(&[], false), Ok(false));
        assert_eq!(placeholder_policy(&[], true), Ok(false));
        assert_eq!(placeholder_policy(&[Key::WifiSsid, Key::MqttServer], false), Ok(true));
        assert_eq!(
            placeholder_policy(&[Key::WifiSsid, Key::MqttServer], true),
            Err(Error::Placeholder(Key::WifiSsid))
        );
    }

    #[test]
    fn source_selection() {
        assert_eq!(Source::select(Some("devices/n7.toml"), true), Source::Override("devices/n7.toml"));
        assert_eq!(Source::select(Some("devices/n7.toml"), false).file_name(), "devices/n7.toml");
        assert_eq!(Source::select(None, true).file_name(), "cfg.toml");
        assert_eq!(Source::select(None, false), Source::Template);
        assert_eq!(Source::Template.file_name(), "cfg.toml.example");
    }

    #[test]
    fn port_range() {
        assert_eq!(check_port(1883), Ok(1883));
        assert_eq!(check_port(1), Ok(1));
        assert_eq!(check_port(65535), Ok(65535));
        assert_eq!(check_port(0), Err(Error::InvalidPort(0)));
        assert_eq!(check_port(65536), Err(Error::InvalidPort(65536)));
        assert_eq!(check_port(-1), Err(Error::InvalidPort(-1)));
    }

    #[test]
    fn secrets() {
        assert!(Key::NodeSecretToken.is_secret());
        assert!(Key::WifiPassword.is_secret());
        assert!(Key::MqttPassword.is_secret());
        assert!(!Key::MqttUsername.is_secret());
        assert!(!Key::NodeId.is_secret());
    }

    #[test]
    fn error_messages_name_the_key() {
        let msg = Error::Placeholder(Key::MqttServer).to_string();
        assert_eq!(msg, "`mqtt_server` is still set to \"change-me\"");
        assert_eq!(Error::InvalidPort(0).key(), Key::MqttPort);
    }
}
