/// Current crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Value shipped in the template for every field that must be filled in
pub const PLACEHOLDER: &str = "change-me";

/// Node identifier shipped in the template
pub const DEFAULT_NODE_ID: &str = "node_0";

/// Conventional MQTT port without TLS
pub const MQTT_PORT_PLAINTEXT: u16 = 1883;
/// Conventional MQTT port over TLS
pub const MQTT_PORT_TLS: u16 = 8883;

/// Maximum node identifier length (also used as DHCP hostname and MQTT client id)
pub const NODE_ID_MAX: usize = 32;
/// Maximum SSID length allowed by 802.11
pub const WIFI_SSID_MAX: usize = 32;
/// Maximum WPA passphrase length
pub const WIFI_PASSWORD_MAX: usize = 64;
/// Maximum length of any other string value
pub const VALUE_MAX: usize = 128;

/// Capacity of derived backend URLs
pub const URL_MAX: usize = 128;
/// Route segment inserted between the API base URL and the node identifier
pub const NODE_ROUTE: &str = "/nodes/";
/// Maximum API base URL length, leaving room for the node route
pub const API_BASE_URL_MAX: usize = URL_MAX - NODE_ROUTE.len() - NODE_ID_MAX;
/// Capacity of derived MQTT topics
pub const TOPIC_MAX: usize = 64;

/// Per-device configuration file, kept out of version control
pub const CONFIG_FILE: &str = "cfg.toml";
/// Checked-in template used when no per-device file exists
pub const TEMPLATE_FILE: &str = "cfg.toml.example";
/// Environment variable pointing the build at another configuration file
pub const CONFIG_ENV: &str = "NODE_CFG";
