use std::{
    env,
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

#[allow(dead_code)]
#[path = "src/constants.rs"]
mod constants;
#[allow(dead_code)]
#[path = "src/validate.rs"]
mod validate;

use constants::{CONFIG_ENV, CONFIG_FILE, TEMPLATE_FILE};
use validate::{Key, Source};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    node_id: String,
    node_secret_token: String,
    wifi_ssid: String,
    wifi_password: String,
    mqtt_server: String,
    mqtt_port: i64,
    mqtt_username: String,
    mqtt_password: String,
    api_base_url: String,
}

impl RawConfig {
    fn entries(&self) -> [(Key, &str); 8] {
        [
            (Key::NodeId, self.node_id.as_str()),
            (Key::NodeSecretToken, self.node_secret_token.as_str()),
            (Key::WifiSsid, self.wifi_ssid.as_str()),
            (Key::WifiPassword, self.wifi_password.as_str()),
            (Key::MqttServer, self.mqtt_server.as_str()),
            (Key::MqttUsername, self.mqtt_username.as_str()),
            (Key::MqttPassword, self.mqtt_password.as_str()),
            (Key::ApiBaseUrl, self.api_base_url.as_str()),
        ]
    }
}

fn config_path(manifest_dir: &Path) -> PathBuf {
    let override_path = env::var(CONFIG_ENV).ok();
    let per_device_exists = manifest_dir.join(CONFIG_FILE).exists();

    let source = Source::select(override_path.as_deref(), per_device_exists);
    if source == Source::Template {
        println!(
            "cargo:warning={} not found, building with {}",
            CONFIG_FILE, TEMPLATE_FILE
        );
    }
    manifest_dir.join(source.file_name())
}

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let path = config_path(&manifest_dir);

    // Tell Cargo to rerun if the config or its selection changes
    println!("cargo:rerun-if-env-changed={}", CONFIG_ENV);
    println!("cargo:rerun-if-changed={}", manifest_dir.join(CONFIG_FILE).display());
    println!("cargo:rerun-if-changed={}", path.display());

    // Read and parse
    let toml_str = fs::read_to_string(&path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let raw: RawConfig = toml::from_str(&toml_str)
        .map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;

    // Validate
    let strict = env::var_os("CARGO_FEATURE_STRICT").is_some();
    let mut placeholders = Vec::new();
    for (key, value) in raw.entries() {
        match validate::check(key, value) {
            Ok(()) => {}
            Err(e) if e.is_placeholder() => placeholders.push(key),
            Err(e) => return Err(format!("{}: {}", path.display(), e).into()),
        }
    }
    let port = validate::check_port(raw.mqtt_port)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    let pending = placeholders
        .iter()
        .map(|key| key.name())
        .collect::<Vec<_>>()
        .join(", ");
    let warn = validate::placeholder_policy(&placeholders, strict).map_err(|e| {
        format!(
            "{}: {} (pending: {})",
            path.display(),
            e,
            pending
        )
    })?;
    if warn {
        println!(
            "cargo:warning=placeholder values left in {}: {}",
            path.display(),
            pending
        );
    }

    // Generate Rust code
    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");
    let code = format!(
        r#"
        pub const CONFIG: Config = Config {{
            node_id: {id:?},
            node_secret_token: {token:?},
            wifi_ssid: {ssid:?},
            wifi_password: {psk:?},
            mqtt_server: {ms:?},
            mqtt_port: {mp},
            mqtt_username: {mu:?},
            mqtt_password: {mpw:?},
            api_base_url: {api:?},
        }};
    "#,
        id = raw.node_id,
        token = raw.node_secret_token,
        ssid = raw.wifi_ssid,
        psk = raw.wifi_password,
        ms = raw.mqtt_server,
        mp = port,
        mu = raw.mqtt_username,
        mpw = raw.mqtt_password,
        api = raw.api_base_url,
    );

    fs::write(dest_path, code)?;
    Ok(())
}
