//! Per-device build configuration for an IoT node.
//!
//! Values are read from `cfg.toml` by the build script and exposed as
//! [`CONFIG`]. Copy `cfg.toml.example` to `cfg.toml` and replace every
//! `"change-me"` before flashing a device.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod constants;
pub mod endpoint;
pub mod validate;

pub use config::{Config, MqttTransport, CONFIG};
