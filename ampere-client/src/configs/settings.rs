use std::env;

use ampere_api::models::Channel;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

/// Local HTTP surface a UI talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Control {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bridge {
    /// Serial port to open; discovered from the available ports when absent
    pub port_path: Option<String>,
    /// Matched against port names and USB product strings during discovery
    #[serde(default = "default_device_name")]
    pub device_name: Option<String>,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Billing {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Totals keep growing for the whole session, the gateway replaces the session record
    #[default]
    Accumulate,
    /// Totals drop by the submitted amount once the gateway accepts a bill
    ResetOnSubmit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tariff {
    #[serde(default = "default_rate_per_kwh")]
    pub rate_per_kwh: f64,
    #[serde(default)]
    pub reset_policy: ResetPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    /// `current1: 0.52`
    KeyValue,
    /// `Current1 (Amps): 0.52`
    Pattern,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Telemetry {
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// Matchers tried in order, the first one that recognises a line wins
    #[serde(default = "default_priority")]
    pub priority: Vec<MatcherKind>,
}

/// Command tokens the bridge firmware expects for one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCommands {
    pub channel: Channel,
    pub on: String,
    pub off: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logger: Logger,
    pub control: Control,
    pub bridge: Bridge,
    pub billing: Billing,
    #[serde(default)]
    pub tariff: Tariff,
    #[serde(default)]
    pub telemetry: Telemetry,
    #[serde(default)]
    pub channels: Vec<ChannelCommands>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("AMPERE").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            rate_per_kwh: default_rate_per_kwh(),
            reset_policy: ResetPolicy::default(),
        }
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            priority: default_priority(),
        }
    }
}

fn default_device_name() -> Option<String> {
    Some(String::from("ESP32test"))
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_read_timeout_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_rate_per_kwh() -> f64 {
    8.0
}

fn default_max_history() -> usize {
    5000
}

fn default_priority() -> Vec<MatcherKind> {
    vec![MatcherKind::KeyValue, MatcherKind::Pattern]
}
