use serde::{Deserialize, Serialize};

use super::Channel;

/// Point-in-time view of one channel for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelReading {
    pub channel: Channel,
    /// Last reported voltage, `"0"` until the first report
    pub voltage: String,
    /// Most recent current sample, `"0"` when the history is empty
    pub current: String,
    /// Last issued power command
    pub is_on: bool,
    /// Cumulative energy in Wh
    pub power_used: f64,
    /// Cumulative cost rounded to 4 decimals
    pub price: f64,
}

impl ChannelReading {
    pub fn idle(channel: Channel) -> Self {
        Self {
            channel,
            voltage: String::from("0"),
            current: String::from("0"),
            is_on: false,
            power_used: 0.0,
            price: 0.0,
        }
    }
}
