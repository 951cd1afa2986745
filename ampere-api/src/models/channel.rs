use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the two independently switched devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Channel {
    /// Device 1
    One,
    /// Device 2
    Two,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::One, Channel::Two];

    pub fn number(self) -> u8 {
        match self {
            Channel::One => 1,
            Channel::Two => 2,
        }
    }

    /// Path segment used by the billing gateway, e.g. `device1`.
    pub fn device_name(self) -> String {
        format!("device{}", self.number())
    }

    pub fn bill_path(self) -> String {
        format!("/bill/{}", self.device_name())
    }

    pub fn monthly_path(self) -> String {
        format!("/bill/{}/monthly", self.device_name())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Device {}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChannel(pub String);

impl fmt::Display for UnknownChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown channel: {}", self.0)
    }
}

impl std::error::Error for UnknownChannel {}

impl TryFrom<u8> for Channel {
    type Error = UnknownChannel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Channel::One),
            2 => Ok(Channel::Two),
            other => Err(UnknownChannel(other.to_string())),
        }
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> Self {
        channel.number()
    }
}

impl FromStr for Channel {
    type Err = UnknownChannel;

    /// Accepts `1`, `2`, `device1` and `device2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed
            .strip_prefix("device")
            .unwrap_or(trimmed)
            .parse::<u8>()
            .map_err(|_| UnknownChannel(s.to_string()))?;

        Channel::try_from(number).map_err(|_| UnknownChannel(s.to_string()))
    }
}
