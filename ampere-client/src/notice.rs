use core::fmt;

use ampere_api::models::Channel;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Something the user should see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Notice {
    BridgeUnavailable { reason: String },
    BillStored { channel: Channel, message: String },
    BillFailed { channel: Channel, reason: String },
    InvalidLimit { input: String },
    OverPowerUsage,
}

impl Notice {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Notice::BillStored { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::BridgeUnavailable { reason } => write!(f, "Bridge unavailable: {reason}"),
            Notice::BillStored { message, .. } => write!(f, "{message}"),
            Notice::BillFailed { channel, reason } => write!(f, "Error storing {channel} bill: {reason}"),
            Notice::InvalidLimit { input } => {
                write!(f, "Invalid input `{input}`: please enter a valid number of minutes")
            }
            Notice::OverPowerUsage => write!(f, "Over Power Usage"),
        }
    }
}

/// Fans notices out to every subscriber and the log.
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notice>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    pub fn publish(&self, notice: Notice) {
        if notice.is_failure() {
            tracing::warn!("{}", notice);
        } else {
            tracing::info!("{}", notice);
        }

        // nobody listening is fine, the log still has it
        let _ = self.sender.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        let failed = Notice::BillFailed {
            channel: Channel::Two,
            reason: String::from("connection refused"),
        };

        assert_eq!(failed.to_string(), "Error storing Device 2 bill: connection refused");
        assert_eq!(Notice::OverPowerUsage.to_string(), "Over Power Usage");
    }

    #[test]
    fn test_notice_json_is_tagged() {
        let value = serde_json::to_value(Notice::InvalidLimit { input: String::from("abc") }).unwrap();

        assert_eq!(value["kind"], "invalidLimit");
        assert_eq!(value["input"], "abc");
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_notices() {
        let notifier = Notifier::new(8);
        let mut receiver = notifier.subscribe();

        notifier.publish(Notice::OverPowerUsage);

        assert_eq!(receiver.recv().await.unwrap(), Notice::OverPowerUsage);
    }
}
