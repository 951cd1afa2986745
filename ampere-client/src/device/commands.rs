use std::collections::BTreeMap;

use ampere_api::models::Channel;

use crate::configs::ChannelCommands;

/// Power command tokens per channel, as the bridge firmware understands them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable {
    entries: BTreeMap<Channel, ChannelCommands>,
}

impl CommandTable {
    /// Starts from the stock firmware vocabulary and applies `overrides` on top.
    pub fn with_overrides(overrides: &[ChannelCommands]) -> Self {
        let mut table = Self::default();
        for entry in overrides {
            table.entries.insert(entry.channel, entry.clone());
        }
        table
    }

    pub fn token(&self, channel: Channel, on: bool) -> &str {
        match self.entries.get(&channel) {
            Some(entry) if on => &entry.on,
            Some(entry) => &entry.off,
            None => stock_token(channel, on),
        }
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        let entries = Channel::ALL
            .into_iter()
            .map(|channel| {
                let commands = ChannelCommands {
                    channel,
                    on: stock_token(channel, true).to_string(),
                    off: stock_token(channel, false).to_string(),
                };
                (channel, commands)
            })
            .collect();

        Self { entries }
    }
}

fn stock_token(channel: Channel, on: bool) -> &'static str {
    match (channel, on) {
        (Channel::One, true) => "on",
        (Channel::One, false) => "off",
        (Channel::Two, true) => "on1",
        (Channel::Two, false) => "off1",
    }
}
