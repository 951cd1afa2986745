use std::sync::LazyLock;

use ampere_api::models::Channel;
use regex::Regex;

use crate::configs::MatcherKind;

static CURRENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Current(\d+) \(Amps\): ([0-9.]+)").expect("current pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Voltage,
    Current,
}

/// One field update for one channel, value kept as the bridge sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub channel: Channel,
    pub field: Field,
    pub value: String,
}

pub trait LineMatcher: Send + Sync {
    /// Every reading the line carries, empty when the line is not recognised.
    fn match_line(&self, line: &str) -> Vec<Reading>;
}

/// `voltage1: 229.8`, `Current2 : 0.41`
pub struct KeyValueMatcher;

impl LineMatcher for KeyValueMatcher {
    fn match_line(&self, line: &str) -> Vec<Reading> {
        let parts: Vec<&str> = line.split(':').collect();
        let [key, value] = parts.as_slice() else {
            return Vec::new();
        };

        let (channel, field) = match key.trim().to_lowercase().as_str() {
            "voltage1" => (Channel::One, Field::Voltage),
            "voltage2" => (Channel::Two, Field::Voltage),
            "current1" => (Channel::One, Field::Current),
            "current2" => (Channel::Two, Field::Current),
            _ => return Vec::new(),
        };

        vec![Reading {
            channel,
            field,
            value: value.trim().to_string(),
        }]
    }
}

/// Free text such as `Sensor Current1 (Amps): 0.52 Current2 (Amps): 0.1`.
pub struct PatternMatcher;

impl LineMatcher for PatternMatcher {
    fn match_line(&self, line: &str) -> Vec<Reading> {
        if !line.contains("Current") {
            return Vec::new();
        }

        CURRENT_PATTERN
            .captures_iter(line)
            .filter_map(|captures| {
                // unknown channel numbers are skipped, the rest of the line still counts
                let channel = captures[1].parse::<u8>().ok().and_then(|n| Channel::try_from(n).ok())?;

                Some(Reading {
                    channel,
                    field: Field::Current,
                    value: captures[2].to_string(),
                })
            })
            .collect()
    }
}

/// Routes every line through exactly one matcher, tried in declared priority.
pub struct TelemetryParser {
    matchers: Vec<Box<dyn LineMatcher>>,
}

impl TelemetryParser {
    pub fn new(priority: &[MatcherKind]) -> Self {
        let matchers = priority
            .iter()
            .map(|kind| -> Box<dyn LineMatcher> {
                match kind {
                    MatcherKind::KeyValue => Box::new(KeyValueMatcher),
                    MatcherKind::Pattern => Box::new(PatternMatcher),
                }
            })
            .collect();

        Self { matchers }
    }

    /// Readings from the first matcher that recognises `line`.
    pub fn parse(&self, line: &str) -> Vec<Reading> {
        self.matchers
            .iter()
            .map(|matcher| matcher.match_line(line))
            .find(|readings| !readings.is_empty())
            .unwrap_or_default()
    }
}

impl Default for TelemetryParser {
    fn default() -> Self {
        Self::new(&[MatcherKind::KeyValue, MatcherKind::Pattern])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(channel: Channel, field: Field, value: &str) -> Reading {
        Reading {
            channel,
            field,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_key_value_lines() {
        let parser = TelemetryParser::default();

        assert_eq!(parser.parse("voltage1: 12"), vec![reading(Channel::One, Field::Voltage, "12")]);
        assert_eq!(parser.parse(" Voltage2 :230.1 "), vec![reading(Channel::Two, Field::Voltage, "230.1")]);
        assert_eq!(parser.parse("current1: 3"), vec![reading(Channel::One, Field::Current, "3")]);
        assert_eq!(parser.parse("CURRENT2: 0.4"), vec![reading(Channel::Two, Field::Current, "0.4")]);
    }

    #[test]
    fn test_ignores_unknown_and_malformed_lines() {
        let parser = TelemetryParser::default();

        for line in ["temperature1: 40", "voltage3: 12", "voltage1 12", "voltage1: 12: 13", ""] {
            assert!(parser.parse(line).is_empty(), "{line}");
        }
    }

    #[test]
    fn test_only_exact_keys_are_accepted() {
        let parser = TelemetryParser::default();

        for line in ["voltage01: 12", "current+1: 3", "current002: 1", "voltage: 5"] {
            assert!(parser.parse(line).is_empty(), "{line}");
        }
    }

    #[test]
    fn test_free_text_current() {
        let parser = TelemetryParser::default();

        assert_eq!(
            parser.parse("Current1 (Amps): 0.52"),
            vec![reading(Channel::One, Field::Current, "0.52")]
        );
        assert_eq!(
            parser.parse("ADC 1873 | Current2 (Amps): 1.25 | ok"),
            vec![reading(Channel::Two, Field::Current, "1.25")]
        );
        assert!(parser.parse("Current1 (Amps): n/a").is_empty());
    }

    #[test]
    fn test_free_text_line_with_both_channels() {
        let parser = TelemetryParser::default();

        assert_eq!(parser.parse("Current1 (Amps): 0.5 Current2 (Amps): 0.7"), vec![
            reading(Channel::One, Field::Current, "0.5"),
            reading(Channel::Two, Field::Current, "0.7"),
        ]);
    }

    #[test]
    fn test_unknown_channel_does_not_hide_later_reading() {
        let parser = TelemetryParser::default();

        assert_eq!(
            parser.parse("Current3 (Amps): 9 Current1 (Amps): 0.5"),
            vec![reading(Channel::One, Field::Current, "0.5")]
        );
    }

    #[test]
    fn test_line_is_dispatched_to_one_matcher() {
        let key_value_first = TelemetryParser::new(&[MatcherKind::KeyValue, MatcherKind::Pattern]);
        let pattern_first = TelemetryParser::new(&[MatcherKind::Pattern, MatcherKind::KeyValue]);

        // two colons, so only the pattern recognises it
        assert_eq!(
            key_value_first.parse("current1: Current1 (Amps): 2"),
            vec![reading(Channel::One, Field::Current, "2")]
        );

        let line = "Current2 (Amps): 1.5";
        assert_eq!(pattern_first.parse(line), vec![reading(Channel::Two, Field::Current, "1.5")]);
        assert_eq!(key_value_first.parse(line), vec![reading(Channel::Two, Field::Current, "1.5")]);
    }

    #[test]
    fn test_disabled_matcher_is_not_used() {
        let parser = TelemetryParser::new(&[MatcherKind::KeyValue]);

        assert!(parser.parse("Current1 (Amps): 0.52").is_empty());
        assert_eq!(parser.parse("current1: 0.52"), vec![reading(Channel::One, Field::Current, "0.52")]);
    }
}
