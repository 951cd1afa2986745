mod history;
mod parser;

pub use history::SampleHistory;
pub use parser::{Field, KeyValueMatcher, LineMatcher, PatternMatcher, Reading, TelemetryParser};
