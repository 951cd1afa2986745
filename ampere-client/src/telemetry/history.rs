use std::collections::VecDeque;

/// Recent current samples of one channel, kept as reported.
///
/// Holds at most `capacity` entries; appending to a full history drops the
/// oldest sample first. Samples stay strings so that a malformed report only
/// affects the average, never the history itself.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    buffer: VecDeque<String>,
    capacity: usize,
}

impl SampleHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, value: impl Into<String>) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value.into());
    }

    /// Mean of every sample that parses as a finite number, `0` when none does.
    pub fn average(&self) -> f64 {
        let (sum, count) = self
            .buffer
            .iter()
            .filter_map(|sample| sample.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

        if count == 0 { 0.0 } else { sum / count as f64 }
    }

    pub fn latest(&self) -> Option<&str> {
        self.buffer.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.buffer.iter().map(String::as_str)
    }
}
