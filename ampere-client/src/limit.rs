use std::time::Duration;

use crate::error::{Error, Result};
use crate::timer::TimerHandle;

/// Accepts a strictly positive whole number of minutes.
pub fn parse_minutes(input: &str) -> Result<u64> {
    match input.trim().parse::<u64>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(Error::InvalidLimit(input.to_string())),
    }
}

pub fn limit_delay(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

/// The single pending usage deadline, if any.
#[derive(Debug, Default)]
pub struct UsageLimit {
    deadline: Option<TimerHandle>,
}

impl UsageLimit {
    /// Replaces the pending deadline; the old one never fires.
    pub fn arm(&mut self, deadline: TimerHandle) {
        self.deadline = Some(deadline);
    }

    /// Consumes the deadline when `generation` is the armed one.
    pub fn fire(&mut self, generation: u64) -> bool {
        let current = self
            .deadline
            .as_ref()
            .is_some_and(|deadline| deadline.is_current(generation));
        if current {
            self.deadline = None;
        }
        current
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}
