use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// A running timer task. Dropping the handle cancels the timer.
#[derive(Debug)]
pub struct TimerHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Posts `event(generation)` every `period`, first one `period` after start.
    pub fn periodic<E, F>(generation: u64, period: Duration, events: UnboundedSender<E>, event: F) -> Self
    where
        E: Send + 'static,
        F: Fn(u64) -> E + Send + 'static,
    {
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                if events.send(event(generation)).is_err() {
                    break;
                }
            }
        });

        Self { generation, task }
    }

    /// Posts `event(generation)` once after `delay`.
    pub fn deadline<E, F>(generation: u64, delay: Duration, events: UnboundedSender<E>, event: F) -> Self
    where
        E: Send + 'static,
        F: FnOnce(u64) -> E + Send + 'static,
    {
        let task = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = events.send(event(generation));
        });

        Self { generation, task }
    }

    /// Whether an event stamped with `generation` came from this timer.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
