use ampere_api::models::{Channel, ChannelReading};
use tokio::sync::watch;

use crate::accounting::{EnergyMeter, MeterSnapshot, parse_voltage, round_price};
use crate::configs::{Tariff, Telemetry};
use crate::telemetry::{Field, Reading, SampleHistory};
use crate::timer::TimerHandle;

/// State of one switched device. Only the monitor loop mutates it; readers
/// get copies through [`DeviceChannel::subscribe`].
pub struct DeviceChannel {
    channel: Channel,
    voltage: String,
    history: SampleHistory,
    meter: EnergyMeter,
    is_on: bool,
    ticker: Option<TimerHandle>,
    readings: watch::Sender<ChannelReading>,
}

impl DeviceChannel {
    pub fn new(channel: Channel, telemetry: &Telemetry, tariff: &Tariff) -> Self {
        let (readings, _) = watch::channel(ChannelReading::idle(channel));

        Self {
            channel,
            voltage: String::from("0"),
            history: SampleHistory::new(telemetry.max_history),
            meter: EnergyMeter::new(tariff.rate_per_kwh, tariff.reset_policy),
            is_on: false,
            ticker: None,
            readings,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn history(&self) -> &SampleHistory {
        &self.history
    }

    pub fn meter(&self) -> &EnergyMeter {
        &self.meter
    }

    pub fn subscribe(&self) -> watch::Receiver<ChannelReading> {
        self.readings.subscribe()
    }

    pub fn apply(&mut self, reading: Reading) {
        match reading.field {
            Field::Voltage => self.voltage = reading.value,
            Field::Current => self.history.append(reading.value),
        }
        self.publish();
    }

    pub fn set_on(&mut self, on: bool) {
        self.is_on = on;
        self.publish();
    }

    /// Installs a new accumulation timer, cancelling the previous one.
    pub fn start_ticker(&mut self, ticker: TimerHandle) {
        self.ticker = Some(ticker);
    }

    pub fn stop_ticker(&mut self) {
        self.ticker = None;
    }

    /// Whether a tick stamped with `generation` belongs to the running timer.
    pub fn accepts_tick(&self, generation: u64) -> bool {
        self.ticker.as_ref().is_some_and(|ticker| ticker.is_current(generation))
    }

    /// One accumulation step: average current × voltage over one second.
    pub fn tick(&mut self) {
        let avg_amp = self.history.average();
        let voltage = parse_voltage(&self.voltage);
        let increment = self.meter.step(avg_amp, voltage);

        tracing::debug!(
            "{} - avg amp: {}, voltage: {}, increment: {}, power used: {}, price: {}",
            self.channel,
            avg_amp,
            voltage,
            increment,
            self.meter.energy_wh(),
            self.meter.price()
        );

        self.publish();
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        self.meter.snapshot()
    }

    pub fn settle(&mut self, billed: &MeterSnapshot) {
        self.meter.settle(billed);
        self.publish();
    }

    pub fn reading(&self) -> ChannelReading {
        ChannelReading {
            channel: self.channel,
            voltage: self.voltage.clone(),
            current: self.history.latest().unwrap_or("0").to_string(),
            is_on: self.is_on,
            power_used: self.meter.energy_wh(),
            price: round_price(self.meter.price()),
        }
    }

    fn publish(&self) {
        self.readings.send_replace(self.reading());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> DeviceChannel {
        DeviceChannel::new(Channel::One, &Telemetry::default(), &Tariff::default())
    }

    fn reading(field: Field, value: &str) -> Reading {
        Reading {
            channel: Channel::One,
            field,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_end_to_end_tick() {
        let mut channel = channel();
        let observer = channel.subscribe();

        channel.apply(reading(Field::Voltage, "12"));
        channel.apply(reading(Field::Current, "1"));
        channel.apply(reading(Field::Current, "3"));
        channel.tick();

        assert_eq!(channel.history().average(), 2.0);
        assert!((channel.meter().energy_wh() - 0.006667).abs() < 1e-6);
        assert!((channel.meter().price() - 0.0000533).abs() < 1e-7);

        let seen = observer.borrow().clone();
        assert_eq!(seen.voltage, "12");
        assert_eq!(seen.current, "3");
        assert_eq!(seen.price, 0.0001);
    }

    #[test]
    fn test_idle_reading_defaults() {
        let channel = channel();
        let reading = channel.reading();

        assert_eq!(reading.voltage, "0");
        assert_eq!(reading.current, "0");
        assert!(!reading.is_on);
        assert_eq!(reading.power_used, 0.0);
    }

    #[test]
    fn test_tick_without_voltage_adds_nothing() {
        let mut channel = channel();

        channel.apply(reading(Field::Current, "5"));
        channel.tick();

        assert_eq!(channel.meter().energy_wh(), 0.0);
    }
}
