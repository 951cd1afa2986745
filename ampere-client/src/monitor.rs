use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use ampere_api::models::{BillRequest, Channel, ChannelReading, MonthlyQuery, MonthlyUsage};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::accounting::{MeterSnapshot, SessionId};
use crate::configs::Settings;
use crate::device::{CommandTable, DeviceChannel};
use crate::error::{Error, Result};
use crate::limit::{UsageLimit, limit_delay, parse_minutes};
use crate::notice::{Notice, Notifier};
use crate::services::actuator_service::CommandSink;
use crate::services::billing_service::BillingGateway;
use crate::telemetry::TelemetryParser;
use crate::timer::TimerHandle;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const REQUEST_BUFFER: usize = 32;

/// Internal happenings posted back into the loop by timers and billing tasks.
#[derive(Debug)]
pub enum Event {
    Tick { channel: Channel, generation: u64 },
    LimitReached { generation: u64 },
    BillSettled { channel: Channel, billed: MeterSnapshot, outcome: Result<String> },
}

enum Request {
    Power {
        channel: Channel,
        on: bool,
        reply: oneshot::Sender<ChannelReading>,
    },
    ArmLimit {
        input: String,
        reply: oneshot::Sender<Result<u64>>,
    },
}

/// Owns both channels and applies every change in arrival order.
pub struct Monitor {
    channels: [DeviceChannel; 2],
    parser: TelemetryParser,
    commands: CommandTable,
    bridge: Option<Arc<dyn CommandSink>>,
    gateway: Arc<dyn BillingGateway>,
    session: SessionId,
    notifier: Notifier,
    limit: UsageLimit,
    generation: u64,
    events_tx: mpsc::UnboundedSender<Event>,
    events_rx: mpsc::UnboundedReceiver<Event>,
    requests: mpsc::Receiver<Request>,
}

/// Cloneable front door to a running [`Monitor`].
#[derive(Clone)]
pub struct MonitorHandle {
    requests: mpsc::Sender<Request>,
    readings: Arc<BTreeMap<Channel, watch::Receiver<ChannelReading>>>,
    gateway: Arc<dyn BillingGateway>,
    notifier: Notifier,
}

impl Monitor {
    pub fn new(
        settings: &Settings,
        session: SessionId,
        bridge: Option<Arc<dyn CommandSink>>,
        gateway: Arc<dyn BillingGateway>,
        notifier: Notifier,
    ) -> (Self, MonitorHandle) {
        let channels = Channel::ALL.map(|channel| DeviceChannel::new(channel, &settings.telemetry, &settings.tariff));

        let readings = channels
            .iter()
            .map(|device| (device.channel(), device.subscribe()))
            .collect();

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (requests_tx, requests) = mpsc::channel(REQUEST_BUFFER);

        let handle = MonitorHandle {
            requests: requests_tx,
            readings: Arc::new(readings),
            gateway: Arc::clone(&gateway),
            notifier: notifier.clone(),
        };

        let monitor = Self {
            channels,
            parser: TelemetryParser::new(&settings.telemetry.priority),
            commands: CommandTable::with_overrides(&settings.channels),
            bridge,
            gateway,
            session,
            notifier,
            limit: UsageLimit::default(),
            generation: 0,
            events_tx,
            events_rx,
            requests,
        };

        (monitor, handle)
    }

    /// Runs until every [`MonitorHandle`] is dropped.
    pub async fn run(mut self, mut telemetry: mpsc::Receiver<String>) {
        let mut telemetry_open = true;

        tracing::debug!("monitor started for {}", self.session);

        loop {
            tokio::select! {
                Some(event) = self.events_rx.recv() => self.handle_event(event),
                request = self.requests.recv() => match request {
                    Some(request) => self.handle_request(request).await,
                    None => break,
                },
                chunk = telemetry.recv(), if telemetry_open => match chunk {
                    Some(chunk) => self.ingest(&chunk),
                    None => {
                        tracing::debug!("telemetry source closed");
                        telemetry_open = false;
                    }
                },
            }
        }

        tracing::debug!("monitor stopped");
    }

    /// Feeds each line of a raw bridge chunk to the parser.
    pub fn ingest(&mut self, chunk: &str) {
        for line in chunk.split('\n') {
            let line = line.trim_end_matches('\r');
            for reading in self.parser.parse(line) {
                self.device_mut(reading.channel).apply(reading);
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Tick { channel, generation } => {
                let device = self.device_mut(channel);
                if device.is_on() && device.accepts_tick(generation) {
                    device.tick();
                }
            }
            Event::LimitReached { generation } => {
                if self.limit.fire(generation) {
                    self.notifier.publish(Notice::OverPowerUsage);
                }
            }
            Event::BillSettled { channel, billed, outcome } => match outcome {
                Ok(message) => {
                    self.device_mut(channel).settle(&billed);
                    self.notifier.publish(Notice::BillStored { channel, message });
                }
                Err(e) => self.notifier.publish(Notice::BillFailed {
                    channel,
                    reason: e.to_string(),
                }),
            },
        }
    }

    async fn handle_request(&mut self, request: Request) {
        match request {
            Request::Power { channel, on, reply } => {
                let reading = if on {
                    self.power_on(channel).await
                } else {
                    self.power_off(channel).await
                };
                let _ = reply.send(reading);
            }
            Request::ArmLimit { input, reply } => {
                let _ = reply.send(self.arm_limit(&input));
            }
        }
    }

    async fn power_on(&mut self, channel: Channel) -> ChannelReading {
        self.send_command(channel, true).await;

        self.generation += 1;
        let ticker = TimerHandle::periodic(self.generation, TICK_PERIOD, self.events_tx.clone(), move |generation| {
            Event::Tick { channel, generation }
        });

        let device = self.device_mut(channel);
        device.set_on(true);
        device.start_ticker(ticker);
        device.reading()
    }

    /// Bills the pre-toggle totals, then switches the device off.
    async fn power_off(&mut self, channel: Channel) -> ChannelReading {
        let billed = self.device_mut(channel).snapshot();
        self.submit_bill(channel, billed);

        self.send_command(channel, false).await;

        let device = self.device_mut(channel);
        device.set_on(false);
        device.stop_ticker();
        device.reading()
    }

    fn arm_limit(&mut self, input: &str) -> Result<u64> {
        let minutes = match parse_minutes(input) {
            Ok(minutes) => minutes,
            Err(e) => {
                self.notifier.publish(Notice::InvalidLimit { input: input.to_string() });
                return Err(e);
            }
        };

        self.generation += 1;
        self.limit.arm(TimerHandle::deadline(
            self.generation,
            limit_delay(minutes),
            self.events_tx.clone(),
            |generation| Event::LimitReached { generation },
        ));

        tracing::info!("usage limit armed for {} minutes", minutes);

        Ok(minutes)
    }

    fn submit_bill(&self, channel: Channel, billed: MeterSnapshot) {
        let gateway = Arc::clone(&self.gateway);
        let events = self.events_tx.clone();
        let bill = BillRequest {
            power_used: billed.energy_wh,
            price: billed.price,
            session_id: self.session.to_string(),
        };

        tokio::spawn(async move {
            let outcome = gateway.submit(channel, &bill).await;
            let _ = events.send(Event::BillSettled { channel, billed, outcome });
        });
    }

    async fn send_command(&self, channel: Channel, on: bool) {
        let token = self.commands.token(channel, on);

        let Some(bridge) = &self.bridge else {
            tracing::debug!("no bridge connected, skipping command `{}`", token);
            return;
        };

        if let Err(e) = bridge.send(token).await {
            self.notifier.publish(Notice::BridgeUnavailable { reason: e.to_string() });
        }
    }

    fn device_mut(&mut self, channel: Channel) -> &mut DeviceChannel {
        &mut self.channels[usize::from(channel.number()) - 1]
    }
}

impl MonitorHandle {
    pub async fn power_on(&self, channel: Channel) -> Result<ChannelReading> {
        self.power(channel, true).await
    }

    pub async fn power_off(&self, channel: Channel) -> Result<ChannelReading> {
        self.power(channel, false).await
    }

    /// Arms the usage limit from raw user input, returning the accepted minutes.
    pub async fn arm_limit(&self, input: &str) -> Result<u64> {
        let (reply, response) = oneshot::channel();
        self.call(Request::ArmLimit { input: input.to_string(), reply }, response).await?
    }

    pub fn reading(&self, channel: Channel) -> ChannelReading {
        self.readings
            .get(&channel)
            .map(|receiver| receiver.borrow().clone())
            .unwrap_or_else(|| ChannelReading::idle(channel))
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notifier.subscribe()
    }

    pub async fn monthly(&self, channel: Channel, query: MonthlyQuery) -> Result<MonthlyUsage> {
        if !query.is_valid() {
            return Err(Error::InvalidMonth(query.month));
        }

        self.gateway.monthly(channel, query).await
    }

    async fn power(&self, channel: Channel, on: bool) -> Result<ChannelReading> {
        let (reply, response) = oneshot::channel();
        self.call(Request::Power { channel, on, reply }, response).await
    }

    async fn call<T>(&self, request: Request, response: oneshot::Receiver<T>) -> Result<T> {
        self.requests.send(request).await.map_err(|_| Error::MonitorStopped)?;
        response.await.map_err(|_| Error::MonitorStopped)
    }
}
