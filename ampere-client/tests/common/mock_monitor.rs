use std::io;
use std::sync::{Arc, Mutex};

use ampere_api::models::{BillRequest, Channel, MonthlyQuery, MonthlyUsage};
use ampere_client::accounting::SessionId;
use ampere_client::configs::{Billing, Bridge, Control, Logger, Settings, Tariff, Telemetry};
use ampere_client::error::{Error, Result};
use ampere_client::monitor::{Monitor, MonitorHandle};
use ampere_client::notice::{Notice, Notifier};
use ampere_client::services::actuator_service::CommandSink;
use ampere_client::services::billing_service::BillingGateway;
use async_trait::async_trait;
use time::macros::datetime;
use tokio::sync::{broadcast, mpsc};

pub const SESSION: &str = "session-1709294400000";

#[derive(Default)]
pub struct RecordingSink {
    pub commands: Mutex<Vec<String>>,
}

#[async_trait]
impl CommandSink for RecordingSink {
    async fn send(&self, command: &str) -> Result<()> {
        self.commands.lock().unwrap().push(command.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeGateway {
    pub bills: Mutex<Vec<(Channel, BillRequest)>>,
    pub unreachable: bool,
    pub usage: MonthlyUsage,
}

impl FakeGateway {
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl BillingGateway for FakeGateway {
    async fn submit(&self, channel: Channel, bill: &BillRequest) -> Result<String> {
        if self.unreachable {
            return Err(Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused")));
        }

        self.bills.lock().unwrap().push((channel, bill.clone()));
        Ok(format!("{} bill stored for session", channel))
    }

    async fn monthly(&self, _channel: Channel, _query: MonthlyQuery) -> Result<MonthlyUsage> {
        Ok(self.usage)
    }
}

pub fn settings() -> Settings {
    Settings {
        logger: Logger {
            level: String::from("debug"),
        },
        control: Control {
            host: String::from("127.0.0.1"),
            port: 0,
        },
        bridge: Bridge {
            port_path: None,
            device_name: None,
            baud_rate: 115_200,
            read_timeout_ms: 500,
        },
        billing: Billing {
            base_url: String::from("http://127.0.0.1:8000"),
            timeout_secs: 1,
        },
        tariff: Tariff::default(),
        telemetry: Telemetry::default(),
        channels: Vec::new(),
    }
}

pub struct MockMonitor {
    pub handle: MonitorHandle,
    pub telemetry: mpsc::Sender<String>,
    pub sink: Arc<RecordingSink>,
    pub gateway: Arc<FakeGateway>,
    pub notices: broadcast::Receiver<Notice>,
}

impl MockMonitor {
    pub fn new() -> Self {
        Self::with(settings(), FakeGateway::default())
    }

    pub fn with(settings: Settings, gateway: FakeGateway) -> Self {
        let sink = Arc::new(RecordingSink::default());
        let gateway = Arc::new(gateway);
        let notifier = Notifier::new(16);
        let notices = notifier.subscribe();
        let (telemetry, telemetry_rx) = mpsc::channel(16);

        let (monitor, handle) = Monitor::new(
            &settings,
            SessionId::at(datetime!(2024-03-01 12:00:00 UTC)),
            Some(sink.clone() as Arc<dyn CommandSink>),
            gateway.clone() as Arc<dyn BillingGateway>,
            notifier,
        );
        tokio::spawn(monitor.run(telemetry_rx));

        Self {
            handle,
            telemetry,
            sink,
            gateway,
            notices,
        }
    }

    pub async fn feed(&self, chunk: &str) {
        self.telemetry.send(chunk.to_string()).await.unwrap();
        settle().await;
    }

    pub fn commands(&self) -> Vec<String> {
        self.sink.commands.lock().unwrap().clone()
    }

    pub fn bills(&self) -> Vec<(Channel, BillRequest)> {
        self.gateway.bills.lock().unwrap().clone()
    }
}

/// Lets spawned tasks drain their queues.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
}
