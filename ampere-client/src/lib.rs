use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::accounting::SessionId;
use crate::app::create_app;
use crate::configs::{Bridge, Settings};
use crate::monitor::Monitor;
use crate::notice::{Notice, Notifier};
use crate::services::actuator_service::{ActuatorService, CommandSink};
use crate::services::billing_service::{BillingGateway, BillingService};

pub mod accounting;
pub mod app;
pub mod configs;
pub mod device;
pub mod error;
pub mod handles;
pub mod limit;
pub mod monitor;
pub mod notice;
pub mod services;
pub mod telemetry;
pub mod timer;

const TELEMETRY_BUFFER: usize = 256;
const NOTICE_BUFFER: usize = 64;

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn std::error::Error>> {
    let notifier = Notifier::new(NOTICE_BUFFER);
    let session = SessionId::generate();
    let gateway: Arc<dyn BillingGateway> = Arc::new(BillingService::new(&settings.billing)?);

    let (telemetry_tx, telemetry_rx) = mpsc::channel(TELEMETRY_BUFFER);

    let bridge = match connect_bridge(&settings.bridge, telemetry_tx).await {
        Ok(bridge) => Some(bridge as Arc<dyn CommandSink>),
        Err(e) => {
            notifier.publish(Notice::BridgeUnavailable { reason: e.to_string() });
            None
        }
    };

    tracing::info!("starting session {}", session);

    let (monitor, handle) = Monitor::new(settings, session, bridge, gateway, notifier);
    tokio::spawn(monitor.run(telemetry_rx));

    let app = create_app(handle);

    let ip_addr = settings.control.host.parse::<IpAddr>()?;

    let address = SocketAddr::from((ip_addr, settings.control.port));

    let listener = TcpListener::bind(&address).await?;

    tracing::info!("control surface listening on {:?}", address);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn connect_bridge(bridge: &Bridge, lines: mpsc::Sender<String>) -> error::Result<Arc<ActuatorService>> {
    let service = ActuatorService::new(bridge)?;
    service.listen(lines).await?;

    tracing::info!("bridge connected on {}", service.port_path());

    Ok(Arc::new(service))
}
