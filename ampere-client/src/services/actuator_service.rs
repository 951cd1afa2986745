use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serialport::{SerialPort, SerialPortInfo, SerialPortType, available_ports};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::configs::Bridge;
use crate::error::{Error, Result};

/// Outbound half of the hardware bridge.
#[async_trait]
pub trait CommandSink: Send + Sync {
    /// Writes one command token followed by a newline.
    async fn send(&self, command: &str) -> Result<()>;
}

pub struct ActuatorService {
    port: Arc<Mutex<Box<dyn SerialPort>>>,
    port_path: String,
}

impl ActuatorService {
    pub fn new(bridge: &Bridge) -> Result<Self> {
        let port_path = match &bridge.port_path {
            Some(port_path) => port_path.clone(),
            None => find_port(&available_ports()?, bridge.device_name.as_deref())?,
        };

        tracing::debug!("Connect to port: {}", port_path);

        let port = serialport::new(&port_path, bridge.baud_rate)
            .timeout(Duration::from_millis(bridge.read_timeout_ms))
            .open()?;

        Ok(Self {
            port: Arc::new(Mutex::new(port)),
            port_path,
        })
    }

    pub fn port_path(&self) -> &str {
        &self.port_path
    }

    /// Forwards every complete line the bridge prints to `lines`.
    ///
    /// Reads run on a blocking thread against a clone of the port handle. A
    /// read timeout keeps the partial line and waits for the rest.
    pub async fn listen(&self, lines: mpsc::Sender<String>) -> Result<JoinHandle<()>> {
        let reader = self.port.lock().await.try_clone()?;
        let port_path = self.port_path.clone();

        Ok(tokio::task::spawn_blocking(move || {
            let mut reader = BufReader::new(reader);
            let mut buffer = Vec::new();

            loop {
                match reader.read_until(b'\n', &mut buffer) {
                    Ok(0) => {
                        tracing::warn!("Bridge {} closed", port_path);
                        break;
                    }
                    Ok(_) => {
                        if buffer.last() != Some(&b'\n') {
                            continue;
                        }
                        let line = String::from_utf8_lossy(&buffer).into_owned();
                        buffer.clear();
                        if lines.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                    Err(e) => {
                        tracing::error!("Bridge read error: {}", e);
                        break;
                    }
                }
            }
        }))
    }
}

#[async_trait]
impl CommandSink for ActuatorService {
    async fn send(&self, command: &str) -> Result<()> {
        let mut port = self.port.lock().await;

        port.write_all(format!("{command}\n").as_bytes())?;
        port.flush()?;

        tracing::debug!("Sent command: {}", command);

        Ok(())
    }
}

/// Picks the bridge among `ports`: the first whose name or USB product
/// contains `device_name`, or simply the first port when no name is set.
pub fn find_port(ports: &[SerialPortInfo], device_name: Option<&str>) -> Result<String> {
    let found = match device_name {
        Some(name) => ports.iter().find(|port| {
            let product = match &port.port_type {
                SerialPortType::UsbPort(usb) => usb.product.as_deref().unwrap_or_default(),
                _ => "",
            };
            port.port_name.contains(name) || product.contains(name)
        }),
        None => ports.first(),
    };

    found
        .map(|port| port.port_name.clone())
        .ok_or_else(|| Error::BridgeNotFound(device_name.unwrap_or("any serial port").to_string()))
}

#[cfg(test)]
mod tests {
    use serialport::UsbPortInfo;

    use super::*;

    fn usb_port(name: &str, product: Option<&str>) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::UsbPort(UsbPortInfo {
                vid: 0x10c4,
                pid: 0xea60,
                serial_number: None,
                manufacturer: None,
                product: product.map(str::to_string),
            }),
        }
    }

    #[test]
    fn test_find_port_by_usb_product() {
        let ports = vec![
            usb_port("/dev/ttyUSB0", Some("CP2102")),
            usb_port("/dev/ttyUSB1", Some("ESP32test bridge")),
        ];

        assert_eq!(find_port(&ports, Some("ESP32test")).unwrap(), "/dev/ttyUSB1");
    }

    #[test]
    fn test_find_port_by_name() {
        let ports = vec![SerialPortInfo {
            port_name: String::from("/dev/rfcomm-ESP32test"),
            port_type: SerialPortType::BluetoothPort,
        }];

        assert_eq!(find_port(&ports, Some("ESP32test")).unwrap(), "/dev/rfcomm-ESP32test");
    }

    #[test]
    fn test_find_port_without_name_takes_first() {
        let ports = vec![usb_port("/dev/ttyACM0", None), usb_port("/dev/ttyACM1", None)];

        assert_eq!(find_port(&ports, None).unwrap(), "/dev/ttyACM0");
    }

    #[test]
    fn test_missing_bridge() {
        let ports = vec![usb_port("/dev/ttyUSB0", Some("CP2102"))];

        assert!(matches!(find_port(&ports, Some("ESP32test")), Err(Error::BridgeNotFound(_))));
        assert!(matches!(find_port(&[], None), Err(Error::BridgeNotFound(_))));
    }
}
