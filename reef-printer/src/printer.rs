//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - Network printers (TCP port 9100)
//! - Spooler printers (submission through the OS print queue)
//! - Serial printers (stub)

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::process::Command;
use tracing::{info, instrument, warn};

use crate::error::{PrintError, PrintResult};

/// Default raw TCP port for thermal printers
pub const RAW_PORT: u16 = 9100;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    addr: SocketAddr,
    connect_timeout: Duration,
    write_timeout: Duration,
    probe_timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let addr_str = format!("{}:{}", host, port);
        let addr = addr_str
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr_str)))?;

        Ok(Self {
            addr,
            connect_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(1),
        })
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set write-phase timeout
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set reachability probe timeout
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Get the printer address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(data), fields(addr = %self.addr, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Connecting to printer");

        let mut stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(self.addr))
            .await
            .map_err(|_| PrintError::Timeout(format!("Connection timeout: {}", self.addr)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.addr, e)))?;

        info!("Connected, sending {} bytes", data.len());

        // Success requires the full payload flushed and the socket shut down
        let write_phase = async {
            stream.write_all(data).await?;
            stream.flush().await?;
            stream.shutdown().await
        };

        tokio::time::timeout(self.write_timeout, write_phase)
            .await
            .map_err(|_| PrintError::Timeout(format!("Write timeout: {}", self.addr)))??;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(fields(addr = %self.addr))]
    async fn is_online(&self) -> bool {
        match tokio::time::timeout(self.probe_timeout, TcpStream::connect(self.addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Printer offline");
                false
            }
            Err(_) => {
                warn!("Printer check timeout");
                false
            }
        }
    }
}

/// Spooler printer
///
/// Submits raw data to a printer registered with the OS print queue,
/// addressed by its spooler name. The payload is staged in a temporary
/// file which is removed on every exit path.
#[derive(Debug, Clone)]
pub struct SpoolerPrinter {
    name: String,
    timeout: Duration,
}

impl SpoolerPrinter {
    /// Create a spooler printer addressed by its OS-registered name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set per-submission-attempt timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the spooler name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one spooler submission command through the shell
    async fn run_spool_command(&self, args: &[&str]) -> PrintResult<()> {
        let program = args.first().copied().unwrap_or("cmd");

        let output = tokio::time::timeout(
            self.timeout,
            Command::new("cmd").arg("/C").args(args).output(),
        )
        .await
        .map_err(|_| PrintError::Timeout(format!("Spooler command timed out: {}", program)))?
        .map_err(|e| PrintError::Spooler(format!("{}: {}", program, e)))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(PrintError::Spooler(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )))
        }
    }
}

impl Printer for SpoolerPrinter {
    #[instrument(skip(data), fields(printer = %self.name, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let spool = tempfile::NamedTempFile::new()?;
        tokio::fs::write(spool.path(), data).await?;

        let path = spool.path().to_string_lossy().into_owned();
        let target = format!("/d:{}", self.name);

        match self.run_spool_command(&["print", &target, &path]).await {
            Ok(()) => {
                info!("Print job submitted to spooler");
                Ok(())
            }
            Err(e) => {
                // Alternate submission: raw byte-copy to the printer queue
                warn!(error = %e, "print command failed, trying raw copy");
                self.run_spool_command(&["copy", "/b", &path, &self.name])
                    .await
            }
        }
        // spool dropped here; the staged file is removed regardless of outcome
    }

    async fn is_online(&self) -> bool {
        // Spooler availability is reported by the OS printer listing,
        // not probed per job.
        true
    }
}

/// Serial printer (stub)
///
/// Keeps the transport switch total; serial submission is not implemented.
#[derive(Debug, Clone)]
pub struct SerialPrinter {
    port: String,
}

impl SerialPrinter {
    /// Create a serial printer addressed by its port name (e.g., "COM3")
    pub fn new(port: &str) -> Self {
        Self {
            port: port.to_string(),
        }
    }

    /// Get the serial port name
    pub fn port(&self) -> &str {
        &self.port
    }
}

impl Printer for SerialPrinter {
    async fn print(&self, _data: &[u8]) -> PrintResult<()> {
        Err(PrintError::Unsupported(format!(
            "Serial printing is not implemented (port {})",
            self.port
        )))
    }

    async fn is_online(&self) -> bool {
        false
    }
}
