//! Metric submission
//!
//! The check reports one gauge per cycle. Sinks are caller-owned values
//! passed into the cycle, never process-wide globals. The statsd sink speaks
//! the DogStatsD line protocol over UDP (fire-and-forget by design); the
//! tracing sink is for dry runs and tests.

use anyhow::Result;
use std::net::UdpSocket;
use tracing::info;

/// Gauge submission seam
pub trait MetricsSink {
    fn gauge(&self, name: &str, value: f64, tags: &[String]) -> Result<()>;
}

/// DogStatsD line-protocol sink: `name:value|g|#tag,tag`
pub struct StatsdSink {
    socket: UdpSocket,
    addr: String,
}

impl StatsdSink {
    pub fn new(addr: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        Ok(Self {
            socket,
            addr: addr.to_string(),
        })
    }

    fn format_datagram(name: &str, value: f64, tags: &[String]) -> String {
        if tags.is_empty() {
            format!("{}:{}|g", name, value)
        } else {
            format!("{}:{}|g|#{}", name, value, tags.join(","))
        }
    }
}

impl MetricsSink for StatsdSink {
    fn gauge(&self, name: &str, value: f64, tags: &[String]) -> Result<()> {
        let datagram = Self::format_datagram(name, value, tags);
        self.socket.send_to(datagram.as_bytes(), &self.addr)?;
        Ok(())
    }
}

/// Sink that logs gauges instead of sending them
pub struct TracingSink;

impl MetricsSink for TracingSink {
    fn gauge(&self, name: &str, value: f64, tags: &[String]) -> Result<()> {
        info!(metric = name, value, tags = %tags.join(","), "gauge");
        Ok(())
    }
}
