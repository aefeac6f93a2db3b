//! Ping command models

/// Latency and health figures reported by `$ping`
#[derive(Debug, Clone)]
pub struct PingMetrics {
    pub response_roundtrip: u64,
    pub uptime: String,
    pub open_sessions: usize,
    pub rates_endpoint: String,
}
