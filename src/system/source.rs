use std::fmt;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// One probe a [`MetricSource`] answers. Used to tag failures in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
    Battery,
    Network,
    Processes,
}

impl MetricKind {
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::Disk => "disk",
            MetricKind::Battery => "battery",
            MetricKind::Network => "network",
            MetricKind::Processes => "processes",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MetricError {
    /// The OS query failed or the hardware behind it is missing.
    #[error("{metric} metric unavailable: {reason}")]
    Unavailable { metric: MetricKind, reason: String },
}

impl MetricError {
    pub fn unavailable(metric: MetricKind, reason: impl Into<String>) -> Self {
        MetricError::Unavailable {
            metric,
            reason: reason.into(),
        }
    }

    pub fn metric(&self) -> MetricKind {
        match self {
            MetricError::Unavailable { metric, .. } => *metric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatteryStatus {
    pub percent: f64,
    pub charging: bool,
}

/// Cumulative byte counters summed over all interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkCounters {
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// One row of a process enumeration. `cpu_share` is whatever the OS sampled
/// over its own interval, so it may exceed 100 on multi-core hosts.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub name: String,
    pub cpu_share: f64,
}

/// OS-level probes consumed by the sampler. Every query is independent and
/// may fail on its own without affecting the others.
pub trait MetricSource: Send {
    fn cpu_utilization(&mut self) -> Result<f64, MetricError>;
    fn memory_utilization(&mut self) -> Result<f64, MetricError>;
    fn disk_utilization(&mut self, path: &Path) -> Result<f64, MetricError>;
    /// `Ok(None)` means the host has no battery.
    fn battery_status(&mut self) -> Result<Option<BatteryStatus>, MetricError>;
    fn network_counters(&mut self) -> Result<NetworkCounters, MetricError>;
    fn enumerate_processes(&mut self) -> Result<Vec<ProcessSample>, MetricError>;
}
