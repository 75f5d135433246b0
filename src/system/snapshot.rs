use serde::Serialize;

use super::rate::NetworkDelta;
use super::source::{BatteryStatus, MetricKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_share: f64,
}

/// Everything sampled in one tick. Fields whose probe failed are `None` and
/// listed in `unavailable`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub disk_percent: Option<f64>,
    /// `None` without a matching `unavailable` entry means the host has no battery.
    pub battery: Option<BatteryStatus>,
    pub network: Option<NetworkDelta>,
    pub top_processes: Vec<ProcessEntry>,
    pub cpu_history: Vec<f64>,
    pub memory_history: Vec<f64>,
    pub unavailable: Vec<MetricKind>,
}

impl Snapshot {
    pub fn is_available(&self, metric: MetricKind) -> bool {
        !self.unavailable.contains(&metric)
    }
}
