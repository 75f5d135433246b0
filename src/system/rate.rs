use std::time::{Duration, Instant};

use serde::Serialize;

use super::source::NetworkCounters;

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Megabytes between two cumulative counter readings.
///
/// A reading lower than the previous one (interface reset, counter wrap)
/// yields 0 instead of a negative or overflowed value.
pub fn delta_megabytes(prev: u64, curr: u64) -> f64 {
    match curr.checked_sub(prev) {
        Some(bytes) => bytes as f64 / BYTES_PER_MB,
        None => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NetworkDelta {
    pub sent_mb: f64,
    pub received_mb: f64,
    pub elapsed: Duration,
}

impl NetworkDelta {
    pub fn sent_per_sec(&self) -> f64 {
        per_sec(self.sent_mb, self.elapsed)
    }

    pub fn received_per_sec(&self) -> f64 {
        per_sec(self.received_mb, self.elapsed)
    }
}

fn per_sec(mb: f64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { mb / secs } else { 0.0 }
}

/// Last observed cumulative network counters.
#[derive(Debug, Default)]
pub struct NetworkCounterState {
    last: Option<(NetworkCounters, Instant)>,
}

impl NetworkCounterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the delta against the stored reading, then store `curr`.
    /// The first call only seeds the state and reports zero traffic.
    pub fn advance(&mut self, curr: NetworkCounters, now: Instant) -> NetworkDelta {
        let delta = match self.last {
            Some((prev, at)) => {
                if curr.bytes_sent < prev.bytes_sent || curr.bytes_received < prev.bytes_received
                {
                    tracing::debug!(
                        prev_sent = prev.bytes_sent,
                        curr_sent = curr.bytes_sent,
                        prev_received = prev.bytes_received,
                        curr_received = curr.bytes_received,
                        "network counter rollover"
                    );
                }
                NetworkDelta {
                    sent_mb: delta_megabytes(prev.bytes_sent, curr.bytes_sent),
                    received_mb: delta_megabytes(prev.bytes_received, curr.bytes_received),
                    elapsed: now.saturating_duration_since(at),
                }
            }
            None => NetworkDelta::default(),
        };
        self.last = Some((curr, now));
        delta
    }

    pub fn last(&self) -> Option<NetworkCounters> {
        self.last.map(|(counters, _)| counters)
    }
}
