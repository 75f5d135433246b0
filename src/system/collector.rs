use std::path::{Path, PathBuf};

use sysinfo::{Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System};

use super::source::{
    BatteryStatus, MetricError, MetricKind, MetricSource, NetworkCounters, ProcessSample,
};

/// [`MetricSource`] backed by `sysinfo` for CPU, memory, disks, network and
/// processes, and by the `battery` crate for power state.
pub struct SysinfoSource {
    sys: System,
    disks: Disks,
    networks: Networks,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut sys = System::new();
        // CPU usage and per-process shares are deltas between two refreshes,
        // so take the baseline now.
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        sys.refresh_processes_specifics(ProcessesToUpdate::All, true, process_refresh());
        SysinfoSource {
            sys,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl MetricSource for SysinfoSource {
    fn cpu_utilization(&mut self) -> Result<f64, MetricError> {
        self.sys.refresh_cpu_usage();
        if self.sys.cpus().is_empty() {
            return Err(MetricError::unavailable(MetricKind::Cpu, "no CPUs reported"));
        }
        Ok(f64::from(self.sys.global_cpu_usage()).clamp(0.0, 100.0))
    }

    fn memory_utilization(&mut self) -> Result<f64, MetricError> {
        self.sys.refresh_memory();
        percent_used(self.sys.used_memory(), self.sys.total_memory())
            .ok_or_else(|| MetricError::unavailable(MetricKind::Memory, "total memory is 0"))
    }

    fn disk_utilization(&mut self, path: &Path) -> Result<f64, MetricError> {
        let target = path.canonicalize().map_err(|e| {
            MetricError::unavailable(MetricKind::Disk, format!("{}: {e}", path.display()))
        })?;

        self.disks.refresh(true);

        let mounts: Vec<PathBuf> = self
            .disks
            .list()
            .iter()
            .map(|d| d.mount_point().to_path_buf())
            .collect();
        // Canonical form resolves symlinks; the raw path covers platforms
        // where canonicalize adds a verbatim prefix the mount list lacks.
        let index = best_mount(&target, &mounts)
            .or_else(|| best_mount(path, &mounts))
            .ok_or_else(|| {
                MetricError::unavailable(
                    MetricKind::Disk,
                    format!("no mounted disk contains {}", target.display()),
                )
            })?;

        let disk = &self.disks.list()[index];
        let total = disk.total_space();
        let used = total.saturating_sub(disk.available_space());
        percent_used(used, total).ok_or_else(|| {
            MetricError::unavailable(
                MetricKind::Disk,
                format!("{} reports zero capacity", disk.mount_point().display()),
            )
        })
    }

    fn battery_status(&mut self) -> Result<Option<BatteryStatus>, MetricError> {
        // `battery::Manager` is `!Send`, so it cannot live in a source that
        // moves onto the blocking pool; it is opened per query.
        let manager = match battery::Manager::new() {
            Ok(m) => m,
            // No power-supply interface at all: a desktop or VM, not a failure.
            Err(_) => return Ok(None),
        };
        let mut batteries = manager
            .batteries()
            .map_err(|e| MetricError::unavailable(MetricKind::Battery, e.to_string()))?;

        match batteries.next() {
            None => Ok(None),
            Some(Err(e)) => Err(MetricError::unavailable(MetricKind::Battery, e.to_string())),
            Some(Ok(b)) => Ok(Some(BatteryStatus {
                percent: (f64::from(b.state_of_charge().value) * 100.0).clamp(0.0, 100.0),
                charging: matches!(b.state(), battery::State::Charging | battery::State::Full),
            })),
        }
    }

    fn network_counters(&mut self) -> Result<NetworkCounters, MetricError> {
        self.networks.refresh(true);
        let list = self.networks.list();
        if list.is_empty() {
            return Err(MetricError::unavailable(
                MetricKind::Network,
                "no network interfaces",
            ));
        }
        let mut counters = NetworkCounters::default();
        for data in list.values() {
            counters.bytes_sent = counters.bytes_sent.saturating_add(data.total_transmitted());
            counters.bytes_received = counters
                .bytes_received
                .saturating_add(data.total_received());
        }
        Ok(counters)
    }

    fn enumerate_processes(&mut self) -> Result<Vec<ProcessSample>, MetricError> {
        self.sys
            .refresh_processes_specifics(ProcessesToUpdate::All, true, process_refresh());

        let mut processes: Vec<ProcessSample> = self
            .sys
            .processes()
            .iter()
            // Linux threads show up as entries of their own; their CPU is
            // already part of the owning process.
            .filter(|(_, process)| process.thread_kind().is_none())
            .map(|(pid, process)| ProcessSample {
                pid: pid.as_u32(),
                name: process.name().to_string_lossy().to_string(),
                cpu_share: f64::from(process.cpu_usage()),
            })
            .collect();
        if processes.is_empty() {
            return Err(MetricError::unavailable(
                MetricKind::Processes,
                "process table is empty",
            ));
        }
        // sysinfo hands out a HashMap; pid order gives ties a stable meaning.
        processes.sort_by_key(|p| p.pid);
        Ok(processes)
    }
}

/// CPU share only, and no per-thread entries.
fn process_refresh() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing().with_cpu().without_tasks()
}

fn percent_used(used: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some((used as f64 / total as f64 * 100.0).clamp(0.0, 100.0))
}

/// Index of the mount point that is the longest prefix of `target`.
fn best_mount(target: &Path, mounts: &[PathBuf]) -> Option<usize> {
    mounts
        .iter()
        .enumerate()
        .filter(|(_, mount)| target.starts_with(mount))
        .max_by_key(|(_, mount)| mount.components().count())
        .map(|(i, _)| i)
}
