use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::history::{self, RollingHistory};
use super::platform;
use super::rate::NetworkCounterState;
use super::ranker;
use super::snapshot::Snapshot;
use super::source::{MetricError, MetricKind, MetricSource};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplerError {
    #[error("sampler is already running")]
    AlreadyRunning,
    #[error("sampling interval must be greater than zero")]
    InvalidInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    Stopped,
    Running,
    Stopping,
}

#[derive(Debug, Clone)]
pub struct SamplerSettings {
    pub history_len: usize,
    pub top_k: usize,
    pub name_width: usize,
    pub disk_path: PathBuf,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        SamplerSettings {
            history_len: history::DEFAULT_CAPACITY,
            top_k: ranker::DEFAULT_TOP_K,
            name_width: ranker::DEFAULT_NAME_WIDTH,
            disk_path: platform::default_disk_path(),
        }
    }
}

/// State carried from tick to tick: the probe source, chart histories and
/// the last network counters. Runs one tick at a time, synchronously.
pub struct SamplerCore {
    source: Box<dyn MetricSource>,
    settings: SamplerSettings,
    cpu_history: RollingHistory<f64>,
    memory_history: RollingHistory<f64>,
    network: NetworkCounterState,
    ticks: u64,
    failing: HashSet<MetricKind>,
}

impl SamplerCore {
    pub fn new(source: Box<dyn MetricSource>, settings: SamplerSettings) -> Self {
        SamplerCore {
            source,
            cpu_history: RollingHistory::new(settings.history_len),
            memory_history: RollingHistory::new(settings.history_len),
            settings,
            network: NetworkCounterState::new(),
            ticks: 0,
            failing: HashSet::new(),
        }
    }

    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    /// Query every probe once and build the resulting snapshot. A failed
    /// probe blanks its own field and nothing else.
    pub fn tick(&mut self) -> Snapshot {
        let _tick_span = tracing::debug_span!("sampler.tick", tick = self.ticks + 1).entered();

        self.ticks += 1;
        let mut unavailable = Vec::new();

        let cpu = self.source.cpu_utilization();
        let cpu_percent = self.observe(MetricKind::Cpu, cpu, &mut unavailable);

        let memory = self.source.memory_utilization();
        let memory_percent = self.observe(MetricKind::Memory, memory, &mut unavailable);

        let disk = self.source.disk_utilization(&self.settings.disk_path);
        let disk_percent = self.observe(MetricKind::Disk, disk, &mut unavailable);

        let battery = self.source.battery_status();
        let battery = self
            .observe(MetricKind::Battery, battery, &mut unavailable)
            .flatten();

        let counters = self.source.network_counters();
        let network = self
            .observe(MetricKind::Network, counters, &mut unavailable)
            .map(|counters| self.network.advance(counters, Instant::now()));

        let processes = self.source.enumerate_processes();
        let top_processes = self
            .observe(MetricKind::Processes, processes, &mut unavailable)
            .map(|all| ranker::rank(all, self.settings.top_k, self.settings.name_width))
            .unwrap_or_default();

        if let Some(cpu) = cpu_percent {
            self.cpu_history.push(cpu);
        }
        if let Some(memory) = memory_percent {
            self.memory_history.push(memory);
        }

        Snapshot {
            tick: self.ticks,
            cpu_percent,
            memory_percent,
            disk_percent,
            battery,
            network,
            top_processes,
            cpu_history: self.cpu_history.snapshot(),
            memory_history: self.memory_history.snapshot(),
            unavailable,
        }
    }

    fn observe<T>(
        &mut self,
        metric: MetricKind,
        result: Result<T, MetricError>,
        unavailable: &mut Vec<MetricKind>,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                if self.failing.remove(&metric) {
                    tracing::info!(%metric, "metric available again");
                }
                Some(value)
            }
            Err(err) => {
                if self.failing.insert(metric) {
                    tracing::warn!(%metric, error = %err, "metric unavailable");
                } else {
                    tracing::debug!(%metric, error = %err, "metric still unavailable");
                }
                unavailable.push(metric);
                None
            }
        }
    }
}

/// Drives a [`SamplerCore`] on a fixed cadence in a background task and
/// publishes each snapshot to a depth-1 watch channel.
///
/// Lifecycle is `Stopped -> Running -> Stopping -> Stopped`. All methods take
/// `&self`, so a sampler shared behind an `Arc` can be stopped from any task.
pub struct Sampler {
    core: Arc<Mutex<SamplerCore>>,
    publisher: Arc<watch::Sender<Option<Snapshot>>>,
    shutdown: watch::Sender<bool>,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
    state: Mutex<SamplerState>,
}

impl Sampler {
    pub fn new(source: impl MetricSource + 'static, settings: SamplerSettings) -> Self {
        Self::from_core(SamplerCore::new(Box::new(source), settings))
    }

    pub fn from_core(core: SamplerCore) -> Self {
        let (publisher, _) = watch::channel(None);
        let (shutdown, _) = watch::channel(false);
        Sampler {
            core: Arc::new(Mutex::new(core)),
            publisher: Arc::new(publisher),
            shutdown,
            task: tokio::sync::Mutex::new(None),
            state: Mutex::new(SamplerState::Stopped),
        }
    }

    /// Receiver that always holds the most recent snapshot. A slow reader
    /// misses intermediate ticks rather than queueing them.
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.publisher.subscribe()
    }

    pub fn latest(&self) -> Option<Snapshot> {
        self.publisher.borrow().clone()
    }

    pub fn state(&self) -> SamplerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SamplerState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Spawn the sampling task on the current tokio runtime. The first tick
    /// fires immediately.
    pub async fn start(&self, interval: Duration) -> Result<(), SamplerError> {
        if interval.is_zero() {
            return Err(SamplerError::InvalidInterval);
        }
        let mut task = self.task.lock().await;
        if task.is_some() {
            return Err(SamplerError::AlreadyRunning);
        }

        self.shutdown.send_replace(false);
        let shutdown = self.shutdown.subscribe();
        *task = Some(tokio::spawn(run(
            Arc::clone(&self.core),
            Arc::clone(&self.publisher),
            shutdown,
            interval,
        )));
        self.set_state(SamplerState::Running);
        tracing::info!(?interval, "sampler started");
        Ok(())
    }

    /// Stop the sampling task and wait for it to exit. Once this returns no
    /// further snapshot is published. Stopping an idle sampler does nothing.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        let Some(handle) = task.take() else {
            return;
        };

        self.set_state(SamplerState::Stopping);
        self.shutdown.send_replace(true);
        if let Err(err) = handle.await
            && err.is_panic()
        {
            tracing::error!(error = %err, "sampler task panicked");
        }
        self.set_state(SamplerState::Stopped);
        tracing::info!("sampler stopped");
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        // The task also exits once this sender is gone; signal first so it
        // does not start another tick in between.
        self.shutdown.send_replace(true);
    }
}

async fn run(
    core: Arc<Mutex<SamplerCore>>,
    publisher: Arc<watch::Sender<Option<Snapshot>>>,
    mut shutdown: watch::Receiver<bool>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        let tick_core = Arc::clone(&core);
        let tick = tokio::task::spawn_blocking(move || run_tick(&tick_core));

        // A hung probe must not hold up shutdown: the blocking tick is
        // abandoned and its result dropped.
        let outcome = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            outcome = tick => outcome,
        };

        match outcome {
            Ok(Some(snapshot)) => {
                if *shutdown.borrow() {
                    break;
                }
                publisher.send_replace(Some(snapshot));
            }
            Ok(None) => tracing::warn!("previous tick still running, skipping"),
            Err(err) => tracing::error!(error = %err, "sampling tick panicked"),
        }
    }
}

fn run_tick(core: &Mutex<SamplerCore>) -> Option<Snapshot> {
    match core.try_lock() {
        Ok(mut guard) => Some(guard.tick()),
        Err(TryLockError::Poisoned(poisoned)) => {
            tracing::warn!("recovering sampler state after a panicked tick");
            let mut guard = poisoned.into_inner();
            core.clear_poison();
            Some(guard.tick())
        }
        Err(TryLockError::WouldBlock) => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::path::Path;

    use super::*;
    use crate::system::source::{BatteryStatus, NetworkCounters, ProcessSample};

    #[derive(Default)]
    struct FakeSource {
        cpu: VecDeque<f64>,
        memory: f64,
        disk_calls: u32,
        disk_fails_on: Vec<u32>,
        battery: Option<BatteryStatus>,
        network: VecDeque<NetworkCounters>,
        processes: Vec<ProcessSample>,
    }

    impl MetricSource for FakeSource {
        fn cpu_utilization(&mut self) -> Result<f64, MetricError> {
            self.cpu
                .pop_front()
                .ok_or_else(|| MetricError::unavailable(MetricKind::Cpu, "script exhausted"))
        }

        fn memory_utilization(&mut self) -> Result<f64, MetricError> {
            Ok(self.memory)
        }

        fn disk_utilization(&mut self, _path: &Path) -> Result<f64, MetricError> {
            self.disk_calls += 1;
            if self.disk_fails_on.contains(&self.disk_calls) {
                Err(MetricError::unavailable(MetricKind::Disk, "injected"))
            } else {
                Ok(55.0)
            }
        }

        fn battery_status(&mut self) -> Result<Option<BatteryStatus>, MetricError> {
            Ok(self.battery)
        }

        fn network_counters(&mut self) -> Result<NetworkCounters, MetricError> {
            self.network
                .pop_front()
                .ok_or_else(|| MetricError::unavailable(MetricKind::Network, "script exhausted"))
        }

        fn enumerate_processes(&mut self) -> Result<Vec<ProcessSample>, MetricError> {
            Ok(self.processes.clone())
        }
    }

    fn settings(history_len: usize) -> SamplerSettings {
        SamplerSettings {
            history_len,
            ..SamplerSettings::default()
        }
    }

    fn counters(sent: u64, received: u64) -> NetworkCounters {
        NetworkCounters {
            bytes_sent: sent,
            bytes_received: received,
        }
    }

    #[test]
    fn history_after_four_ticks() {
        let source = FakeSource {
            cpu: VecDeque::from([10.0, 20.0, 30.0, 40.0]),
            memory: 50.0,
            ..FakeSource::default()
        };
        let mut core = SamplerCore::new(Box::new(source), settings(3));
        let snapshots: Vec<Snapshot> = (0..4).map(|_| core.tick()).collect();

        assert_eq!(snapshots[0].cpu_history, vec![0.0, 0.0, 10.0]);
        assert_eq!(snapshots[3].cpu_history, vec![20.0, 30.0, 40.0]);
        assert_eq!(snapshots[3].memory_history, vec![50.0, 50.0, 50.0]);
        assert_eq!(snapshots[3].tick, 4);
    }

    #[test]
    fn disk_failure_only_blanks_disk() {
        let source = FakeSource {
            cpu: VecDeque::from([10.0, 20.0, 30.0]),
            memory: 40.0,
            disk_fails_on: vec![2],
            ..FakeSource::default()
        };
        let mut core = SamplerCore::new(Box::new(source), settings(60));

        let first = core.tick();
        assert_eq!(first.disk_percent, Some(55.0));

        let second = core.tick();
        assert_eq!(second.cpu_percent, Some(20.0));
        assert_eq!(second.memory_percent, Some(40.0));
        assert_eq!(second.disk_percent, None);
        assert!(!second.is_available(MetricKind::Disk));
        assert!(second.is_available(MetricKind::Cpu));

        let third = core.tick();
        assert_eq!(third.disk_percent, Some(55.0));
        assert!(third.is_available(MetricKind::Disk));
    }

    #[test]
    fn failed_cpu_does_not_append_history() {
        let source = FakeSource {
            cpu: VecDeque::from([10.0]),
            ..FakeSource::default()
        };
        let mut core = SamplerCore::new(Box::new(source), settings(3));
        core.tick();
        let snapshot = core.tick();
        assert_eq!(snapshot.cpu_percent, None);
        assert_eq!(snapshot.cpu_history, vec![0.0, 0.0, 10.0]);
        assert_eq!(snapshot.unavailable, vec![MetricKind::Cpu, MetricKind::Network]);
    }

    #[test]
    fn first_network_delta_is_zero() {
        let source = FakeSource {
            network: VecDeque::from([
                counters(10_000_000, 20_000_000),
                counters(11_048_576, 20_000_000),
            ]),
            ..FakeSource::default()
        };
        let mut core = SamplerCore::new(Box::new(source), settings(3));

        let first = core.tick().network.unwrap();
        assert_eq!(first.sent_mb, 0.0);
        assert_eq!(first.received_mb, 0.0);

        let second = core.tick().network.unwrap();
        assert!((second.sent_mb - 1.0).abs() < 1e-9);
        assert_eq!(second.received_mb, 0.0);
    }

    #[test]
    fn absent_battery_is_not_unavailable() {
        let mut core = SamplerCore::new(Box::new(FakeSource::default()), settings(3));
        let snapshot = core.tick();
        assert_eq!(snapshot.battery, None);
        assert!(snapshot.is_available(MetricKind::Battery));
    }

    #[test]
    fn top_processes_ranked_and_capped() {
        let processes = (1..=8)
            .map(|pid| ProcessSample {
                pid,
                name: format!("proc-{pid}"),
                cpu_share: f64::from(pid % 4),
            })
            .collect();
        let source = FakeSource {
            processes,
            ..FakeSource::default()
        };
        let mut core = SamplerCore::new(
            Box::new(source),
            SamplerSettings {
                top_k: 3,
                ..SamplerSettings::default()
            },
        );
        let pids: Vec<u32> = core.tick().top_processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![3, 7, 2]);
    }

    #[tokio::test]
    async fn stop_before_start_is_noop() {
        let sampler = Sampler::new(FakeSource::default(), settings(3));
        sampler.stop().await;
        assert_eq!(sampler.state(), SamplerState::Stopped);
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let sampler = Sampler::new(FakeSource::default(), settings(3));
        sampler.start(Duration::from_millis(20)).await.unwrap();
        assert_eq!(
            sampler.start(Duration::from_millis(20)).await,
            Err(SamplerError::AlreadyRunning)
        );
        sampler.stop().await;
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let sampler = Sampler::new(FakeSource::default(), settings(3));
        assert_eq!(
            sampler.start(Duration::ZERO).await,
            Err(SamplerError::InvalidInterval)
        );
        assert_eq!(sampler.state(), SamplerState::Stopped);
    }

    #[tokio::test]
    async fn double_stop_leaves_stopped() {
        let sampler = Sampler::new(FakeSource::default(), settings(3));
        sampler.start(Duration::from_millis(20)).await.unwrap();
        assert_eq!(sampler.state(), SamplerState::Running);
        sampler.stop().await;
        sampler.stop().await;
        assert_eq!(sampler.state(), SamplerState::Stopped);
    }

    #[test]
    fn poisoned_core_keeps_ticking() {
        let core = Arc::new(Mutex::new(SamplerCore::new(
            Box::new(FakeSource::default()),
            settings(3),
        )));
        let poison = Arc::clone(&core);
        let _ = std::thread::spawn(move || {
            let _guard = poison.lock().unwrap();
            panic!("probe blew up");
        })
        .join();
        assert!(core.is_poisoned());

        let snapshot = run_tick(&core).expect("tick should run");
        assert_eq!(snapshot.tick, 1);
        assert!(!core.is_poisoned());
    }

    #[test]
    fn busy_core_skips_tick() {
        let core = Mutex::new(SamplerCore::new(Box::new(FakeSource::default()), settings(3)));
        let _held = core.lock().unwrap();
        assert!(run_tick(&core).is_none());
    }
}
