//! Simulation scheduler — the repeating task that ticks every device.
//!
//! One round ticks every configured device sequentially, in discovery order,
//! each tick bounded by a timeout. A failing or slow device never stops the
//! round nor the loop; it is logged and counted in the [`RoundReport`].
//! Rounds never overlap, whether started by the loop or by
//! [`SimulationScheduler::run_round`].
//!
//! The clock is abstracted behind [`Ticker`] so tests drive rounds by hand
//! with a [`ChannelTicker`] instead of waiting for wall-clock periods.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use ladsim_domain::error::LadsError;
use ladsim_domain::view::{AbsorbanceReaderDevice, Shape};

use crate::ports::AddressSpaceHost;
use crate::services::synthesis::{PerturbationSource, SynthesisEngine, ValueGenerator};

/// Default period between two rounds.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);
/// Default time budget of a single device tick.
pub const DEFAULT_TICK_TIMEOUT: Duration = Duration::from_millis(500);

/// A source of round triggers.
pub trait Ticker: Send + 'static {
    /// Wait for the next trigger. Returns `false` once no more will come.
    fn tick(&mut self) -> impl Future<Output = bool> + Send;
}

/// Fixed-period ticker; the first trigger fires one period after creation.
///
/// Missed triggers are skipped rather than bursted, so a late round never
/// causes back-to-back rounds.
pub struct IntervalTicker {
    interval: tokio::time::Interval,
}

impl IntervalTicker {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

impl Ticker for IntervalTicker {
    fn tick(&mut self) -> impl Future<Output = bool> + Send {
        async {
            self.interval.tick().await;
            true
        }
    }
}

/// Ticker triggered through a [`TickHandle`].
pub struct ChannelTicker {
    rx: mpsc::UnboundedReceiver<()>,
}

/// Sending half of a [`ChannelTicker`]; dropping it ends the ticker.
#[derive(Clone)]
pub struct TickHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl ChannelTicker {
    #[must_use]
    pub fn new() -> (TickHandle, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (TickHandle { tx }, Self { rx })
    }
}

impl TickHandle {
    /// Request one round. Returns `false` when the ticker is gone.
    pub fn trigger(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

impl Ticker for ChannelTicker {
    fn tick(&mut self) -> impl Future<Output = bool> + Send {
        async { self.rx.recv().await.is_some() }
    }
}

/// Outcome of one round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Running totals published after every round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub rounds: u64,
    pub last: RoundReport,
}

struct Round<H, G, P> {
    engine: SynthesisEngine<H, G, P>,
    devices: Vec<AbsorbanceReaderDevice>,
    tick_timeout: Duration,
    stats: watch::Sender<SchedulerStats>,
    serial: AsyncMutex<()>,
}

impl<H, G, P> Round<H, G, P>
where
    H: AddressSpaceHost,
    G: ValueGenerator,
    P: PerturbationSource,
{
    async fn run(&self) -> RoundReport {
        let _serial = self.serial.lock().await;
        let mut report = RoundReport::default();
        for device in &self.devices {
            let outcome = tokio::time::timeout(self.tick_timeout, self.engine.tick(device))
                .await
                .unwrap_or(Err(LadsError::TickTimedOut {
                    after: self.tick_timeout,
                }));
            match outcome {
                Ok(_) => report.succeeded += 1,
                Err(err) => {
                    report.failed += 1;
                    tracing::warn!(device = %device.node_id(), error = %err, "tick failed");
                }
            }
        }
        self.stats.send_modify(|stats| {
            stats.rounds += 1;
            stats.last = report;
        });
        report
    }
}

struct Running {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owns the device list, the synthesis engine and the repeating task.
pub struct SimulationScheduler<H, G, P> {
    round: Arc<Round<H, G, P>>,
    running: Mutex<Option<Running>>,
}

impl<H, G, P> SimulationScheduler<H, G, P>
where
    H: AddressSpaceHost + 'static,
    G: ValueGenerator + 'static,
    P: PerturbationSource + 'static,
{
    /// Create a stopped scheduler for `devices`.
    pub fn new(
        engine: SynthesisEngine<H, G, P>,
        devices: Vec<AbsorbanceReaderDevice>,
        tick_timeout: Duration,
    ) -> Self {
        let (stats, _) = watch::channel(SchedulerStats::default());
        Self {
            round: Arc::new(Round {
                engine,
                devices,
                tick_timeout,
                stats,
                serial: AsyncMutex::new(()),
            }),
            running: Mutex::new(None),
        }
    }

    /// The devices ticked every round, in order.
    #[must_use]
    pub fn devices(&self) -> &[AbsorbanceReaderDevice] {
        &self.round.devices
    }

    /// Watch the statistics published after each round.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SchedulerStats> {
        self.round.stats.subscribe()
    }

    /// Run one round immediately, outside of the repeating task.
    ///
    /// Waits for a round in progress to finish first.
    pub async fn run_round(&self) -> RoundReport {
        self.round.run().await
    }

    /// Spawn the repeating task, one round per `ticker` trigger.
    ///
    /// Does nothing if the scheduler is already running.
    pub fn start<T: Ticker>(&self, mut ticker: T) {
        let mut running = self.lock();
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            tracing::warn!("scheduler already running");
            return;
        }
        let (shutdown, mut stop) = watch::channel(false);
        let round = Arc::clone(&self.round);
        let handle = tokio::spawn(async move {
            tracing::info!(devices = round.devices.len(), "simulation started");
            loop {
                tokio::select! {
                    biased;
                    _ = stop.changed() => break,
                    more = ticker.tick() => {
                        if !more {
                            break;
                        }
                        let report = round.run().await;
                        tracing::debug!(
                            succeeded = report.succeeded,
                            failed = report.failed,
                            "round finished"
                        );
                    }
                }
            }
            tracing::info!("simulation stopped");
        });
        *running = Some(Running { shutdown, handle });
    }

    /// Stop the repeating task, letting a round in progress finish.
    pub async fn stop(&self) {
        let Some(running) = self.lock().take() else {
            return;
        };
        let _ = running.shutdown.send(true);
        if let Err(err) = running.handle.await {
            tracing::error!(error = %err, "simulation task panicked");
        }
    }

    /// Whether the repeating task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
