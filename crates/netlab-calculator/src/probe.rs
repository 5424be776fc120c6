//! Simulated latency probe.
//!
//! The only non-pure operation of the library. A probe models one in-flight ping per
//! widget: `start` moves it to `Pending`, a task sleeps for the configured delay, draws a
//! latency from the injected source and resolves to `Completed`. Triggering the probe
//! again while it is pending is a no-op. There is no cancellation and no failure outcome;
//! a task lost to a runtime shutdown or a panicking source puts the probe back to `Idle`.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::CalculatorError;

/// Simulated round trip before a sample resolves.
pub const PROBE_DELAY_MS: u64 = 700;
/// Fastest simulated reply.
pub const MIN_LATENCY_MS: u32 = 10;
/// Slowest simulated reply.
pub const MAX_LATENCY_MS: u32 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Timing of the simulated ping.
pub struct ProbeConstants {
    /// Delay before a sample resolves
    pub delay_ms: u64,
    /// Lower bound of sampled latencies
    pub min_latency_ms: u32,
    /// Upper bound of sampled latencies
    pub max_latency_ms: u32,
}

impl Default for ProbeConstants {
    fn default() -> Self {
        Self {
            delay_ms: PROBE_DELAY_MS,
            min_latency_ms: MIN_LATENCY_MS,
            max_latency_ms: MAX_LATENCY_MS,
        }
    }
}

impl ProbeConstants {
    /// `delay_ms` as a `Duration`.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Sampling range; an inverted configuration collapses to `min..=min`.
    pub fn latency_range(&self) -> RangeInclusive<u32> {
        self.min_latency_ms..=self.max_latency_ms.max(self.min_latency_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Outcome of one probe.
pub struct LatencySample {
    /// Simulated round trip
    pub latency_ms: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Observable state of a probe.
pub enum ProbeState {
    /// Never started, or its last run was lost
    #[default]
    Idle,
    /// A run is in flight
    Pending,
    /// The last run resolved with this sample
    Completed(LatencySample),
}

impl ProbeState {
    /// Whether a run is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Source of simulated latencies, injected so tests can script outcomes.
pub trait LatencySource: Send + 'static {
    /// Draws a latency in milliseconds from `range`.
    fn sample_ms(&mut self, range: RangeInclusive<u32>) -> u32;
}

/// Uniform sampling from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngLatencySource<R> {
    rng: R,
}

impl<R: Rng + Send + 'static> RngLatencySource<R> {
    /// Samples from `rng`.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngLatencySource<StdRng> {
    /// A generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// A reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send + 'static> LatencySource for RngLatencySource<R> {
    fn sample_ms(&mut self, range: RangeInclusive<u32>) -> u32 {
        self.rng.gen_range(range)
    }
}

struct ProbeShared<S> {
    constants: ProbeConstants,
    source: Mutex<S>,
    state: watch::Sender<ProbeState>,
}

/// One latency probe per widget instance.
pub struct LatencyProbe<S = RngLatencySource<StdRng>> {
    shared: Arc<ProbeShared<S>>,
}

impl LatencyProbe {
    /// A probe drawing from an entropy-seeded generator.
    pub fn new(constants: ProbeConstants) -> Self {
        Self::with_source(constants, RngLatencySource::from_entropy())
    }
}

impl Default for LatencyProbe {
    fn default() -> Self {
        Self::new(ProbeConstants::default())
    }
}

impl<S: LatencySource> LatencyProbe<S> {
    /// A probe drawing from `source`.
    pub fn with_source(constants: ProbeConstants, source: S) -> Self {
        let (state, _) = watch::channel(ProbeState::Idle);
        Self { shared: Arc::new(ProbeShared { constants, source: Mutex::new(source), state }) }
    }

    /// Timing this probe runs with.
    pub fn constants(&self) -> &ProbeConstants {
        &self.shared.constants
    }

    /// Whether a run is in flight.
    pub fn is_pending(&self) -> bool {
        self.shared.state.borrow().is_pending()
    }

    /// Current state.
    pub fn state(&self) -> ProbeState {
        *self.shared.state.borrow()
    }

    /// Receiver notified on every transition, for driving a loading indicator.
    pub fn subscribe(&self) -> watch::Receiver<ProbeState> {
        self.shared.state.subscribe()
    }

    /// Starts a probe, or returns `None` when one is already pending.
    ///
    /// Outside a Tokio runtime nothing is started and `None` is returned.
    pub fn start(&self) -> Option<ProbeHandle> {
        let Ok(runtime) = Handle::try_current() else {
            warn!("latency probe triggered outside a Tokio runtime, trigger ignored");
            return None;
        };
        let started = self.shared.state.send_if_modified(|state| {
            if state.is_pending() {
                false
            } else {
                *state = ProbeState::Pending;
                true
            }
        });
        if !started {
            debug!("latency probe already pending, trigger ignored");
            return None;
        }

        info!(delay_ms = self.shared.constants.delay_ms, "latency probe started");
        let run = PendingRun { shared: Arc::clone(&self.shared), resolved: false };
        let task = runtime.spawn(run.resolve());
        Some(ProbeHandle { task })
    }
}

/// The in-flight half of a probe. Dropped unresolved, it returns the probe to `Idle`.
struct PendingRun<S> {
    shared: Arc<ProbeShared<S>>,
    resolved: bool,
}

impl<S: LatencySource> PendingRun<S> {
    async fn resolve(mut self) -> LatencySample {
        let shared = &self.shared;
        tokio::time::sleep(shared.constants.delay()).await;
        let latency_ms = shared.source.lock().await.sample_ms(shared.constants.latency_range());
        let sample = LatencySample { latency_ms };
        shared.state.send_replace(ProbeState::Completed(sample));
        self.resolved = true;
        info!(latency_ms, "latency probe completed");
        sample
    }
}

impl<S> Drop for PendingRun<S> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let reset = self.shared.state.send_if_modified(|state| {
            let pending = state.is_pending();
            if pending {
                *state = ProbeState::Idle;
            }
            pending
        });
        if reset {
            warn!("latency probe stopped before resolving, back to idle");
        }
    }
}

/// Resolves once the probe it was issued for completes.
#[derive(Debug)]
pub struct ProbeHandle {
    task: JoinHandle<LatencySample>,
}

impl ProbeHandle {
    /// The sample, or `ProbeInterrupted` when the run was lost.
    pub async fn wait(self) -> Result<LatencySample, CalculatorError> {
        self.task.await.map_err(|_| CalculatorError::ProbeInterrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constants() {
        let c = ProbeConstants::default();
        assert_eq!(c.delay(), Duration::from_millis(700));
        assert_eq!(c.latency_range(), 10..=80);
    }

    #[test]
    fn seeded_source_stays_in_range() {
        let mut source = RngLatencySource::seeded(7);
        for _ in 0..1_000 {
            let ms = source.sample_ms(10..=80);
            assert!((10..=80).contains(&ms));
        }
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let mut a = RngLatencySource::seeded(42);
        let mut b = RngLatencySource::seeded(42);
        let xs: Vec<u32> = (0..16).map(|_| a.sample_ms(10..=80)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.sample_ms(10..=80)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn start_outside_a_runtime_is_refused() {
        let probe = LatencyProbe::with_source(ProbeConstants::default(), RngLatencySource::seeded(3));
        assert!(probe.start().is_none());
        assert_eq!(probe.state(), ProbeState::Idle);
    }

    #[test]
    fn runtime_shutdown_returns_to_idle() {
        let probe = LatencyProbe::with_source(ProbeConstants::default(), RngLatencySource::seeded(4));
        let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();

        let handle = runtime.block_on(async { probe.start() }).unwrap();
        assert!(probe.is_pending());
        drop(runtime);

        assert_eq!(probe.state(), ProbeState::Idle);

        let outcome =
            tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(handle.wait());
        assert_eq!(outcome, Err(CalculatorError::ProbeInterrupted));
        assert!(probe.start().is_none());
        assert_eq!(probe.state(), ProbeState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn starts_idle_and_completes() {
        let probe = LatencyProbe::with_source(ProbeConstants::default(), RngLatencySource::seeded(1));
        assert_eq!(probe.state(), ProbeState::Idle);

        let handle = probe.start().unwrap();
        assert!(probe.is_pending());

        let sample = handle.wait().await.unwrap();
        assert!((10..=80).contains(&sample.latency_ms));
        assert_eq!(probe.state(), ProbeState::Completed(sample));
    }
}
