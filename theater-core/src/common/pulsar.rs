/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use static_assertions::assert_impl_all;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::*;

use crate::common::{PulsarReport, Result, RunStrategy, Sequential, TheaterError, TickContext};
use crate::traits::{Behavior, BehaviorRef};

const REPORT_CAPACITY: usize = 64;

/// Lifecycle of a [`Pulsar`]. Transitions only go forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulsarState {
    /// Constructed, not yet started.
    Idle,
    /// Ticking.
    Running,
    /// Stopped for good.
    Stopped,
}

/// Handle returned by [`Pulsar::register`], used to remove the behavior again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BehaviorKey(u64);

/// A periodic scheduler.
///
/// Every `interval` the pulsar takes a snapshot of its registered behaviors and hands it
/// to its [`RunStrategy`]. A tick that overruns delays the next one; ticks never
/// overlap. Behaviors registered or removed mid-tick take effect on the next tick.
///
/// `Pulsar` is a cheap handle; clones control the same scheduler.
#[derive(Clone)]
pub struct Pulsar {
    inner: Arc<PulsarInner>,
}

assert_impl_all!(Pulsar: Send, Sync, Clone);

struct PulsarInner {
    name: String,
    interval: Duration,
    behaviors: RwLock<Vec<(BehaviorKey, BehaviorRef)>>,
    next_key: AtomicU64,
    strategy: RwLock<Arc<dyn RunStrategy>>,
    state: Mutex<PulsarState>,
    ticks: AtomicU64,
    cancellation_token: CancellationToken,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
    reports: broadcast::Sender<PulsarReport>,
}

impl Pulsar {
    /// Creates an idle pulsar ticking every `interval`.
    ///
    /// # Errors
    ///
    /// [`TheaterError::InvalidInterval`] if `interval` is zero.
    pub fn new(interval: Duration) -> Result<Self> {
        Self::named("pulsar", interval)
    }

    /// Creates an idle pulsar with a name used in logs and reports.
    ///
    /// # Errors
    ///
    /// [`TheaterError::InvalidInterval`] if `interval` is zero.
    pub fn named(name: impl Into<String>, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(TheaterError::InvalidInterval { micros: 0 });
        }
        let (reports, _) = broadcast::channel(REPORT_CAPACITY);
        Ok(Self {
            inner: Arc::new(PulsarInner {
                name: name.into(),
                interval,
                behaviors: RwLock::new(Vec::new()),
                next_key: AtomicU64::new(0),
                strategy: RwLock::new(Arc::new(Sequential)),
                state: Mutex::new(PulsarState::Idle),
                ticks: AtomicU64::new(0),
                cancellation_token: CancellationToken::new(),
                loop_handle: Mutex::new(None),
                reports,
            }),
        })
    }

    /// Creates an idle pulsar from a signed microsecond interval.
    ///
    /// # Errors
    ///
    /// [`TheaterError::InvalidInterval`] if `micros` is zero or negative.
    pub fn from_micros(micros: i64) -> Result<Self> {
        match u64::try_from(micros) {
            Ok(value) if value > 0 => Self::new(Duration::from_micros(value)),
            _ => Err(TheaterError::InvalidInterval { micros }),
        }
    }

    /// Adds a behavior at the end of the tick order.
    pub fn register_behavior(&self, behavior: BehaviorRef) -> BehaviorKey {
        let key = BehaviorKey(self.inner.next_key.fetch_add(1, Ordering::SeqCst));
        trace!(pulsar = %self.inner.name, behavior = behavior.name(), "registering behavior");
        self.inner.behaviors.write().push((key, behavior));
        key
    }

    /// Adds `behavior` at the end of the tick order.
    pub fn register(&self, behavior: impl Behavior) -> BehaviorKey {
        self.register_behavior(Arc::new(behavior))
    }

    /// Removes a behavior. Returns `false` if the key is unknown or already removed.
    ///
    /// A tick already in progress still runs the removed behavior.
    pub fn remove_behavior(&self, key: BehaviorKey) -> bool {
        let mut behaviors = self.inner.behaviors.write();
        let before = behaviors.len();
        behaviors.retain(|(existing, _)| *existing != key);
        before != behaviors.len()
    }

    /// Number of registered behaviors.
    #[must_use]
    pub fn behavior_count(&self) -> usize {
        self.inner.behaviors.read().len()
    }

    /// Replaces the run strategy, effective from the next tick.
    pub fn set_strategy(&self, strategy: impl RunStrategy) {
        debug!(pulsar = %self.inner.name, ?strategy, "run strategy replaced");
        *self.inner.strategy.write() = Arc::new(strategy);
    }

    /// Begins ticking. The first tick fires one interval from now.
    ///
    /// # Errors
    ///
    /// [`TheaterError::PulsarAlreadyStarted`] while running and
    /// [`TheaterError::PulsarStopped`] after [`Pulsar::stop`].
    #[instrument(skip(self), fields(pulsar = %self.inner.name))]
    pub fn start(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        match *state {
            PulsarState::Running => return Err(TheaterError::PulsarAlreadyStarted),
            PulsarState::Stopped => return Err(TheaterError::PulsarStopped),
            PulsarState::Idle => {}
        }
        *state = PulsarState::Running;

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { tick_loop(inner).await });
        *self.inner.loop_handle.lock() = Some(handle);
        debug!(interval = ?self.inner.interval, "pulsar started");
        Ok(())
    }

    /// Stops ticking and waits for an in-progress tick to finish.
    ///
    /// No tick starts after this returns.
    ///
    /// # Errors
    ///
    /// [`TheaterError::PulsarNotRunning`] if the pulsar was never started or has
    /// already been stopped.
    #[instrument(skip(self), fields(pulsar = %self.inner.name))]
    pub async fn stop(&self) -> Result<()> {
        let handle = {
            let mut state = self.inner.state.lock();
            if *state != PulsarState::Running {
                return Err(TheaterError::PulsarNotRunning);
            }
            *state = PulsarState::Stopped;
            self.inner.loop_handle.lock().take()
        };
        self.inner.cancellation_token.cancel();

        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                error!(error = %err, "pulsar loop ended abnormally");
            }
        }
        debug!(ticks = self.tick_count(), "pulsar stopped");
        Ok(())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PulsarState {
        *self.inner.state.lock()
    }

    /// Ticks started so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.inner.ticks.load(Ordering::SeqCst)
    }

    /// The tick interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Name used in logs and reports.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Subscribes to failure reports produced from now on.
    #[must_use]
    pub fn reports(&self) -> broadcast::Receiver<PulsarReport> {
        self.inner.reports.subscribe()
    }
}

async fn tick_loop(inner: Arc<PulsarInner>) {
    let mut ticker = interval_at(Instant::now() + inner.interval, inner.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = inner.cancellation_token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let number = inner.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        let behaviors: Vec<BehaviorRef> = inner
            .behaviors
            .read()
            .iter()
            .map(|(_, behavior)| Arc::clone(behavior))
            .collect();
        let strategy = Arc::clone(&*inner.strategy.read());

        trace!(pulsar = %inner.name, tick = number, behaviors = behaviors.len(), "tick");
        let tick = TickContext::new(number, inner.name.clone(), inner.reports.clone());
        strategy.run(&tick, &behaviors).await;
    }
}

impl fmt::Debug for Pulsar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pulsar")
            .field("name", &self.inner.name)
            .field("interval", &self.inner.interval)
            .field("state", &self.state())
            .field("behaviors", &self.behavior_count())
            .field("ticks", &self.tick_count())
            .finish()
    }
}
