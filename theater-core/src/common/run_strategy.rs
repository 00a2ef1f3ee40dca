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

use std::fmt::Debug;
use std::panic::{catch_unwind, AssertUnwindSafe};

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::*;

use crate::common::panic::panic_message;
use crate::common::PulsarReport;
use crate::traits::BehaviorRef;

/// Per-tick information handed to a [`RunStrategy`].
#[derive(Debug, Clone)]
pub struct TickContext {
    number: u64,
    pulsar: String,
    reports: broadcast::Sender<PulsarReport>,
}

impl TickContext {
    pub(crate) fn new(number: u64, pulsar: String, reports: broadcast::Sender<PulsarReport>) -> Self {
        Self {
            number,
            pulsar,
            reports,
        }
    }

    /// Tick number, starting at 1.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Name of the pulsar that produced this tick.
    #[must_use]
    pub fn pulsar(&self) -> &str {
        &self.pulsar
    }

    /// Broadcasts a report to the pulsar's report subscribers.
    pub fn report(&self, report: PulsarReport) {
        let _ = self.reports.send(report);
    }
}

/// Decides how a pulsar runs its behaviors on each tick.
///
/// Implementations must call each behavior at most once per tick, and should isolate
/// failures per behavior (see [`behave_isolated`]). The tick is finished when `run`
/// returns; the pulsar never overlaps two ticks.
#[async_trait]
pub trait RunStrategy: Debug + Send + Sync + 'static {
    /// Runs one tick over a snapshot of the registered behaviors.
    async fn run(&self, tick: &TickContext, behaviors: &[BehaviorRef]);
}

/// Calls `behavior.behave()`, catching a panic and reporting it.
///
/// Returns `false` if the behavior panicked.
pub fn behave_isolated(tick: &TickContext, behavior: &BehaviorRef) -> bool {
    match catch_unwind(AssertUnwindSafe(|| behavior.behave())) {
        Ok(()) => true,
        Err(payload) => {
            let info = panic_message(payload.as_ref());
            error!(
                pulsar = tick.pulsar(),
                behavior = behavior.name(),
                tick = tick.number(),
                %info,
                "behavior panicked"
            );
            tick.report(PulsarReport::BehaviorPanicked {
                pulsar: tick.pulsar().to_string(),
                behavior: behavior.name().to_string(),
                tick: tick.number(),
                info,
            });
            false
        }
    }
}

/// Runs behaviors one after another, in registration order, on the pulsar's task.
///
/// The default strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sequential;

#[async_trait]
impl RunStrategy for Sequential {
    async fn run(&self, tick: &TickContext, behaviors: &[BehaviorRef]) {
        for behavior in behaviors {
            behave_isolated(tick, behavior);
        }
    }
}

/// Runs every behavior of a tick on the blocking pool at once and waits for all of them.
#[derive(Debug, Default, Clone, Copy)]
pub struct Concurrent;

#[async_trait]
impl RunStrategy for Concurrent {
    async fn run(&self, tick: &TickContext, behaviors: &[BehaviorRef]) {
        let mut set = JoinSet::new();
        for behavior in behaviors {
            let behavior = BehaviorRef::clone(behavior);
            let tick = tick.clone();
            set.spawn_blocking(move || {
                behave_isolated(&tick, &behavior);
            });
        }
        while let Some(joined) = set.join_next().await {
            if let Err(err) = joined {
                error!(pulsar = tick.pulsar(), error = %err, "behavior task failed");
            }
        }
    }
}
