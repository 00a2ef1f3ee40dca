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

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the dispatch loop does with a message whose kind has no registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnroutedPolicy {
    /// Log at `error` and broadcast [`BusReport::Unrouted`](crate::common::BusReport::Unrouted).
    #[default]
    Report,
    /// Log at `trace` only.
    Ignore,
}

/// Message bus configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Maximum handler invocations running at once; `0` means unbounded.
    ///
    /// When the bound is reached the dispatch loop waits for a slot before starting the
    /// next handler. Publishers are never affected.
    pub max_concurrent_handlers: usize,
    /// Policy for messages nobody registered for.
    pub unrouted_policy: UnroutedPolicy,
    /// Capacity of the report broadcast channel (minimum 1).
    pub report_capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            max_concurrent_handlers: 0,
            unrouted_policy: UnroutedPolicy::Report,
            report_capacity: 256,
        }
    }
}

/// Tick intervals of the two pulsars a stage runs, in microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulsarConfig {
    /// Interval of the pulsar driving components (roughly 60 ticks per second by default).
    pub component_interval_us: u64,
    /// Interval of the pulsar driving spaces.
    pub space_interval_us: u64,
}

impl Default for PulsarConfig {
    fn default() -> Self {
        Self {
            component_interval_us: 16_666,
            space_interval_us: 100_000,
        }
    }
}

impl PulsarConfig {
    /// Component pulsar interval as a `Duration`.
    #[must_use]
    pub const fn component_interval(&self) -> Duration {
        Duration::from_micros(self.component_interval_us)
    }

    /// Space pulsar interval as a `Duration`.
    #[must_use]
    pub const fn space_interval(&self) -> Duration {
        Duration::from_micros(self.space_interval_us)
    }
}
