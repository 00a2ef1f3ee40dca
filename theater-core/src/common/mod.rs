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

//! Provides the runtime components of the Theater core.
//!
//! # Key Re-exported Components:
//!
//! *   [`MessageBus`]: FIFO message queue, handler registry and dispatch loop.
//! *   [`Pulsar`]: periodic scheduler driving registered behaviors.
//! *   [`RunStrategy`], [`Sequential`], [`Concurrent`]: how a pulsar tick runs its behaviors.
//! *   [`BusReport`], [`PulsarReport`]: failures caught inside the core.
//! *   [`TheaterError`]: errors returned to callers.
//! *   [`BusConfig`], [`PulsarConfig`]: serde-friendly configuration sections.

// --- Public Re-exports ---
pub use config::{BusConfig, PulsarConfig, UnroutedPolicy};
pub use error::{Result, TheaterError};
pub use message_bus::MessageBus;
pub use pulsar::{BehaviorKey, Pulsar, PulsarState};
pub use report::{BusReport, PulsarReport};
pub use run_strategy::{behave_isolated, Concurrent, RunStrategy, Sequential, TickContext};
pub use types::*;

// --- Submodules ---

/// Defines common type aliases and the registration entry.
mod types;

/// Defines configuration sections for the bus and pulsars.
mod config;
/// Defines the dispatch loop run by the [`MessageBus`].
mod dispatch;
/// Defines [`TheaterError`].
mod error;
/// Defines the [`MessageBus`].
mod message_bus;
/// Renders caught panic payloads.
mod panic;
/// Defines the [`Pulsar`].
mod pulsar;
/// Defines [`BusReport`] and [`PulsarReport`].
mod report;
/// Defines [`RunStrategy`] and the built-in strategies.
mod run_strategy;
