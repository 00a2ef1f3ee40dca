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

//! Capability traits an element may implement.
//!
//! *   [`Notifier`]: can publish messages.
//! *   [`Observer`]: can register interest in a message kind under a filter.
//! *   [`Element`]: an identified unit that is both.
//! *   [`Behavior`]: knows how to advance its own state by one pulsar tick.
//!
//! [`BusNotifier`], [`BusObserver`] and [`ElementBase`] are the bus-backed default
//! implementations; elements hold one and delegate to it.

// --- Public Re-exports ---
pub use behavior::{behavior_fn, Behavior, BehaviorFn, BehaviorRef};
pub use element::{Element, ElementBase};
pub use notifier::{BusNotifier, Notifier, NotifierRef};
pub use observer::{BusObserver, Observer};

// --- Submodules ---

/// Defines the [`Behavior`] trait.
mod behavior;
/// Defines the [`Element`] trait and [`ElementBase`].
mod element;
/// Defines the [`Notifier`] capability.
mod notifier;
/// Defines the [`Observer`] capability.
mod observer;
