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

//! Defines common type aliases and supporting structures used within `theater-core`.
//!
//! This module centralizes the closure signatures stored in the bus registry so that
//! the bus, the capability traits and the filter helpers all agree on them.

use std::sync::Arc;

use dashmap::DashMap;
use derive_new::new;

use crate::message::{Message, MsgKind};

/// A predicate narrowing which messages of a kind a handler wants.
///
/// Runs on the dispatch loop for every registration of the message's kind, so it must
/// be pure and fast.
pub type MsgFilter = Arc<dyn Fn(&Message) -> bool + Send + Sync + 'static>;

/// A callback invoked with a message accepted by its filter.
///
/// Each invocation runs as its own task; it may publish further messages or mutate
/// element state, and must tolerate running concurrently with itself.
pub type MsgHandler = Arc<dyn Fn(&Message) + Send + Sync + 'static>;

/// Crate-internal: one `(filter, handler)` pair stored under a message kind.
///
/// Immutable once registered. `index` is the position within its kind's list and is
/// only used to identify the entry in logs and reports.
#[derive(new)]
pub(crate) struct Registration {
    pub(crate) filter: Option<MsgFilter>,
    pub(crate) handler: MsgHandler,
    pub(crate) index: usize,
}

impl Registration {
    /// A missing filter accepts everything.
    pub(crate) fn accepts(&self, message: &Message) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(message))
    }
}

/// Crate-internal: the handler registry, kind -> registrations in insertion order.
///
/// Grows only. Entries are `Arc`ed so the dispatch loop can snapshot a kind's list
/// without holding the shard lock while it spawns handlers.
pub(crate) type HandlerRegistry = DashMap<MsgKind, Vec<Arc<Registration>>>;
