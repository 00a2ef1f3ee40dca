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

use crate::message::{ElementId, MsgKind};

/// A failure observed by the dispatch loop.
///
/// Broadcast to every receiver obtained from
/// [`MessageBus::reports`](crate::common::MessageBus::reports). Reports are
/// fire-and-forget: with no receivers they are only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusReport {
    /// A message was published for a kind nothing has registered for.
    Unrouted {
        /// Kind of the message.
        kind: MsgKind,
        /// Sender of the message.
        sender_id: ElementId,
    },
    /// A filter panicked; its handler was skipped for this message.
    FilterPanicked {
        /// Kind of the message.
        kind: MsgKind,
        /// Sender of the message.
        sender_id: ElementId,
        /// Position of the registration within its kind.
        registration: usize,
        /// Rendered panic payload.
        info: String,
    },
    /// A handler panicked while processing a message.
    HandlerPanicked {
        /// Kind of the message.
        kind: MsgKind,
        /// Sender of the message.
        sender_id: ElementId,
        /// Position of the registration within its kind.
        registration: usize,
        /// Rendered panic payload.
        info: String,
    },
}

impl BusReport {
    /// Kind of the message the report is about.
    #[must_use]
    pub const fn kind(&self) -> &MsgKind {
        match self {
            Self::Unrouted { kind, .. }
            | Self::FilterPanicked { kind, .. }
            | Self::HandlerPanicked { kind, .. } => kind,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    #[must_use]
    pub const fn as_label(&self) -> &'static str {
        match self {
            Self::Unrouted { .. } => "unrouted",
            Self::FilterPanicked { .. } => "filter_panicked",
            Self::HandlerPanicked { .. } => "handler_panicked",
        }
    }
}

/// A failure observed by a pulsar tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PulsarReport {
    /// A behavior panicked; the rest of the tick went on.
    BehaviorPanicked {
        /// Name of the pulsar.
        pulsar: String,
        /// Name of the behavior.
        behavior: String,
        /// Tick number, starting at 1.
        tick: u64,
        /// Rendered panic payload.
        info: String,
    },
}
