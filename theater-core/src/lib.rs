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

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # Theater Core
//!
//! The communication and scheduling backbone of the Theater framework. Elements
//! (game or UI components) never hold references to each other; they publish
//! [`Message`](crate::message::Message)s onto a shared
//! [`MessageBus`](crate::common::MessageBus) and register filtered handlers for the
//! message kinds they care about. Time-driven state changes are driven separately
//! by a [`Pulsar`](crate::common::Pulsar), which ticks registered
//! [`Behavior`](crate::traits::Behavior)s at a fixed cadence.
//!
//! ## Key Concepts
//!
//! - **Messages**: immutable records of a [`MsgKind`](crate::message::MsgKind), the
//!   sender's [`ElementId`](crate::message::ElementId), an optional sender capability
//!   and a closed [`MsgParams`](crate::message::MsgParams) payload.
//! - **Message bus**: an unbounded FIFO plus a `kind -> [(filter, handler)]` registry.
//!   A dedicated dispatch loop pops messages in order and runs every accepting
//!   handler as its own tracked task, with per-invocation panic isolation.
//! - **Capabilities**: [`Observer`](crate::traits::Observer) and
//!   [`Notifier`](crate::traits::Notifier) traits, with bus-backed adapters that any
//!   element can compose.
//! - **Pulsar**: a periodic scheduler with a pluggable
//!   [`RunStrategy`](crate::common::RunStrategy).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use theater_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bus = MessageBus::new();
//!     bus.on_all("Greeting", |msg| println!("hello from {}", msg.sender_id()));
//!     bus.start()?;
//!     bus.publish(Message::new("Greeting", ElementId::new()));
//!     bus.stop().await;
//!     Ok(())
//! }
//! ```

/// Bus, dispatch loop, pulsar, run strategies, reports, errors and config sections.
pub(crate) mod common;

/// Identifiers, message kinds, payloads and reusable filters.
pub(crate) mod message;

/// Capability traits implemented by elements.
pub(crate) mod traits;

/// Reusable filter constructors, such as "from a specific sender".
pub mod filters {
    pub use crate::message::filters::*;
}

/// A prelude module for conveniently importing the most commonly used items.
///
/// # Re-exports
///
/// ## External Crates
/// *   [`async_trait::async_trait`]: needed to implement [`RunStrategy`](crate::common::RunStrategy).
///
/// ## Core Types
/// *   [`crate::common::MessageBus`]: The message queue and its dispatch loop.
/// *   [`crate::common::Pulsar`]: The periodic behavior scheduler.
/// *   [`crate::common::Sequential`] / [`crate::common::Concurrent`]: Built-in run strategies.
/// *   [`crate::common::BusReport`] / [`crate::common::PulsarReport`]: Failure reports.
/// *   [`crate::common::TheaterError`]: Errors returned to callers.
/// *   [`crate::message::Message`], [`crate::message::MsgKind`], [`crate::message::MsgParams`].
/// *   [`crate::traits::Observer`], [`crate::traits::Notifier`], [`crate::traits::Element`],
///     [`crate::traits::Behavior`].
pub mod prelude {
    pub use async_trait::async_trait;

    pub use crate::common::{
        behave_isolated, BehaviorKey, BusConfig, BusReport, Concurrent, MessageBus, MsgFilter,
        MsgHandler, Pulsar, PulsarConfig, PulsarReport, PulsarState, Result, RunStrategy,
        Sequential, TheaterError, TickContext, UnroutedPolicy,
    };
    pub use crate::filters;
    pub use crate::message::{
        CustomParams, ElementId, InputKind, KeyParams, Message, MsgKind, MsgParams, ParamValue,
        PointerParams,
    };
    pub use crate::traits::{
        behavior_fn, Behavior, BehaviorFn, BehaviorRef, BusNotifier, BusObserver, Element,
        ElementBase, Notifier, NotifierRef, Observer,
    };
}
