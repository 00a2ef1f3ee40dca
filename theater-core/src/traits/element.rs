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

use crate::common::{MessageBus, MsgFilter, MsgHandler};
use crate::message::{ElementId, Message, MsgKind};
use crate::traits::{BusNotifier, BusObserver, Notifier, Observer};

/// An independently identified unit of application state that communicates only
/// through the bus.
pub trait Element: Observer + Notifier {
    /// The element's identity.
    fn id(&self) -> &ElementId;

    /// Human readable name, used in logs.
    fn name(&self) -> &str {
        ""
    }
}

/// Identity plus bus-backed [`Observer`] and [`Notifier`] capabilities.
///
/// Embed one in an element type and delegate to it, or use it directly for elements
/// that need nothing more.
///
/// ```rust,ignore
/// struct Ship {
///     base: ElementBase,
/// }
///
/// impl Notifier for Ship {
///     fn notify(&self, message: Message) {
///         self.base.notify(message);
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ElementBase {
    id: ElementId,
    name: String,
    observer: BusObserver,
    notifier: BusNotifier,
}

impl ElementBase {
    /// Creates an element with a fresh [`ElementId`] wired to `bus`.
    pub fn new(bus: &MessageBus, name: impl Into<String>) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            observer: BusObserver::new(bus.clone()),
            notifier: BusNotifier::new(bus.clone()),
        }
    }

    /// Starts a message of `kind` stamped with this element's id.
    pub fn message(&self, kind: impl Into<MsgKind>) -> Message {
        Message::new(kind, self.id.clone())
    }

    /// The bus this element talks to.
    #[must_use]
    pub const fn bus(&self) -> &MessageBus {
        self.notifier.bus()
    }
}

impl Observer for ElementBase {
    fn observe(&self, kind: MsgKind, filter: Option<MsgFilter>, handler: MsgHandler) {
        self.observer.observe(kind, filter, handler);
    }
}

impl Notifier for ElementBase {
    fn notify(&self, message: Message) {
        self.notifier.notify(message);
    }
}

impl Element for ElementBase {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
