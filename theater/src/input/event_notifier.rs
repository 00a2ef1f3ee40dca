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

use std::sync::Arc;

use theater_core::prelude::*;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::*;

use crate::input::{to_message, InputEvent};

/// An element that turns raw input events into bus messages.
///
/// Every forwarded message carries the notifier as its sender, so handlers can answer
/// the input source through [`Message::notify_sender`].
#[derive(Debug, Clone)]
pub struct EventNotifier {
    base: ElementBase,
}

impl EventNotifier {
    /// Creates a notifier publishing to `bus`.
    pub fn new(bus: &MessageBus) -> Self {
        Self {
            base: ElementBase::new(bus, "event_notifier"),
        }
    }

    /// Publishes the message for `event`. Returns `false` if the event code has no
    /// message kind and was skipped.
    pub fn forward(self: &Arc<Self>, event: &InputEvent) -> bool {
        match to_message(event, self.base.id().clone()) {
            Some(message) => {
                let sender: NotifierRef = self.clone();
                self.base.notify(message.with_sender(sender));
                true
            }
            None => {
                trace!(code = ?event.code, "skipping input event without a message kind");
                false
            }
        }
    }

    /// Drains `events` on a new task until every sender is dropped.
    pub fn spawn(self: Arc<Self>, mut events: mpsc::Receiver<InputEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            debug!(id = %self.base.id(), "event notifier started");
            while let Some(event) = events.recv().await {
                trace!(%event, "input event");
                self.forward(&event);
            }
            debug!(id = %self.base.id(), "input channel closed, event notifier finished");
        })
    }
}

impl Observer for EventNotifier {
    fn observe(&self, kind: MsgKind, filter: Option<MsgFilter>, handler: MsgHandler) {
        self.base.observe(kind, filter, handler);
    }
}

impl Notifier for EventNotifier {
    fn notify(&self, message: Message) {
        self.base.notify(message);
    }
}

impl Element for EventNotifier {
    fn id(&self) -> &ElementId {
        self.base.id()
    }

    fn name(&self) -> &str {
        "event_notifier"
    }
}
