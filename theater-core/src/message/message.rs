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

use crate::message::{ElementId, MsgKind, MsgParams, ParamValue};
use crate::traits::NotifierRef;

/// An immutable record exchanged between elements through the bus.
///
/// Built with [`Message::new`] and the `with_*` builder methods, then handed to the bus
/// by value. Once published it is shared read-only between every matching handler, so
/// nothing the sender does afterwards can race with delivery.
#[derive(Clone)]
pub struct Message {
    kind: MsgKind,
    sender_id: ElementId,
    sender: Option<NotifierRef>,
    params: MsgParams,
}

impl Message {
    /// Creates a message with no payload and no sender capability.
    pub fn new(kind: impl Into<MsgKind>, sender_id: ElementId) -> Self {
        Self {
            kind: kind.into(),
            sender_id,
            sender: None,
            params: MsgParams::None,
        }
    }

    /// Attaches the sender's notifier so receivers can answer it.
    #[must_use]
    pub fn with_sender(mut self, sender: NotifierRef) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Sets the payload.
    #[must_use]
    pub fn with_params(mut self, params: impl Into<MsgParams>) -> Self {
        self.params = params.into();
        self
    }

    /// Adds a named field to the payload.
    ///
    /// The payload becomes [`MsgParams::Fields`]; a pointer, key or custom payload set
    /// earlier is discarded. Set fields before anything else, or use
    /// [`Message::with_params`] alone.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params = self.params.with_field(key, value);
        self
    }

    /// The routing kind.
    #[must_use]
    pub const fn kind(&self) -> &MsgKind {
        &self.kind
    }

    /// Identity of the sending element.
    #[must_use]
    pub const fn sender_id(&self) -> &ElementId {
        &self.sender_id
    }

    /// The sender's notifier capability, if it attached one.
    #[must_use]
    pub const fn sender(&self) -> Option<&NotifierRef> {
        self.sender.as_ref()
    }

    /// The payload.
    #[must_use]
    pub const fn params(&self) -> &MsgParams {
        &self.params
    }

    /// Hands `message` to the sender's notifier. Returns `false` if there is none.
    pub fn notify_sender(&self, message: Self) -> bool {
        match &self.sender {
            Some(sender) => {
                sender.notify(message);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("kind", &self.kind)
            .field("sender_id", &self.sender_id)
            .field("has_sender", &self.sender.is_some())
            .field("params", &self.params)
            .finish()
    }
}
