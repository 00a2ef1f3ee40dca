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

use derive_new::new;

use crate::common::MessageBus;
use crate::message::Message;

/// A shared reference to something that can publish messages.
pub type NotifierRef = Arc<dyn Notifier>;

/// The capability to publish messages.
///
/// Implementations must not block on delivery: publishing only enqueues.
pub trait Notifier: Send + Sync + 'static {
    /// Publishes `message`.
    fn notify(&self, message: Message);
}

/// The default [`Notifier`]: publishes onto the bus it was constructed with.
#[derive(new, Debug, Clone)]
pub struct BusNotifier {
    bus: MessageBus,
}

impl BusNotifier {
    /// The bus messages are published to.
    #[must_use]
    pub const fn bus(&self) -> &MessageBus {
        &self.bus
    }
}

impl Notifier for BusNotifier {
    fn notify(&self, message: Message) {
        self.bus.publish(message);
    }
}
