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

use crate::common::{MessageBus, MsgFilter, MsgHandler};
use crate::message::{Message, MsgKind};

/// The capability to register interest in a message kind.
///
/// `observe` is the only required method; the closure-taking helpers wrap it.
pub trait Observer: Send + Sync + 'static {
    /// Registers `handler` for `kind`, narrowed by `filter` (`None` accepts everything).
    fn observe(&self, kind: MsgKind, filter: Option<MsgFilter>, handler: MsgHandler);

    /// Registers closure `handler` for `kind`, guarded by closure `filter`.
    fn observe_when<F, H>(&self, kind: impl Into<MsgKind>, filter: F, handler: H)
    where
        Self: Sized,
        F: Fn(&Message) -> bool + Send + Sync + 'static,
        H: Fn(&Message) + Send + Sync + 'static,
    {
        let filter: MsgFilter = Arc::new(filter);
        self.observe(kind.into(), Some(filter), Arc::new(handler));
    }

    /// Registers closure `handler` for every message of `kind`.
    fn observe_all<H>(&self, kind: impl Into<MsgKind>, handler: H)
    where
        Self: Sized,
        H: Fn(&Message) + Send + Sync + 'static,
    {
        self.observe(kind.into(), None, Arc::new(handler));
    }
}

/// The default [`Observer`]: registers on the bus it was constructed with.
#[derive(new, Debug, Clone)]
pub struct BusObserver {
    bus: MessageBus,
}

impl BusObserver {
    /// The bus registrations go to.
    #[must_use]
    pub const fn bus(&self) -> &MessageBus {
        &self.bus
    }
}

impl Observer for BusObserver {
    fn observe(&self, kind: MsgKind, filter: Option<MsgFilter>, handler: MsgHandler) {
        self.bus.register_handler(kind, filter, handler);
    }
}
