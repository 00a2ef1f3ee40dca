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

//! Reusable filter constructors.
//!
//! A filter runs on the dispatch loop once per registration per message, so every
//! filter built here is a pure, allocation-free check.

use std::collections::HashSet;
use std::sync::Arc;

use crate::common::MsgFilter;
use crate::message::{ElementId, Message};

/// Accepts messages sent by `sender`.
pub fn from_sender(sender: ElementId) -> MsgFilter {
    Arc::new(move |message: &Message| message.sender_id() == &sender)
}

/// Accepts messages sent by any of `senders`.
pub fn from_any_sender(senders: impl IntoIterator<Item = ElementId>) -> MsgFilter {
    let senders: HashSet<ElementId> = senders.into_iter().collect();
    Arc::new(move |message: &Message| senders.contains(message.sender_id()))
}

/// Wraps a predicate as a filter.
pub fn when<F>(predicate: F) -> MsgFilter
where
    F: Fn(&Message) -> bool + Send + Sync + 'static,
{
    Arc::new(predicate)
}

/// Accepts a message only if every filter does. An empty list accepts everything.
pub fn all(filters: Vec<MsgFilter>) -> MsgFilter {
    Arc::new(move |message: &Message| filters.iter().all(|filter| filter(message)))
}
