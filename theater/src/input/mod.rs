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

//! Input translation.
//!
//! An input source (a window system, a test harness) produces [`InputEvent`]s and sends
//! them over a channel; an [`EventNotifier`] drains the channel and publishes one bus
//! message per event, using the fixed [`InputKind`](theater_core::prelude::InputKind)
//! vocabulary.

pub use event::{Device, EventCode, InputEvent, Keyboard, Mouse, Scancode};
pub use event_notifier::EventNotifier;
pub use translate::{input_kind, input_params, to_message};

mod event;
mod event_notifier;
mod translate;
