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

//! Message data model: who sent it, what kind it is, and what it carries.
//!
//! Everything in this module is plain data. The bus treats a [`MsgKind`] as an opaque
//! routing key and a [`MsgParams`] as an opaque payload; only the elements at either
//! end agree on the concrete payload shape for a given kind.

// --- Public Re-exports ---
pub use element_id::ElementId;
pub use message::Message;
pub use msg_kind::{InputKind, MsgKind};
pub use params::{CustomParams, KeyParams, MsgParams, ParamValue, PointerParams};

// --- Submodules ---

/// Defines the [`ElementId`] identity token.
mod element_id;
/// Defines the immutable [`Message`] record.
#[allow(clippy::module_inception)]
mod message;
/// Defines the [`MsgKind`] routing key and the [`InputKind`] vocabulary.
mod msg_kind;
/// Defines the closed [`MsgParams`] payload.
mod params;
/// Filter construction helpers.
pub mod filters;
