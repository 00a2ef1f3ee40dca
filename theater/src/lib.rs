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

//! # Theater
//!
//! The embedding surface of the Theater framework. [`theater_core`] provides the
//! message bus and pulsars; this crate assembles them into a running
//! [`Stage`](crate::stage::Stage), loads configuration from the XDG config directory,
//! installs tracing, and translates raw input events into bus messages.
//!
//! ```rust,ignore
//! use theater::prelude::*;
//!
//! struct Title;
//!
//! impl Scene for Title {
//!     fn init(&self, context: &StageContext) {
//!         context.bus().on_all(InputKind::KeyPressOn, |msg| {
//!             println!("key {:?}", msg.params().key());
//!         });
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = TheaterConfig::load();
//!     let _guard = init_tracing(&config.tracing);
//!     let stage = Stage::launch_with_config(config).await?;
//!     stage.append_scene("title", Title);
//!     stage.enter_scene(&"title".into())?;
//!     stage.shutdown().await?;
//!     Ok(())
//! }
//! ```

/// Configuration loading.
pub mod config;
/// Stage-level errors.
pub mod error;
/// Raw input events and their translation to bus messages.
pub mod input;
/// Tracing subscriber setup.
pub mod logging;
/// The stage runtime and scenes.
pub mod stage;

/// A prelude module for conveniently importing the most commonly used items.
///
/// Re-exports the whole [`theater_core::prelude`] plus the stage, config, logging and
/// input types of this crate.
pub mod prelude {
    pub use theater_core::prelude::*;

    pub use crate::config::{TheaterConfig, TimeoutConfig, TracingConfig};
    pub use crate::error::StageError;
    pub use crate::input::{
        input_kind, to_message, Device, EventCode, EventNotifier, InputEvent, Keyboard, Mouse,
        Scancode,
    };
    pub use crate::logging::init_tracing;
    pub use crate::stage::{Scene, SceneId, Stage, StageContext};
}
