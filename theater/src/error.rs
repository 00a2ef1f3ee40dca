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

use std::path::PathBuf;
use std::time::Duration;

use theater_core::prelude::TheaterError;
use thiserror::Error;

use crate::stage::SceneId;

/// Errors produced while configuring or running a [`Stage`](crate::stage::Stage).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StageError {
    /// An error from the bus or one of the pulsars.
    #[error(transparent)]
    Core(#[from] TheaterError),

    /// A configuration file could not be read or parsed.
    #[error("invalid configuration {path}: {reason}")]
    Config {
        /// The file that was read, or `<inline>` for string input.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// `enter_scene` named a scene that was never appended.
    #[error("unknown scene '{id}'")]
    UnknownScene {
        /// The requested scene.
        id: SceneId,
    },

    /// Shutdown did not complete within the configured timeout.
    #[error("shutdown did not finish within {timeout:?}")]
    ShutdownTimeout {
        /// The timeout that elapsed.
        timeout: Duration,
    },
}

impl StageError {
    /// Returns a short stable label (snake_case) for use in logs.
    #[must_use]
    pub const fn as_label(&self) -> &'static str {
        match self {
            Self::Core(err) => err.as_label(),
            Self::Config { .. } => "config",
            Self::UnknownScene { .. } => "unknown_scene",
            Self::ShutdownTimeout { .. } => "shutdown_timeout",
        }
    }
}
