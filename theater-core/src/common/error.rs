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

//! Errors returned to callers of the core.
//!
//! These are configuration and lifecycle mistakes, reported at the call that made
//! them. Failures *inside* running handlers or behaviors are not errors; they are
//! caught and surfaced as [`BusReport`](crate::common::BusReport) /
//! [`PulsarReport`](crate::common::PulsarReport) events.

use thiserror::Error;

/// Shorthand for results carrying a [`TheaterError`].
pub type Result<T, E = TheaterError> = std::result::Result<T, E>;

/// Errors produced by the message bus and the pulsar.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TheaterError {
    /// A pulsar was constructed with a zero or negative tick interval.
    #[error("pulsar interval must be positive, got {micros}µs")]
    InvalidInterval {
        /// The rejected interval in microseconds.
        micros: i64,
    },

    /// `start` was called on a pulsar that is already running.
    #[error("pulsar is already running")]
    PulsarAlreadyStarted,

    /// `start` was called on a pulsar that has been stopped; pulsars are not restartable.
    #[error("pulsar has been stopped and cannot be restarted")]
    PulsarStopped,

    /// `stop` was called on a pulsar that is not running.
    #[error("pulsar is not running")]
    PulsarNotRunning,

    /// The dispatch loop was started while another one owns the queue.
    #[error("message bus dispatch loop is already running")]
    BusAlreadyRunning,

    /// The dispatch loop was started after the bus was stopped.
    #[error("message bus has been stopped")]
    BusStopped,
}

impl TheaterError {
    /// Returns a short stable label (snake_case) for use in logs.
    #[must_use]
    pub const fn as_label(&self) -> &'static str {
        match self {
            Self::InvalidInterval { .. } => "invalid_interval",
            Self::PulsarAlreadyStarted => "pulsar_already_started",
            Self::PulsarStopped => "pulsar_stopped",
            Self::PulsarNotRunning => "pulsar_not_running",
            Self::BusAlreadyRunning => "bus_already_running",
            Self::BusStopped => "bus_stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_messages() {
        let err = TheaterError::InvalidInterval { micros: -5 };
        assert_eq!(err.as_label(), "invalid_interval");
        assert!(err.to_string().contains("-5"));
        assert_eq!(TheaterError::BusStopped.as_label(), "bus_stopped");
    }
}
