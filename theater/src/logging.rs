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

use std::sync::Once;

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::TracingConfig;

static INIT: Once = Once::new();

/// Installs the global tracing subscriber described by `config`.
///
/// The filter comes from `RUST_LOG` when set, otherwise from `config.level`. With
/// `log_to_file` the output goes to a daily rolling file through a non-blocking
/// writer; keep the returned guard alive for as long as logs should be flushed.
///
/// Only the first call has any effect; later calls return `None`.
pub fn init_tracing(config: &TracingConfig) -> Option<WorkerGuard> {
    let mut guard = None;
    INIT.call_once(|| {
        guard = install(config);
    });
    guard
}

fn env_filter(config: &TracingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn install(config: &TracingConfig) -> Option<WorkerGuard> {
    if config.log_to_file {
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(config.log_file_prefix.as_str())
            .filename_suffix("log")
            .build(&config.log_directory);

        match appender {
            Ok(appender) => {
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let subscriber = FmtSubscriber::builder()
                    .with_env_filter(env_filter(config))
                    .with_target(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(writer)
                    .finish();
                return tracing::subscriber::set_global_default(subscriber)
                    .ok()
                    .map(|()| guard);
            }
            Err(e) => {
                install_stderr(config);
                warn!(
                    directory = %config.log_directory,
                    error = %e,
                    "could not open log file, logging to stderr"
                );
                return None;
            }
        }
    }

    install_stderr(config);
    None
}

fn install_stderr(config: &TracingConfig) {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();
    // Another subscriber may already be installed by the embedding application.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
