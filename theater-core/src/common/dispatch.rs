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

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::*;

use crate::common::message_bus::BusInner;
use crate::common::panic::panic_message;
use crate::common::types::Registration;
use crate::common::{BusReport, UnroutedPolicy};
use crate::message::Message;

/// The dispatch loop.
///
/// Pops messages in FIFO order and hands each one to [`deliver`]. On cancellation the
/// queue is closed, whatever is still in it is delivered, and the loop waits for all
/// handler tasks before signalling `drained`.
#[instrument(skip_all)]
pub(crate) async fn run(inner: Arc<BusInner>, mut inbox: mpsc::UnboundedReceiver<Message>) {
    let _drained = inner.drained.clone().drop_guard();
    trace!("dispatch loop started");

    loop {
        tokio::select! {
            biased;
            () = inner.cancellation_token.cancelled() => {
                trace!("dispatch loop cancelled");
                break;
            }
            incoming = inbox.recv() => {
                match incoming {
                    Some(message) => deliver(&inner, message).await,
                    None => break,
                }
            }
        }
    }

    inbox.close();
    while let Some(message) = inbox.recv().await {
        deliver(&inner, message).await;
    }

    inner.tracker.close();
    inner.tracker.wait().await;
    trace!("dispatch loop drained");
}

/// Runs every registration of the message's kind, in registration order.
///
/// Filters run inline; accepted handlers are spawned on the blocking pool. Registrations made after the
/// snapshot is taken do not see this message.
async fn deliver(inner: &BusInner, message: Message) {
    inner.pending.fetch_sub(1, Ordering::SeqCst);

    let entries: Vec<Arc<Registration>> = inner
        .registry
        .get(message.kind())
        .map(|entries| entries.value().clone())
        .unwrap_or_default();

    if entries.is_empty() {
        unrouted(inner, &message);
        return;
    }

    let message = Arc::new(message);
    for entry in entries {
        let accepted = match catch_unwind(AssertUnwindSafe(|| entry.accepts(&message))) {
            Ok(accepted) => accepted,
            Err(payload) => {
                let info = panic_message(payload.as_ref());
                error!(kind = %message.kind(), registration = entry.index, %info, "filter panicked");
                let _ = inner.reports.send(BusReport::FilterPanicked {
                    kind: message.kind().clone(),
                    sender_id: message.sender_id().clone(),
                    registration: entry.index,
                    info,
                });
                continue;
            }
        };
        if !accepted {
            continue;
        }

        let permit = match &inner.permits {
            Some(permits) => Arc::clone(permits).acquire_owned().await.ok(),
            None => None,
        };

        let message = Arc::clone(&message);
        let reports = inner.reports.clone();
        // Handlers are synchronous and may block; keep them off the runtime workers.
        inner.tracker.spawn_blocking(move || {
            let _permit = permit;
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| (entry.handler)(&message))) {
                let info = panic_message(payload.as_ref());
                error!(kind = %message.kind(), registration = entry.index, %info, "handler panicked");
                let _ = reports.send(BusReport::HandlerPanicked {
                    kind: message.kind().clone(),
                    sender_id: message.sender_id().clone(),
                    registration: entry.index,
                    info,
                });
            }
        });
    }
}

fn unrouted(inner: &BusInner, message: &Message) {
    match inner.config.unrouted_policy {
        UnroutedPolicy::Report => {
            error!(kind = %message.kind(), sender = %message.sender_id(), "no handler registered for message kind");
            let _ = inner.reports.send(BusReport::Unrouted {
                kind: message.kind().clone(),
                sender_id: message.sender_id().clone(),
            });
        }
        UnroutedPolicy::Ignore => {
            trace!(kind = %message.kind(), "ignoring unrouted message");
        }
    }
}
