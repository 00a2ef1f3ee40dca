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

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use static_assertions::assert_impl_all;
use tokio::sync::{broadcast, mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::*;

use crate::common::dispatch;
use crate::common::types::{HandlerRegistry, Registration};
use crate::common::{BusConfig, BusReport, MsgFilter, MsgHandler, Result, TheaterError};
use crate::message::{Message, MsgKind};
use crate::traits::Notifier;

/// The publish/subscribe hub elements communicate through.
///
/// A `MessageBus` is a cheap handle: clones share the same queue, registry and
/// dispatch loop. Publishing never blocks; messages are queued FIFO and the dispatch
/// loop started by [`MessageBus::start`] pops them in order, running every accepting
/// handler as its own task.
///
/// Failures inside handlers or filters are caught per invocation and broadcast as
/// [`BusReport`]s; they never stop the loop.
#[derive(Clone)]
pub struct MessageBus {
    inner: Arc<BusInner>,
}

assert_impl_all!(MessageBus: Send, Sync, Clone);

/// Crate-internal: state shared between bus handles and the dispatch loop.
pub(crate) struct BusInner {
    pub(crate) outbox: mpsc::UnboundedSender<Message>,
    /// Taken by whichever dispatch loop starts first.
    pub(crate) inbox: Mutex<Option<mpsc::UnboundedReceiver<Message>>>,
    pub(crate) registry: HandlerRegistry,
    /// Cleared by [`MessageBus::stop`]; never set again.
    pub(crate) running: AtomicBool,
    pub(crate) pending: AtomicUsize,
    pub(crate) cancellation_token: CancellationToken,
    /// Cancelled once the dispatch loop has drained and all handlers finished.
    pub(crate) drained: CancellationToken,
    pub(crate) tracker: TaskTracker,
    pub(crate) permits: Option<Arc<Semaphore>>,
    pub(crate) reports: broadcast::Sender<BusReport>,
    pub(crate) config: BusConfig,
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageBus {
    /// Creates an empty bus with [`BusConfig::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Creates an empty bus.
    ///
    /// Nothing is dispatched until [`MessageBus::start`] (or
    /// [`MessageBus::run_dispatch_loop`]) is called; messages published before that
    /// wait in the queue.
    #[must_use]
    pub fn with_config(config: BusConfig) -> Self {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let (reports, _) = broadcast::channel(config.report_capacity.max(1));
        let permits = match config.max_concurrent_handlers {
            0 => None,
            limit => Some(Arc::new(Semaphore::new(limit))),
        };

        Self {
            inner: Arc::new(BusInner {
                outbox,
                inbox: Mutex::new(Some(inbox)),
                registry: HandlerRegistry::default(),
                running: AtomicBool::new(true),
                pending: AtomicUsize::new(0),
                cancellation_token: CancellationToken::new(),
                drained: CancellationToken::new(),
                tracker: TaskTracker::new(),
                permits,
                reports,
                config,
            }),
        }
    }

    /// Appends a `(filter, handler)` pair to the list for `kind`.
    ///
    /// Registrations are never removed. A registration made while the loop runs
    /// applies to every message dispatched after it; a `None` filter accepts all
    /// messages of the kind.
    pub fn register_handler(
        &self,
        kind: impl Into<MsgKind>,
        filter: Option<MsgFilter>,
        handler: MsgHandler,
    ) {
        let kind = kind.into();
        let mut entries = self.inner.registry.entry(kind.clone()).or_default();
        let index = entries.len();
        entries.push(Arc::new(Registration::new(filter, handler, index)));
        trace!(%kind, index, "registered handler");
    }

    /// Registers closure `handler` for messages of `kind` accepted by closure `filter`.
    pub fn on<F, H>(&self, kind: impl Into<MsgKind>, filter: F, handler: H)
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
        H: Fn(&Message) + Send + Sync + 'static,
    {
        let filter: MsgFilter = Arc::new(filter);
        self.register_handler(kind, Some(filter), Arc::new(handler));
    }

    /// Registers closure `handler` for every message of `kind`.
    pub fn on_all<H>(&self, kind: impl Into<MsgKind>, handler: H)
    where
        H: Fn(&Message) + Send + Sync + 'static,
    {
        self.register_handler(kind, None, Arc::new(handler));
    }

    /// Appends `message` to the FIFO. Never blocks; safe from any thread or handler.
    ///
    /// After [`MessageBus::stop`] this is a no-op.
    pub fn publish(&self, message: Message) {
        if !self.is_running() {
            trace!(kind = %message.kind(), "bus stopped, dropping message");
            return;
        }
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        if let Err(err) = self.inner.outbox.send(message) {
            self.inner.pending.fetch_sub(1, Ordering::SeqCst);
            trace!(kind = %err.0.kind(), "queue closed, dropping message");
        }
    }

    /// Spawns the dispatch loop on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// [`TheaterError::BusStopped`] after [`MessageBus::stop`], and
    /// [`TheaterError::BusAlreadyRunning`] if a loop already owns the queue.
    #[instrument(skip(self))]
    pub fn start(&self) -> Result<()> {
        let inbox = self.take_inbox()?;
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            dispatch::run(inner, inbox).await;
        });
        debug!("message bus dispatch loop spawned");
        Ok(())
    }

    /// Runs the dispatch loop on the calling task until [`MessageBus::stop`] is called
    /// from elsewhere.
    ///
    /// # Errors
    ///
    /// Same as [`MessageBus::start`].
    pub async fn run_dispatch_loop(&self) -> Result<()> {
        let inbox = self.take_inbox()?;
        dispatch::run(Arc::clone(&self.inner), inbox).await;
        Ok(())
    }

    fn take_inbox(&self) -> Result<mpsc::UnboundedReceiver<Message>> {
        if !self.is_running() {
            return Err(TheaterError::BusStopped);
        }
        let inbox = self
            .inner
            .inbox
            .lock()
            .take()
            .ok_or(TheaterError::BusAlreadyRunning)?;
        Ok(inbox)
    }

    /// Stops the bus.
    ///
    /// Further publishes are dropped. Messages already queued are still delivered, and
    /// this resolves once every handler invocation has finished. If the dispatch loop
    /// was never started, the queue is drained on the calling task. Calling it again is
    /// a no-op.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            trace!("message bus already stopped");
            return;
        }
        self.inner.cancellation_token.cancel();

        let unstarted = self.inner.inbox.lock().take();
        match unstarted {
            Some(inbox) => {
                trace!(pending = self.pending(), "dispatch loop never started, draining inline");
                dispatch::run(Arc::clone(&self.inner), inbox).await;
            }
            None => self.inner.drained.cancelled().await,
        }
        debug!("message bus stopped");
    }

    /// Subscribes to failure reports produced from now on.
    #[must_use]
    pub fn reports(&self) -> broadcast::Receiver<BusReport> {
        self.inner.reports.subscribe()
    }

    /// Number of registrations for `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: &MsgKind) -> usize {
        self.inner.registry.get(kind).map_or(0, |entries| entries.len())
    }

    /// `true` from construction until [`MessageBus::stop`] is called.
    ///
    /// A running bus accepts registrations and publishes whether or not its dispatch
    /// loop has been started yet.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Messages published but not yet popped by the dispatch loop.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// The configuration this bus was built with.
    #[must_use]
    pub fn config(&self) -> &BusConfig {
        &self.inner.config
    }
}

impl Notifier for MessageBus {
    fn notify(&self, message: Message) {
        self.publish(message);
    }
}

impl fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBus")
            .field("kinds", &self.inner.registry.len())
            .field("running", &self.is_running())
            .field("pending", &self.pending())
            .finish()
    }
}
