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

//! Elements talking to each other through the observer and notifier capabilities.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use theater_core::prelude::*;
use tokio::sync::mpsc;

use crate::setup::*;

mod setup;

/// An element with its own state that composes the bus-backed capabilities.
struct Score {
    base: ElementBase,
    total: Arc<AtomicI64>,
}

impl Score {
    fn new(bus: &MessageBus) -> Self {
        Self {
            base: ElementBase::new(bus, "score"),
            total: Arc::new(AtomicI64::new(0)),
        }
    }

    fn listen_to(&self, scorer: ElementId) {
        let total = self.total.clone();
        self.base.observe(
            MsgKind::named("Scored"),
            Some(filters::from_sender(scorer)),
            Arc::new(move |msg: &Message| {
                total.fetch_add(msg.params().get_int("points").unwrap_or(0), Ordering::SeqCst);
            }),
        );
    }
}

impl Observer for Score {
    fn observe(&self, kind: MsgKind, filter: Option<MsgFilter>, handler: MsgHandler) {
        self.base.observe(kind, filter, handler);
    }
}

impl Notifier for Score {
    fn notify(&self, message: Message) {
        self.base.notify(message);
    }
}

impl Element for Score {
    fn id(&self) -> &ElementId {
        self.base.id()
    }

    fn name(&self) -> &str {
        "score"
    }
}

/// Collects whatever is sent to it; stands in for an element's reply address.
#[derive(Default)]
struct Mailbox {
    received: Mutex<Vec<Message>>,
}

impl Notifier for Mailbox {
    fn notify(&self, message: Message) {
        self.received.lock().push(message);
    }
}

#[tokio::test]
async fn test_element_receives_only_from_observed_sender() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let player = ElementBase::new(&bus, "player");
    let cheater = ElementBase::new(&bus, "cheater");
    let score = Score::new(&bus);
    score.listen_to(player.id().clone());

    bus.start()?;
    player.notify(player.message("Scored").with_field("points", 10));
    cheater.notify(cheater.message("Scored").with_field("points", 1000));
    player.notify(player.message("Scored").with_field("points", 5));
    bus.stop().await;

    assert_eq!(score.total.load(Ordering::SeqCst), 15);
    assert_eq!(Element::name(&score), "score");
    Ok(())
}

#[tokio::test]
async fn test_handler_replies_through_sender_capability() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let server = ElementBase::new(&bus, "server");
    let mailbox = Arc::new(Mailbox::default());

    let responder = server.clone();
    server.observe_all("Ask", move |msg| {
        let reply = responder.message("Answer").with_field("value", 42);
        assert!(msg.notify_sender(reply));
    });

    bus.start()?;
    let asker = ElementId::new();
    let sender: NotifierRef = mailbox.clone();
    bus.publish(Message::new("Ask", asker).with_sender(sender));
    bus.stop().await;

    let received = mailbox.received.lock();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].kind(), &MsgKind::from("Answer"));
    assert_eq!(received[0].sender_id(), server.id());
    assert_eq!(received[0].params().get_int("value"), Some(42));
    Ok(())
}

#[tokio::test]
async fn test_reply_to_bus_backed_sender_is_redispatched() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let server = ElementBase::new(&bus, "server");
    let client = ElementBase::new(&bus, "client");
    let (tx, mut rx) = mpsc::unbounded_channel();

    let responder = server.clone();
    server.observe_all("Ping", move |msg| {
        msg.notify_sender(responder.message("Pong"));
    });
    client.observe_when(
        "Pong",
        {
            let server_id = server.id().clone();
            move |msg: &Message| msg.sender_id() == &server_id
        },
        move |msg| {
            let _ = tx.send(msg.sender_id().clone());
        },
    );

    bus.start()?;
    let reply_to: NotifierRef = Arc::new(client.clone());
    client.notify(client.message("Ping").with_sender(reply_to));

    let from = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await?;
    assert_eq!(from.as_ref(), Some(server.id()));
    bus.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_message_without_sender_capability_cannot_be_answered() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    bus.on_all("Ask", move |msg| {
        let _ = tx.send(msg.notify_sender(Message::new("Answer", ElementId::new())));
    });

    bus.start()?;
    bus.publish(Message::new("Ask", ElementId::new()));
    let answered = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await?;
    assert_eq!(answered, Some(false));
    bus.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_bus_notifier_and_observer_adapters() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let observer = BusObserver::new(bus.clone());
    let notifier = BusNotifier::new(bus.clone());
    let (tx, mut rx) = mpsc::unbounded_channel();

    observer.observe_all(InputKind::MouseLeftDown, move |msg| {
        let _ = tx.send(msg.params().pointer().map(|p| (p.x, p.y)));
    });
    assert_eq!(bus.handler_count(&InputKind::MouseLeftDown.into()), 1);

    bus.start()?;
    notifier.notify(
        Message::new(InputKind::MouseLeftDown, ElementId::new())
            .with_params(PointerParams { x: 3, y: 4, move_x: 0.0, move_y: 0.0 }),
    );
    let clicked = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await?;
    assert_eq!(clicked, Some(Some((3, 4))));
    bus.stop().await;
    Ok(())
}
