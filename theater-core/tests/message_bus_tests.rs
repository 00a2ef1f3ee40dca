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

//! Dispatch behavior of the message bus: ordering, filtering, fan-out, failure
//! isolation and shutdown.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use theater_core::prelude::*;
use tokio::sync::mpsc;
use tokio::sync::broadcast::error::TryRecvError;

use crate::setup::*;

mod setup;

fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    (count.clone(), count)
}

#[tokio::test]
async fn test_messages_are_handled_in_publish_order() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::with_config(BusConfig {
        max_concurrent_handlers: 1,
        ..BusConfig::default()
    });
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    bus.on_all("Step", move |msg| {
        if let Some(seq) = msg.params().get_int("seq") {
            recorder.lock().push(seq);
        }
    });

    bus.start()?;
    let sender = ElementId::new();
    for seq in 0..100_i64 {
        bus.publish(Message::new("Step", sender.clone()).with_field("seq", seq));
    }
    bus.stop().await;

    let expected: Vec<i64> = (0..100).collect();
    assert_eq!(*seen.lock(), expected);
    Ok(())
}

#[tokio::test]
async fn test_filter_selects_sender() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let button = ElementId::new();
    let other = ElementId::new();
    let (count, hits) = counter();

    bus.register_handler(
        "Click",
        Some(filters::from_sender(button.clone())),
        Arc::new(move |_msg: &Message| {
            hits.fetch_add(1, Ordering::SeqCst);
        }),
    );

    bus.start()?;
    bus.publish(Message::new("Click", button.clone()));
    bus.publish(Message::new("Click", other));
    bus.publish(Message::new("Click", button));
    bus.stop().await;

    assert_eq!(count.load(Ordering::SeqCst), 2);
    Ok(())
}

#[tokio::test]
async fn test_every_accepting_handler_runs_once() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let counts: Vec<Arc<AtomicUsize>> = (0..3).map(|_| Arc::new(AtomicUsize::new(0))).collect();
    for count in &counts {
        let count = count.clone();
        bus.on_all("Tick", move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        });
    }
    let (rejected, rejected_hits) = counter();
    bus.on(
        "Tick",
        |_| false,
        move |_| {
            rejected_hits.fetch_add(1, Ordering::SeqCst);
        },
    );
    assert_eq!(bus.handler_count(&MsgKind::from("Tick")), 4);

    bus.start()?;
    bus.publish(Message::new("Tick", ElementId::new()));
    bus.stop().await;

    for count in &counts {
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
    assert_eq!(rejected.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn test_unrouted_message_is_reported() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let mut reports = bus.reports();
    let sender = ElementId::new();

    bus.start()?;
    bus.publish(Message::new("Nobody", sender.clone()));
    bus.stop().await;

    assert_eq!(
        reports.try_recv()?,
        BusReport::Unrouted {
            kind: MsgKind::from("Nobody"),
            sender_id: sender,
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_unrouted_message_can_be_ignored() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::with_config(BusConfig {
        unrouted_policy: UnroutedPolicy::Ignore,
        ..BusConfig::default()
    });
    let mut reports = bus.reports();

    bus.start()?;
    bus.publish(Message::new("Nobody", ElementId::new()));
    bus.stop().await;

    assert!(matches!(reports.try_recv(), Err(TryRecvError::Empty)));
    Ok(())
}

#[tokio::test]
async fn test_handler_panic_does_not_stop_dispatch() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let mut reports = bus.reports();
    let (count, hits) = counter();

    bus.on_all("Work", |msg| {
        if msg.params().get_bool("explode") == Some(true) {
            panic!("handler exploded");
        }
    });
    bus.on_all("Work", move |_| {
        hits.fetch_add(1, Ordering::SeqCst);
    });
    let (status_count, status_hits) = counter();
    bus.on_all("Status", move |_| {
        status_hits.fetch_add(1, Ordering::SeqCst);
    });

    bus.start()?;
    let sender = ElementId::new();
    bus.publish(Message::new("Work", sender.clone()).with_field("explode", true));
    bus.publish(Message::new("Status", sender.clone()));
    bus.publish(Message::new("Work", sender.clone()));
    bus.stop().await;

    assert_eq!(count.load(Ordering::SeqCst), 2, "sibling handler ran for both messages");
    assert_eq!(status_count.load(Ordering::SeqCst), 1, "other kinds are still delivered");
    match reports.try_recv()? {
        BusReport::HandlerPanicked {
            kind,
            sender_id,
            registration,
            info,
        } => {
            assert_eq!(kind, MsgKind::from("Work"));
            assert_eq!(sender_id, sender);
            assert_eq!(registration, 0);
            assert_eq!(info, "handler exploded");
        }
        other => panic!("unexpected report {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_filter_panic_skips_only_its_handler() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let mut reports = bus.reports();
    let (skipped, skipped_hits) = counter();
    let (count, hits) = counter();

    bus.on(
        "Work",
        |_| panic!("filter exploded"),
        move |_| {
            skipped_hits.fetch_add(1, Ordering::SeqCst);
        },
    );
    bus.on_all("Work", move |_| {
        hits.fetch_add(1, Ordering::SeqCst);
    });

    bus.start()?;
    bus.publish(Message::new("Work", ElementId::new()));
    bus.stop().await;

    assert_eq!(skipped.load(Ordering::SeqCst), 0);
    assert_eq!(count.load(Ordering::SeqCst), 1);
    let report = reports.try_recv()?;
    assert_eq!(report.as_label(), "filter_panicked");
    Ok(())
}

#[tokio::test]
async fn test_handler_may_publish_while_dispatching() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let publisher = bus.clone();
    bus.on_all("Ping", move |msg| {
        publisher.publish(Message::new("Pong", msg.sender_id().clone()));
    });
    bus.on_all("Pong", move |msg| {
        let _ = tx.send(msg.sender_id().clone());
    });

    bus.start()?;
    let sender = ElementId::new();
    bus.publish(Message::new("Ping", sender.clone()));

    let echoed = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await?;
    assert_eq!(echoed, Some(sender));
    bus.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_registration_applies_to_later_messages() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::with_config(BusConfig {
        unrouted_policy: UnroutedPolicy::Ignore,
        ..BusConfig::default()
    });
    let (tx, mut rx) = mpsc::unbounded_channel();

    bus.start()?;
    bus.publish(Message::new("Late", ElementId::new()).with_field("n", 1));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(bus.pending(), 0);

    bus.on_all("Late", move |msg| {
        let _ = tx.send(msg.params().get_int("n"));
    });
    bus.publish(Message::new("Late", ElementId::new()).with_field("n", 2));

    let first = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await?;
    assert_eq!(first, Some(Some(2)));
    bus.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_stop_delivers_queued_messages() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let (count, hits) = counter();
    bus.on_all("Queued", move |_| {
        hits.fetch_add(1, Ordering::SeqCst);
    });

    for _ in 0..10 {
        bus.publish(Message::new("Queued", ElementId::new()));
    }
    assert_eq!(bus.pending(), 10);

    bus.start()?;
    bus.stop().await;

    assert_eq!(count.load(Ordering::SeqCst), 10);
    assert_eq!(bus.pending(), 0);
    assert!(!bus.is_running());
    Ok(())
}

#[tokio::test]
async fn test_stop_without_start_delivers_queued_messages() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let mut reports = bus.reports();
    let (count, hits) = counter();
    bus.on_all("Queued", move |_| {
        hits.fetch_add(1, Ordering::SeqCst);
    });

    for _ in 0..3 {
        bus.publish(Message::new("Queued", ElementId::new()));
    }
    bus.stop().await;

    assert_eq!(count.load(Ordering::SeqCst), 3);
    assert_eq!(bus.pending(), 0);
    assert!(matches!(reports.try_recv(), Err(TryRecvError::Empty)));
    assert_eq!(bus.start(), Err(TheaterError::BusStopped));
    Ok(())
}

#[tokio::test]
async fn test_slow_handler_does_not_delay_next_message() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let (tx, mut rx) = mpsc::unbounded_channel();

    bus.on_all("Slow", |_| {
        std::thread::sleep(Duration::from_millis(500));
    });
    bus.on_all("Fast", move |msg| {
        let _ = tx.send(msg.sender_id().clone());
    });

    bus.start()?;
    let sender = ElementId::new();
    bus.publish(Message::new("Slow", sender.clone()));
    bus.publish(Message::new("Slow", sender.clone()));
    bus.publish(Message::new("Fast", sender.clone()));

    let fast = tokio::time::timeout(Duration::from_millis(250), rx.recv()).await?;
    assert_eq!(fast, Some(sender));
    bus.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_publish_after_stop_is_dropped() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let (count, hits) = counter();
    bus.on_all("Late", move |_| {
        hits.fetch_add(1, Ordering::SeqCst);
    });

    bus.start()?;
    bus.stop().await;
    bus.publish(Message::new("Late", ElementId::new()));
    bus.stop().await;

    assert_eq!(bus.pending(), 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert_eq!(bus.start(), Err(TheaterError::BusStopped));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_bound_is_respected() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::with_config(BusConfig {
        max_concurrent_handlers: 2,
        ..BusConfig::default()
    });
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (done, done_hits) = counter();

    let (active_in, peak_in) = (active.clone(), peak.clone());
    bus.on_all("Slow", move |_| {
        let now = active_in.fetch_add(1, Ordering::SeqCst) + 1;
        peak_in.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(10));
        active_in.fetch_sub(1, Ordering::SeqCst);
        done_hits.fetch_add(1, Ordering::SeqCst);
    });

    bus.start()?;
    for _ in 0..8 {
        bus.publish(Message::new("Slow", ElementId::new()));
    }
    bus.stop().await;

    assert_eq!(done.load(Ordering::SeqCst), 8);
    assert!(peak.load(Ordering::SeqCst) <= 2);
    Ok(())
}

#[tokio::test]
async fn test_payload_free_message_reaches_handler() -> anyhow::Result<()> {
    initialize_tracing();
    let bus = MessageBus::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    bus.on_all(InputKind::KeyPressOn, move |msg| {
        let _ = tx.send(msg.params().is_empty());
    });

    bus.start()?;
    bus.publish(Message::new(InputKind::KeyPressOn, ElementId::new()));
    let empty = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await?;
    assert_eq!(empty, Some(true));
    bus.stop().await;
    Ok(())
}

#[tokio::test]
async fn test_fresh_bus_starts_empty_and_running() -> anyhow::Result<()> {
    initialize_tracing();
    let first = MessageBus::new();
    first.on_all("Used", |_| {});
    first.stop().await;

    let fresh = MessageBus::new();
    assert!(fresh.is_running());
    assert_eq!(fresh.pending(), 0);
    assert_eq!(fresh.handler_count(&MsgKind::from("Used")), 0);
    assert!(!first.is_running());
    Ok(())
}
