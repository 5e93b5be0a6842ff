//! One long-running task per qualified topic (spec §4.8). Woken by a
//! coalesced [`tokio::sync::Notify`] signal or, as a safety net, a fixed
//! poll interval; consumers within a topic are served sequentially so a
//! single consumer never has two in-flight batches.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};

use super::delivery::deliver;
use crate::consumers::ConsumerRegistry;
use crate::scope::Scope;
use crate::store::{parse_sequence, EventStore, ReadQuery};

pub struct DispatcherHandle {
    pub wake: Arc<Notify>,
    stop: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl DispatcherHandle {
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        self.wake.notify_one();
        let _ = self.task.await;
    }
}

#[allow(clippy::too_many_arguments)]
pub fn spawn(
    scope: Scope,
    topic: String,
    qualified_topic: String,
    event_store: Arc<EventStore>,
    consumers: Arc<ConsumerRegistry>,
    client: reqwest::Client,
    batch_size: usize,
    poll_interval: Duration,
) -> DispatcherHandle {
    let wake = Arc::new(Notify::new());
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let task_wake = wake.clone();

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = task_wake.notified() => {}
                _ = tokio::time::sleep(poll_interval) => {}
                _ = stop_rx.changed() => {}
            }
            if *stop_rx.borrow() {
                break;
            }
            run_iteration(&scope, &topic, &qualified_topic, &event_store, &consumers, &client, batch_size).await;
        }
        tracing::info!(topic = %qualified_topic, "dispatcher stopped");
    });

    DispatcherHandle {
        wake,
        stop: stop_tx,
        task,
    }
}

async fn run_iteration(
    scope: &Scope,
    topic: &str,
    qualified_topic: &str,
    event_store: &EventStore,
    consumers: &ConsumerRegistry,
    client: &reqwest::Client,
    batch_size: usize,
) {
    for consumer in consumers.find_by_topic(qualified_topic) {
        let since_sequence = consumer.cursor(qualified_topic).and_then(|id| parse_sequence(&id));
        let query = ReadQuery {
            since_sequence,
            date: None,
            limit: Some(batch_size),
        };

        let events = match event_store.get_events(scope, topic, &query) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!(topic = %qualified_topic, consumer = %consumer.id, error = %e, "read failed, skipping consumer this iteration");
                continue;
            }
        };

        if events.is_empty() {
            continue;
        }

        let outcome = deliver(client, &consumer, &events).await;
        if outcome.success {
            let last_id = events.last().expect("checked non-empty above").id.clone();
            consumers.update_cursor(consumer.id, qualified_topic, &last_id);
        } else {
            tracing::warn!(
                topic = %qualified_topic,
                consumer = %consumer.id,
                reason = %outcome.error.unwrap_or_default(),
                "evicting consumer after failed delivery"
            );
            consumers.delete(consumer.id);
        }
    }
}
