//! In-process publish/subscribe bus for domain events.
//!
//! [`EventBus`] owns an unbounded [`tokio::sync::mpsc`] queue drained by a
//! single dispatcher task. Publishing never blocks: the event is queued and
//! the call returns. The dispatcher pops events in FIFO order, looks up the
//! handlers subscribed to the event's [`EventKind`], and awaits each one in
//! registration order.
//!
//! A handler that returns an error or panics is logged and counted; it never
//! reaches the publisher and never stops delivery to the remaining handlers
//! or to later events. Delivery is best effort: events still queued when the
//! bus stops are lost.
//!
//! Handlers run on the dispatcher task, not on the publisher's request task,
//! so any state they touch must be behind its own lock.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock, mpsc, watch};
use tokio::task::JoinHandle;

use super::{Event, EventKind};

type HandlerFn = dyn Fn(Arc<Event>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync;

/// A named handler registered for one event kind.
struct Subscriber {
    name: String,
    handler: Box<HandlerFn>,
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Snapshot of the bus counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    /// Events accepted by [`EventBus::publish`].
    pub published: u64,
    /// Events popped and dispatched by the dispatcher.
    pub dispatched: u64,
    /// Handler invocations that returned an error or panicked.
    pub handler_failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    published: AtomicU64,
    dispatched: AtomicU64,
    handler_failures: AtomicU64,
}

/// State shared between the bus handles and the dispatcher task.
#[derive(Debug, Default)]
struct Shared {
    subscribers: RwLock<HashMap<EventKind, Vec<Arc<Subscriber>>>>,
    counters: Counters,
}

impl Shared {
    async fn dispatch(&self, event: Arc<Event>) {
        let subscribers = self
            .subscribers
            .read()
            .await
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();

        for subscriber in subscribers {
            let invocation = AssertUnwindSafe(async {
                (subscriber.handler)(Arc::clone(&event)).await
            });

            match invocation.catch_unwind().await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    self.counters
                        .handler_failures
                        .fetch_add(1, Ordering::Relaxed);
                    tracing::error!(
                        event_type = %event.kind(),
                        event_id = %event.id(),
                        subscriber = %subscriber.name,
                        error = %err,
                        "event handler failed"
                    );
                }
                Err(_) => {
                    self.counters
                        .handler_failures
                        .fetch_add(1, Ordering::Relaxed);
                    tracing::error!(
                        event_type = %event.kind(),
                        event_id = %event.id(),
                        subscriber = %subscriber.name,
                        "event handler panicked"
                    );
                }
            }
        }

        self.counters.dispatched.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug)]
struct Inner {
    sender: mpsc::UnboundedSender<Arc<Event>>,
    shared: Arc<Shared>,
    stop: watch::Sender<bool>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

/// Handle to an event bus and its dispatcher task.
///
/// Cloning is cheap; all clones share one queue, one subscriber table and
/// one dispatcher.
#[derive(Debug, Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    /// Creates a bus and spawns its dispatcher on the current tokio runtime.
    ///
    /// While the queue is empty the dispatcher wakes up every
    /// `poll_interval` so a stop request is never missed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn start(poll_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (stop, stop_rx) = watch::channel(false);
        let shared = Arc::new(Shared::default());

        let dispatcher = tokio::spawn(run_dispatcher(
            receiver,
            stop_rx,
            Arc::clone(&shared),
            poll_interval,
        ));

        Self {
            inner: Arc::new(Inner {
                sender,
                shared,
                stop,
                dispatcher: Mutex::new(Some(dispatcher)),
            }),
        }
    }

    /// Registers `handler` for events of `kind`.
    ///
    /// Handlers of one kind are invoked in the order they were registered.
    /// `name` identifies the handler in logs.
    pub async fn subscribe<F, Fut>(&self, kind: EventKind, name: impl Into<String>, handler: F)
    where
        F: Fn(Arc<Event>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let subscriber = Subscriber {
            name: name.into(),
            handler: Box::new(move |event: Arc<Event>| handler(event).boxed()),
        };
        tracing::debug!(event_type = %kind, subscriber = %subscriber.name, "handler subscribed");

        self.inner
            .shared
            .subscribers
            .write()
            .await
            .entry(kind)
            .or_default()
            .push(Arc::new(subscriber));
    }

    /// Queues `event` for asynchronous delivery and returns immediately.
    ///
    /// After [`EventBus::shutdown`] the event is dropped with a warning.
    pub fn publish(&self, event: impl Into<Event>) {
        let event = Arc::new(event.into());
        let kind = event.kind();
        let id = event.id();

        if self.inner.sender.send(event).is_err() {
            tracing::warn!(event_type = %kind, event_id = %id, "event bus stopped; event dropped");
            return;
        }

        self.inner
            .shared
            .counters
            .published
            .fetch_add(1, Ordering::Relaxed);
        tracing::debug!(event_type = %kind, event_id = %id, "event published");
    }

    /// Number of handlers registered for `kind`.
    pub async fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .shared
            .subscribers
            .read()
            .await
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Current counter values.
    #[must_use]
    pub fn stats(&self) -> BusStats {
        let counters = &self.inner.shared.counters;
        BusStats {
            published: counters.published.load(Ordering::Relaxed),
            dispatched: counters.dispatched.load(Ordering::Relaxed),
            handler_failures: counters.handler_failures.load(Ordering::Relaxed),
        }
    }

    /// Returns `true` while the dispatcher is accepting events.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.inner.sender.is_closed()
    }

    /// Signals the dispatcher to stop and waits for it to exit.
    ///
    /// A handler already running is allowed to finish; events still queued
    /// are discarded. Calling this more than once is harmless.
    pub async fn shutdown(&self) {
        self.inner.stop.send_replace(true);

        let dispatcher = self.inner.dispatcher.lock().await.take();
        if let Some(dispatcher) = dispatcher
            && let Err(err) = dispatcher.await
        {
            tracing::error!(error = %err, "event dispatcher terminated abnormally");
        }
    }
}

async fn run_dispatcher(
    mut receiver: mpsc::UnboundedReceiver<Arc<Event>>,
    mut stop: watch::Receiver<bool>,
    shared: Arc<Shared>,
    poll_interval: Duration,
) {
    tracing::info!(
        poll_interval_ms = poll_interval.as_millis() as u64,
        "event dispatcher started"
    );

    loop {
        if *stop.borrow() {
            break;
        }

        tokio::select! {
            biased;
            _ = stop.changed() => break,
            next = tokio::time::timeout(poll_interval, receiver.recv()) => match next {
                Ok(Some(event)) => shared.dispatch(event).await,
                Ok(None) => break,
                Err(_idle) => {}
            },
        }
    }

    receiver.close();
    tracing::info!("event dispatcher stopped");
}
