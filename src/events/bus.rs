//! # Host event bus.
//!
//! [`EventBus`] is the capability a host binding provides: register a
//! [`Receiver`] against an [`EventFilter`], and unregister it again. One receiver
//! instance may be registered many times; unregistering removes all of them.
//!
//! [`Bus`] is the in-process implementation, a wrapper around
//! [`tokio::sync::broadcast`] with one worker task per registration.
//!
//! ## Architecture
//! ```text
//! Publishers (host):                       Registrations:
//!   battery ──┐                         ┌──► worker R1 ── filter ──► receiver.handle()
//!   clock   ──┼──► Bus (broadcast) ─────┼──► worker R2 ── filter ──► receiver.handle()
//!   network ──┘                         └──► worker RN ── filter ──► receiver.handle()
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls `broadcast::Sender::send`.
//! - **Subscribe at register time**: a registration sees every broadcast published
//!   after `register` returns.
//! - **Panic isolation**: a panicking receiver is logged; its worker keeps running.
//! - **Lag handling**: slow workers skip the oldest broadcasts and log how many.
//! - **No persistence**: broadcasts with no matching registration are dropped.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::event::Event;
use super::filter::EventFilter;
use crate::error::BusError;
use crate::receivers::Receiver;

/// Identifier of one registration on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(pub u64);

/// Capability of a host event bus.
///
/// Any host binding (a platform callback layer, a test double, the in-process
/// [`Bus`]) implements this so the subscription manager stays host-agnostic.
pub trait EventBus: Send + Sync {
    /// Registers `receiver` for broadcasts passing `filter`.
    fn register(&self, receiver: Arc<dyn Receiver>, filter: EventFilter) -> RegistrationId;

    /// Removes every registration of this receiver instance.
    ///
    /// Returns the number of registrations removed, or
    /// [`BusError::NotRegistered`] if there were none.
    fn unregister(&self, receiver: &Arc<dyn Receiver>) -> Result<usize, BusError>;
}

/// One live registration.
struct Registration {
    id: RegistrationId,
    receiver: Arc<dyn Receiver>,
    cancel: CancellationToken,
}

struct Shared {
    tx: broadcast::Sender<Event>,
    registrations: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
    tag: Arc<str>,
}

/// In-process broadcast bus.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone; clones share registrations.
///
/// `register` spawns a worker and must be called from inside a Tokio runtime.
#[derive(Clone)]
pub struct Bus {
    shared: Arc<Shared>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        Self::with_tag(capacity, crate::config::DEFAULT_TAG)
    }

    /// Creates a bus from a [`Config`](crate::Config) (capacity and log tag).
    pub fn from_config(config: &crate::Config) -> Self {
        Self::with_tag(config.bus_capacity_clamped(), config.tag.clone())
    }

    fn with_tag(capacity: usize, tag: impl Into<Arc<str>>) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self {
            shared: Arc::new(Shared {
                tx,
                registrations: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                tag: tag.into(),
            }),
        }
    }

    /// Publishes a broadcast to all live registrations.
    ///
    /// Returns how many workers were subscribed at the time of the call
    /// (before filtering). With no registrations the event is dropped.
    pub fn publish(&self, ev: Event) -> usize {
        self.shared.tx.send(ev).unwrap_or(0)
    }

    /// Number of live registrations.
    pub fn registrations(&self) -> usize {
        self.lock().len()
    }

    /// Cancels every registration.
    pub fn close(&self) {
        let drained: Vec<Registration> = self.lock().drain(..).collect();
        for reg in &drained {
            reg.cancel.cancel();
        }
        if !drained.is_empty() {
            tracing::debug!(tag = %self.shared.tag, count = drained.len(), "bus closed");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Registration>> {
        // Registrations stay consistent even if a holder panicked.
        self.shared
            .registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_worker(
        &self,
        id: RegistrationId,
        receiver: Arc<dyn Receiver>,
        filter: EventFilter,
        cancel: CancellationToken,
    ) {
        let mut rx = self.shared.tx.subscribe();
        let tag = self.shared.tag.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => {
                            if filter.matches(&ev) {
                                deliver(receiver.as_ref(), &ev, &tag).await;
                            }
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(
                                tag = %tag,
                                registration = id.0,
                                receiver = receiver.name(),
                                skipped,
                                "receiver lagged; broadcasts dropped"
                            );
                        }
                    }
                }
            }
        });
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::from_config(&crate::Config::default())
    }
}

impl EventBus for Bus {
    fn register(&self, receiver: Arc<dyn Receiver>, filter: EventFilter) -> RegistrationId {
        let id = RegistrationId(self.shared.next_id.fetch_add(1, AtomicOrdering::Relaxed));
        let cancel = CancellationToken::new();

        self.spawn_worker(id, Arc::clone(&receiver), filter, cancel.clone());
        self.lock().push(Registration {
            id,
            receiver,
            cancel,
        });
        id
    }

    fn unregister(&self, receiver: &Arc<dyn Receiver>) -> Result<usize, BusError> {
        let removed: Vec<Registration> = {
            let mut regs = self.lock();
            let (removed, kept): (Vec<_>, Vec<_>) = regs
                .drain(..)
                .partition(|reg| same_receiver(&reg.receiver, receiver));
            *regs = kept;
            removed
        };

        if removed.is_empty() {
            return Err(BusError::NotRegistered {
                receiver: receiver.name(),
            });
        }
        for reg in &removed {
            tracing::trace!(
                tag = %self.shared.tag,
                registration = reg.id.0,
                "registration cancelled"
            );
            reg.cancel.cancel();
        }
        Ok(removed.len())
    }
}

/// Identity comparison on the data pointer (vtables may differ across codegen units).
fn same_receiver(a: &Arc<dyn Receiver>, b: &Arc<dyn Receiver>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Calls the receiver, catching and logging a panic.
async fn deliver(receiver: &dyn Receiver, ev: &Event, tag: &str) {
    let fut = receiver.handle(ev);
    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
        let info = {
            let any = &*panic_err;
            if let Some(msg) = any.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = any.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            }
        };
        tracing::error!(
            tag = %tag,
            receiver = receiver.name(),
            action = %ev.action,
            info = %info,
            "receiver panicked"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use tracing::Level;

    use super::*;
    use crate::events::EventKind;
    use crate::testing::capture;

    #[derive(Default)]
    struct Counter {
        hits: AtomicUsize,
    }

    #[async_trait]
    impl Receiver for Counter {
        async fn handle(&self, _event: &Event) {
            self.hits.fetch_add(1, AtomicOrdering::SeqCst);
        }

        fn name(&self) -> &'static str {
            "counter"
        }
    }

    /// Panics on its first call, counts every call.
    #[derive(Default)]
    struct Exploding {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Receiver for Exploding {
        async fn handle(&self, _event: &Event) {
            if self.calls.fetch_add(1, AtomicOrdering::SeqCst) == 0 {
                panic!("boom");
            }
        }
    }

    /// Blocks every call until released.
    #[derive(Default)]
    struct Gated {
        hits: AtomicUsize,
        released: AtomicBool,
        gate: Notify,
    }

    #[async_trait]
    impl Receiver for Gated {
        async fn handle(&self, _event: &Event) {
            self.hits.fetch_add(1, AtomicOrdering::SeqCst);
            if !self.released.load(AtomicOrdering::SeqCst) {
                self.gate.notified().await;
            }
        }

        fn name(&self) -> &'static str {
            "gated"
        }
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_filtered_delivery() {
        let bus = Bus::new(16);
        let counter = Arc::new(Counter::default());
        bus.register(counter.clone(), EventFilter::new(EventKind::BatteryLow));

        bus.publish(Event::new(EventKind::BatteryLow));
        bus.publish(Event::new(EventKind::TimeChanged));
        settle().await;

        assert_eq!(counter.hits.load(AtomicOrdering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_double_registration_delivers_twice() {
        let bus = Bus::new(16);
        let counter = Arc::new(Counter::default());
        bus.register(counter.clone(), EventFilter::new(EventKind::TimeChanged));
        bus.register(counter.clone(), EventFilter::new(EventKind::TimeChanged));
        assert_eq!(bus.registrations(), 2);

        bus.publish(Event::new(EventKind::TimeChanged));
        settle().await;

        assert_eq!(counter.hits.load(AtomicOrdering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unregister_stops_delivery() {
        let bus = Bus::new(16);
        let counter = Arc::new(Counter::default());
        let as_receiver: Arc<dyn Receiver> = counter.clone();
        bus.register(as_receiver.clone(), EventFilter::new(EventKind::PowerConnected));
        bus.register(as_receiver.clone(), EventFilter::new(EventKind::PowerDisconnected));

        assert_eq!(bus.unregister(&as_receiver), Ok(2));
        assert_eq!(bus.registrations(), 0);

        bus.publish(Event::new(EventKind::PowerConnected));
        settle().await;
        assert_eq!(counter.hits.load(AtomicOrdering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unregister_unknown_receiver() {
        let bus = Bus::new(16);
        let registered: Arc<dyn Receiver> = Arc::new(Counter::default());
        let stranger: Arc<dyn Receiver> = Arc::new(Counter::default());
        bus.register(registered, EventFilter::new(EventKind::BatteryLow));

        assert_eq!(
            bus.unregister(&stranger),
            Err(BusError::NotRegistered { receiver: "counter" })
        );
        assert_eq!(bus.registrations(), 1);
    }

    #[tokio::test]
    async fn test_panicking_receiver_keeps_worker_alive() {
        let (logs, _guard) = capture();
        let bus = Bus::new(16);
        let exploding = Arc::new(Exploding::default());
        bus.register(exploding.clone(), EventFilter::new(EventKind::BatteryLow));

        bus.publish(Event::new(EventKind::BatteryLow));
        bus.publish(Event::new(EventKind::BatteryLow));
        settle().await;

        assert_eq!(exploding.calls.load(AtomicOrdering::SeqCst), 2);
        assert_eq!(bus.registrations(), 1);

        let errors = logs.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "receiver panicked");
        assert_eq!(errors[0].field("info"), Some("boom"));
    }

    #[tokio::test]
    async fn test_lagged_worker_warns_and_keeps_delivering() {
        let (logs, _guard) = capture();
        let bus = Bus::new(1);
        let gated = Arc::new(Gated::default());
        bus.register(gated.clone(), EventFilter::new(EventKind::BatteryLow));

        bus.publish(Event::new(EventKind::BatteryLow));
        while gated.hits.load(AtomicOrdering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        // Worker is parked inside the first call; capacity 1 keeps only the last.
        for _ in 0..3 {
            bus.publish(Event::new(EventKind::BatteryLow));
        }
        gated.released.store(true, AtomicOrdering::SeqCst);
        gated.gate.notify_one();
        settle().await;

        let warns = logs.at(Level::WARN);
        assert_eq!(warns.len(), 1);
        assert_eq!(warns[0].message, "receiver lagged; broadcasts dropped");
        assert_eq!(warns[0].field("skipped"), Some("2"));
        assert_eq!(warns[0].field("receiver"), Some("gated"));

        assert_eq!(gated.hits.load(AtomicOrdering::SeqCst), 2);

        bus.publish(Event::new(EventKind::BatteryLow));
        settle().await;
        assert_eq!(gated.hits.load(AtomicOrdering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_close_cancels_everything() {
        let bus = Bus::new(16);
        let counter = Arc::new(Counter::default());
        bus.register(counter.clone(), EventFilter::new(EventKind::BatteryLow));
        bus.close();

        assert_eq!(bus.registrations(), 0);
        bus.publish(Event::new(EventKind::BatteryLow));
        settle().await;
        assert_eq!(counter.hits.load(AtomicOrdering::SeqCst), 0);
    }
}
