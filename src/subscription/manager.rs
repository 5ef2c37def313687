//! # SubscriptionManager: ties dispatcher registration to a host lifecycle window.
//!
//! ```text
//! on_create / activate()
//!   ├─► Dispatcher::new(config, notifier, state)      (exactly one per window)
//!   ├─► for filter in SubscriptionSet: bus.register(dispatcher, filter)
//!   └─► info "receiver registered"
//!
//! host delivers broadcasts ──► Dispatcher::handle(&Event)   (any thread, any number of times)
//!
//! on_destroy / deactivate()
//!   ├─► bus.unregister(dispatcher)                     (removes every registration)
//!   ├─► info "receiver unregistered"
//!   └─► dispatcher dropped
//! ```
//!
//! ## Rules
//! - Calls are single-threaded and strictly paired by the host lifecycle.
//! - `activate` twice without `deactivate` is caller error: it is logged and the
//!   first dispatcher's registrations are left behind.
//! - `deactivate` with nothing registered is reported, never a panic.

use std::sync::Arc;

use crate::config::Config;
use crate::error::SubscriptionError;
use crate::events::EventBus;
use crate::platform::{Notifier, SystemState};
use crate::receivers::{Dispatcher, Receiver};

use super::set::SubscriptionSet;

/// Registers one [`Dispatcher`] for the lifetime of a host component.
pub struct SubscriptionManager<B: EventBus> {
    bus: B,
    config: Config,
    notifier: Arc<dyn Notifier>,
    state: Arc<dyn SystemState>,
    subscriptions: SubscriptionSet,
    active: Option<Arc<Dispatcher>>,
}

impl<B: EventBus> SubscriptionManager<B> {
    /// Creates an inactive manager using [`SubscriptionSet::standard`].
    pub fn new(
        bus: B,
        config: Config,
        notifier: Arc<dyn Notifier>,
        state: Arc<dyn SystemState>,
    ) -> Self {
        Self {
            bus,
            config,
            notifier,
            state,
            subscriptions: SubscriptionSet::standard(),
            active: None,
        }
    }

    /// Replaces the filters used by the next [`activate`](Self::activate).
    #[must_use]
    pub fn with_subscriptions(mut self, subscriptions: SubscriptionSet) -> Self {
        self.subscriptions = subscriptions;
        self
    }

    /// Creates a dispatcher and registers it once per subscription entry.
    pub fn activate(&mut self) {
        let tag = &*self.config.tag;
        if self.active.is_some() {
            tracing::warn!(tag, "activate called while a receiver is registered");
        }

        let dispatcher = Arc::new(Dispatcher::new(
            self.config.clone(),
            Arc::clone(&self.notifier),
            Arc::clone(&self.state),
        ));
        let receiver: Arc<dyn Receiver> = dispatcher.clone();

        for filter in &self.subscriptions {
            let id = self.bus.register(Arc::clone(&receiver), filter.clone());
            tracing::debug!(tag, registration = id.0, %filter, "registered");
        }
        self.active = Some(dispatcher);

        tracing::info!(tag, count = self.subscriptions.len(), "receiver registered");
    }

    /// Unregisters the active dispatcher.
    ///
    /// Returns the number of registrations removed. With no active dispatcher this
    /// logs at error level and returns [`SubscriptionError::NotActive`].
    pub fn deactivate(&mut self) -> Result<usize, SubscriptionError> {
        let tag = &*self.config.tag;
        let Some(dispatcher) = self.active.take() else {
            let err = SubscriptionError::NotActive;
            tracing::error!(tag, error = err.as_label(), "{}", err.as_message());
            return Err(err);
        };

        let receiver: Arc<dyn Receiver> = dispatcher;
        match self.bus.unregister(&receiver) {
            Ok(removed) => {
                tracing::info!(tag, removed, "receiver unregistered");
                Ok(removed)
            }
            Err(e) => {
                let err = SubscriptionError::from(e);
                tracing::error!(tag, error = err.as_label(), "{}", err.as_message());
                Err(err)
            }
        }
    }

    /// Host creation hook.
    pub fn on_create(&mut self) {
        self.activate();
    }

    /// Host destruction hook. Failures are logged by [`deactivate`](Self::deactivate)
    /// and go no further.
    pub fn on_destroy(&mut self) {
        let _ = self.deactivate();
    }

    /// Returns `true` between `activate` and `deactivate`.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The dispatcher registered for the current window, if any.
    pub fn dispatcher(&self) -> Option<&Arc<Dispatcher>> {
        self.active.as_ref()
    }

    /// Filters used on `activate`.
    pub fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    /// Host bus the dispatcher is registered on.
    pub fn bus(&self) -> &B {
        &self.bus
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use tracing::Level;

    use super::*;
    use crate::error::BusError;
    use crate::events::{EventFilter, EventKind, RegistrationId};
    use crate::platform::{FixedState, MemoryNotifier};
    use crate::testing::capture;

    /// Host bus double that only keeps bookkeeping.
    #[derive(Default)]
    struct LedgerBus {
        entries: Mutex<Vec<(Arc<dyn Receiver>, EventFilter)>>,
    }

    impl LedgerBus {
        fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }

        fn filters(&self) -> Vec<EventFilter> {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .map(|(_, f)| f.clone())
                .collect()
        }
    }

    impl EventBus for LedgerBus {
        fn register(&self, receiver: Arc<dyn Receiver>, filter: EventFilter) -> RegistrationId {
            let mut entries = self.entries.lock().unwrap();
            entries.push((receiver, filter));
            RegistrationId(entries.len() as u64)
        }

        fn unregister(&self, receiver: &Arc<dyn Receiver>) -> Result<usize, BusError> {
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|(r, _)| {
                !std::ptr::eq(Arc::as_ptr(r).cast::<()>(), Arc::as_ptr(receiver).cast::<()>())
            });
            match before - entries.len() {
                0 => Err(BusError::NotRegistered {
                    receiver: receiver.name(),
                }),
                n => Ok(n),
            }
        }
    }

    fn manager() -> SubscriptionManager<LedgerBus> {
        SubscriptionManager::new(
            LedgerBus::default(),
            Config::default(),
            Arc::new(MemoryNotifier::new()),
            Arc::new(FixedState::offline()),
        )
    }

    #[test]
    fn test_activate_registers_every_filter_once() {
        let (logs, _guard) = capture();
        let mut m = manager();

        m.activate();

        assert!(m.is_active());
        assert_eq!(m.bus().len(), 7);
        assert_eq!(m.bus().filters(), m.subscriptions().iter().cloned().collect::<Vec<_>>());

        let infos = logs.at(Level::INFO);
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].message, "receiver registered");
        assert_eq!(infos[0].field("count"), Some("7"));
    }

    #[test]
    fn test_activate_then_deactivate_leaves_nothing() {
        let mut m = manager();
        m.activate();

        assert_eq!(m.deactivate(), Ok(7));
        assert_eq!(m.bus().len(), 0);
        assert!(!m.is_active());
        assert!(m.dispatcher().is_none());
    }

    #[test]
    fn test_deactivate_without_activate_reports() {
        let (logs, _guard) = capture();
        let mut m = manager();

        let err = m.deactivate().unwrap_err();
        assert_eq!(err, SubscriptionError::NotActive);
        assert!(err.is_unregistered());

        let errors = logs.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field("error"), Some("subscription_not_active"));
    }

    #[test]
    fn test_second_deactivate_reports() {
        let mut m = manager();
        m.on_create();
        m.on_destroy();
        m.on_destroy();

        assert_eq!(m.deactivate(), Err(SubscriptionError::NotActive));
        assert_eq!(m.bus().len(), 0);
    }

    #[test]
    fn test_double_activate_is_caller_error() {
        let (logs, _guard) = capture();
        let mut m = manager();

        m.activate();
        let first = Arc::clone(m.dispatcher().unwrap());
        m.activate();

        assert_eq!(m.bus().len(), 14);
        assert!(!Arc::ptr_eq(&first, m.dispatcher().unwrap()));
        assert_eq!(logs.at(Level::WARN).len(), 1);

        // Only the current dispatcher is paired with deactivate.
        assert_eq!(m.deactivate(), Ok(7));
        assert_eq!(m.bus().len(), 7);
    }

    #[test]
    fn test_custom_subscriptions() {
        let mut m = manager().with_subscriptions(
            SubscriptionSet::new()
                .with(EventFilter::new(EventKind::BatteryLow))
                .with(EventFilter::new(EventKind::TimeChanged)),
        );
        m.activate();
        assert_eq!(m.bus().len(), 2);
        assert_eq!(m.deactivate(), Ok(2));
    }

    #[test]
    fn test_bus_rejection_is_reported() {
        struct ForgetfulBus;

        impl EventBus for ForgetfulBus {
            fn register(
                &self,
                _receiver: Arc<dyn Receiver>,
                _filter: EventFilter,
            ) -> RegistrationId {
                RegistrationId(0)
            }

            fn unregister(&self, receiver: &Arc<dyn Receiver>) -> Result<usize, BusError> {
                Err(BusError::NotRegistered {
                    receiver: receiver.name(),
                })
            }
        }

        let mut m = SubscriptionManager::new(
            ForgetfulBus,
            Config::default(),
            Arc::new(MemoryNotifier::new()),
            Arc::new(FixedState::offline()),
        );
        m.activate();

        let err = m.deactivate().unwrap_err();
        assert_eq!(
            err,
            SubscriptionError::Bus(BusError::NotRegistered {
                receiver: "Dispatcher"
            })
        );
        assert_eq!(err.as_label(), "bus_not_registered");
        assert!(!m.is_active());
    }
}
