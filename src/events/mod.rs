//! Host broadcasts: types, filters and the bus.
//!
//! This module groups the broadcast **data model** and the **bus** that delivers
//! broadcasts to registered receivers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] broadcast classification and payload
//! - [`EventFilter`] per-registration match predicate
//! - [`EventBus`] host bus capability, [`Bus`] in-process implementation over
//!   `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: the host platform (or a simulation of it) via [`Bus::publish`].
//! - **Consumers**: [`Receiver`](crate::Receiver) implementations registered through
//!   [`EventBus::register`], typically by the [`SubscriptionManager`](crate::SubscriptionManager).

mod bus;
mod event;
mod filter;

pub use bus::{Bus, EventBus, RegistrationId};
pub use event::{Event, EventKind};
pub use filter::EventFilter;
