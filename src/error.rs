//! Error types used by the dispatcher, the bus, and the subscription manager.
//!
//! This module defines three error enums:
//!
//! - [`DispatchError`]: a broadcast payload could not be turned into a message.
//! - [`BusError`]: registration bookkeeping on the host bus failed.
//! - [`SubscriptionError`]: the subscription manager was driven out of order.
//!
//! None of these cross the host bus boundary: the dispatcher resolves its own
//! errors to a fallback notification, and lifecycle hooks log instead of failing.
//! All types provide `as_label` (stable snake_case) and `as_message` helpers for logs.

use thiserror::Error;

use crate::events::EventKind;

/// # Errors produced while rendering a broadcast.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Payload is missing or inconsistent (e.g. battery scale of zero).
    #[error("malformed {kind} payload: {reason}")]
    MalformedPayload {
        /// Kind of the offending event.
        kind: EventKind,
        /// What was wrong with it.
        reason: String,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use receptor::{DispatchError, EventKind};
    ///
    /// let err = DispatchError::MalformedPayload { kind: EventKind::BatteryChanged, reason: "scale=0".into() };
    /// assert_eq!(err.as_label(), "dispatch_malformed_payload");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::MalformedPayload { .. } => "dispatch_malformed_payload",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::MalformedPayload { kind, reason } => {
                format!("malformed payload: kind={kind} reason={reason}")
            }
        }
    }
}

/// # Errors produced by a host event bus.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// Receiver has no live registrations on this bus.
    #[error("receiver '{receiver}' is not registered")]
    NotRegistered {
        /// Receiver name.
        receiver: &'static str,
    },
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::NotRegistered { .. } => "bus_not_registered",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BusError::NotRegistered { receiver } => format!("not registered: {receiver}"),
        }
    }
}

/// # Errors produced by the subscription manager.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionError {
    /// `deactivate` was called with no dispatcher registered.
    #[error("deactivate called without an active receiver")]
    NotActive,

    /// The host bus rejected the deregistration.
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl SubscriptionError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use receptor::SubscriptionError;
    ///
    /// assert_eq!(SubscriptionError::NotActive.as_label(), "subscription_not_active");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SubscriptionError::NotActive => "subscription_not_active",
            SubscriptionError::Bus(e) => e.as_label(),
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SubscriptionError::NotActive => "no active receiver to unregister".to_string(),
            SubscriptionError::Bus(e) => e.as_message(),
        }
    }

    /// Indicates whether this is the deregister-without-register caller error.
    pub fn is_unregistered(&self) -> bool {
        matches!(
            self,
            SubscriptionError::NotActive | SubscriptionError::Bus(BusError::NotRegistered { .. })
        )
    }
}
