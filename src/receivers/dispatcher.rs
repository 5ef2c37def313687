//! # Dispatcher: maps each broadcast to one user-visible notification.
//!
//! The [`Dispatcher`] is the [`Receiver`] the subscription manager registers. It
//! is stateless: it holds only its configuration and the two outbound capabilities
//! ([`Notifier`], [`SystemState`]), so the bus can call it concurrently with itself.
//!
//! ## Mapping
//! ```text
//! BatteryLow          ─► "Battery low!"
//! PowerConnected      ─► "Charger connected!"
//! PowerDisconnected   ─► "Charger disconnected!"
//! BatteryChanged      ─► "New battery level: {percent}%"     (payload, else live reading)
//!                        "Invalid battery data"               (scale <= 0, level < 0, no reading)
//! TimeChanged         ─► "Time changed!"
//! PackageAdded        ─► "New app installed: {package}"
//!                        "Invalid package data"               (no package in data URI)
//! ConnectivityChanged ─► "Connectivity changed: {WiFi|Cellular|Other|NONE}"   (live query)
//! Unknown             ─► "Unexpected event received: {raw action}"            (+ warn)
//! ```
//!
//! ## Logging
//! Every call logs the raw action at `info`. Unknown actions and malformed payloads
//! add one `warn` record. All records carry the configured `tag` field.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::DispatchError;
use crate::events::{Event, EventKind};
use crate::platform::{BatteryStatus, Connectivity, Notifier, SystemState};
use crate::receivers::Receiver;

/// Shown when a battery-changed broadcast cannot produce a percentage.
pub const INVALID_BATTERY_TEXT: &str = "Invalid battery data";
/// Shown when a package-added broadcast has no package identifier.
pub const INVALID_PACKAGE_TEXT: &str = "Invalid package data";

/// Stateless broadcast-to-notification dispatcher.
pub struct Dispatcher {
    config: Config,
    notifier: Arc<dyn Notifier>,
    state: Arc<dyn SystemState>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given outbound capabilities.
    pub fn new(config: Config, notifier: Arc<dyn Notifier>, state: Arc<dyn SystemState>) -> Self {
        Self {
            config,
            notifier,
            state,
        }
    }

    /// Log tag this dispatcher writes under.
    pub fn tag(&self) -> &str {
        &self.config.tag
    }

    /// Renders the notification text for a broadcast without showing it.
    ///
    /// Total over [`EventKind`]: every kind, including `Unknown`, has a text.
    /// Only malformed payloads return an error.
    pub fn render(&self, event: &Event) -> Result<String, DispatchError> {
        let text = match event.kind {
            EventKind::BatteryLow => "Battery low!".to_string(),
            EventKind::PowerConnected => "Charger connected!".to_string(),
            EventKind::PowerDisconnected => "Charger disconnected!".to_string(),
            EventKind::BatteryChanged => {
                format!("New battery level: {}%", self.battery_percent(event)?)
            }
            EventKind::TimeChanged => "Time changed!".to_string(),
            EventKind::PackageAdded => {
                let package =
                    event
                        .scheme_specific_part()
                        .ok_or_else(|| DispatchError::MalformedPayload {
                            kind: EventKind::PackageAdded,
                            reason: format!("no package in data {:?}", event.data.as_deref()),
                        })?;
                format!("New app installed: {package}")
            }
            EventKind::ConnectivityChanged => {
                let caps = self.state.network_capabilities();
                format!(
                    "Connectivity changed: {}",
                    Connectivity::classify(caps.as_ref())
                )
            }
            EventKind::Unknown => format!("Unexpected event received: {}", event.action),
        };
        Ok(text)
    }

    /// Payload level/scale if both are present, otherwise the live reading.
    fn battery_percent(&self, event: &Event) -> Result<i32, DispatchError> {
        let reading = match (event.level, event.scale) {
            (Some(level), Some(scale)) => Some(BatteryStatus::new(level, scale)),
            _ => self.state.battery(),
        };
        let reading = reading.ok_or_else(|| DispatchError::MalformedPayload {
            kind: EventKind::BatteryChanged,
            reason: "no battery level or scale".to_string(),
        })?;
        reading
            .percent()
            .ok_or_else(|| DispatchError::MalformedPayload {
                kind: EventKind::BatteryChanged,
                reason: format!("level={} scale={}", reading.level, reading.scale),
            })
    }

    fn fallback_text(err: &DispatchError) -> &'static str {
        match err {
            DispatchError::MalformedPayload {
                kind: EventKind::PackageAdded,
                ..
            } => INVALID_PACKAGE_TEXT,
            DispatchError::MalformedPayload { .. } => INVALID_BATTERY_TEXT,
        }
    }

    fn show(&self, text: &str) {
        self.notifier.show(text, self.config.toast_duration);
    }
}

#[async_trait]
impl Receiver for Dispatcher {
    async fn handle(&self, event: &Event) {
        let tag = &*self.config.tag;
        tracing::info!(tag, action = %event.action, seq = event.seq, "broadcast received");

        match self.render(event) {
            Ok(text) => {
                if event.is_unknown() {
                    tracing::warn!(tag, action = %event.action, "unexpected broadcast");
                }
                self.show(&text);
            }
            Err(err) => {
                tracing::warn!(
                    tag,
                    action = %event.action,
                    error = err.as_label(),
                    detail = %err.as_message(),
                    "malformed broadcast payload"
                );
                self.show(Self::fallback_text(&err));
            }
        }
    }

    fn name(&self) -> &'static str {
        "Dispatcher"
    }
}
