//! # System broadcasts delivered by the host.
//!
//! The [`EventKind`] enum classifies the closed set of host broadcasts this crate
//! reacts to:
//! - **Power events**: battery low, charger connected/disconnected, battery level changed
//! - **Clock events**: wall-clock time was set
//! - **Package events**: an application was installed
//! - **Network events**: the active network changed
//!
//! Anything else is [`EventKind::Unknown`]; the raw action string is kept on the
//! [`Event`] so it can still be reported.
//!
//! The [`Event`] struct carries the kind-specific payload (battery level/scale,
//! data URI) plus a timestamp and sequence number.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use receptor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::BatteryChanged)
//!     .with_level(50)
//!     .with_scale(100);
//!
//! assert_eq!(ev.kind, EventKind::BatteryChanged);
//! assert_eq!(&*ev.action, "android.intent.action.BATTERY_CHANGED");
//! assert_eq!(ev.level, Some(50));
//!
//! let ev = Event::from_action("FOO_BAR");
//! assert_eq!(ev.kind, EventKind::Unknown);
//! assert_eq!(&*ev.action, "FOO_BAR");
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of host broadcasts.
///
/// The action strings returned by [`EventKind::action`] are the wire contract with
/// the host platform and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Power ===
    /// Battery level dropped below the host's "low" threshold.
    BatteryLow,

    /// External power was connected.
    PowerConnected,

    /// External power was disconnected.
    PowerDisconnected,

    /// Battery status changed. May fire many times in quick succession.
    ///
    /// Payload:
    /// - `level`: current battery level
    /// - `scale`: maximum battery level
    BatteryChanged,

    // === Clock ===
    /// Wall-clock time was set.
    TimeChanged,

    // === Packages ===
    /// A new application package was installed.
    ///
    /// Payload:
    /// - `data`: `package:<identifier>` URI
    PackageAdded,

    // === Network ===
    /// Active network changed. Carries no payload; current state is queried live.
    ConnectivityChanged,

    /// Any action outside the closed set above.
    Unknown,
}

impl EventKind {
    /// Every known kind, in registration order.
    pub const KNOWN: [EventKind; 7] = [
        EventKind::BatteryLow,
        EventKind::PowerConnected,
        EventKind::PowerDisconnected,
        EventKind::BatteryChanged,
        EventKind::TimeChanged,
        EventKind::PackageAdded,
        EventKind::ConnectivityChanged,
    ];

    /// Resolves a host action string. Unrecognized strings map to [`EventKind::Unknown`].
    pub fn from_action(action: &str) -> Self {
        match action {
            "android.intent.action.BATTERY_LOW" => EventKind::BatteryLow,
            "android.intent.action.ACTION_POWER_CONNECTED" => EventKind::PowerConnected,
            "android.intent.action.ACTION_POWER_DISCONNECTED" => EventKind::PowerDisconnected,
            "android.intent.action.BATTERY_CHANGED" => EventKind::BatteryChanged,
            "android.intent.action.TIME_SET" => EventKind::TimeChanged,
            "android.intent.action.PACKAGE_ADDED" => EventKind::PackageAdded,
            "android.net.conn.CONNECTIVITY_CHANGE" => EventKind::ConnectivityChanged,
            _ => EventKind::Unknown,
        }
    }

    /// Host action string for this kind; `None` for [`EventKind::Unknown`].
    pub fn action(&self) -> Option<&'static str> {
        match self {
            EventKind::BatteryLow => Some("android.intent.action.BATTERY_LOW"),
            EventKind::PowerConnected => Some("android.intent.action.ACTION_POWER_CONNECTED"),
            EventKind::PowerDisconnected => {
                Some("android.intent.action.ACTION_POWER_DISCONNECTED")
            }
            EventKind::BatteryChanged => Some("android.intent.action.BATTERY_CHANGED"),
            EventKind::TimeChanged => Some("android.intent.action.TIME_SET"),
            EventKind::PackageAdded => Some("android.intent.action.PACKAGE_ADDED"),
            EventKind::ConnectivityChanged => Some("android.net.conn.CONNECTIVITY_CHANGE"),
            EventKind::Unknown => None,
        }
    }

    /// Short stable label (snake_case) for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::BatteryLow => "battery_low",
            EventKind::PowerConnected => "power_connected",
            EventKind::PowerDisconnected => "power_disconnected",
            EventKind::BatteryChanged => "battery_changed",
            EventKind::TimeChanged => "time_changed",
            EventKind::PackageAdded => "package_added",
            EventKind::ConnectivityChanged => "connectivity_changed",
            EventKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Host broadcast with optional payload.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `action`: raw action string as delivered by the host
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Raw action tag.
    pub action: Arc<str>,

    /// Current battery level (battery-changed only).
    pub level: Option<i32>,
    /// Maximum battery level (battery-changed only).
    pub scale: Option<i32>,
    /// Data URI, e.g. `package:com.example.app`.
    pub data: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of a known kind with current timestamp and next sequence number.
    ///
    /// Unknown broadcasts have no action string of their own; build them with
    /// [`Event::from_action`] so the raw tag is kept. Passing [`EventKind::Unknown`]
    /// here is a caller bug (debug builds panic; release builds get an empty action).
    pub fn new(kind: EventKind) -> Self {
        debug_assert!(
            kind != EventKind::Unknown,
            "Event::new(EventKind::Unknown) drops the raw action; use Event::from_action"
        );
        Self::build(kind, Arc::from(kind.action().unwrap_or_default()))
    }

    /// Creates an event from a raw host action string.
    pub fn from_action(action: impl Into<Arc<str>>) -> Self {
        let action = action.into();
        Self::build(EventKind::from_action(&action), action)
    }

    fn build(kind: EventKind, action: Arc<str>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            action,
            level: None,
            scale: None,
            data: None,
        }
    }

    /// Attaches the current battery level.
    #[inline]
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// Attaches the maximum battery level.
    #[inline]
    pub fn with_scale(mut self, scale: i32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Attaches a data URI.
    #[inline]
    pub fn with_data(mut self, data: impl Into<Arc<str>>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Creates a package-added event for the given package identifier.
    #[inline]
    pub fn package_added(package: &str) -> Self {
        Event::new(EventKind::PackageAdded).with_data(format!("package:{package}"))
    }

    /// Creates a battery-changed event with level and scale.
    #[inline]
    pub fn battery_changed(level: i32, scale: i32) -> Self {
        Event::new(EventKind::BatteryChanged)
            .with_level(level)
            .with_scale(scale)
    }

    /// Scheme of the data URI (text before the first `:`).
    pub fn scheme(&self) -> Option<&str> {
        let data = self.data.as_deref()?;
        data.split_once(':').map(|(scheme, _)| scheme)
    }

    /// Scheme-specific part of the data URI (text after the first `:`), if non-empty.
    pub fn scheme_specific_part(&self) -> Option<&str> {
        let data = self.data.as_deref()?;
        data.split_once(':')
            .map(|(_, rest)| rest)
            .filter(|rest| !rest.is_empty())
    }

    /// Returns `true` if the action is outside the known set.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, EventKind::Unknown)
    }
}
