//! # Live system state.
//!
//! [`SystemState`] is the outbound query capability the dispatcher uses when a
//! broadcast does not carry the data it needs: the active network's transports
//! and the current battery reading.
//!
//! Both queries must be pure reads (no shared mutable cache), so the dispatcher
//! can be called concurrently with itself without locking.

use std::fmt;

/// Network transport as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Wireless LAN.
    Wifi,
    /// Mobile data.
    Cellular,
    /// Wired LAN.
    Ethernet,
    /// Bluetooth tethering.
    Bluetooth,
    /// Virtual private network on top of another transport.
    Vpn,
}

/// Capability set of the active network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkCapabilities {
    transports: Vec<Transport>,
}

impl NetworkCapabilities {
    /// Empty set (no transports).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a transport (duplicates are ignored).
    #[must_use]
    pub fn with_transport(mut self, transport: Transport) -> Self {
        if !self.transports.contains(&transport) {
            self.transports.push(transport);
        }
        self
    }

    /// Returns `true` if `transport` is part of this set.
    pub fn has_transport(&self, transport: Transport) -> bool {
        self.transports.contains(&transport)
    }

    /// Transports in insertion order.
    pub fn transports(&self) -> &[Transport] {
        &self.transports
    }
}

impl FromIterator<Transport> for NetworkCapabilities {
    fn from_iter<I: IntoIterator<Item = Transport>>(iter: I) -> Self {
        iter.into_iter()
            .fold(NetworkCapabilities::new(), NetworkCapabilities::with_transport)
    }
}

/// Connectivity classification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Active network has WiFi.
    Wifi,
    /// Active network is cellular (and not WiFi).
    Cellular,
    /// Active network uses some other transport.
    Other,
    /// No active network.
    None,
}

impl Connectivity {
    /// Classifies the active network.
    ///
    /// WiFi wins over cellular; any other transport is `Other`; no active
    /// network (or one without transports) is `None`.
    pub fn classify(caps: Option<&NetworkCapabilities>) -> Self {
        let Some(caps) = caps else {
            return Connectivity::None;
        };
        if caps.has_transport(Transport::Wifi) {
            Connectivity::Wifi
        } else if caps.has_transport(Transport::Cellular) {
            Connectivity::Cellular
        } else if !caps.transports().is_empty() {
            Connectivity::Other
        } else {
            Connectivity::None
        }
    }

    /// Label shown to the user.
    pub fn as_str(&self) -> &'static str {
        match self {
            Connectivity::Wifi => "WiFi",
            Connectivity::Cellular => "Cellular",
            Connectivity::Other => "Other",
            Connectivity::None => "NONE",
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Battery reading: `level` out of `scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryStatus {
    /// Current level.
    pub level: i32,
    /// Maximum level.
    pub scale: i32,
}

impl BatteryStatus {
    /// Reading of `level` out of `scale`.
    pub fn new(level: i32, scale: i32) -> Self {
        Self { level, scale }
    }

    /// Integer percentage, or `None` if the reading cannot produce one
    /// (non-positive scale, negative level, or a level so far above scale that
    /// the percentage does not fit `i32`).
    ///
    /// Computed in `i64`, so `level * 100` never overflows.
    pub fn percent(&self) -> Option<i32> {
        if self.scale <= 0 || self.level < 0 {
            return None;
        }
        i32::try_from(i64::from(self.level) * 100 / i64::from(self.scale)).ok()
    }
}

/// Capability to query live system state.
pub trait SystemState: Send + Sync + 'static {
    /// Capabilities of the active network; `None` when there is no active network.
    fn network_capabilities(&self) -> Option<NetworkCapabilities>;

    /// Current battery reading, if the host exposes one.
    fn battery(&self) -> Option<BatteryStatus> {
        None
    }
}

/// System state fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct FixedState {
    network: Option<NetworkCapabilities>,
    battery: Option<BatteryStatus>,
}

impl FixedState {
    /// No active network, no battery reading.
    #[must_use]
    pub fn offline() -> Self {
        Self::default()
    }

    /// Active network with the given capabilities.
    #[must_use]
    pub fn with_network(mut self, caps: NetworkCapabilities) -> Self {
        self.network = Some(caps);
        self
    }

    /// Active network with a single transport.
    #[must_use]
    pub fn with_transport(self, transport: Transport) -> Self {
        self.with_network(NetworkCapabilities::new().with_transport(transport))
    }

    /// Live battery reading of `level` out of `scale`.
    #[must_use]
    pub fn with_battery(mut self, level: i32, scale: i32) -> Self {
        self.battery = Some(BatteryStatus::new(level, scale));
        self
    }
}

impl SystemState for FixedState {
    fn network_capabilities(&self) -> Option<NetworkCapabilities> {
        self.network.clone()
    }

    fn battery(&self) -> Option<BatteryStatus> {
        self.battery
    }
}
