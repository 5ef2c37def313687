//! # Event filters.
//!
//! An [`EventFilter`] selects which broadcasts a registration receives: one
//! [`EventKind`] and, optionally, a required data scheme (e.g. `package` for
//! package-added broadcasts).

use std::fmt;
use std::sync::Arc;

use super::event::{Event, EventKind};

/// Match predicate for one registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventFilter {
    /// Kind the event must have.
    pub kind: EventKind,
    /// Data scheme the event must carry, if set.
    pub scheme: Option<Arc<str>>,
}

impl EventFilter {
    /// Filter on kind only.
    pub fn new(kind: EventKind) -> Self {
        Self { kind, scheme: None }
    }

    /// Additionally requires the event's data URI to use `scheme`.
    pub fn with_scheme(mut self, scheme: impl Into<Arc<str>>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Returns `true` if the event passes this filter.
    ///
    /// With a scheme set, events without data never match.
    pub fn matches(&self, event: &Event) -> bool {
        if event.kind != self.kind {
            return false;
        }
        match &self.scheme {
            None => true,
            Some(required) => event.scheme() == Some(&**required),
        }
    }
}

impl fmt::Display for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scheme {
            None => write!(f, "{}", self.kind),
            Some(scheme) => write!(f, "{} (scheme={scheme})", self.kind),
        }
    }
}
