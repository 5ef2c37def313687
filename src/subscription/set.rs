//! # SubscriptionSet: the filters a dispatcher is registered against.
//!
//! An ordered list of [`EventFilter`]s. Each entry becomes exactly one
//! registration on the host bus; duplicates are kept.

use crate::events::{EventFilter, EventKind};

/// Ordered set of registration filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionSet {
    filters: Vec<EventFilter>,
}

impl SubscriptionSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every known broadcast; package-added additionally requires the `package` scheme.
    #[must_use]
    pub fn standard() -> Self {
        EventKind::KNOWN
            .into_iter()
            .map(|kind| match kind {
                EventKind::PackageAdded => EventFilter::new(kind).with_scheme("package"),
                other => EventFilter::new(other),
            })
            .fold(Self::new(), Self::with)
    }

    /// Appends a filter.
    #[must_use]
    pub fn with(mut self, filter: EventFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventFilter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<'a> IntoIterator for &'a SubscriptionSet {
    type Item = &'a EventFilter;
    type IntoIter = std::slice::Iter<'a, EventFilter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}
