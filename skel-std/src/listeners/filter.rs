//! Filter listener for conditional event processing.

use skel_core::{BoxError, Event, Flow, Listener};

/// A listener that only forwards events matching a predicate.
///
/// Events the predicate rejects continue to the next listener untouched.
pub struct FilterListener<L, F> {
    inner: L,
    predicate: F,
}

impl<L, F> FilterListener<L, F> {
    /// Create a new filter listener around `inner`.
    pub fn new(inner: L, predicate: F) -> Self {
        Self { inner, predicate }
    }
}

impl<L, F> Listener for FilterListener<L, F>
where
    L: Listener,
    F: Fn(&Event<'_>) -> bool + Send + Sync + 'static,
{
    fn on_event(&self, event: &Event<'_>) -> Result<Flow, BoxError> {
        if (self.predicate)(event) {
            self.inner.on_event(event)
        } else {
            Ok(Flow::Continue)
        }
    }
}
