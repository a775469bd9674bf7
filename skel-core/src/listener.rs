//! # Listener
//!
//! The unit of extension. A listener observes one [`Event`] at a time and
//! decides whether notification continues ([`Flow::Continue`]) or stops
//! ([`Flow::Halt`]).
//!
//! Listeners are plain callable values. Any closure taking `&Event<'_>` and
//! returning something [`IntoFlow`] is a listener, so extensions never
//! need to be looked up by method name:
//!
//! ```rust,ignore
//! registry.register(EventKind::SetRequest, "audit", "log_request", |event: &Event<'_>| {
//!     println!("{event:?}");
//! })?;
//! ```
//!
//! Notification is synchronous and in order. A listener must not assume
//! it runs on another thread.

use crate::{
    error::BoxError,
    event::Event,
    flow::{Flow, IntoFlow},
};

/// An observer of lifecycle events.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener`",
    label = "missing `Listener` implementation",
    note = "Implement `Listener` or pass a closure `|event: &Event<'_>| ...`."
)]
pub trait Listener: Send + Sync + 'static {
    /// Called for every event of the kind the listener was registered for.
    fn on_event(&self, event: &Event<'_>) -> Result<Flow, BoxError>;
}

// Blanket impl for closures
impl<F, R> Listener for F
where
    F: Fn(&Event<'_>) -> R + Send + Sync + 'static,
    R: IntoFlow,
{
    fn on_event(&self, event: &Event<'_>) -> Result<Flow, BoxError> {
        (self)(event).into_flow()
    }
}
