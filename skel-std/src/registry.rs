//! Listener registry.
//!
//! Listeners are indexed by [`EventKind`] and, within a kind, kept in
//! registration order. A registration is identified by the triple
//! (kind, subscriber, handler): registering the same triple twice keeps
//! the first listener, removing an absent triple does nothing.

use skel_core::{DispatchError, Event, EventKind, Flow, Listener};
use std::{borrow::Cow, collections::HashMap, fmt, sync::Arc};

/// Identity of a registration within one event kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerKey {
    /// Who registered the listener (an extension name, a module path...).
    pub subscriber: Cow<'static, str>,
    /// Which of the subscriber's handlers this is.
    pub handler: Cow<'static, str>,
}

impl ListenerKey {
    /// Creates a key.
    pub fn new(
        subscriber: impl Into<Cow<'static, str>>,
        handler: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            subscriber: subscriber.into(),
            handler: handler.into(),
        }
    }
}

impl fmt::Display for ListenerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.subscriber, self.handler)
    }
}

/// A registered listener.
struct Entry {
    key: ListenerKey,
    listener: Arc<dyn Listener>,
}

/// Ordered, per-event registry of listeners.
///
/// # Concurrency
///
/// `notify()` takes `&self` and `register()` / `remove()` take `&mut self`,
/// so a listener can never mutate the registry while it is being notified.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: HashMap<EventKind, Vec<Entry>>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `kind` under `subscriber::handler`.
    ///
    /// A no-op if the triple is already registered. Otherwise the listener is
    /// appended and a [`Event::RegisterListener`] event is fired; an error
    /// from one of its listeners is returned after the registration took
    /// effect.
    pub fn register<L: Listener>(
        &mut self,
        kind: EventKind,
        subscriber: impl Into<Cow<'static, str>>,
        handler: impl Into<Cow<'static, str>>,
        listener: L,
    ) -> Result<&mut Self, DispatchError> {
        self.register_shared(kind, subscriber, handler, Arc::new(listener))
    }

    /// Registers an already shared listener, so the same value can be
    /// registered for several kinds.
    pub fn register_shared(
        &mut self,
        kind: EventKind,
        subscriber: impl Into<Cow<'static, str>>,
        handler: impl Into<Cow<'static, str>>,
        listener: Arc<dyn Listener>,
    ) -> Result<&mut Self, DispatchError> {
        let key = ListenerKey::new(subscriber, handler);
        let entries = self.listeners.entry(kind.clone()).or_default();
        if entries.iter().any(|e| e.key == key) {
            tracing::trace!(event = %kind, listener = %key, "listener already registered");
            return Ok(self);
        }

        tracing::debug!(event = %kind, listener = %key, "registering listener");
        entries.push(Entry {
            key: key.clone(),
            listener,
        });

        self.notify(&Event::RegisterListener {
            kind: &kind,
            subscriber: &key.subscriber,
            handler: &key.handler,
        })?;
        Ok(self)
    }

    /// Removes the registration for `subscriber::handler` under `kind`, if any.
    pub fn remove(&mut self, kind: &EventKind, subscriber: &str, handler: &str) -> &mut Self {
        if let Some(entries) = self.listeners.get_mut(kind) {
            if let Some(pos) = entries
                .iter()
                .position(|e| e.key.subscriber == subscriber && e.key.handler == handler)
            {
                entries.remove(pos);
                tracing::debug!(event = %kind, subscriber, handler, "removed listener");
            }
        }
        self
    }

    /// Notifies every listener registered for the event's kind, in
    /// registration order.
    ///
    /// Returns `Ok(false)` as soon as a listener halts, `Ok(true)` otherwise
    /// (including when nobody listens). Listener errors are not caught.
    pub fn notify(&self, event: &Event<'_>) -> Result<bool, DispatchError> {
        let kind = event.kind();
        let Some(entries) = self.listeners.get(&kind) else {
            return Ok(true);
        };

        for entry in entries {
            match entry.listener.on_event(event) {
                Ok(Flow::Continue) => continue,
                Ok(Flow::Halt) => {
                    tracing::debug!(event = %kind, listener = %entry.key, "notification halted");
                    return Ok(false);
                }
                Err(source) => {
                    return Err(DispatchError::Listener {
                        event: kind.to_string(),
                        subscriber: entry.key.subscriber.to_string(),
                        handler: entry.key.handler.to_string(),
                        source,
                    });
                }
            }
        }
        Ok(true)
    }

    /// Whether the triple is registered.
    pub fn contains(&self, kind: &EventKind, subscriber: &str, handler: &str) -> bool {
        self.listeners.get(kind).is_some_and(|entries| {
            entries
                .iter()
                .any(|e| e.key.subscriber == subscriber && e.key.handler == handler)
        })
    }

    /// Keys registered for `kind`, in notification order.
    pub fn listeners_for(&self, kind: &EventKind) -> Vec<&ListenerKey> {
        self.listeners
            .get(kind)
            .map(|entries| entries.iter().map(|e| &e.key).collect())
            .unwrap_or_default()
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, entries) in &self.listeners {
            let keys: Vec<String> = entries.iter().map(|e| e.key.to_string()).collect();
            map.entry(&kind.as_str(), &keys);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingListener;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    fn order_listener(id: usize, order: &Arc<Mutex<Vec<usize>>>, result: bool) -> impl Listener {
        let order = order.clone();
        move |_event: &Event<'_>| {
            order.lock().unwrap().push(id);
            result
        }
    }

    #[test]
    fn test_notify_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        for id in 1..=3 {
            registry
                .register(EventKind::SetRouter, "test", format!("h{id}"), order_listener(id, &order, true))
                .unwrap();
        }

        assert!(registry.notify(&Event::SetRouter).unwrap());
        assert_eq!(*order.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_false_halts_notification() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();
        registry
            .register(EventKind::SetRouter, "test", "first", order_listener(1, &order, true))
            .unwrap()
            .register(EventKind::SetRouter, "test", "veto", order_listener(2, &order, false))
            .unwrap()
            .register(EventKind::SetRouter, "test", "last", order_listener(3, &order, true))
            .unwrap();

        assert!(!registry.notify(&Event::SetRouter).unwrap());
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_no_listeners_continues() {
        let registry = ListenerRegistry::new();
        assert!(registry.notify(&Event::SetDatabase).unwrap());
    }

    #[test]
    fn test_duplicate_registration_is_noop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ListenerRegistry::new();
        for _ in 0..2 {
            let calls = calls.clone();
            registry
                .register(EventKind::SetRouter, "audit", "count", move |_: &Event<'_>| {
                    calls.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        assert_eq!(registry.len(), 1);
        registry.notify(&Event::SetRouter).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_same_handler_different_kinds() {
        let mut registry = ListenerRegistry::new();
        let shared: Arc<dyn Listener> = Arc::new(|_: &Event<'_>| ());
        registry
            .register_shared(EventKind::SetRouter, "audit", "any", shared.clone())
            .unwrap()
            .register_shared(EventKind::SetDatabase, "audit", "any", shared)
            .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut registry = ListenerRegistry::new();
        registry
            .register(EventKind::SetRouter, "a", "one", |_: &Event<'_>| ())
            .unwrap()
            .register(EventKind::SetRouter, "b", "two", |_: &Event<'_>| ())
            .unwrap();

        registry.remove(&EventKind::SetRouter, "a", "one");
        assert!(!registry.contains(&EventKind::SetRouter, "a", "one"));
        assert_eq!(
            registry.listeners_for(&EventKind::SetRouter),
            vec![&ListenerKey::new("b", "two")]
        );

        // Absent triples are ignored.
        registry
            .remove(&EventKind::SetRouter, "a", "one")
            .remove(&EventKind::ClearRequest, "x", "y");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_fires_meta_event() {
        let recorder = RecordingListener::new();
        let mut registry = ListenerRegistry::new();
        registry
            .register(EventKind::RegisterListener, "meta", "watch", recorder.clone())
            .unwrap();
        registry
            .register(EventKind::SetRequest, "audit", "log", |_: &Event<'_>| ())
            .unwrap();
        // Re-registering does not fire again.
        registry
            .register(EventKind::SetRequest, "audit", "log", |_: &Event<'_>| ())
            .unwrap();

        assert_eq!(
            recorder.details(),
            vec![
                "RegisterListener:meta::watch".to_owned(),
                "SetRequest:audit::log".to_owned(),
            ]
        );
    }

    #[test]
    fn test_custom_event_reaches_only_custom_listeners() {
        let builtin = crate::testing::CountingListener::new();
        let custom = crate::testing::CountingListener::new();
        let mut registry = ListenerRegistry::new();
        registry
            .register(EventKind::ResponseCreated, "core", "count", builtin.clone())
            .unwrap()
            .register(EventKind::custom("ResponseCreated"), "ext", "count", custom.clone())
            .unwrap();

        let payload = serde_json::json!({ "status": 200 });
        registry
            .notify(&Event::Custom {
                name: "ResponseCreated",
                payload: &payload,
            })
            .unwrap();

        assert_eq!(builtin.count(), 0);
        assert_eq!(custom.count(), 1);
    }

    #[test]
    fn test_listener_error_propagates() {
        let mut registry = ListenerRegistry::new();
        registry
            .register(EventKind::SetRouter, "broken", "explode", |_: &Event<'_>| {
                Err::<(), _>(std::io::Error::other("listener exploded"))
            })
            .unwrap();

        let err = registry.notify(&Event::SetRouter).unwrap_err();
        match err {
            DispatchError::Listener {
                event,
                subscriber,
                handler,
                source,
            } => {
                assert_eq!(event, "SetRouter");
                assert_eq!(subscriber, "broken");
                assert_eq!(handler, "explode");
                assert_eq!(source.to_string(), "listener exploded");
            }
        }
    }
}
