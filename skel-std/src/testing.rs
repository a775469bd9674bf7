//! Testing utilities for skel.
//!
//! This module provides utilities to make testing listeners, routers and
//! the coordinator easier.
//!
//! # Features
//!
//! - [`RecordingListener`]: A listener that records every event it receives
//! - [`CountingListener`]: A listener that counts invocations
//! - [`MemoryStore`]: An in-memory store of strings and templates
//! - [`FnRouter`]: A router backed by a closure
//! - [`TestContext`]: A standalone [`AppContext`] for exercising routers

use skel_core::{
    AppContext, BoxError, Config, Event, ExecutionProfile, Flow, Listener, Request,
    RouteOutcome, Router, Store, Template,
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Recording Listener
// ============================================================================

/// Short, comparable summary of an event's payload.
pub fn describe(event: &Event<'_>) -> String {
    match event {
        Event::RegisterListener {
            kind,
            subscriber,
            handler,
        } => format!("{kind}:{subscriber}::{handler}"),
        Event::SetConfig(config) => config.keys().collect::<Vec<_>>().join(","),
        Event::SetRequest(request) | Event::BeforeRouting(request) => {
            format!("{} {}", request.method(), request.uri())
        }
        Event::SetExecutionProfile(profile) => profile.to_string(),
        Event::Error { code, .. } => code.to_string(),
        Event::Redirect { url, code } => format!("{code} {url}"),
        Event::ComponentCreated(component) => component.template().as_str().to_owned(),
        Event::ResponseCreated(response) => response.status().to_string(),
        Event::BeforeClearRequest(request) | Event::ClearRequest(request) => request
            .map(|r| r.uri().to_owned())
            .unwrap_or_default(),
        Event::Custom { payload, .. } => payload.to_string(),
        Event::SetDatabase
        | Event::SetRouter
        | Event::SetRenderer
        | Event::UnauthenticatedUser
        | Event::UnauthorizedAction => String::new(),
    }
}

/// A listener that records all events it receives.
///
/// Clones share the same record, so keep one clone for assertions and
/// register the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::new();
/// app.register_listener(EventKind::SetRequest, "test", "record", recorder.clone())?;
///
/// app.set_request(Request::get("/"))?;
/// assert_eq!(recorder.names(), vec!["SetRequest"]);
/// ```
#[derive(Clone)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<(String, String)>>>,
    result: Flow,
}

impl RecordingListener {
    /// Create a new recording listener that returns `Continue`.
    pub fn new() -> Self {
        Self::with_result(Flow::Continue)
    }

    /// Create a recording listener that returns a specific result.
    pub fn with_result(result: Flow) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            result,
        }
    }

    /// Recorded `(event name, payload summary)` pairs.
    pub fn events(&self) -> Vec<(String, String)> {
        self.events.lock().unwrap().clone()
    }

    /// Recorded event names, in order.
    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|(name, _)| name).collect()
    }

    /// Recorded payload summaries, in order.
    pub fn details(&self) -> Vec<String> {
        self.events().into_iter().map(|(_, detail)| detail).collect()
    }

    /// Get the number of recorded events.
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for RecordingListener {
    fn on_event(&self, event: &Event<'_>) -> Result<Flow, BoxError> {
        self.events
            .lock()
            .unwrap()
            .push((event.kind().to_string(), describe(event)));
        Ok(self.result)
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A listener that counts invocations.
#[derive(Clone, Default)]
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a new counting listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Listener for CountingListener {
    fn on_event(&self, _event: &Event<'_>) -> Result<Flow, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(Flow::Continue)
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// An in-memory store.
///
/// Counts how often the string table is loaded so tests can check caching.
#[derive(Clone, Default)]
pub struct MemoryStore {
    strings: HashMap<String, String>,
    templates: HashMap<String, String>,
    string_loads: Arc<AtomicUsize>,
    offline: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a localized string.
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }

    /// Adds a template.
    pub fn with_template(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.templates.insert(name.into(), source.into());
        self
    }

    /// Makes every call fail, as if the backing database were unreachable.
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// How many times [`Store::strings`] was called.
    pub fn string_loads(&self) -> usize {
        self.string_loads.load(Ordering::SeqCst)
    }
}

impl Store for MemoryStore {
    fn strings(&self) -> Result<HashMap<String, String>, BoxError> {
        self.string_loads.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err("store is offline".into());
        }
        Ok(self.strings.clone())
    }

    fn template(&self, name: &str) -> Result<Template, BoxError> {
        if self.offline {
            return Err("store is offline".into());
        }
        self.templates
            .get(name)
            .map(|source| Template::new(name, source.clone()))
            .ok_or_else(|| format!("template `{name}` not found").into())
    }
}

// ============================================================================
// Fn Router
// ============================================================================

/// A router backed by a closure over the request.
pub struct FnRouter<F> {
    route: F,
    calls: Arc<AtomicUsize>,
}

impl<F> FnRouter<F>
where
    F: Fn(&Request) -> Result<RouteOutcome, BoxError> + Send + Sync + 'static,
{
    /// Create a router that answers with `route`.
    pub fn new(route: F) -> Self {
        Self {
            route,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared call counter.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl<F> Router for FnRouter<F>
where
    F: Fn(&Request) -> Result<RouteOutcome, BoxError> + Send + Sync + 'static,
{
    async fn route(
        &self,
        request: &Request,
        _app: &dyn AppContext,
    ) -> Result<RouteOutcome, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.route)(request)
    }
}

// ============================================================================
// Test Context
// ============================================================================

/// A standalone [`AppContext`] for testing routers without a coordinator.
#[derive(Default)]
pub struct TestContext {
    config: Config,
    profile: ExecutionProfile,
    request: Option<Request>,
    strings: HashMap<String, String>,
}

impl TestContext {
    /// Create an empty context in the test profile.
    pub fn new() -> Self {
        Self {
            profile: ExecutionProfile::Test,
            ..Self::default()
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Attaches a request.
    pub fn with_request(mut self, request: Request) -> Self {
        self.request = Some(request);
        self
    }

    /// Adds a string.
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }
}

impl AppContext for TestContext {
    fn config(&self) -> &Config {
        &self.config
    }

    fn execution_profile(&self) -> ExecutionProfile {
        self.profile
    }

    fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    fn str(&self, key: &str, default: &str) -> Result<String, BoxError> {
        Ok(match self.strings.get(key) {
            Some(value) if !value.is_empty() => value.clone(),
            _ => default.to_owned(),
        })
    }
}
