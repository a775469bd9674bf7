//! The request/response coordinator.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --set_request--> Dispatching --get_response--> Resolved
//!   ^                                                    |
//!   +------------------------clear_request---------------+
//! ```
//!
//! # Notifications
//!
//! Every notification fired by [`App`] is advisory: a listener returning
//! `false` stops the remaining listeners for that event, but the app carries
//! on. A listener error aborts the operation and is returned to the caller.

use crate::{AppError, mapper::Resolution};
use skel_core::{
    AppContext, BoxError, Component, Config, DispatchError, DynRouter, Event, EventKind,
    ExecutionProfile, Listener, Renderer, Request, Response, Router, Store, Template,
    config::{CONTEXT_ROOT_KEY, EXEC_PROFILE_KEY, WEB_ROOT_KEY},
};
use skel_std::{ListenerRegistry, MarkerRenderer, StringCache};
use std::{borrow::Cow, fmt, sync::Arc};
use tracing::debug;

/// Keys every configuration must define.
pub const REQUIRED_KEYS: &[&str] = &[EXEC_PROFILE_KEY, CONTEXT_ROOT_KEY, WEB_ROOT_KEY];

/// Where the app is in the per-request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// No request attached.
    #[default]
    Idle,
    /// A request is attached and waiting for a response.
    Dispatching,
    /// A response was produced for the attached request.
    Resolved,
}

/// The application coordinator.
///
/// Owns the configuration, the store, the router, the renderer and the
/// current request, and turns that request into a response. One `App`
/// handles one request at a time; give each worker its own.
pub struct App {
    config: Config,
    store: Arc<dyn Store>,
    router: Box<dyn DynRouter>,
    renderer: Arc<dyn Renderer>,
    default_renderer: bool,
    request: Option<Request>,
    profile: ExecutionProfile,
    listeners: ListenerRegistry,
    strings: StringCache,
    state: LifecycleState,
}

impl App {
    /// Creates an app.
    ///
    /// Fails if any of [`REQUIRED_KEYS`] is missing or the execution
    /// profile is not recognized. The renderer defaults to a
    /// [`MarkerRenderer`] reading templates from `store`.
    pub fn new<S: Store, R: Router>(config: Config, store: S, router: R) -> Result<Self, AppError> {
        config.require(REQUIRED_KEYS)?;
        let profile = config.execution_profile()?;
        let store: Arc<dyn Store> = Arc::new(store);

        let app = Self {
            config,
            renderer: Arc::new(MarkerRenderer::with_store(store.clone())),
            default_renderer: true,
            store,
            router: Box::new(router),
            request: None,
            profile,
            listeners: ListenerRegistry::new(),
            strings: StringCache::new(),
            state: LifecycleState::Idle,
        };
        debug!(profile = %app.profile, "app created");
        app.notify(&Event::SetDatabase)?;
        app.notify(&Event::SetRouter)?;
        Ok(app)
    }

    // ------------------------------------------------------------------------
    // Request lifecycle
    // ------------------------------------------------------------------------

    /// Attaches `request`, replacing any previous one.
    pub fn set_request(&mut self, request: Request) -> Result<&mut Self, AppError> {
        let request = self.request.insert(request);
        self.state = LifecycleState::Dispatching;
        debug!(method = request.method(), uri = request.uri(), "request attached");
        self.listeners.notify(&Event::SetRequest(request))?;
        Ok(self)
    }

    /// Routes the attached request and returns the prepared response.
    ///
    /// Fails with [`AppError::NoRequest`] if no request is attached.
    /// Not-found, unauthenticated and unauthorized outcomes and router
    /// errors become error pages or redirects.
    pub async fn get_response(&mut self) -> Result<Response, AppError> {
        let request = self.request.as_ref().ok_or(AppError::NoRequest)?;
        self.listeners.notify(&Event::BeforeRouting(request))?;

        let routed = self.router.route_dyn(request, &*self).await;
        let mut response = match self.resolve(routed)? {
            Resolution::Render(component) => {
                self.listeners.notify(&Event::ComponentCreated(&component))?;
                self.render_response(&component, request)?
            }
            Resolution::Redirect(response) => response,
        };

        response.prepare(request);
        self.listeners.notify(&Event::ResponseCreated(&response))?;
        self.state = LifecycleState::Resolved;
        debug!(status = response.status(), "response created");
        Ok(response)
    }

    /// Attaches `request` and returns its response.
    pub async fn respond(&mut self, request: Request) -> Result<Response, AppError> {
        self.set_request(request)?;
        self.get_response().await
    }

    /// Detaches and returns the current request, if any.
    pub fn clear_request(&mut self) -> Result<Option<Request>, AppError> {
        self.listeners
            .notify(&Event::BeforeClearRequest(self.request.as_ref()))?;
        let request = self.request.take();
        self.state = LifecycleState::Idle;
        self.listeners
            .notify(&Event::ClearRequest(request.as_ref()))?;
        debug!("request cleared");
        Ok(request)
    }

    fn render_response(&self, component: &Component, request: &Request) -> Result<Response, AppError> {
        if request.wants_json() {
            let body = serde_json::to_vec(&component.to_value())?;
            return Ok(Response::json(component.status(), body));
        }
        let text = self.renderer.render(component).map_err(AppError::Render)?;
        Ok(Response::html(component.status(), text))
    }

    // ------------------------------------------------------------------------
    // Wiring
    // ------------------------------------------------------------------------

    /// Replaces the configuration. The execution profile is left alone.
    pub fn set_config(&mut self, config: Config) -> Result<&mut Self, AppError> {
        config.require(REQUIRED_KEYS)?;
        self.config = config;
        self.listeners.notify(&Event::SetConfig(&self.config))?;
        Ok(self)
    }

    /// Replaces the store. The string table, once built, is kept.
    ///
    /// The default renderer is rebuilt to read templates from the new
    /// store. A renderer installed with [`App::set_renderer`] is kept.
    pub fn set_store<S: Store>(&mut self, store: S) -> Result<&mut Self, AppError> {
        let store: Arc<dyn Store> = Arc::new(store);
        if self.default_renderer {
            self.renderer = Arc::new(MarkerRenderer::with_store(store.clone()));
        }
        self.store = store;
        self.listeners.notify(&Event::SetDatabase)?;
        Ok(self)
    }

    /// Replaces the router.
    pub fn set_router<R: Router>(&mut self, router: R) -> Result<&mut Self, AppError> {
        self.router = Box::new(router);
        self.listeners.notify(&Event::SetRouter)?;
        Ok(self)
    }

    /// Replaces the renderer.
    pub fn set_renderer<T: Renderer>(&mut self, renderer: T) -> Result<&mut Self, AppError> {
        self.renderer = Arc::new(renderer);
        self.default_renderer = false;
        self.listeners.notify(&Event::SetRenderer)?;
        Ok(self)
    }

    /// Changes the execution profile.
    pub fn set_execution_profile(
        &mut self,
        profile: ExecutionProfile,
    ) -> Result<&mut Self, AppError> {
        self.profile = profile;
        self.listeners
            .notify(&Event::SetExecutionProfile(profile))?;
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current store.
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// The attached request.
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    /// Current execution profile.
    pub fn execution_profile(&self) -> ExecutionProfile {
        self.profile
    }

    /// Lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The configured public web root.
    pub fn public_root(&self) -> Result<&str, AppError> {
        Ok(self.config.public_root()?)
    }

    /// Looks up a localized string.
    ///
    /// Returns `default` when the key is absent *or* maps to an empty
    /// string. The first call builds the string table from the built-in
    /// dictionary and the store.
    pub fn str(&self, key: &str, default: &str) -> Result<String, AppError> {
        self.strings
            .get(key, default, || self.store.strings())
            .map_err(AppError::Strings)
    }

    /// Loads a template from the store.
    pub fn template(&self, name: &str) -> Result<Template, AppError> {
        self.store.template(name).map_err(|source| AppError::Template {
            name: name.to_owned(),
            source,
        })
    }

    // ------------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------------

    /// Registered listeners.
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Registers `listener` for `kind` under `subscriber::handler`.
    /// Registering the same triple again is a no-op.
    pub fn register_listener<L: Listener>(
        &mut self,
        kind: EventKind,
        subscriber: impl Into<Cow<'static, str>>,
        handler: impl Into<Cow<'static, str>>,
        listener: L,
    ) -> Result<&mut Self, AppError> {
        self.listeners
            .register(kind, subscriber, handler, listener)?;
        Ok(self)
    }

    /// Removes a registration; absent triples are ignored.
    pub fn remove_listener(&mut self, kind: &EventKind, subscriber: &str, handler: &str) -> &mut Self {
        self.listeners.remove(kind, subscriber, handler);
        self
    }

    /// Notifies listeners of `event`. Returns `false` if one of them halted.
    pub fn notify(&self, event: &Event<'_>) -> Result<bool, DispatchError> {
        self.listeners.notify(event)
    }

    // ------------------------------------------------------------------------
    // Debugging
    // ------------------------------------------------------------------------

    /// Dumps a component tree for debugging. Long templates are shortened
    /// to their first and last 50 characters.
    pub fn debug_component(&self, component: &Component) -> String {
        format!("Site: {}", ComponentDump { component, depth: 1 })
    }
}

/// Indented tree view of a component.
struct ComponentDump<'a> {
    component: &'a Component,
    depth: usize,
}

impl fmt::Display for ComponentDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = "\t".repeat(self.depth - 1);
        let indent = "\t".repeat(self.depth);
        let template = self.component.template().as_str().replace('\n', "\\n");

        write!(f, "\n{heading}Component----------------------------------------")?;
        writeln!(f, "\n{heading}Template: {}", shorten(&template))?;

        for (key, value) in self.component.data() {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Object(_) => "(Object)".to_owned(),
                other => other.to_string(),
            };
            write!(f, "\n{indent}{key}:\n{indent}{text}")?;
            writeln!(f, "\n{indent}.........................")?;
        }
        for (key, child) in self.component.children() {
            let child = ComponentDump {
                component: child,
                depth: self.depth + 1,
            };
            write!(f, "\n{indent}{key}:{child}")?;
            writeln!(f, "\n{indent}.........................")?;
        }
        Ok(())
    }
}

fn shorten(text: &str) -> Cow<'_, str> {
    let count = text.chars().count();
    if count <= 100 {
        return Cow::Borrowed(text);
    }
    let head: String = text.chars().take(50).collect();
    let tail: String = text.chars().skip(count - 50).collect();
    Cow::Owned(format!("{head}...{tail}"))
}

impl AppContext for App {
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
        Ok(App::str(self, key, default)?)
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("profile", &self.profile)
            .field("state", &self.state)
            .field("request", &self.request)
            .field("listeners", &self.listeners)
            .field("strings_built", &self.strings.is_built())
            .finish_non_exhaustive()
    }
}
