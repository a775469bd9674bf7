//! # skel - Application Coordinator
//!
//! `skel` is the coordination core of a server-rendered web application.
//! An [`App`] owns the configuration, a store, a router and the current
//! request, turns that request into a response, and notifies listeners at
//! every step of the way.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skel::prelude::*;
//!
//! let config = skel::config::load_layered("config/app")?;
//! let mut router = PathRouter::new();
//! router.get("/", |_req, _params, _app| {
//!     Ok(Component::inline("<h1>##title##</h1>").with("title", "Home").into())
//! })?;
//!
//! let mut app = App::new(config, my_store, router)?;
//! app.register_listener(EventKind::ResponseCreated, "audit", "log", LoggingListener::new())?;
//!
//! let response = app.respond(Request::get("/")).await?;
//! app.clear_request()?;
//! ```
//!
//! ## Error pages and redirects
//!
//! Routers report expected failures as [`RouteOutcome`] variants. The app
//! maps them to 404 pages and 303 redirects; unexpected router errors
//! become 500 pages. See [`mapper`].

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod app;
mod error;
pub mod mapper;

pub use app::{App, LifecycleState, REQUIRED_KEYS};
pub use error::AppError;
pub use mapper::{RedirectStatus, Resolution};

pub use skel_core::{
    // Context
    AppContext,
    // Error types
    BoxError,
    // Values
    Component,
    Config,
    ConfigError,
    ConfigMap,
    ConfigSource,
    Cookie,
    DispatchError,
    // Router traits
    DynRouter,
    // Events
    Event,
    EventKind,
    ExecutionProfile,
    Flow,
    Headers,
    IntoFlow,
    Listener,
    // Collaborators
    Renderer,
    Request,
    Response,
    RouteOutcome,
    Router,
    Store,
    Template,
    TemplateRef,
};

pub use skel_std::{
    ListenerKey, ListenerRegistry, MarkerRenderer, PathRouter, RouteParams, StringCache,
    TomlFile,
};

/// Configuration file loading.
pub mod config {
    pub use skel_std::config::{layered_paths, load, load_layered, parse_toml};
}

/// Standard listener implementations.
pub mod listeners {
    pub use skel_std::listeners::{FilterListener, LoggingListener};
}

/// Testing utilities.
pub mod testing {
    pub use skel_std::testing::{
        CountingListener, FnRouter, MemoryStore, RecordingListener, TestContext, describe,
    };
}

/// Prelude module - common imports for skel.
///
/// # Usage
///
/// ```rust,ignore
/// use skel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        App, AppContext, AppError, BoxError, Component, Config, Event, EventKind,
        ExecutionProfile, Flow, Listener, PathRouter, Request, Response, RouteOutcome, Router,
        Store,
        listeners::{FilterListener, LoggingListener},
    };
}
