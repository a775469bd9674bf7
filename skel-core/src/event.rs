//! # Lifecycle events
//!
//! Every notification the coordinator fires is an [`Event`]. Listeners are
//! registered against an [`EventKind`] and receive the event by reference,
//! so payloads (requests, components, responses) are never cloned just to
//! be observed.

use crate::{
    component::Component,
    config::{Config, ExecutionProfile},
    http::{Request, Response},
};
use std::{borrow::Cow, fmt};

/// The name of a lifecycle event.
///
/// Listeners are keyed by kind. [`EventKind::Custom`] lets extensions
/// notify each other through the same registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A listener was added to the registry.
    RegisterListener,
    /// The configuration was replaced.
    SetConfig,
    /// The store (persistence handle) was replaced.
    SetDatabase,
    /// The router was replaced.
    SetRouter,
    /// The renderer was replaced.
    SetRenderer,
    /// A request was attached.
    SetRequest,
    /// The execution profile changed.
    SetExecutionProfile,
    /// Routing is about to start.
    BeforeRouting,
    /// An error component was produced.
    Error,
    /// The router reported an unauthenticated user.
    UnauthenticatedUser,
    /// The router reported an unauthorized action.
    UnauthorizedAction,
    /// A redirect is about to be issued.
    Redirect,
    /// A component is ready to be rendered.
    ComponentCreated,
    /// A response is ready to be handed to the transport.
    ResponseCreated,
    /// The request is about to be detached.
    BeforeClearRequest,
    /// The request was detached.
    ClearRequest,
    /// An extension-defined event.
    Custom(Cow<'static, str>),
}

impl EventKind {
    /// Every built-in kind, in lifecycle order.
    pub const BUILTIN: [EventKind; 16] = [
        EventKind::RegisterListener,
        EventKind::SetConfig,
        EventKind::SetDatabase,
        EventKind::SetRouter,
        EventKind::SetRenderer,
        EventKind::SetRequest,
        EventKind::SetExecutionProfile,
        EventKind::BeforeRouting,
        EventKind::Error,
        EventKind::UnauthenticatedUser,
        EventKind::UnauthorizedAction,
        EventKind::Redirect,
        EventKind::ComponentCreated,
        EventKind::ResponseCreated,
        EventKind::BeforeClearRequest,
        EventKind::ClearRequest,
    ];

    /// Creates a custom event kind.
    pub fn custom(name: impl Into<Cow<'static, str>>) -> Self {
        EventKind::Custom(name.into())
    }

    /// The event's wire name.
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::RegisterListener => "RegisterListener",
            EventKind::SetConfig => "SetConfig",
            EventKind::SetDatabase => "SetDatabase",
            EventKind::SetRouter => "SetRouter",
            EventKind::SetRenderer => "SetRenderer",
            EventKind::SetRequest => "SetRequest",
            EventKind::SetExecutionProfile => "SetExecutionProfile",
            EventKind::BeforeRouting => "BeforeRouting",
            EventKind::Error => "Error",
            EventKind::UnauthenticatedUser => "UnauthenticatedUserException",
            EventKind::UnauthorizedAction => "UnauthorizedActionException",
            EventKind::Redirect => "Redirect",
            EventKind::ComponentCreated => "ComponentCreated",
            EventKind::ResponseCreated => "ResponseCreated",
            EventKind::BeforeClearRequest => "BeforeClearRequest",
            EventKind::ClearRequest => "ClearRequest",
            EventKind::Custom(name) => name,
        }
    }

    /// Parses a wire name. Unknown names become [`EventKind::Custom`].
    pub fn from_name(name: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|kind| kind.as_str() == name)
            .cloned()
            .unwrap_or_else(|| EventKind::Custom(Cow::Owned(name.to_owned())))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event together with its payload.
#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    /// A listener was registered under `kind` for `subscriber::handler`.
    RegisterListener {
        /// Kind the listener was registered for.
        kind: &'a EventKind,
        /// Subscriber identity.
        subscriber: &'a str,
        /// Handler identity.
        handler: &'a str,
    },
    /// The configuration was replaced.
    SetConfig(&'a Config),
    /// The store was replaced.
    SetDatabase,
    /// The router was replaced.
    SetRouter,
    /// The renderer was replaced.
    SetRenderer,
    /// A request was attached.
    SetRequest(&'a Request),
    /// The execution profile changed.
    SetExecutionProfile(ExecutionProfile),
    /// Routing is about to start for the request.
    BeforeRouting(&'a Request),
    /// An error component was produced for `code`.
    Error {
        /// The error component.
        component: &'a Component,
        /// HTTP status of the error.
        code: u16,
    },
    /// The router reported an unauthenticated user.
    UnauthenticatedUser,
    /// The router reported an unauthorized action.
    UnauthorizedAction,
    /// A redirect to `url` with status `code` is about to be issued.
    Redirect {
        /// Redirect target.
        url: &'a str,
        /// Normalized redirect status.
        code: u16,
    },
    /// A component is ready to be rendered.
    ComponentCreated(&'a Component),
    /// A prepared response is ready.
    ResponseCreated(&'a Response),
    /// The request (if any) is about to be detached.
    BeforeClearRequest(Option<&'a Request>),
    /// The request (if any) was detached.
    ClearRequest(Option<&'a Request>),
    /// An extension-defined event with a JSON payload.
    ///
    /// Its kind is always [`EventKind::Custom`], even when `name` matches a
    /// built-in event, so extensions cannot impersonate the app's own
    /// notifications.
    Custom {
        /// Name listeners subscribe under.
        name: &'a str,
        /// Arbitrary payload.
        payload: &'a serde_json::Value,
    },
}

impl Event<'_> {
    /// The kind listeners are looked up by.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::RegisterListener { .. } => EventKind::RegisterListener,
            Event::SetConfig(_) => EventKind::SetConfig,
            Event::SetDatabase => EventKind::SetDatabase,
            Event::SetRouter => EventKind::SetRouter,
            Event::SetRenderer => EventKind::SetRenderer,
            Event::SetRequest(_) => EventKind::SetRequest,
            Event::SetExecutionProfile(_) => EventKind::SetExecutionProfile,
            Event::BeforeRouting(_) => EventKind::BeforeRouting,
            Event::Error { .. } => EventKind::Error,
            Event::UnauthenticatedUser => EventKind::UnauthenticatedUser,
            Event::UnauthorizedAction => EventKind::UnauthorizedAction,
            Event::Redirect { .. } => EventKind::Redirect,
            Event::ComponentCreated(_) => EventKind::ComponentCreated,
            Event::ResponseCreated(_) => EventKind::ResponseCreated,
            Event::BeforeClearRequest(_) => EventKind::BeforeClearRequest,
            Event::ClearRequest(_) => EventKind::ClearRequest,
            Event::Custom { name, .. } => EventKind::Custom(Cow::Owned((*name).to_owned())),
        }
    }
}
