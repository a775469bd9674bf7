//! # Router contract
//!
//! A router turns a [`Request`] into a [`RouteOutcome`]. Expected outcomes
//! (not found, unauthenticated, unauthorized) are variants, not errors, and
//! the coordinator matches them exhaustively. An `Err` from a router is an
//! unexpected failure and becomes a generic error page.
//!
//! Routing may block or await whatever it needs; from the coordinator's
//! side it is a single awaited call.

use crate::{component::Component, context::AppContext, error::BoxError, http::Request};
use futures::future::BoxFuture;
use std::{any::Any, fmt, future::Future};

/// What a router resolved a request to.
pub enum RouteOutcome {
    /// A renderable unit.
    Component(Component),
    /// A type-erased controller result. It must downcast to [`Component`];
    /// anything else is a contract violation.
    Opaque(Box<dyn Any + Send>),
    /// No route matches the request.
    NotFound,
    /// The route requires an authenticated user.
    Unauthenticated,
    /// The user may not perform this action.
    Unauthorized,
}

impl RouteOutcome {
    /// Erases a controller result for the capability check at the routing
    /// boundary.
    pub fn opaque<T: Any + Send>(value: T) -> Self {
        RouteOutcome::Opaque(Box::new(value))
    }
}

impl From<Component> for RouteOutcome {
    fn from(component: Component) -> Self {
        RouteOutcome::Component(component)
    }
}

impl fmt::Debug for RouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteOutcome::Component(c) => f.debug_tuple("Component").field(c).finish(),
            RouteOutcome::Opaque(_) => f.write_str("Opaque(..)"),
            RouteOutcome::NotFound => f.write_str("NotFound"),
            RouteOutcome::Unauthenticated => f.write_str("Unauthenticated"),
            RouteOutcome::Unauthorized => f.write_str("Unauthorized"),
        }
    }
}

/// The routing collaborator.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot route requests",
    label = "missing `Router` implementation",
    note = "Implement `Router` to resolve requests into components."
)]
pub trait Router: Send + Sync + 'static {
    /// Resolves the request. `app` is the coordinator that is dispatching.
    fn route(
        &self,
        request: &Request,
        app: &dyn AppContext,
    ) -> impl Future<Output = Result<RouteOutcome, BoxError>> + Send;
}

/// Object-safe version of [`Router`], held by the coordinator.
pub trait DynRouter: Send + Sync + 'static {
    /// Resolves the request (dynamic dispatch version).
    fn route_dyn<'a>(
        &'a self,
        request: &'a Request,
        app: &'a dyn AppContext,
    ) -> BoxFuture<'a, Result<RouteOutcome, BoxError>>;
}

// Blanket implementation: Any type implementing Router implements DynRouter automatically.
impl<T: Router> DynRouter for T {
    fn route_dyn<'a>(
        &'a self,
        request: &'a Request,
        app: &'a dyn AppContext,
    ) -> BoxFuture<'a, Result<RouteOutcome, BoxError>> {
        Box::pin(self.route(request, app))
    }
}
