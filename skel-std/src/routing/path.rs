//! Matchit-based router implementation.
//!
//! Routes are registered per method and path pattern (e.g. `/users/{id}`).
//! A path with no registered pattern, or with no handler for the request's
//! method, resolves to [`RouteOutcome::NotFound`].

use matchit::{Match, Router as InnerRouter};
use skel_core::{AppContext, BoxError, Request, RouteOutcome, Router};
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;

/// Parameters captured from the matched path pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: Vec<(String, String)>,
}

impl RouteParams {
    /// Looks up a parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates parameters in pattern order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Errors raised while registering routes.
#[derive(Error, Debug)]
pub enum RouteBuildError {
    /// The pattern was rejected by the matcher.
    #[error("invalid route `{pattern}`: {source}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        #[source]
        source: matchit::InsertError,
    },

    /// The method already has a handler for this pattern.
    #[error("route already exists: {method} {pattern}")]
    Duplicate {
        /// HTTP method.
        method: String,
        /// Path pattern.
        pattern: String,
    },
}

type RouteHandler = Arc<
    dyn Fn(&Request, &RouteParams, &dyn AppContext) -> Result<RouteOutcome, BoxError>
        + Send
        + Sync,
>;

/// A router based on `matchit`.
pub struct PathRouter {
    router: InnerRouter<usize>,
    patterns: Vec<(String, HashMap<String, RouteHandler>)>,
}

impl PathRouter {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self {
            router: InnerRouter::new(),
            patterns: Vec::new(),
        }
    }

    /// Registers `handler` for `method` requests matching `pattern`.
    pub fn route<F>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RouteBuildError>
    where
        F: Fn(&Request, &RouteParams, &dyn AppContext) -> Result<RouteOutcome, BoxError>
            + Send
            + Sync
            + 'static,
    {
        let method = method.to_ascii_uppercase();
        let slot = match self.patterns.iter().position(|(p, _)| p == pattern) {
            Some(slot) => slot,
            None => {
                let slot = self.patterns.len();
                self.router
                    .insert(pattern, slot)
                    .map_err(|source| RouteBuildError::Pattern {
                        pattern: pattern.to_owned(),
                        source,
                    })?;
                self.patterns.push((pattern.to_owned(), HashMap::new()));
                slot
            }
        };

        let handlers = &mut self.patterns[slot].1;
        if handlers.contains_key(&method) {
            return Err(RouteBuildError::Duplicate {
                method,
                pattern: pattern.to_owned(),
            });
        }
        handlers.insert(method, Arc::new(handler));
        Ok(self)
    }

    /// Shorthand for `route("GET", ...)`.
    pub fn get<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RouteBuildError>
    where
        F: Fn(&Request, &RouteParams, &dyn AppContext) -> Result<RouteOutcome, BoxError>
            + Send
            + Sync
            + 'static,
    {
        self.route("GET", pattern, handler)
    }

    /// Number of registered path patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no pattern is registered.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    fn resolve(&self, request: &Request) -> Option<(RouteHandler, RouteParams)> {
        let Match { value, params } = self.router.at(request.path()).ok()?;
        let handlers = &self.patterns[*value].1;
        // HEAD falls back to the GET handler.
        let handler = handlers.get(request.method()).or_else(|| {
            request
                .is_head()
                .then(|| handlers.get("GET"))
                .flatten()
        })?;
        let params = RouteParams {
            params: params
                .iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        };
        Some((handler.clone(), params))
    }
}

impl Default for PathRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for PathRouter {
    async fn route(
        &self,
        request: &Request,
        app: &dyn AppContext,
    ) -> Result<RouteOutcome, BoxError> {
        match self.resolve(request) {
            Some((handler, params)) => handler(request, &params, app),
            None => {
                tracing::debug!(method = request.method(), path = request.path(), "no route");
                Ok(RouteOutcome::NotFound)
            }
        }
    }
}
