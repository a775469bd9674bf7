//! Request routing.
//!
//! [`PathRouter`] is a ready-made router for applications and tests. Path
//! matching is delegated to `matchit`.

pub mod path;

pub use path::{PathRouter, RouteBuildError, RouteParams};
