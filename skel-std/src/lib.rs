//! # skel-std
//!
//! Standard implementations for the skel application coordinator.
//!
//! This crate provides:
//! - **Listener registry**: [`ListenerRegistry`], keyed by event kind
//! - **Configuration files**: [`TomlFile`], [`config::load_layered`]
//! - **String cache**: [`StringCache`] over the built-in dictionary
//! - **Rendering**: [`MarkerRenderer`] for `##key##` templates
//! - **Routing**: [`PathRouter`] backed by `matchit`
//! - **Standard listeners**: Filter, Logging

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use skel_core;

// Modules
pub mod config;
pub mod listeners;
pub mod registry;
pub mod render;
pub mod routing;
pub mod strings;
pub mod testing;

pub use config::TomlFile;
pub use listeners::{FilterListener, LoggingListener};
pub use registry::{ListenerKey, ListenerRegistry};
pub use render::{MarkerRenderer, RenderError};
pub use routing::{PathRouter, RouteParams};
pub use strings::{DEFAULT_STRINGS, StringCache};
