//! # skel-core
//!
//! Core types and collaborator contracts for the skel application
//! coordinator.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! routers, stores, renderers and extensions that do not need the
//! coordinator itself.
//!
//! # Layers
//!
//! ## Events ([`Event`], [`Listener`])
//!
//! The coordinator notifies listeners at well-defined lifecycle points.
//! A listener receives the event by reference and returns a [`Flow`]:
//! `Continue` hands the event to the next listener, `Halt` stops the chain.
//!
//! ## Collaborators ([`Router`], [`Store`], [`Renderer`])
//!
//! - **Router**: resolves a [`Request`] into a [`RouteOutcome`]
//! - **Store**: supplies localized strings and templates
//! - **Renderer**: renders a [`Component`] into text
//!
//! ## Values ([`Config`], [`Request`], [`Response`], [`Component`])
//!
//! Plain data exchanged between the coordinator, its collaborators and the
//! transport.
//!
//! # Error Types
//!
//! - [`DispatchError`] - Listener failures
//! - [`ConfigError`] - Configuration failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod component;
pub mod config;
mod context;
mod error;
mod event;
mod flow;
pub mod http;
mod listener;
mod router;
mod store;

// Re-exports
pub use component::{Component, TemplateRef};
pub use config::{Config, ConfigMap, ConfigSource, ExecutionProfile};
pub use context::AppContext;
pub use error::{BoxError, ConfigError, DispatchError};
pub use event::{Event, EventKind};
pub use flow::{Flow, IntoFlow};
pub use http::{Cookie, Headers, Request, Response};
pub use listener::Listener;
pub use router::{DynRouter, RouteOutcome, Router};
pub use store::{Renderer, Store, Template};
