//! # courier-types — shared vocabulary for the courier mediator
//!
//! Everything the behavior pipeline and the event publisher agree on lives
//! here, so that behaviors, handlers and listeners can be written against
//! this crate alone without pulling in either registry.
//!
//! | Concept | Types |
//! |---------|-------|
//! | Dispatch context | [`Context`] |
//! | Commands and queries | [`Request`], [`RequestKind`], [`Response`], [`RequestHandler`] |
//! | Events | [`Event`], [`EventType`], [`AnyEvent`] |
//! | Listener capabilities | [`EventListener`], [`DynEventListener`] |
//! | Errors | [`BoxError`], [`RegistrationError`], [`PublishError`], [`AggregateError`] |
//!
//! ## Event identity
//!
//! Events are keyed by an explicit [`EventType`] tag declared on the payload
//! type, not by runtime type introspection. Two payload types that declare
//! the same tag address the same subscriber list.

#![deny(missing_docs)]

pub mod context;
pub mod error;
pub mod event;
pub mod future;
pub mod handler;
pub mod request;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use context::Context;
pub use error::{
    AggregateError, BoxError, DispatchError, ListenerFailure, PublishError, RegistrationError,
};
pub use event::{AnyEvent, DynEventListener, Event, EventListener, EventType};
pub use future::BoxFuture;
pub use handler::{RequestHandler, handler_fn};
pub use request::{Request, RequestKind, Response};
