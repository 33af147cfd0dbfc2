#![deny(missing_docs)]
//! Event subscriptions and publishing for courier.
//!
//! The [`SubscriberRegistry`] maps each [`EventType`](courier_types::EventType)
//! to the listeners subscribed to it, in subscription order. Publishing
//! delivers the event to every one of them, even when some fail, and
//! reports the failures together as an
//! [`AggregateError`](courier_types::AggregateError).
//!
//! Publishing to a tag nobody subscribed to is an error
//! ([`PublishError::NoHandler`](courier_types::PublishError::NoHandler)),
//! not a silent no-op.

pub mod listener;
mod publish;
pub mod registry;

pub use listener::{TracingListener, dyn_listener_fn, listener_fn};
pub use registry::SubscriberRegistry;
