//! Events and the two listener capabilities.
//!
//! A listener either handles one concrete payload type ([`EventListener`])
//! or handles any payload published under a tag it subscribed to
//! ([`DynEventListener`]). The publisher prefers the typed path and uses the
//! dyn path for listeners that opted into it.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::context::Context;
use crate::error::BoxError;

/// Explicit identity of an event shape; the subscription key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EventType(&'static str);

impl EventType {
    /// Declare an event tag, e.g. `EventType::new("order.placed")`.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The tag as a string.
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A payload that can be published.
///
/// ```
/// use courier_types::{Event, EventType};
///
/// #[derive(Debug)]
/// struct OrderPlaced {
///     order_id: u64,
/// }
///
/// impl Event for OrderPlaced {
///     const EVENT_TYPE: EventType = EventType::new("order.placed");
/// }
/// # let _ = OrderPlaced { order_id: 1 }.order_id;
/// ```
pub trait Event: fmt::Debug + Send + Sync + 'static {
    /// The tag this payload is published under.
    const EVENT_TYPE: EventType;
}

/// Object-safe view of any [`Event`].
///
/// Implemented for every `Event`; used by the dyn listener path.
pub trait AnyEvent: fmt::Debug + Send + Sync {
    /// The tag this payload is published under.
    fn event_type(&self) -> EventType;

    /// Rust type name of the concrete payload (diagnostics only).
    fn type_name(&self) -> &'static str;

    /// Upcast for downcasting back to the concrete payload.
    fn as_any(&self) -> &dyn Any;
}

impl<E: Event> AnyEvent for E {
    fn event_type(&self) -> EventType {
        E::EVENT_TYPE
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<'e> dyn AnyEvent + 'e {
    /// Borrow the concrete payload if it is an `E`.
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    /// Whether the concrete payload is an `E`.
    pub fn is<E: Event>(&self) -> bool {
        self.as_any().is::<E>()
    }
}

/// Handles one concrete event payload type.
///
/// Returning an error does not stop the other listeners for the same
/// event; the publisher collects it into an
/// [`AggregateError`](crate::AggregateError).
#[async_trait]
pub trait EventListener<E: Event>: Send + Sync {
    /// Called once per publish of an `E`.
    async fn handle(&self, ctx: &Context, event: &E) -> Result<(), BoxError>;
}

/// Handles any payload published under the tags it is subscribed to.
///
/// Opt into this for listeners written against the abstract event
/// capability rather than one payload type (auditing, forwarding,
/// metrics). Errors are treated exactly like [`EventListener`] errors.
#[async_trait]
pub trait DynEventListener: Send + Sync {
    /// Called once per publish of any event under a subscribed tag.
    async fn handle_dyn(&self, ctx: &Context, event: &dyn AnyEvent) -> Result<(), BoxError>;
}
