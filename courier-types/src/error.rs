//! Error types for registration and dispatch.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::event::EventType;
use crate::request::RequestKind;

/// Boxed error returned by behaviors, handlers and listeners.
///
/// The mediator never wraps or rewrites these; callers downcast to recover
/// the concrete error.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Registration errors. Returned immediately, never retried.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Another behavior already occupies this order in the same pipeline.
    #[error("position {order} is taken by another {kind} behavior")]
    DuplicateOrder {
        /// The pipeline that was registered into.
        kind: RequestKind,
        /// The contested order.
        order: i32,
    },

    /// Bulk subscription was called with no listeners.
    #[error("at least one listener must be provided for {event_type}")]
    EmptyListenerSet {
        /// The tag the listeners were meant for.
        event_type: EventType,
    },

    /// The tag is already bound to a different payload type.
    #[error("event type {event_type} is bound to {bound}, cannot subscribe a listener for {attempted}")]
    EventTypeConflict {
        /// The contested tag.
        event_type: EventType,
        /// Payload type the tag was first registered with.
        bound: &'static str,
        /// Payload type of the rejected listener.
        attempted: &'static str,
    },
}

/// Publish errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PublishError {
    /// Nothing is subscribed to the event's tag. No listener ran.
    #[error("no event handler found for event of type {event_type}")]
    NoHandler {
        /// The tag that was published.
        event_type: EventType,
    },

    /// The tag is bound to a different payload type. No listener ran.
    #[error("event type {event_type} is bound to {bound}, cannot publish {published}")]
    EventTypeConflict {
        /// The contested tag.
        event_type: EventType,
        /// Payload type the tag was first registered with.
        bound: &'static str,
        /// Payload type that was published.
        published: &'static str,
    },

    /// One or more listeners failed. Every listener was still attempted.
    #[error(transparent)]
    Listeners(#[from] AggregateError),
}

impl PublishError {
    /// The listener failures, if that is what this is.
    pub fn failures(&self) -> Option<&AggregateError> {
        match self {
            Self::Listeners(aggregate) => Some(aggregate),
            _ => None,
        }
    }
}

/// Errors produced by the built-in behaviors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The context was cancelled before the request reached its handler.
    #[error("dispatch of {0} cancelled")]
    Cancelled(String),

    /// The rest of the chain did not finish in time.
    #[error("dispatch of {name} timed out after {after:?}")]
    TimedOut {
        /// Name of the request.
        name: String,
        /// The limit that was exceeded.
        after: Duration,
    },

    /// A behavior refused to pass the request on, e.g. failed validation.
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// One failed listener within a publish.
#[derive(Debug)]
pub struct ListenerFailure {
    /// Zero-based position of the listener in registration order.
    pub index: usize,
    /// The listener's error, unchanged.
    pub error: BoxError,
}

/// Every listener failure from a single publish, in registration order.
#[derive(Debug)]
pub struct AggregateError {
    event_type: EventType,
    attempted: usize,
    failures: Vec<ListenerFailure>,
}

impl AggregateError {
    /// Bundle failures collected while publishing `event_type` to `attempted` listeners.
    pub fn new(event_type: EventType, attempted: usize, failures: Vec<ListenerFailure>) -> Self {
        Self {
            event_type,
            attempted,
            failures,
        }
    }

    /// The tag that was published.
    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// How many listeners were invoked, failed or not.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Number of failed listeners.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// True when no listener failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failures with their listener positions.
    pub fn iter(&self) -> impl Iterator<Item = &ListenerFailure> {
        self.failures.iter()
    }

    /// Just the underlying errors.
    pub fn errors(&self) -> impl Iterator<Item = &(dyn StdError + Send + Sync + 'static)> {
        self.failures.iter().map(|f| &*f.error)
    }

    /// First constituent error of concrete type `T`.
    pub fn find<T: StdError + 'static>(&self) -> Option<&T> {
        self.failures
            .iter()
            .find_map(|f| f.error.downcast_ref::<T>())
    }

    /// Take ownership of the failures.
    pub fn into_failures(self) -> Vec<ListenerFailure> {
        self.failures
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} listeners for {} failed",
            self.failures.len(),
            self.attempted,
            self.event_type
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}[#{}] {}", failure.index, failure.error)?;
        }
        Ok(())
    }
}

impl StdError for AggregateError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.failures
            .first()
            .map(|f| &*f.error as &(dyn StdError + 'static))
    }
}
