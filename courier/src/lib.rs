#![deny(missing_docs)]
//! # courier — umbrella crate
//!
//! Single import surface for the courier mediator. Re-exports the shared
//! vocabulary and, behind feature flags, the behavior pipeline and the
//! event publisher. With both enabled (the default) it also provides
//! [`Mediator`], which owns one registry of each and is meant to be built
//! once at startup and shared by reference.
//!
//! ```no_run
//! use courier::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), BoxError> {
//! let mediator = Mediator::new();
//! mediator.register_command_behavior(100, TracingBehavior::new())?;
//!
//! let handler = handler_fn(|_ctx, request| {
//!     Box::pin(async move {
//!         let response: Result<Response, BoxError> = Ok(json!({ "accepted": request.name }));
//!         response
//!     })
//! });
//! let response = mediator
//!     .send_command(&Context::new(), "place_order", json!({ "sku": "A-1" }), &handler)
//!     .await?;
//! # let _ = response;
//! # Ok(())
//! # }
//! ```

pub mod config;
#[cfg(all(feature = "behavior", feature = "events"))]
pub mod mediator;

pub use config::MediatorConfig;
#[cfg(all(feature = "behavior", feature = "events"))]
pub use mediator::Mediator;

#[cfg(feature = "behavior")]
pub use courier_behavior;
#[cfg(feature = "events")]
pub use courier_events;
pub use courier_types;

/// Happy-path imports for wiring a mediator.
pub mod prelude {
    pub use crate::config::MediatorConfig;
    #[cfg(all(feature = "behavior", feature = "events"))]
    pub use crate::mediator::Mediator;

    pub use courier_types::{
        AggregateError, AnyEvent, BoxError, Context, DispatchError, DynEventListener, Event,
        EventListener, EventType, PublishError, RegistrationError, Request, RequestHandler,
        RequestKind, Response, handler_fn,
    };

    #[cfg(feature = "behavior")]
    pub use courier_behavior::{
        Behavior, BehaviorRegistry, CancellationGuard, Next, Pipeline, TimeoutBehavior,
        TracingBehavior, behavior_fn,
    };

    #[cfg(feature = "events")]
    pub use courier_events::{SubscriberRegistry, TracingListener, dyn_listener_fn, listener_fn};
}
