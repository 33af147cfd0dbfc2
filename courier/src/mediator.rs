//! The mediator: one behavior registry and one subscriber registry.

use std::sync::Arc;
use std::time::Instant;

use courier_behavior::{Behavior, BehaviorRegistry};
use courier_events::SubscriberRegistry;
use courier_types::{
    BoxError, Context, DynEventListener, Event, EventListener, EventType, PublishError,
    RegistrationError, Request, RequestHandler, Response,
};

use crate::config::MediatorConfig;

/// Owns the behavior pipelines and the event subscriptions.
///
/// Construct one at startup, register behaviors and listeners, then share
/// it (`&Mediator` or `Arc<Mediator>`) with whatever dispatches requests
/// and publishes events. Registration and dispatch may happen
/// concurrently.
pub struct Mediator {
    config: MediatorConfig,
    behaviors: BehaviorRegistry,
    subscribers: SubscriberRegistry,
}

impl Mediator {
    /// Create a mediator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MediatorConfig::default())
    }

    /// Create a mediator with the given configuration.
    pub fn with_config(config: MediatorConfig) -> Self {
        Self {
            config,
            behaviors: BehaviorRegistry::new(),
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &MediatorConfig {
        &self.config
    }

    /// The command/query behavior registry.
    pub fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    /// The event subscriber registry.
    pub fn subscribers(&self) -> &SubscriberRegistry {
        &self.subscribers
    }

    /// See [`BehaviorRegistry::register_command_behavior`].
    pub fn register_command_behavior(
        &self,
        order: i32,
        behavior: impl Behavior + 'static,
    ) -> Result<(), RegistrationError> {
        self.behaviors.register_command_behavior(order, behavior)
    }

    /// See [`BehaviorRegistry::register_query_behavior`].
    pub fn register_query_behavior(
        &self,
        order: i32,
        behavior: impl Behavior + 'static,
    ) -> Result<(), RegistrationError> {
        self.behaviors.register_query_behavior(order, behavior)
    }

    /// See [`SubscriberRegistry::subscribe`].
    pub fn subscribe<E: Event>(
        &self,
        listener: impl EventListener<E> + 'static,
    ) -> Result<(), RegistrationError> {
        self.subscribers.subscribe::<E>(listener)
    }

    /// See [`SubscriberRegistry::subscribe_all`].
    pub fn subscribe_all<E: Event>(
        &self,
        listeners: impl IntoIterator<Item = Arc<dyn EventListener<E>>>,
    ) -> Result<(), RegistrationError> {
        self.subscribers.subscribe_all::<E>(listeners)
    }

    /// See [`SubscriberRegistry::subscribe_dyn`].
    pub fn subscribe_dyn(&self, event_type: EventType, listener: impl DynEventListener + 'static) {
        self.subscribers.subscribe_dyn(event_type, listener);
    }

    /// Run `request` through its kind's behaviors and then `handler`.
    pub async fn send(
        &self,
        ctx: &Context,
        request: Request,
        handler: &dyn RequestHandler,
    ) -> Result<Response, BoxError> {
        if !self.config.trace_dispatch {
            return self.behaviors.execute(ctx, request, handler).await;
        }

        let kind = request.kind;
        let name = request.name.clone();
        tracing::debug!(%kind, %name, behaviors = self.behaviors.len(kind), "courier.dispatch.start");

        let started = Instant::now();
        let result = self.behaviors.execute(ctx, request, handler).await;
        tracing::debug!(
            %kind,
            %name,
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "courier.dispatch.end"
        );
        result
    }

    /// Send a command named `name`.
    pub async fn send_command(
        &self,
        ctx: &Context,
        name: impl Into<String>,
        payload: serde_json::Value,
        handler: &dyn RequestHandler,
    ) -> Result<Response, BoxError> {
        self.send(ctx, Request::command(name, payload), handler).await
    }

    /// Send a query named `name`.
    pub async fn send_query(
        &self,
        ctx: &Context,
        name: impl Into<String>,
        payload: serde_json::Value,
        handler: &dyn RequestHandler,
    ) -> Result<Response, BoxError> {
        self.send(ctx, Request::query(name, payload), handler).await
    }

    /// Publish `event` to its subscribers.
    ///
    /// With `require_subscribers` off, an event nobody listens to is logged
    /// and treated as delivered.
    pub async fn publish<E: Event>(&self, ctx: &Context, event: &E) -> Result<(), PublishError> {
        match self.subscribers.publish(ctx, event).await {
            Err(PublishError::NoHandler { event_type }) if !self.config.require_subscribers => {
                tracing::debug!(%event_type, "courier.event.unhandled");
                Ok(())
            }
            other => other,
        }
    }
}

impl Default for Mediator {
    fn default() -> Self {
        Self::new()
    }
}
