//! Fan-out publishing with aggregated listener failures.

use std::any::Any;

use courier_types::{
    AggregateError, AnyEvent, Context, Event, ListenerFailure, PublishError,
};

use crate::registry::{Subscriber, SubscriberRegistry};

impl SubscriberRegistry {
    /// Publish `event` to every listener subscribed to `E::EVENT_TYPE`.
    ///
    /// Listeners run one after another in subscription order, each exactly
    /// once, all with the same `ctx`. A failing listener does not stop the
    /// ones after it; every failure is returned together in
    /// [`PublishError::Listeners`].
    pub async fn publish<E: Event>(&self, ctx: &Context, event: &E) -> Result<(), PublishError> {
        self.publish_dyn(ctx, event).await
    }

    /// Publish an event whose payload type is only known at runtime.
    pub async fn publish_dyn(
        &self,
        ctx: &Context,
        event: &dyn AnyEvent,
    ) -> Result<(), PublishError> {
        let event_type = event.event_type();
        let listeners = self.snapshot(event)?;
        tracing::debug!(
            event_type = %event_type,
            listeners = listeners.len(),
            "courier.event.publish"
        );

        let mut failures = Vec::new();
        for (index, subscriber) in listeners.iter().enumerate() {
            let result = match subscriber {
                Subscriber::Typed(listener) => listener.handle_erased(ctx, event).await,
                Subscriber::Dynamic(listener) => listener.handle_dyn(ctx, event).await,
            };

            if let Err(error) = result {
                tracing::warn!(
                    event_type = %event_type,
                    index,
                    error = %error,
                    "courier.event.listener_failed"
                );
                failures.push(ListenerFailure { index, error });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AggregateError::new(event_type, listeners.len(), failures).into())
        }
    }

    /// Copy out the listeners for `event`, releasing the lock before any of them run.
    fn snapshot(&self, event: &dyn AnyEvent) -> Result<Vec<Subscriber>, PublishError> {
        let event_type = event.event_type();
        let entries = self.read();

        let entry = match entries.get(&event_type) {
            Some(entry) if !entry.listeners.is_empty() => entry,
            _ => return Err(PublishError::NoHandler { event_type }),
        };

        if let Some(bound) = entry.binding {
            if bound.id != Any::type_id(event.as_any()) {
                return Err(PublishError::EventTypeConflict {
                    event_type,
                    bound: bound.name,
                    published: event.type_name(),
                });
            }
        }

        Ok(entry.listeners.clone())
    }
}
