//! RecordingListener — records every event it receives and always succeeds.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::BoxError;
use crate::event::{AnyEvent, DynEventListener, Event, EventListener, EventType};

/// A recorded delivery for inspection in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    /// Tag the event was published under.
    pub event_type: EventType,
    /// `Debug` rendering of the payload.
    pub payload: String,
    /// Correlation id of the publishing context.
    pub correlation_id: Option<String>,
}

/// A listener usable for any event type, typed or dyn.
/// Use `.events()` to inspect what was delivered.
pub struct RecordingListener {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingListener {
    /// Create a listener with an empty log.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Return a snapshot of all recorded deliveries.
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of deliveries so far.
    pub fn calls(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    fn record(&self, ctx: &Context, event: &dyn AnyEvent) {
        self.events.lock().unwrap().push(RecordedEvent {
            event_type: event.event_type(),
            payload: format!("{event:?}"),
            correlation_id: ctx.correlation_id.clone(),
        });
    }
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Event> EventListener<E> for RecordingListener {
    async fn handle(&self, ctx: &Context, event: &E) -> Result<(), BoxError> {
        self.record(ctx, event);
        Ok(())
    }
}

#[async_trait]
impl DynEventListener for RecordingListener {
    async fn handle_dyn(&self, ctx: &Context, event: &dyn AnyEvent) -> Result<(), BoxError> {
        self.record(ctx, event);
        Ok(())
    }
}
