//! Closure adapters and built-in listeners.

use std::marker::PhantomData;

use async_trait::async_trait;
use courier_types::{AnyEvent, BoxError, BoxFuture, Context, DynEventListener, Event, EventListener};

struct ListenerFn<E, F> {
    f: F,
    _event: PhantomData<fn(&E)>,
}

#[async_trait]
impl<E, F> EventListener<E> for ListenerFn<E, F>
where
    E: Event,
    F: for<'a> Fn(&'a Context, &'a E) -> BoxFuture<'a, Result<(), BoxError>> + Send + Sync,
{
    async fn handle(&self, ctx: &Context, event: &E) -> Result<(), BoxError> {
        (self.f)(ctx, event).await
    }
}

/// Create a typed listener from a closure returning a boxed future.
///
/// ```ignore
/// registry.subscribe::<OrderPlaced>(listener_fn::<OrderPlaced, _>(|_ctx, event| {
///     Box::pin(async move {
///         println!("order {} placed", event.order_id);
///         Ok(())
///     })
/// }))?;
/// ```
#[must_use]
pub fn listener_fn<E, F>(f: F) -> impl EventListener<E>
where
    E: Event,
    F: for<'a> Fn(&'a Context, &'a E) -> BoxFuture<'a, Result<(), BoxError>> + Send + Sync,
{
    ListenerFn {
        f,
        _event: PhantomData,
    }
}

struct DynListenerFn<F> {
    f: F,
}

#[async_trait]
impl<F> DynEventListener for DynListenerFn<F>
where
    F: for<'a> Fn(&'a Context, &'a dyn AnyEvent) -> BoxFuture<'a, Result<(), BoxError>>
        + Send
        + Sync,
{
    async fn handle_dyn(&self, ctx: &Context, event: &dyn AnyEvent) -> Result<(), BoxError> {
        (self.f)(ctx, event).await
    }
}

/// Create a listener for the abstract event capability from a closure.
#[must_use]
pub fn dyn_listener_fn<F>(f: F) -> impl DynEventListener
where
    F: for<'a> Fn(&'a Context, &'a dyn AnyEvent) -> BoxFuture<'a, Result<(), BoxError>>
        + Send
        + Sync,
{
    DynListenerFn { f }
}

/// A listener that emits a `DEBUG` [`tracing`] event for every delivery.
///
/// Subscribe it with [`SubscriberRegistry::subscribe_dyn`](crate::SubscriberRegistry::subscribe_dyn)
/// under each tag worth auditing. Never fails.
pub struct TracingListener;

impl TracingListener {
    /// Create a new `TracingListener`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DynEventListener for TracingListener {
    async fn handle_dyn(&self, ctx: &Context, event: &dyn AnyEvent) -> Result<(), BoxError> {
        tracing::debug!(
            event_type = %event.event_type(),
            payload = ?event,
            correlation_id = ctx.correlation_id.as_deref().unwrap_or_default(),
            "courier.event.received"
        );
        Ok(())
    }
}
