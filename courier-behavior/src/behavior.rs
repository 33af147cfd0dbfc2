//! The behavior capability and the continuation it receives.
//!
//! Each behavior gets the request by value plus a [`Next`] for the rest of
//! the chain, and can:
//! - inspect or replace the request before calling `next.run()`
//! - short-circuit by returning without calling `next.run()`
//! - inspect, replace or recover from the result after the chain returns

use std::sync::Arc;

use courier_types::{BoxError, BoxFuture, Context, Request, RequestHandler, Response};

/// Middleware around command or query execution.
///
/// Uses boxed futures so heterogeneous behaviors can share one collection.
pub trait Behavior: Send + Sync {
    /// Process a request, optionally delegating to the rest of the chain.
    fn handle<'a>(
        &'a self,
        ctx: &'a Context,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Response, BoxError>>;
}

/// The remaining behaviors plus the terminal handler.
///
/// Consumed on call to prevent double-invoke.
pub struct Next<'a> {
    handler: &'a dyn RequestHandler,
    behaviors: &'a [Arc<dyn Behavior>],
}

impl<'a> Next<'a> {
    /// Chain `behaviors` (outermost first) around `handler`.
    pub fn new(handler: &'a dyn RequestHandler, behaviors: &'a [Arc<dyn Behavior>]) -> Self {
        Self { handler, behaviors }
    }

    /// Behaviors still ahead of the handler.
    pub fn remaining(&self) -> usize {
        self.behaviors.len()
    }

    /// Continue the chain, eventually calling the handler.
    ///
    /// Errors come back exactly as the failing behavior or handler returned them.
    pub async fn run(self, ctx: &'a Context, request: Request) -> Result<Response, BoxError> {
        if let Some((head, tail)) = self.behaviors.split_first() {
            let next = Next::new(self.handler, tail);
            head.handle(ctx, request, next).await
        } else {
            self.handler.handle(ctx, request).await
        }
    }
}

struct BehaviorFn<F> {
    f: F,
}

impl<F> Behavior for BehaviorFn<F>
where
    F: for<'a> Fn(&'a Context, Request, Next<'a>) -> BoxFuture<'a, Result<Response, BoxError>>
        + Send
        + Sync,
{
    fn handle<'a>(
        &'a self,
        ctx: &'a Context,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Response, BoxError>> {
        (self.f)(ctx, request, next)
    }
}

/// Create a behavior from a closure.
///
/// The closure must return a `Box::pin(async move { ... })` future.
///
/// # Example
///
/// ```ignore
/// use courier_behavior::*;
///
/// let audit = behavior_fn(|ctx, request, next| {
///     Box::pin(async move {
///         tracing::info!(name = %request.name, "audit");
///         next.run(ctx, request).await
///     })
/// });
/// ```
#[must_use]
pub fn behavior_fn<F>(f: F) -> impl Behavior
where
    F: for<'a> Fn(&'a Context, Request, Next<'a>) -> BoxFuture<'a, Result<Response, BoxError>>
        + Send
        + Sync,
{
    BehaviorFn { f }
}
