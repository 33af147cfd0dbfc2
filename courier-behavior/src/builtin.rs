//! Built-in behaviors.

use std::time::{Duration, Instant};

use courier_types::{BoxError, BoxFuture, Context, DispatchError, Request, Response};

use crate::behavior::{Behavior, Next};

/// Behavior that emits structured [`tracing`] events around the rest of the chain.
///
/// Never alters the request or the result.
///
/// | Event | Level |
/// |-------|-------|
/// | `courier.request.start` | `DEBUG` |
/// | `courier.request.ok` | `DEBUG` |
/// | `courier.request.failed` | `WARN` |
pub struct TracingBehavior;

impl TracingBehavior {
    /// Create a new `TracingBehavior`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for TracingBehavior {
    fn handle<'a>(
        &'a self,
        ctx: &'a Context,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Response, BoxError>> {
        Box::pin(async move {
            let kind = request.kind;
            let name = request.name.clone();
            let correlation_id = ctx.correlation_id.clone().unwrap_or_default();
            tracing::debug!(%kind, %name, %correlation_id, "courier.request.start");

            let started = Instant::now();
            let result = next.run(ctx, request).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(_) => {
                    tracing::debug!(%kind, %name, %correlation_id, elapsed_ms, "courier.request.ok")
                }
                Err(e) => tracing::warn!(
                    %kind,
                    %name,
                    %correlation_id,
                    elapsed_ms,
                    error = %e,
                    "courier.request.failed"
                ),
            }
            result
        })
    }
}

/// Behavior that stops a request once its context is cancelled.
///
/// Short-circuits with [`DispatchError::Cancelled`] if the token is already
/// cancelled, and abandons the rest of the chain if it is cancelled while
/// the chain is running.
pub struct CancellationGuard;

impl CancellationGuard {
    /// Create a new `CancellationGuard`.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for CancellationGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for CancellationGuard {
    fn handle<'a>(
        &'a self,
        ctx: &'a Context,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Response, BoxError>> {
        Box::pin(async move {
            if ctx.is_cancelled() {
                return Err(DispatchError::Cancelled(request.name).into());
            }

            let name = request.name.clone();
            tokio::select! {
                biased;
                _ = ctx.cancellation_token.cancelled() => {
                    Err(BoxError::from(DispatchError::Cancelled(name)))
                }
                result = next.run(ctx, request) => result,
            }
        })
    }
}

/// Behavior that fails a request whose remaining chain takes longer than a limit.
pub struct TimeoutBehavior {
    limit: Duration,
}

impl TimeoutBehavior {
    /// Create a timeout behavior with the given limit.
    #[must_use]
    pub fn new(limit: Duration) -> Self {
        Self { limit }
    }
}

impl Behavior for TimeoutBehavior {
    fn handle<'a>(
        &'a self,
        ctx: &'a Context,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<Response, BoxError>> {
        Box::pin(async move {
            let name = request.name.clone();
            match tokio::time::timeout(self.limit, next.run(ctx, request)).await {
                Ok(result) => result,
                Err(_) => Err(DispatchError::TimedOut {
                    name,
                    after: self.limit,
                }
                .into()),
            }
        })
    }
}
