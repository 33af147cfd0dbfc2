//! The terminal operation a behavior chain wraps.

use crate::context::Context;
use crate::error::BoxError;
use crate::future::BoxFuture;
use crate::request::{Request, Response};

/// The actual command or query handler at the end of a behavior chain.
///
/// Supplied by whatever layer owns request routing; the mediator only wraps
/// it. Errors are returned to the caller unchanged.
pub trait RequestHandler: Send + Sync {
    /// Handle one request.
    fn handle<'a>(
        &'a self,
        ctx: &'a Context,
        request: Request,
    ) -> BoxFuture<'a, Result<Response, BoxError>>;
}

struct HandlerFn<F> {
    f: F,
}

impl<F> RequestHandler for HandlerFn<F>
where
    F: for<'a> Fn(&'a Context, Request) -> BoxFuture<'a, Result<Response, BoxError>>
        + Send
        + Sync,
{
    fn handle<'a>(
        &'a self,
        ctx: &'a Context,
        request: Request,
    ) -> BoxFuture<'a, Result<Response, BoxError>> {
        (self.f)(ctx, request)
    }
}

/// Create a [`RequestHandler`] from a closure returning a boxed future.
///
/// # Example
///
/// ```
/// use courier_types::{handler_fn, BoxError, Response};
///
/// let echo = handler_fn(|_ctx, request| {
///     Box::pin(async move {
///         let response: Result<Response, BoxError> = Ok(request.payload);
///         response
///     })
/// });
/// # let _ = echo;
/// ```
#[must_use]
pub fn handler_fn<F>(f: F) -> impl RequestHandler
where
    F: for<'a> Fn(&'a Context, Request) -> BoxFuture<'a, Result<Response, BoxError>>
        + Send
        + Sync,
{
    HandlerFn { f }
}
