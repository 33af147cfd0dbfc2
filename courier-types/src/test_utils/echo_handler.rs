//! EchoHandler — returns the request payload as the response.

use std::sync::Mutex;

use crate::context::Context;
use crate::error::BoxError;
use crate::future::BoxFuture;
use crate::handler::RequestHandler;
use crate::request::{Request, Response};

/// A handler that echoes the payload back and remembers every request.
pub struct EchoHandler {
    seen: Mutex<Vec<Request>>,
}

impl EchoHandler {
    /// Create a handler with an empty history.
    pub fn new() -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.seen.lock().unwrap().clone()
    }

    /// How many times the handler ran.
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Default for EchoHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestHandler for EchoHandler {
    fn handle<'a>(
        &'a self,
        _ctx: &'a Context,
        request: Request,
    ) -> BoxFuture<'a, Result<Response, BoxError>> {
        Box::pin(async move {
            let payload = request.payload.clone();
            self.seen.lock().unwrap().push(request);
            Ok(payload)
        })
    }
}
