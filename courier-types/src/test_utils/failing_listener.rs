//! FailingListener — counts deliveries and always fails.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use thiserror::Error;

use crate::context::Context;
use crate::error::BoxError;
use crate::event::{AnyEvent, DynEventListener, Event, EventListener};

/// The error a [`FailingListener`] returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ListenerFailed(pub String);

/// A listener that fails every delivery with [`ListenerFailed`].
pub struct FailingListener {
    message: String,
    calls: AtomicUsize,
}

impl FailingListener {
    /// Create a listener failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of deliveries so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail(&self) -> Result<(), BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Box::new(ListenerFailed(self.message.clone())))
    }
}

#[async_trait]
impl<E: Event> EventListener<E> for FailingListener {
    async fn handle(&self, _ctx: &Context, _event: &E) -> Result<(), BoxError> {
        self.fail()
    }
}

#[async_trait]
impl DynEventListener for FailingListener {
    async fn handle_dyn(&self, _ctx: &Context, _event: &dyn AnyEvent) -> Result<(), BoxError> {
        self.fail()
    }
}
