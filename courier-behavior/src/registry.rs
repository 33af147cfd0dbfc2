//! Behavior registry: register by order, snapshot, execute.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use courier_types::{
    BoxError, Context, RegistrationError, Request, RequestHandler, RequestKind, Response,
};

use crate::behavior::{Behavior, Next};

#[derive(Default)]
struct Pipelines {
    commands: BTreeMap<i32, Arc<dyn Behavior>>,
    queries: BTreeMap<i32, Arc<dyn Behavior>>,
}

impl Pipelines {
    fn get(&self, kind: RequestKind) -> &BTreeMap<i32, Arc<dyn Behavior>> {
        match kind {
            RequestKind::Command => &self.commands,
            RequestKind::Query => &self.queries,
        }
    }

    fn get_mut(&mut self, kind: RequestKind) -> &mut BTreeMap<i32, Arc<dyn Behavior>> {
        match kind {
            RequestKind::Command => &mut self.commands,
            RequestKind::Query => &mut self.queries,
        }
    }
}

/// Command and query behaviors, each keyed by a unique order.
///
/// Higher orders run outermost. Registration takes the write lock;
/// enumeration takes the read lock and hands back a snapshot, so a
/// dispatch never holds the lock while behaviors run.
pub struct BehaviorRegistry {
    pipelines: RwLock<Pipelines>,
}

impl BehaviorRegistry {
    /// Create a registry with no behaviors.
    pub fn new() -> Self {
        Self {
            pipelines: RwLock::new(Pipelines::default()),
        }
    }

    /// Register a command behavior at `order`.
    pub fn register_command_behavior(
        &self,
        order: i32,
        behavior: impl Behavior + 'static,
    ) -> Result<(), RegistrationError> {
        self.register_arc(RequestKind::Command, order, Arc::new(behavior))
    }

    /// Register a query behavior at `order`.
    pub fn register_query_behavior(
        &self,
        order: i32,
        behavior: impl Behavior + 'static,
    ) -> Result<(), RegistrationError> {
        self.register_arc(RequestKind::Query, order, Arc::new(behavior))
    }

    /// Register a behavior into the `kind` pipeline.
    pub fn register(
        &self,
        kind: RequestKind,
        order: i32,
        behavior: impl Behavior + 'static,
    ) -> Result<(), RegistrationError> {
        self.register_arc(kind, order, Arc::new(behavior))
    }

    /// Register a shared behavior, e.g. one instance used by both pipelines.
    ///
    /// Fails with [`RegistrationError::DuplicateOrder`] if `order` is taken
    /// in that pipeline; the existing behavior stays in place.
    pub fn register_arc(
        &self,
        kind: RequestKind,
        order: i32,
        behavior: Arc<dyn Behavior>,
    ) -> Result<(), RegistrationError> {
        let mut pipelines = self
            .pipelines
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let pipeline = pipelines.get_mut(kind);

        if pipeline.contains_key(&order) {
            tracing::warn!(kind = %kind, order, "courier.behavior.rejected");
            return Err(RegistrationError::DuplicateOrder { kind, order });
        }

        pipeline.insert(order, behavior);
        tracing::debug!(kind = %kind, order, total = pipeline.len(), "courier.behavior.registered");
        Ok(())
    }

    /// Behaviors for `kind`, highest order first.
    pub fn sorted_behaviors(&self, kind: RequestKind) -> Vec<Arc<dyn Behavior>> {
        let pipelines = self.pipelines.read().unwrap_or_else(PoisonError::into_inner);
        pipelines.get(kind).values().rev().cloned().collect()
    }

    /// Registered orders for `kind`, highest first.
    pub fn orders(&self, kind: RequestKind) -> Vec<i32> {
        let pipelines = self.pipelines.read().unwrap_or_else(PoisonError::into_inner);
        pipelines.get(kind).keys().rev().copied().collect()
    }

    /// Number of behaviors registered for `kind`.
    pub fn len(&self, kind: RequestKind) -> usize {
        let pipelines = self.pipelines.read().unwrap_or_else(PoisonError::into_inner);
        pipelines.get(kind).len()
    }

    /// Whether `kind` has no behaviors.
    pub fn is_empty(&self, kind: RequestKind) -> bool {
        self.len(kind) == 0
    }

    /// Freeze the current `kind` pipeline for repeated execution.
    pub fn pipeline(&self, kind: RequestKind) -> Pipeline {
        Pipeline {
            kind,
            behaviors: self.sorted_behaviors(kind),
        }
    }

    /// Run `request` through its kind's behaviors and then `handler`.
    ///
    /// The pipeline is snapshotted before the first behavior runs.
    pub async fn execute(
        &self,
        ctx: &Context,
        request: Request,
        handler: &dyn RequestHandler,
    ) -> Result<Response, BoxError> {
        self.pipeline(request.kind)
            .execute(ctx, request, handler)
            .await
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of one pipeline, outermost behavior first.
#[derive(Clone)]
pub struct Pipeline {
    kind: RequestKind,
    behaviors: Vec<Arc<dyn Behavior>>,
}

impl Pipeline {
    /// Which pipeline this snapshot was taken from.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Number of behaviors in the snapshot.
    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    /// Whether the snapshot is empty (requests go straight to the handler).
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Run `request` through the snapshot and then `handler`.
    pub async fn execute(
        &self,
        ctx: &Context,
        request: Request,
        handler: &dyn RequestHandler,
    ) -> Result<Response, BoxError> {
        Next::new(handler, &self.behaviors).run(ctx, request).await
    }
}
