//! Subscriber registry: tag -> ordered listeners.

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use courier_types::{
    AnyEvent, BoxError, BoxFuture, Context, DynEventListener, Event, EventListener, EventType,
    PublishError, RegistrationError,
};

/// A typed listener with its payload type erased.
pub(crate) trait ErasedListener: Send + Sync {
    fn handle_erased<'a>(
        &'a self,
        ctx: &'a Context,
        event: &'a dyn AnyEvent,
    ) -> BoxFuture<'a, Result<(), BoxError>>;
}

struct Typed<E: Event> {
    listener: Arc<dyn EventListener<E>>,
    _event: PhantomData<fn(&E)>,
}

impl<E: Event> ErasedListener for Typed<E> {
    fn handle_erased<'a>(
        &'a self,
        ctx: &'a Context,
        event: &'a dyn AnyEvent,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(async move {
            match event.downcast_ref::<E>() {
                Some(event) => self.listener.handle(ctx, event).await,
                // Publish checks the tag binding first, so this only trips if
                // that check is bypassed.
                None => Err(Box::new(PublishError::EventTypeConflict {
                    event_type: E::EVENT_TYPE,
                    bound: type_name::<E>(),
                    published: event.type_name(),
                }) as BoxError),
            }
        })
    }
}

/// One entry in a tag's listener list.
#[derive(Clone)]
pub(crate) enum Subscriber {
    /// Registered for one concrete payload type.
    Typed(Arc<dyn ErasedListener>),
    /// Registered against the abstract event capability.
    Dynamic(Arc<dyn DynEventListener>),
}

/// The concrete payload type a tag's typed listeners expect.
#[derive(Clone, Copy)]
pub(crate) struct Binding {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
}

#[derive(Default)]
pub(crate) struct Subscribers {
    pub(crate) binding: Option<Binding>,
    pub(crate) listeners: Vec<Subscriber>,
}

/// Listeners keyed by event tag, in subscription order.
///
/// The first typed subscription for a tag binds it to that payload type;
/// typed subscriptions or publishes for a different type under the same
/// tag are rejected. Dyn listeners never bind a tag.
pub struct SubscriberRegistry {
    entries: RwLock<HashMap<EventType, Subscribers>>,
}

impl SubscriberRegistry {
    /// Create a registry with no subscriptions.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe a listener for payload type `E`.
    pub fn subscribe<E: Event>(
        &self,
        listener: impl EventListener<E> + 'static,
    ) -> Result<(), RegistrationError> {
        self.subscribe_arc::<E>(Arc::new(listener))
    }

    /// Subscribe a shared listener for payload type `E`.
    pub fn subscribe_arc<E: Event>(
        &self,
        listener: Arc<dyn EventListener<E>>,
    ) -> Result<(), RegistrationError> {
        self.subscribe_all::<E>([listener])
    }

    /// Subscribe several listeners for `E`, in iteration order.
    ///
    /// Fails with [`RegistrationError::EmptyListenerSet`] when given none,
    /// and registers nothing in that case.
    pub fn subscribe_all<E: Event>(
        &self,
        listeners: impl IntoIterator<Item = Arc<dyn EventListener<E>>>,
    ) -> Result<(), RegistrationError> {
        let listeners: Vec<Subscriber> = listeners
            .into_iter()
            .map(|listener| {
                Subscriber::Typed(Arc::new(Typed {
                    listener,
                    _event: PhantomData,
                }))
            })
            .collect();

        if listeners.is_empty() {
            return Err(RegistrationError::EmptyListenerSet {
                event_type: E::EVENT_TYPE,
            });
        }

        let binding = Binding {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
        };
        let mut entries = self.write();

        if let Some(bound) = entries.get(&E::EVENT_TYPE).and_then(|s| s.binding) {
            if bound.id != binding.id {
                tracing::warn!(
                    event_type = %E::EVENT_TYPE,
                    bound = bound.name,
                    attempted = binding.name,
                    "courier.event.conflict"
                );
                return Err(RegistrationError::EventTypeConflict {
                    event_type: E::EVENT_TYPE,
                    bound: bound.name,
                    attempted: binding.name,
                });
            }
        }

        let added = listeners.len();
        let entry = entries.entry(E::EVENT_TYPE).or_default();
        entry.binding.get_or_insert(binding);
        entry.listeners.extend(listeners);

        tracing::debug!(
            event_type = %E::EVENT_TYPE,
            added,
            total = entry.listeners.len(),
            "courier.event.subscribed"
        );
        Ok(())
    }

    /// Subscribe a listener written against the abstract event capability.
    ///
    /// It receives every event published under `event_type`, whatever the
    /// payload type.
    pub fn subscribe_dyn(&self, event_type: EventType, listener: impl DynEventListener + 'static) {
        self.subscribe_dyn_arc(event_type, Arc::new(listener));
    }

    /// Shared form of [`subscribe_dyn`](Self::subscribe_dyn).
    pub fn subscribe_dyn_arc(&self, event_type: EventType, listener: Arc<dyn DynEventListener>) {
        let mut entries = self.write();
        let entry = entries.entry(event_type).or_default();
        entry.listeners.push(Subscriber::Dynamic(listener));

        tracing::debug!(
            event_type = %event_type,
            added = 1,
            total = entry.listeners.len(),
            "courier.event.subscribed"
        );
    }

    /// Number of listeners subscribed to `event_type`.
    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.read()
            .get(&event_type)
            .map_or(0, |entry| entry.listeners.len())
    }

    /// Whether anything is subscribed to `event_type`.
    pub fn has_listeners(&self, event_type: EventType) -> bool {
        self.listener_count(event_type) > 0
    }

    /// All tags with at least one listener, sorted.
    pub fn event_types(&self) -> Vec<EventType> {
        let mut types: Vec<EventType> = self
            .read()
            .iter()
            .filter(|(_, entry)| !entry.listeners.is_empty())
            .map(|(event_type, _)| *event_type)
            .collect();
        types.sort();
        types
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, HashMap<EventType, Subscribers>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<EventType, Subscribers>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
