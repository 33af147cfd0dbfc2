//! Mediator configuration.

use serde::{Deserialize, Serialize};

/// Static configuration for a [`Mediator`](crate::Mediator).
///
/// Deserializable so it can sit inside an application's own config file;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediatorConfig {
    /// Whether publishing an event nobody subscribed to is an error.
    /// When `false`, the mediator logs it and returns `Ok(())`.
    pub require_subscribers: bool,

    /// Whether the mediator emits `courier.dispatch.*` tracing events
    /// around each command and query.
    pub trace_dispatch: bool,
}

impl MediatorConfig {
    /// Set [`require_subscribers`](Self::require_subscribers).
    #[must_use]
    pub fn with_require_subscribers(mut self, require: bool) -> Self {
        self.require_subscribers = require;
        self
    }

    /// Set [`trace_dispatch`](Self::trace_dispatch).
    #[must_use]
    pub fn with_trace_dispatch(mut self, trace: bool) -> Self {
        self.trace_dispatch = trace;
        self
    }
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            require_subscribers: true,
            trace_dispatch: true,
        }
    }
}
