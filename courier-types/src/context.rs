//! Per-dispatch context handed to every behavior, handler and listener.

use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

/// Caller-supplied context for one dispatch or publish call.
///
/// The mediator passes it through unmodified. Honoring
/// [`cancellation_token`](Self::cancellation_token) is up to the behaviors
/// and listeners that receive it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Identifier correlating everything that happens for one logical operation.
    pub correlation_id: Option<String>,
    /// Free-form values attached by the caller (tenant, user, trace ids...).
    pub metadata: HashMap<String, serde_json::Value>,
    /// Cooperative cancellation signal.
    pub cancellation_token: CancellationToken,
}

impl Context {
    /// Create an empty context with a fresh cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the correlation id.
    #[must_use]
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Attach a metadata value.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Use an existing cancellation token (typically a child of a server-wide one).
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Look up a metadata value.
    pub fn metadata(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.get(key)
    }

    /// Whether the caller has asked for cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}
