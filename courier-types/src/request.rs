//! Commands, queries and their responses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which behavior pipeline a request travels through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// A state-changing request.
    Command,
    /// A read-only request.
    Query,
}

impl RequestKind {
    /// Lowercase name, as used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Query => "query",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command or query in flight through the behavior pipeline.
///
/// Behaviors receive the request by value and may hand a modified copy to
/// the rest of the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Command or query.
    pub kind: RequestKind,
    /// Routing name, e.g. `"place_order"`.
    pub name: String,
    /// Request body.
    pub payload: serde_json::Value,
}

impl Request {
    /// Build a command.
    pub fn command(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: RequestKind::Command,
            name: name.into(),
            payload,
        }
    }

    /// Build a query.
    pub fn query(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            kind: RequestKind::Query,
            name: name.into(),
            payload,
        }
    }
}

/// What a handler (and therefore the whole chain) produces.
pub type Response = serde_json::Value;
