//! Boxed future alias used by the dyn-compatible capabilities.

use std::future::Future;
use std::pin::Pin;

/// A pinned, boxed, `Send` future borrowing for `'a`.
///
/// Behaviors and handlers return this instead of `impl Future` so they can
/// be stored as trait objects in heterogeneous collections.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
