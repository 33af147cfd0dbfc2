#![deny(missing_docs)]
//! Behavior pipelines for commands and queries.
//!
//! A [`BehaviorRegistry`] keeps two independent ordered collections of
//! [`Behavior`]s, one per [`RequestKind`](courier_types::RequestKind).
//! Dispatching a request wraps the terminal
//! [`RequestHandler`](courier_types::RequestHandler) in every behavior of
//! its kind, highest order outermost:
//!
//! ```text
//! B(10) -> B(5) -> B(-3) -> handler
//! ```
//!
//! Each behavior receives a [`Next`] it may run, skip, or run and then
//! rewrite the result of.

pub mod behavior;
pub mod builtin;
pub mod registry;

pub use behavior::*;
pub use builtin::*;
pub use registry::*;
