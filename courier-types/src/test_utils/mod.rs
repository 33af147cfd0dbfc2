//! In-memory implementations for testing.
//!
//! Available behind the `test-utils` feature flag. These are minimal
//! listeners and handlers that record what they saw.

mod echo_handler;
mod failing_listener;
mod recording_listener;

pub use echo_handler::EchoHandler;
pub use failing_listener::{FailingListener, ListenerFailed};
pub use recording_listener::{RecordedEvent, RecordingListener};
