//! Type aliases for commonly used complex types.
//!
//! Callback shapes cross crate boundaries (the transport contract, the
//! facade, tests), so they get a single name here.
//!
//! ```rust,ignore
//! use cnckit_core::types::*;
//!
//! // Instead of: Arc<parking_lot::Mutex<Session>>
//! let session: ThreadSafe<Session> = thread_safe(Session::default());
//! ```

use crate::error::RemoteError;
use crate::event::EventName;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::sync::Arc;

// =============================================================================
// THREAD-SAFE SHARED TYPES
// =============================================================================

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex`, which never poisons.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Wrap a value in a [`ThreadSafe`]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Wrap a value in a [`ThreadSafeRw`]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}

// =============================================================================
// CALLBACK TYPES
// =============================================================================

/// Outcome of a request acknowledged by the service: the acknowledgment
/// arguments, or the error the service reported.
pub type AckResult = Result<Vec<Value>, RemoteError>;

/// One-shot acknowledgment callback for a forwarded request.
pub type AckCallback = Box<dyn FnOnce(AckResult) + Send>;

/// One-shot callback fired when the service greets a new connection.
pub type ReadyCallback = Box<dyn FnOnce() + Send>;

/// Single entry point through which a transport delivers pushed events.
pub type EventSink = Arc<dyn Fn(EventName, Vec<Value>) + Send + Sync>;
