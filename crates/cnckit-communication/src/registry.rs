//! Listener registry
//!
//! Maps each known event name to the ordered list of listeners subscribed
//! to it. Registration order is invocation order, duplicates are allowed,
//! and removal takes out the first listener with a matching identity.

use cnckit_core::{EventName, Listener};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Subscriber table keyed by event name
#[derive(Debug, Clone)]
pub struct ListenerRegistry {
    listeners: HashMap<EventName, Vec<Listener>>,
}

impl ListenerRegistry {
    /// Create a registry with an empty list for every known event
    pub fn new() -> Self {
        Self {
            listeners: EventName::ALL
                .iter()
                .map(|name| (*name, Vec::new()))
                .collect(),
        }
    }

    /// Append `listener` to the list for `name`
    pub fn register(&mut self, name: EventName, listener: Listener) -> bool {
        tracing::debug!("{} registered for '{}'", listener.id(), name);
        self.listeners.entry(name).or_default().push(listener);
        true
    }

    /// Append `listener` to the list for the event called `name`.
    ///
    /// Returns false, leaving the registry untouched, if `name` is not a
    /// known event.
    pub fn register_by_name(&mut self, name: &str, listener: Listener) -> bool {
        match name.parse::<EventName>() {
            Ok(event) => self.register(event, listener),
            Err(err) => {
                tracing::debug!("Ignoring registration: {}", err);
                false
            }
        }
    }

    /// Remove the first occurrence of `listener` from the list for `name`.
    ///
    /// Removing a listener that is not registered is a no-op that still
    /// returns true.
    pub fn deregister(&mut self, name: EventName, listener: &Listener) -> bool {
        if let Some(list) = self.listeners.get_mut(&name) {
            if let Some(index) = list.iter().position(|l| l == listener) {
                list.remove(index);
                tracing::debug!("{} deregistered from '{}'", listener.id(), name);
            }
        }
        true
    }

    /// Remove the first occurrence of `listener` from the list for the event
    /// called `name`. Returns false if `name` is not a known event.
    pub fn deregister_by_name(&mut self, name: &str, listener: &Listener) -> bool {
        match name.parse::<EventName>() {
            Ok(event) => self.deregister(event, listener),
            Err(err) => {
                tracing::debug!("Ignoring deregistration: {}", err);
                false
            }
        }
    }

    /// Snapshot of the listeners for `name`, in invocation order
    pub fn listeners(&self, name: EventName) -> Vec<Listener> {
        self.listeners.get(&name).cloned().unwrap_or_default()
    }

    /// Number of listeners registered for `name`
    pub fn listener_count(&self, name: EventName) -> usize {
        self.listeners.get(&name).map_or(0, Vec::len)
    }

    /// Number of listeners across all events
    pub fn total_listeners(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Invoke every listener for `name` with `args`.
    ///
    /// Returns the number of listeners that panicked.
    pub fn dispatch(&self, name: EventName, args: &[Value]) -> usize {
        match self.listeners.get(&name) {
            Some(list) => invoke_isolated(list, name, args),
            None => 0,
        }
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Invoke `listeners` in order with `args`.
///
/// A listener that panics is logged and skipped; the rest still run.
/// Returns the number of listeners that panicked.
pub fn invoke_isolated(listeners: &[Listener], name: EventName, args: &[Value]) -> usize {
    let mut failures = 0;
    for listener in listeners {
        if catch_unwind(AssertUnwindSafe(|| listener.call(args))).is_err() {
            failures += 1;
            tracing::warn!("{} panicked while handling '{}'", listener.id(), name);
        }
    }
    failures
}
