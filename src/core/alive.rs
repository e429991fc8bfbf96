//! # Tracker of currently running agents.
//!
//! [`AliveSet`] maintains the set of agent names that have started and not
//! yet stopped. The supervisor updates it around each agent's run and reads
//! a snapshot during shutdown to name the agents that did not stop within
//! the grace period.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Tracks which agents are currently alive.
///
/// Thread-safe and cloneable; clones share the same state.
#[derive(Clone, Default)]
pub struct AliveSet {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl AliveSet {
    /// Creates a new, empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an agent as running.
    pub fn insert(&self, name: &str) {
        self.inner.lock().unwrap().insert(name.to_string());
    }

    /// Marks an agent as stopped.
    pub fn remove(&self, name: &str) {
        self.inner.lock().unwrap().remove(name);
    }

    /// Returns a sorted snapshot of currently running agent names.
    pub fn snapshot(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.lock().unwrap().iter().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_snapshot() {
        let alive = AliveSet::new();
        alive.insert("touch");
        alive.insert("servo");
        assert_eq!(alive.snapshot(), vec!["servo", "touch"]);

        alive.remove("servo");
        assert_eq!(alive.snapshot(), vec!["touch"]);
    }
}
