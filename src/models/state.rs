//! Allocation state snapshot.
//!
//! Captures the resource occupancies and request ledger at the end of a run
//! so a later batch can continue from exactly that timeline. A snapshot is
//! owned by the run that produced it; continuation always works on a deep
//! copy, never on the original.

use serde::{Deserialize, Serialize};

use super::{Request, Resource};

/// End-of-run snapshot: resource occupancies plus the request ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationState {
    /// All resources with their occupancy windows.
    pub resources: Vec<Resource>,
    /// Requests processed in the run that produced this snapshot.
    pub requests: Vec<Request>,
}

impl AllocationState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state from resources only (fresh request ledger).
    pub fn from_resources(resources: Vec<Resource>) -> Self {
        Self {
            resources,
            requests: Vec::new(),
        }
    }

    /// Takes an exclusive deep copy of the resources for a continuation run.
    ///
    /// The snapshot itself stays valid for retries or parallel what-if
    /// evaluation; the returned resources are independently owned.
    pub fn fork_resources(&self) -> Vec<Resource> {
        self.resources.clone()
    }

    /// Number of resources currently holding a booking.
    pub fn occupied_count(&self) -> usize {
        self.resources.iter().filter(|r| r.is_occupied()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fork_is_independent() {
        let mut r = Resource::new("R1");
        r.book(5.0);
        let state = AllocationState::from_resources(vec![r, Resource::new("R2")]);

        let mut forked = state.fork_resources();
        forked[0].book(10.0);
        forked[1].book(2.0);

        // Original snapshot untouched
        assert!((state.resources[0].next_available() - 5.0).abs() < 1e-10);
        assert!(!state.resources[1].is_occupied());
        assert_eq!(state.occupied_count(), 1);
    }

    #[test]
    fn test_state_restores_from_json() {
        let mut r = Resource::new("R1");
        r.book(5.0);
        let state = AllocationState::from_resources(vec![r]);

        let json = serde_json::to_string(&state).unwrap();
        let restored: AllocationState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.resources.len(), 1);
        assert_eq!(restored.resources[0].id, "R1");
        assert!((restored.resources[0].next_available() - 5.0).abs() < 1e-10);
    }
}
