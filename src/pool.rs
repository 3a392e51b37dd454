//! Resource pool with earliest-available greedy booking.
//!
//! # Algorithm
//!
//! `allocate` scans the pool for the resource with the minimum
//! next-available time and books it from that instant. Each resource is a
//! single growing occupancy chain: the pool approximates
//! earliest-available-first bin packing on one timeline per resource, and
//! deliberately does not backfill into gaps before the last booking.
//!
//! Ties on next-available time go to the first resource in pool order, so
//! results are deterministic for a given pool layout.

use log::debug;

use crate::models::{AllocationState, Resource};

/// A committed booking returned by [`ResourcePool::allocate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    /// Booked resource.
    pub resource_id: String,
    /// Occupancy start (hours from epoch).
    pub start: f64,
    /// Occupancy end (hours from epoch).
    pub stop: f64,
}

/// The set of bookable resources, exclusively owned by one run.
///
/// All occupancy mutation goes through `allocate`; snapshots taken from a
/// pool are copies and never alias the live resources.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    resources: Vec<Resource>,
}

impl ResourcePool {
    /// Creates a pool of unbooked resources from an id list.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resources: ids.into_iter().map(Resource::new).collect(),
        }
    }

    /// Creates a pool of `count` unbooked resources named `R1..Rcount`.
    pub fn with_generated_ids(count: usize) -> Self {
        Self::from_ids((1..=count).map(|i| format!("R{i}")))
    }

    /// Restores a pool from a prior snapshot, deep-copying its resources so
    /// the snapshot remains valid for retries.
    pub fn from_state(state: &AllocationState) -> Self {
        Self {
            resources: state.fork_resources(),
        }
    }

    /// Books the earliest-available resource for `duration_hours`.
    ///
    /// Returns `None` when `duration_hours <= 0` or the pool is empty.
    /// Ties on next-available time resolve to the first resource in pool
    /// order. The chosen resource's occupancy is mutated in place.
    pub fn allocate(&mut self, duration_hours: f64) -> Option<Booking> {
        if duration_hours <= 0.0 {
            return None;
        }

        let mut best: Option<usize> = None;
        let mut best_next = f64::INFINITY;
        for (idx, resource) in self.resources.iter().enumerate() {
            let next = resource.next_available();
            if next < best_next {
                best_next = next;
                best = Some(idx);
            }
        }

        let idx = best?;
        let resource = &mut self.resources[idx];
        let (start, stop) = resource.book(duration_hours);
        debug!(
            "booked resource {} for [{start}, {stop})",
            resource.id
        );
        Some(Booking {
            resource_id: resource.id.clone(),
            start,
            stop,
        })
    }

    /// The resources, in pool order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Resources that currently hold a booking.
    pub fn occupied(&self) -> Vec<&Resource> {
        self.resources.iter().filter(|r| r.is_occupied()).collect()
    }

    /// Number of resources in the pool.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Copies the current occupancies into a snapshot.
    pub fn snapshot(&self) -> Vec<Resource> {
        self.resources.clone()
    }
}
