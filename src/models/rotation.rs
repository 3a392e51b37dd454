//! Rotation round model.
//!
//! A rotation round is one staff check-in window against one occupied
//! resource. Rounds from the same staff member must never overlap, where
//! two half-open intervals `[a, b)` and `[c, d)` overlap iff `a < d && c < b`.

use serde::{Deserialize, Serialize};

/// One staff check-in window, scoped to one resource occupancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationRound {
    /// Assigned staff member.
    pub staff_name: String,
    /// Resource the round covers.
    pub resource_id: String,
    /// Round start (hours from epoch).
    pub start: f64,
    /// Round end (hours from epoch).
    pub stop: f64,
}

impl RotationRound {
    /// Creates a round.
    pub fn new(
        staff_name: impl Into<String>,
        resource_id: impl Into<String>,
        start: f64,
        stop: f64,
    ) -> Self {
        Self {
            staff_name: staff_name.into(),
            resource_id: resource_id.into(),
            start,
            stop,
        }
    }

    /// Whether this round's interval overlaps another's.
    pub fn overlaps(&self, other: &RotationRound) -> bool {
        intervals_overlap(self.start, self.stop, other.start, other.stop)
    }
}

/// Half-open interval overlap: `[a, b)` and `[c, d)` overlap iff `a < d && c < b`.
#[inline]
pub fn intervals_overlap(a: f64, b: f64, c: f64, d: f64) -> bool {
    a < d && c < b
}
