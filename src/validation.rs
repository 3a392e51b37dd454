//! Post-hoc rotation conflict validation.
//!
//! Checks a completed set of rotation rounds for staff double-booking:
//! rounds are grouped by staff identity, sorted by start time, and every
//! pair is tested for half-open interval overlap. The check is a
//! correctness assertion over the scheduler's output; it is advisory —
//! callers log the conflict list and still return their result.

use std::collections::HashMap;

use crate::models::RotationRound;

/// Validation result: `Ok(())` or every detected conflict.
pub type ConflictResult = Result<(), Vec<RotationConflict>>;

/// One detected double-booking.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationConflict {
    /// Staff member booked twice.
    pub staff_name: String,
    /// First of the overlapping rounds (resource, start, stop).
    pub first: (String, f64, f64),
    /// Second of the overlapping rounds.
    pub second: (String, f64, f64),
}

impl std::fmt::Display for RotationConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} double-booked: {} [{}, {}) overlaps {} [{}, {})",
            self.staff_name,
            self.first.0,
            self.first.1,
            self.first.2,
            self.second.0,
            self.second.1,
            self.second.2
        )
    }
}

/// Validates that no staff member holds two overlapping rounds.
///
/// # Returns
/// `Ok(())` when the schedule is conflict-free, `Err(conflicts)` with all
/// detected violations otherwise.
pub fn validate_rounds(rounds: &[RotationRound]) -> ConflictResult {
    let mut by_staff: HashMap<&str, Vec<&RotationRound>> = HashMap::new();
    for round in rounds {
        by_staff
            .entry(round.staff_name.as_str())
            .or_default()
            .push(round);
    }

    let mut conflicts = Vec::new();
    for staff_rounds in by_staff.values_mut() {
        staff_rounds.sort_by(|a, b| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for i in 0..staff_rounds.len() {
            for j in (i + 1)..staff_rounds.len() {
                let (a, b) = (staff_rounds[i], staff_rounds[j]);
                if a.overlaps(b) {
                    conflicts.push(RotationConflict {
                        staff_name: a.staff_name.clone(),
                        first: (a.resource_id.clone(), a.start, a.stop),
                        second: (b.resource_id.clone(), b.start, b.stop),
                    });
                }
            }
        }
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        // Deterministic report order regardless of map iteration
        conflicts.sort_by(|a, b| {
            a.staff_name
                .cmp(&b.staff_name)
                .then_with(|| a.first.1.partial_cmp(&b.first.1).unwrap_or(std::cmp::Ordering::Equal))
        });
        Err(conflicts)
    }
}
