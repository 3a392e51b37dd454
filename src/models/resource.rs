//! Bookable resource model.
//!
//! A resource is a room or bed with at most one occupancy window. Booking
//! extends a single growing occupancy chain per resource — there is no
//! interval set and no backfilling into gaps before the last booking.

use serde::{Deserialize, Serialize};

/// A bookable resource (room/bed).
///
/// A resource that has never been booked has no occupancy and is available
/// from t=0. Once booked, its occupancy records the last window and the
/// resource becomes available again at `occupancy.until`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Current occupancy window. `None` = never booked.
    pub occupancy: Option<Occupancy>,
}

/// An occupancy window on a resource.
///
/// Invariant: `until >= from`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Occupancy {
    /// Window start (hours from epoch).
    pub from: f64,
    /// Window end (hours from epoch).
    pub until: f64,
}

impl Resource {
    /// Creates an unbooked resource.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            occupancy: None,
        }
    }

    /// Earliest instant this resource can begin a new occupancy.
    ///
    /// 0.0 when never booked, else the end of the current occupancy.
    pub fn next_available(&self) -> f64 {
        self.occupancy.map(|o| o.until).unwrap_or(0.0)
    }

    /// Whether this resource currently holds a booking.
    pub fn is_occupied(&self) -> bool {
        self.occupancy.is_some()
    }

    /// Books this resource from its next-available time for `duration_hours`.
    ///
    /// Overwrites the occupancy in place (single occupancy chain) and
    /// returns the booked `[start, stop)` window.
    pub fn book(&mut self, duration_hours: f64) -> (f64, f64) {
        let start = self.next_available();
        let stop = start + duration_hours;
        self.occupancy = Some(Occupancy { from: start, until: stop });
        (start, stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbooked_available_at_zero() {
        let r = Resource::new("R1");
        assert!((r.next_available() - 0.0).abs() < 1e-10);
        assert!(!r.is_occupied());
    }

    #[test]
    fn test_book_advances_next_available() {
        let mut r = Resource::new("R1");
        let (start, stop) = r.book(5.0);
        assert!((start - 0.0).abs() < 1e-10);
        assert!((stop - 5.0).abs() < 1e-10);
        assert!((r.next_available() - 5.0).abs() < 1e-10);
        assert!(r.is_occupied());

        // Chained booking starts where the last one ended
        let (start2, stop2) = r.book(3.0);
        assert!((start2 - 5.0).abs() < 1e-10);
        assert!((stop2 - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_occupancy_invariant() {
        let mut r = Resource::new("R1");
        r.book(2.5);
        let occ = r.occupancy.unwrap();
        assert!(occ.until >= occ.from);
    }
}
