//! Incoming request model.
//!
//! A request is one patient in a batch: an identifier, an optional risk
//! profile, and — once allocated — the booked resource and its window.
//! Requests are created per batch and never reused across batches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An incoming request (patient).
///
/// `resource_id`/`start`/`stop` are `None` until the request is assigned a
/// resource (the unassigned sentinel).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Unique request identifier.
    pub id: String,
    /// Booked resource id, once assigned.
    pub resource_id: Option<String>,
    /// Occupancy start (hours from epoch), once assigned.
    pub start: Option<f64>,
    /// Occupancy end (hours from epoch), once assigned.
    pub stop: Option<f64>,
}

impl Request {
    /// Creates an unassigned request.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_id: None,
            start: None,
            stop: None,
        }
    }

    /// Records the booked resource and window.
    pub fn assign(&mut self, resource_id: impl Into<String>, start: f64, stop: f64) {
        self.resource_id = Some(resource_id.into());
        self.start = Some(start);
        self.stop = Some(stop);
    }

    /// Whether this request holds a booking.
    pub fn is_assigned(&self) -> bool {
        self.resource_id.is_some()
    }
}

/// Risk signal attached to a request.
///
/// The category is an open string set; Critical, High, Observation, Stable
/// and Low are the conventional values the default fit policy knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Risk score in [0, 1] (clamped on construction).
    pub score: f64,
    /// Risk category.
    pub category: String,
}

impl RiskProfile {
    /// Creates a risk profile; the score is clamped to [0, 1].
    pub fn new(score: f64, category: impl Into<String>) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            category: category.into(),
        }
    }
}

/// A candidate (staff, resource) pairing offered to the allocator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeasibleOption {
    /// Candidate staff member.
    pub staff_name: String,
    /// Candidate resource.
    pub resource_id: String,
    /// Resource classification (e.g. "Negative Pressure", "Isolation", "General").
    pub resource_type: String,
    /// Staff member's current assignment count.
    pub staff_load: u32,
    /// Certifications held by the staff member, when known.
    pub staff_certifications: Option<BTreeSet<String>>,
}

impl FeasibleOption {
    /// Creates an option without certification data.
    pub fn new(
        staff_name: impl Into<String>,
        resource_id: impl Into<String>,
        resource_type: impl Into<String>,
        staff_load: u32,
    ) -> Self {
        Self {
            staff_name: staff_name.into(),
            resource_id: resource_id.into(),
            resource_type: resource_type.into(),
            staff_load,
            staff_certifications: None,
        }
    }

    /// Attaches the staff member's certifications.
    pub fn with_certifications<I, S>(mut self, certs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.staff_certifications = Some(certs.into_iter().map(Into::into).collect());
        self
    }

    /// The (staff, resource) pair key used for within-batch exclusivity.
    pub fn pair(&self) -> (String, String) {
        (self.staff_name.clone(), self.resource_id.clone())
    }
}

/// A staff member in a rotation candidate pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    /// Staff identity; overlap checks key on this across the whole batch.
    pub name: String,
    /// Current assignment count; lower load is preferred.
    pub load: u32,
}

impl StaffMember {
    /// Creates a staff member.
    pub fn new(name: impl Into<String>, load: u32) -> Self {
        Self {
            name: name.into(),
            load,
        }
    }
}
