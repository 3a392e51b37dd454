//! Allocation record model.
//!
//! One record per request in a batch: either a binding (staff, resource)
//! assignment with its rotation rounds, or a waitlist entry whose position
//! comes from the three-band risk mapping.

use serde::{Deserialize, Serialize};

use super::RotationRound;

/// Outcome of allocating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStatus {
    /// Binding (staff, resource) assignment.
    Assigned,
    /// No feasible option remained; queued by risk band.
    Waitlisted,
}

/// The allocation decision for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRecord {
    /// Request this record belongs to.
    pub request_id: String,
    /// Assigned or waitlisted.
    pub status: AllocationStatus,
    /// Risk score the decision was ordered by.
    pub risk_score: f64,
    /// Risk category the fit scores were computed against.
    pub risk_category: String,
    /// Assigned resource; set when status is `Assigned`.
    pub resource_id: Option<String>,
    /// Assigned staff member; set when status is `Assigned`.
    pub staff_name: Option<String>,
    /// Waitlist band (1 = next to place); set when status is `Waitlisted`.
    ///
    /// A coarse priority band from the risk score, not a dense rank over
    /// the waitlist.
    pub waitlist_position: Option<u32>,
    /// Predicted duration label carried through from the risk profile.
    pub duration_label: Option<String>,
    /// Rotation rounds committed for this request's resource.
    pub rotation_rounds: Vec<RotationRound>,
}

impl AllocationRecord {
    /// Creates an assigned record.
    pub fn assigned(
        request_id: impl Into<String>,
        risk_score: f64,
        risk_category: impl Into<String>,
        resource_id: impl Into<String>,
        staff_name: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            status: AllocationStatus::Assigned,
            risk_score,
            risk_category: risk_category.into(),
            resource_id: Some(resource_id.into()),
            staff_name: Some(staff_name.into()),
            waitlist_position: None,
            duration_label: None,
            rotation_rounds: Vec::new(),
        }
    }

    /// Creates a waitlisted record with its band computed from the score.
    pub fn waitlisted(
        request_id: impl Into<String>,
        risk_score: f64,
        risk_category: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            status: AllocationStatus::Waitlisted,
            risk_score,
            risk_category: risk_category.into(),
            resource_id: None,
            staff_name: None,
            waitlist_position: Some(waitlist_band(risk_score)),
            duration_label: None,
            rotation_rounds: Vec::new(),
        }
    }

    /// Attaches the predicted duration label.
    pub fn with_duration_label(mut self, label: impl Into<String>) -> Self {
        self.duration_label = Some(label.into());
        self
    }
}

/// Maps a risk score to a waitlist band.
///
/// `score >= 0.8` → 1, `0.5 <= score < 0.8` → 2, otherwise 3. The band is
/// independent of waitlist length.
pub fn waitlist_band(risk_score: f64) -> u32 {
    if risk_score >= 0.8 {
        1
    } else if risk_score >= 0.5 {
        2
    } else {
        3
    }
}
