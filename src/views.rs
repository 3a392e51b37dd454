//! Report views over allocation output.
//!
//! The same batch result is read by two audiences: staff want their own
//! round list in time order, coordinators want a per-request summary of
//! what each request got. Both views are plain serializable projections;
//! nothing here feeds back into allocation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{AllocationRecord, AllocationStatus, Request, RotationRound};

/// One round as seen from a staff member's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Resource the round covers.
    pub resource_id: String,
    /// Round start (hours).
    pub start: f64,
    /// Round end (hours).
    pub stop: f64,
}

/// One staff member's full round list, sorted by start time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffSchedule {
    /// Staff member the rounds belong to.
    pub staff_name: String,
    /// Rounds in start-time order.
    pub rounds: Vec<RoundEntry>,
}

/// Per-request summary line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSummary {
    /// Request identifier.
    pub request_id: String,
    /// Assigned or waitlisted.
    pub status: AllocationStatus,
    /// Risk score behind the decision.
    pub risk_score: f64,
    /// Risk category behind the fit scores.
    pub risk_category: String,
    /// Assigned resource, when assigned.
    pub resource_id: Option<String>,
    /// Assigned staff member, when assigned.
    pub staff_name: Option<String>,
    /// Waitlist band, when waitlisted.
    pub waitlist_position: Option<u32>,
    /// Predicted duration label, when known.
    pub duration_label: Option<String>,
    /// Number of rotation rounds committed for the request's resource.
    pub round_count: usize,
}

/// Groups rounds per staff member, each list sorted by start time.
///
/// Staff appear in name order so the view is deterministic.
pub fn staff_view(rounds: &[RotationRound]) -> Vec<StaffSchedule> {
    let mut by_staff: BTreeMap<&str, Vec<RoundEntry>> = BTreeMap::new();
    for round in rounds {
        by_staff
            .entry(round.staff_name.as_str())
            .or_default()
            .push(RoundEntry {
                resource_id: round.resource_id.clone(),
                start: round.start,
                stop: round.stop,
            });
    }
    by_staff
        .into_iter()
        .map(|(name, mut entries)| {
            entries.sort_by(|a, b| {
                a.start
                    .partial_cmp(&b.start)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            StaffSchedule {
                staff_name: name.to_string(),
                rounds: entries,
            }
        })
        .collect()
}

/// One request's booked window with the rounds covering it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestBooking {
    /// Request identifier.
    pub request_id: String,
    /// Booked resource, when assigned.
    pub resource_id: Option<String>,
    /// Occupancy start (hours), when assigned.
    pub start: Option<f64>,
    /// Occupancy end (hours), when assigned.
    pub stop: Option<f64>,
    /// Rounds committed for the booked resource, in start order.
    pub rounds: Vec<RoundEntry>,
}

/// Joins each request's booked window with its resource's rounds.
///
/// Unassigned requests appear with no window and no rounds; request
/// order is preserved.
pub fn booking_view(requests: &[Request], rounds: &[RotationRound]) -> Vec<RequestBooking> {
    requests
        .iter()
        .map(|request| {
            let mut entries: Vec<RoundEntry> = match &request.resource_id {
                Some(resource_id) => rounds
                    .iter()
                    .filter(|r| &r.resource_id == resource_id)
                    .map(|r| RoundEntry {
                        resource_id: r.resource_id.clone(),
                        start: r.start,
                        stop: r.stop,
                    })
                    .collect(),
                None => Vec::new(),
            };
            entries.sort_by(|a, b| {
                a.start
                    .partial_cmp(&b.start)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            RequestBooking {
                request_id: request.id.clone(),
                resource_id: request.resource_id.clone(),
                start: request.start,
                stop: request.stop,
                rounds: entries,
            }
        })
        .collect()
}

/// Summarizes each record, preserving record order.
pub fn request_view(records: &[AllocationRecord]) -> Vec<RequestSummary> {
    records
        .iter()
        .map(|record| RequestSummary {
            request_id: record.request_id.clone(),
            status: record.status,
            risk_score: record.risk_score,
            risk_category: record.risk_category.clone(),
            resource_id: record.resource_id.clone(),
            staff_name: record.staff_name.clone(),
            waitlist_position: record.waitlist_position,
            duration_label: record.duration_label.clone(),
            round_count: record.rotation_rounds.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_view_groups_and_sorts() {
        let rounds = vec![
            RotationRound::new("S2", "R2", 3.0, 3.25),
            RotationRound::new("S1", "R1", 6.0, 6.5),
            RotationRound::new("S1", "R1", 0.0, 0.25),
        ];
        let view = staff_view(&rounds);

        assert_eq!(view.len(), 2);
        assert_eq!(view[0].staff_name, "S1");
        assert_eq!(view[1].staff_name, "S2");

        let starts: Vec<f64> = view[0].rounds.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0.0, 6.0]);
    }

    #[test]
    fn test_staff_view_empty() {
        assert!(staff_view(&[]).is_empty());
    }

    #[test]
    fn test_request_view_carries_decision() {
        let records = vec![
            AllocationRecord::assigned("P1", 0.9, "Critical", "405", "Miller")
                .with_duration_label("5-7 days"),
            AllocationRecord::waitlisted("P2", 0.4, "Observation"),
        ];
        let view = request_view(&records);

        assert_eq!(view[0].request_id, "P1");
        assert_eq!(view[0].status, AllocationStatus::Assigned);
        assert_eq!(view[0].resource_id.as_deref(), Some("405"));
        assert_eq!(view[0].duration_label.as_deref(), Some("5-7 days"));
        assert_eq!(view[0].round_count, 0);

        assert_eq!(view[1].status, AllocationStatus::Waitlisted);
        assert_eq!(view[1].waitlist_position, Some(3));
    }

    #[test]
    fn test_booking_view_joins_rounds() {
        let mut assigned = Request::new("P1");
        assigned.assign("R1", 0.0, 48.0);
        let requests = vec![assigned, Request::new("P2")];
        let rounds = vec![
            RotationRound::new("S1", "R1", 6.0, 6.25),
            RotationRound::new("S2", "R1", 0.0, 0.25),
            RotationRound::new("S1", "R2", 3.0, 3.25),
        ];
        let view = booking_view(&requests, &rounds);

        assert_eq!(view[0].request_id, "P1");
        assert_eq!(view[0].resource_id.as_deref(), Some("R1"));
        assert_eq!(view[0].stop, Some(48.0));
        let starts: Vec<f64> = view[0].rounds.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0.0, 6.0]);

        assert_eq!(view[1].resource_id, None);
        assert!(view[1].rounds.is_empty());
    }

    #[test]
    fn test_views_serialize() {
        let rounds = vec![RotationRound::new("S1", "R1", 0.0, 0.25)];
        let json = serde_json::to_string(&staff_view(&rounds)).unwrap();
        assert!(json.contains("S1"));
        assert!(json.contains("R1"));
    }
}
