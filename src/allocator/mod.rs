//! Serial-dictatorship batch allocation.
//!
//! Requests pick in strictly descending risk-score order (equal scores keep
//! submission order): each picks its best-scoring remaining feasibility
//! option, and the chosen (staff, resource) pair is consumed for the rest
//! of the batch. Requests with no options left are waitlisted at a band
//! derived from their score. After the pass, conflict-free rotation rounds
//! are built jointly for all assigned requests, with round counts derived
//! from each request's predicted stay length.
//!
//! This ordering is a fairness policy, not an optimization: the highest
//! risk picks first, and the overall assignment is greedy, not exact.

pub mod scoring;

pub use scoring::FitPolicy;

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::config::ScheduleConfig;
use crate::duration::{round_count, stay_hours_or_default};
use crate::error::AllocError;
use crate::models::{
    AllocationRecord, AllocationStatus, FeasibleOption, RiskProfile, StaffMember,
};
use crate::rotation::{RotationRequest, RotationScheduler, UnfilledSlot};
use crate::validation::{validate_rounds, RotationConflict};

/// One request as presented to the allocator: identity, risk signal,
/// predicted stay, and the candidate pairings it may choose from.
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    /// Request identifier.
    pub id: String,
    /// Risk score and category.
    pub profile: RiskProfile,
    /// Predicted stay label (e.g. "5-7 days"); drives the round count.
    pub duration_label: Option<String>,
    /// Candidate (staff, resource) pairings, in caller preference order.
    ///
    /// Equally-scored options resolve to the first in this list, so the
    /// caller's ordering is part of the tie-break.
    pub options: Vec<FeasibleOption>,
}

impl AllocationRequest {
    /// Creates a request with no options yet.
    pub fn new(id: impl Into<String>, profile: RiskProfile) -> Self {
        Self {
            id: id.into(),
            profile,
            duration_label: None,
            options: Vec::new(),
        }
    }

    /// Sets the predicted stay label.
    pub fn with_duration_label(mut self, label: impl Into<String>) -> Self {
        self.duration_label = Some(label.into());
        self
    }

    /// Adds a feasibility option.
    pub fn with_option(mut self, option: FeasibleOption) -> Self {
        self.options.push(option);
        self
    }

    /// Adds several feasibility options.
    pub fn with_options(mut self, options: Vec<FeasibleOption>) -> Self {
        self.options.extend(options);
        self
    }
}

/// Result of one batch allocation pass.
#[derive(Debug, Clone, Default)]
pub struct AllocationOutcome {
    /// One record per request, in processing (risk) order.
    pub records: Vec<AllocationRecord>,
    /// Rotation slots no staff member could take (non-fatal).
    pub unfilled: Vec<UnfilledSlot>,
    /// Double-bookings detected post-hoc (advisory; empty on a clean run).
    pub conflicts: Vec<RotationConflict>,
    /// Per-request payload problems (malformed options); the batch
    /// continues past them.
    pub request_errors: Vec<AllocError>,
}

impl AllocationOutcome {
    /// The record for one request, if it was part of the batch.
    pub fn record_for(&self, request_id: &str) -> Option<&AllocationRecord> {
        self.records.iter().find(|r| r.request_id == request_id)
    }

    /// Records with a binding assignment.
    pub fn assigned(&self) -> Vec<&AllocationRecord> {
        self.records
            .iter()
            .filter(|r| r.status == AllocationStatus::Assigned)
            .collect()
    }

    /// Waitlisted records.
    pub fn waitlisted(&self) -> Vec<&AllocationRecord> {
        self.records
            .iter()
            .filter(|r| r.status == AllocationStatus::Waitlisted)
            .collect()
    }
}

/// Serial-dictatorship allocator with waitlisting.
#[derive(Debug, Clone, Default)]
pub struct PriorityAllocator {
    policy: FitPolicy,
    config: ScheduleConfig,
}

impl PriorityAllocator {
    /// Creates an allocator with the default policy and config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fit policy.
    pub fn with_policy(mut self, policy: FitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the run configuration.
    pub fn with_config(mut self, config: ScheduleConfig) -> Self {
        self.config = config;
        self
    }

    /// Allocates a batch of requests.
    ///
    /// Processing order is risk score descending with submission order
    /// preserved on ties. A (staff, resource) pair consumed by one request
    /// is never offered to a later one in the same batch.
    pub fn allocate(&self, requests: &[AllocationRequest]) -> AllocationOutcome {
        let mut outcome = AllocationOutcome::default();

        // Stable sort keeps submission order for equal scores; malformed
        // scores sort as 0 so they cannot poison the ordering
        let mut order: Vec<usize> = (0..requests.len()).collect();
        order.sort_by(|&a, &b| {
            effective_score(&requests[b])
                .partial_cmp(&effective_score(&requests[a]))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut consumed: HashSet<(String, String)> = HashSet::new();

        for &idx in &order {
            let request = &requests[idx];
            let record = self.allocate_one(request, &mut consumed, &mut outcome.request_errors);
            outcome.records.push(record);
        }

        self.build_rounds(requests, &mut outcome);
        outcome
    }

    /// Picks the best remaining option for one request, or waitlists it.
    fn allocate_one(
        &self,
        request: &AllocationRequest,
        consumed: &mut HashSet<(String, String)>,
        errors: &mut Vec<AllocError>,
    ) -> AllocationRecord {
        let profile = &request.profile;

        if let Some(error) = profile_error(request) {
            errors.push(error);
            return AllocationRecord::waitlisted(
                &request.id,
                effective_score(request),
                &profile.category,
            );
        }

        let mut best: Option<(&FeasibleOption, f64)> = None;
        for option in &request.options {
            if option.staff_name.is_empty() || option.resource_id.is_empty() {
                errors.push(AllocError::MalformedOption {
                    request_id: request.id.clone(),
                    reason: "empty staff or resource identifier".into(),
                });
                continue;
            }
            if consumed.contains(&option.pair()) {
                continue;
            }
            let score = self.policy.score(&profile.category, option);
            // Strict comparison: ties keep the earlier option
            let better = best.map(|(_, s)| score > s).unwrap_or(true);
            if better {
                best = Some((option, score));
            }
        }

        match best {
            Some((option, score)) => {
                consumed.insert(option.pair());
                debug!(
                    "request {}: assigned ({}, {}) score {score:.3}",
                    request.id, option.staff_name, option.resource_id
                );
                let mut record = AllocationRecord::assigned(
                    &request.id,
                    profile.score,
                    &profile.category,
                    &option.resource_id,
                    &option.staff_name,
                );
                if let Some(label) = &request.duration_label {
                    record = record.with_duration_label(label);
                }
                record
            }
            None => {
                debug!("request {}: no options left, waitlisted", request.id);
                let mut record =
                    AllocationRecord::waitlisted(&request.id, profile.score, &profile.category);
                if let Some(label) = &request.duration_label {
                    record = record.with_duration_label(label);
                }
                record
            }
        }
    }

    /// Builds joint conflict-free rounds for every assigned record.
    ///
    /// Each request contributes its own candidate pool (the staff appearing
    /// in its feasibility list); overlap freedom is still guaranteed for
    /// any staff name shared across pools. Round counts come from the
    /// predicted stay at the configured cadence.
    fn build_rounds(&self, requests: &[AllocationRequest], outcome: &mut AllocationOutcome) {
        let by_id: HashMap<&str, &AllocationRequest> =
            requests.iter().map(|r| (r.id.as_str(), r)).collect();

        let mut rotation_requests = Vec::new();
        // record index per rotation request; a join on resource id would
        // be ambiguous when two records share a resource
        let mut owners = Vec::new();
        for (idx, record) in outcome.records.iter().enumerate() {
            if record.status != AllocationStatus::Assigned {
                continue;
            }
            let (resource_id, request) = match (&record.resource_id, by_id.get(record.request_id.as_str())) {
                (Some(rid), Some(req)) => (rid.clone(), *req),
                _ => continue,
            };
            let hours = stay_hours_or_default(record.duration_label.as_deref());
            let rounds = round_count(hours, self.config.rotation_interval_hours);
            rotation_requests.push(RotationRequest::at_interval(
                resource_id,
                candidate_pool(request),
                rounds,
                self.config.rotation_interval_hours,
            ));
            owners.push(idx);
        }

        let scheduler = RotationScheduler::from_config(&self.config);
        let rotation = scheduler.schedule(&rotation_requests);

        if let Err(conflicts) = validate_rounds(&rotation.rounds) {
            for conflict in &conflicts {
                warn!("rotation conflict: {conflict}");
            }
            outcome.conflicts = conflicts;
        }

        for (i, &record_idx) in owners.iter().enumerate() {
            outcome.records[record_idx].rotation_rounds =
                rotation.rounds_for_request(i).to_vec();
        }
        outcome.unfilled = rotation.unfilled;
    }
}

/// Checks a request's risk profile for shapes the policy cannot score.
fn profile_error(request: &AllocationRequest) -> Option<AllocError> {
    if !request.profile.score.is_finite() {
        return Some(AllocError::MalformedProfile {
            request_id: request.id.clone(),
            reason: "non-finite risk score".into(),
        });
    }
    if request.profile.category.is_empty() {
        return Some(AllocError::MalformedProfile {
            request_id: request.id.clone(),
            reason: "empty risk category".into(),
        });
    }
    None
}

/// Risk score with non-finite values pinned to 0.
fn effective_score(request: &AllocationRequest) -> f64 {
    let score = request.profile.score;
    if score.is_finite() {
        score
    } else {
        0.0
    }
}

/// Distinct staff in a request's feasibility list, as a rotation pool.
fn candidate_pool(request: &AllocationRequest) -> Vec<StaffMember> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();
    for option in &request.options {
        if seen.insert(option.staff_name.clone()) {
            pool.push(StaffMember::new(&option.staff_name, option.staff_load));
        }
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        id: &str,
        score: f64,
        category: &str,
        options: Vec<FeasibleOption>,
    ) -> AllocationRequest {
        AllocationRequest::new(id, RiskProfile::new(score, category)).with_options(options)
    }

    #[test]
    fn test_high_risk_picks_first() {
        // Both requests want the same (staff, resource) pair; the higher
        // score wins it and the lower is left with nothing.
        let shared = FeasibleOption::new("X", "R1", "General", 0);
        let requests = vec![
            request("P2", 0.4, "Stable", vec![shared.clone()]),
            request("P1", 0.9, "Critical", vec![shared]),
        ];
        let outcome = PriorityAllocator::new().allocate(&requests);

        let p1 = outcome.record_for("P1").unwrap();
        assert_eq!(p1.status, AllocationStatus::Assigned);
        assert_eq!(p1.staff_name.as_deref(), Some("X"));
        assert_eq!(p1.resource_id.as_deref(), Some("R1"));

        let p2 = outcome.record_for("P2").unwrap();
        assert_eq!(p2.status, AllocationStatus::Waitlisted);
        assert_eq!(p2.waitlist_position, Some(3)); // 0.4 < 0.5
    }

    #[test]
    fn test_records_in_descending_risk_order() {
        let opt = |s: &str, r: &str| FeasibleOption::new(s, r, "General", 0);
        let requests = vec![
            request("A", 0.3, "Stable", vec![opt("S1", "R1")]),
            request("B", 0.7, "High", vec![opt("S2", "R2")]),
            request("C", 0.5, "Observation", vec![opt("S3", "R3")]),
        ];
        let outcome = PriorityAllocator::new().allocate(&requests);
        let ids: Vec<&str> = outcome.records.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_equal_scores_keep_submission_order() {
        let shared = FeasibleOption::new("X", "R1", "General", 0);
        let requests = vec![
            request("First", 0.6, "Observation", vec![shared.clone()]),
            request("Second", 0.6, "Observation", vec![shared]),
        ];
        let outcome = PriorityAllocator::new().allocate(&requests);
        assert_eq!(
            outcome.record_for("First").unwrap().status,
            AllocationStatus::Assigned
        );
        assert_eq!(
            outcome.record_for("Second").unwrap().status,
            AllocationStatus::Waitlisted
        );
    }

    #[test]
    fn test_consumed_pair_not_reoffered() {
        // P2 shares P1's best pair but has a fallback it can still take.
        let requests = vec![
            request(
                "P1",
                0.9,
                "Critical",
                vec![FeasibleOption::new("X", "R1", "Negative Pressure", 0)],
            ),
            request(
                "P2",
                0.8,
                "Critical",
                vec![
                    FeasibleOption::new("X", "R1", "Negative Pressure", 0),
                    FeasibleOption::new("Y", "R2", "Isolation", 1),
                ],
            ),
        ];
        let outcome = PriorityAllocator::new().allocate(&requests);
        let p2 = outcome.record_for("P2").unwrap();
        assert_eq!(p2.status, AllocationStatus::Assigned);
        assert_eq!(p2.staff_name.as_deref(), Some("Y"));
        assert_eq!(p2.resource_id.as_deref(), Some("R2"));
    }

    #[test]
    fn test_best_scoring_option_wins() {
        // Isolation beats General for a High-risk request at equal load.
        let requests = vec![request(
            "P1",
            0.7,
            "High",
            vec![
                FeasibleOption::new("A", "R1", "General", 2),
                FeasibleOption::new("B", "R2", "Isolation", 2),
            ],
        )];
        let outcome = PriorityAllocator::new().allocate(&requests);
        let p1 = outcome.record_for("P1").unwrap();
        assert_eq!(p1.staff_name.as_deref(), Some("B"));
    }

    #[test]
    fn test_equal_option_scores_take_first_listed() {
        let requests = vec![request(
            "P1",
            0.7,
            "High",
            vec![
                FeasibleOption::new("A", "R1", "Isolation", 2),
                FeasibleOption::new("B", "R2", "Isolation", 2),
            ],
        )];
        let outcome = PriorityAllocator::new().allocate(&requests);
        assert_eq!(
            outcome.record_for("P1").unwrap().staff_name.as_deref(),
            Some("A")
        );
    }

    #[test]
    fn test_waitlist_bands() {
        let requests = vec![
            request("Hi", 0.85, "Critical", vec![]),
            request("Mid", 0.6, "Observation", vec![]),
            request("Lo", 0.2, "Low", vec![]),
        ];
        let outcome = PriorityAllocator::new().allocate(&requests);
        assert_eq!(outcome.record_for("Hi").unwrap().waitlist_position, Some(1));
        assert_eq!(outcome.record_for("Mid").unwrap().waitlist_position, Some(2));
        assert_eq!(outcome.record_for("Lo").unwrap().waitlist_position, Some(3));
        assert_eq!(outcome.assigned().len(), 0);
        assert_eq!(outcome.waitlisted().len(), 3);
    }

    #[test]
    fn test_malformed_option_skipped_not_fatal() {
        let requests = vec![request(
            "P1",
            0.9,
            "Critical",
            vec![
                FeasibleOption::new("", "R1", "General", 0),
                FeasibleOption::new("X", "R2", "General", 0),
            ],
        )];
        let outcome = PriorityAllocator::new().allocate(&requests);
        assert_eq!(outcome.request_errors.len(), 1);
        let p1 = outcome.record_for("P1").unwrap();
        assert_eq!(p1.status, AllocationStatus::Assigned);
        assert_eq!(p1.staff_name.as_deref(), Some("X"));

        // Outcomes stay cloneable with errors attached
        let copied = outcome.clone();
        assert_eq!(copied.request_errors.len(), 1);
        assert!(copied.request_errors[0].to_string().contains("P1"));
    }

    #[test]
    fn test_rounds_built_for_assigned_requests() {
        let requests = vec![request(
            "P1",
            0.9,
            "Critical",
            vec![FeasibleOption::new("X", "R1", "Negative Pressure", 0)],
        )
        .with_duration_label("12 hours")];
        let outcome = PriorityAllocator::new().allocate(&requests);

        let p1 = outcome.record_for("P1").unwrap();
        // 12 h at the default 4 h cadence → 3 rounds
        assert_eq!(p1.rotation_rounds.len(), 3);
        assert!(p1.rotation_rounds.iter().all(|r| r.staff_name == "X"));
        assert!(p1.rotation_rounds.iter().all(|r| r.resource_id == "R1"));
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn test_unparseable_duration_falls_back() {
        let requests = vec![request(
            "P1",
            0.9,
            "Critical",
            vec![FeasibleOption::new("X", "R1", "Negative Pressure", 0)],
        )
        .with_duration_label("soon")];
        let outcome = PriorityAllocator::new().allocate(&requests);
        // 72 h fallback at 4 h cadence → 18 rounds
        assert_eq!(outcome.record_for("P1").unwrap().rotation_rounds.len(), 18);
    }

    #[test]
    fn test_shared_staff_rounds_never_overlap() {
        // Two assigned requests whose only candidate staff is the same
        // person; the joint ledger must keep their rounds disjoint.
        let requests = vec![
            request(
                "P1",
                0.9,
                "Critical",
                vec![FeasibleOption::new("X", "R1", "Negative Pressure", 0)],
            )
            .with_duration_label("8 hours"),
            request(
                "P2",
                0.8,
                "High",
                vec![FeasibleOption::new("X", "R2", "Isolation", 0)],
            )
            .with_duration_label("8 hours"),
        ];
        let outcome = PriorityAllocator::new().allocate(&requests);
        let mut all_rounds = Vec::new();
        for record in &outcome.records {
            all_rounds.extend(record.rotation_rounds.iter().cloned());
        }
        assert!(validate_rounds(&all_rounds).is_ok());
        assert!(outcome.conflicts.is_empty());
    }

    #[test]
    fn test_malformed_profile_waitlists_with_error() {
        let requests = vec![
            request(
                "Bad",
                f64::NAN,
                "Critical",
                vec![FeasibleOption::new("X", "R1", "General", 0)],
            ),
            request("NoCategory", 0.7, "", vec![]),
            request(
                "Good",
                0.5,
                "Observation",
                vec![FeasibleOption::new("Y", "R2", "General", 0)],
            ),
        ];
        let outcome = PriorityAllocator::new().allocate(&requests);

        assert_eq!(outcome.request_errors.len(), 2);
        assert!(outcome
            .request_errors
            .iter()
            .any(|e| e.to_string().contains("non-finite risk score")));
        assert!(outcome
            .request_errors
            .iter()
            .any(|e| e.to_string().contains("empty risk category")));

        // Malformed requests are waitlisted, never assigned
        assert_eq!(
            outcome.record_for("Bad").unwrap().status,
            AllocationStatus::Waitlisted
        );
        assert_eq!(
            outcome.record_for("NoCategory").unwrap().status,
            AllocationStatus::Waitlisted
        );
        // The batch continues for well-formed requests
        assert_eq!(
            outcome.record_for("Good").unwrap().status,
            AllocationStatus::Assigned
        );
    }

    #[test]
    fn test_shared_resource_keeps_rounds_per_request() {
        // Only the (staff, resource) pair is consumed, so two requests can
        // legally land on the same resource through different staff. Each
        // record must get its own rounds, not the first-come total.
        let requests = vec![
            request(
                "P1",
                0.9,
                "Critical",
                vec![FeasibleOption::new("X", "R1", "Negative Pressure", 0)],
            )
            .with_duration_label("8 hours"),
            request(
                "P2",
                0.8,
                "High",
                vec![FeasibleOption::new("Y", "R1", "Isolation", 0)],
            )
            .with_duration_label("8 hours"),
        ];
        let outcome = PriorityAllocator::new().allocate(&requests);

        let p1 = outcome.record_for("P1").unwrap();
        let p2 = outcome.record_for("P2").unwrap();
        assert_eq!(p1.resource_id.as_deref(), Some("R1"));
        assert_eq!(p2.resource_id.as_deref(), Some("R1"));
        assert_eq!(p1.rotation_rounds.len(), 2);
        assert_eq!(p2.rotation_rounds.len(), 2);
        assert!(p1.rotation_rounds.iter().all(|r| r.staff_name == "X"));
        assert!(p2.rotation_rounds.iter().all(|r| r.staff_name == "Y"));
    }

    #[test]
    fn test_empty_batch() {
        let outcome = PriorityAllocator::new().allocate(&[]);
        assert!(outcome.records.is_empty());
        assert!(outcome.unfilled.is_empty());
        assert!(outcome.conflicts.is_empty());
    }
}
