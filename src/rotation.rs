//! Conflict-free staff rotation scheduler.
//!
//! # Algorithm
//!
//! For each occupied resource, a fixed number of rounds is laid out at a
//! fixed cadence, with round durations drawn from a small allowed set and
//! cycled in order. Staff candidates are sorted ascending by load (ties by
//! name) to bias assignment toward less-loaded staff; the search for each
//! slot starts from a rotating offset, advanced after every successful
//! commitment, so load spreads across the whole run instead of reusing the
//! same staff repeatedly.
//!
//! A per-staff committed-interval ledger is keyed by staff name across the
//! whole batch: even when each resource carries its own candidate pool, a
//! staff name appearing in more than one pool can never be double-booked.
//! Slots with no conflict-free candidate are left unfilled and reported as
//! diagnostics, never as errors.

use std::collections::HashMap;

use log::{debug, warn};

use crate::config::ScheduleConfig;
use crate::models::{intervals_overlap, RotationRound, StaffMember};

/// Rotation work for one occupied resource.
#[derive(Debug, Clone)]
pub struct RotationRequest {
    /// Resource the rounds cover.
    pub resource_id: String,
    /// Staff candidates for this resource's rounds.
    pub candidates: Vec<StaffMember>,
    /// Number of rounds to lay out.
    pub rounds: usize,
    /// Hours between successive round starts.
    pub step_hours: f64,
}

impl RotationRequest {
    /// Rounds spread evenly across a window: step = `window / rounds`.
    ///
    /// The default layout (4 rounds over 12 h) puts round starts at
    /// 0, 3, 6 and 9 hours.
    pub fn over_window(
        resource_id: impl Into<String>,
        candidates: Vec<StaffMember>,
        rounds: usize,
        window_hours: f64,
    ) -> Self {
        let step_hours = if rounds > 0 {
            window_hours / rounds as f64
        } else {
            0.0
        };
        Self {
            resource_id: resource_id.into(),
            candidates,
            rounds,
            step_hours,
        }
    }

    /// Rounds at a fixed cadence (for duration-derived round counts).
    pub fn at_interval(
        resource_id: impl Into<String>,
        candidates: Vec<StaffMember>,
        rounds: usize,
        interval_hours: f64,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            candidates,
            rounds,
            step_hours: interval_hours,
        }
    }
}

/// A slot no conflict-free staff member was available for.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfilledSlot {
    /// Resource whose slot stayed open.
    pub resource_id: String,
    /// Slot start (hours).
    pub start: f64,
    /// Slot end (hours).
    pub stop: f64,
}

/// Result of one rotation build.
#[derive(Debug, Clone, Default)]
pub struct RotationOutcome {
    /// Committed rounds, in layout order.
    pub rounds: Vec<RotationRound>,
    /// Slots left open (non-fatal diagnostics).
    pub unfilled: Vec<UnfilledSlot>,
    // `rounds` range per input request, in request order
    spans: Vec<(usize, usize)>,
}

impl RotationOutcome {
    /// Rounds committed for the request at `index` (the position in the
    /// slice passed to [`RotationScheduler::schedule`]).
    ///
    /// Unlike a join on resource id, this stays unambiguous when several
    /// requests cover the same resource.
    pub fn rounds_for_request(&self, index: usize) -> &[RotationRound] {
        self.spans
            .get(index)
            .map(|&(lo, hi)| &self.rounds[lo..hi])
            .unwrap_or(&[])
    }
    /// Rounds committed for one resource.
    pub fn rounds_for_resource(&self, resource_id: &str) -> Vec<&RotationRound> {
        self.rounds
            .iter()
            .filter(|r| r.resource_id == resource_id)
            .collect()
    }

    /// Rounds committed for one staff member.
    pub fn rounds_for_staff(&self, staff_name: &str) -> Vec<&RotationRound> {
        self.rounds
            .iter()
            .filter(|r| r.staff_name == staff_name)
            .collect()
    }
}

/// Builds conflict-free rotation rounds over occupied resources.
#[derive(Debug, Clone)]
pub struct RotationScheduler {
    round_durations_hours: Vec<f64>,
}

impl RotationScheduler {
    /// Creates a scheduler with the default 15/20/30-minute duration cycle.
    pub fn new() -> Self {
        Self::from_config(&ScheduleConfig::default())
    }

    /// Creates a scheduler from a config's round duration cycle.
    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self {
            round_durations_hours: config.round_durations_hours.clone(),
        }
    }

    /// Lays out rounds for all requests in one pass.
    ///
    /// The committed-interval ledger and the rotating offset both span the
    /// whole call, so overlap freedom holds across requests, not just
    /// within one.
    pub fn schedule(&self, requests: &[RotationRequest]) -> RotationOutcome {
        let mut outcome = RotationOutcome::default();
        // staff name → committed [start, stop) intervals
        let mut ledger: HashMap<String, Vec<(f64, f64)>> = HashMap::new();
        let mut offset: usize = 0;

        for request in requests {
            let span_start = outcome.rounds.len();
            let mut pool = request.candidates.clone();
            pool.sort_by(|a, b| a.load.cmp(&b.load).then_with(|| a.name.cmp(&b.name)));

            for k in 0..request.rounds {
                let start = k as f64 * request.step_hours;
                let duration = self.round_durations_hours[k % self.round_durations_hours.len()];
                let stop = start + duration;

                match self.find_staff(&pool, &ledger, offset, start, stop) {
                    Some(idx) => {
                        let staff = &pool[idx];
                        ledger
                            .entry(staff.name.clone())
                            .or_default()
                            .push((start, stop));
                        outcome.rounds.push(RotationRound::new(
                            &staff.name,
                            &request.resource_id,
                            start,
                            stop,
                        ));
                        offset += 1;
                        debug!(
                            "round {k} on {}: {} at [{start}, {stop})",
                            request.resource_id, staff.name
                        );
                    }
                    None => {
                        warn!(
                            "no conflict-free staff for {} slot [{start}, {stop})",
                            request.resource_id
                        );
                        outcome.unfilled.push(UnfilledSlot {
                            resource_id: request.resource_id.clone(),
                            start,
                            stop,
                        });
                    }
                }
            }
            outcome.spans.push((span_start, outcome.rounds.len()));
        }

        outcome
    }

    /// Index of the first candidate (searching from `offset`) whose
    /// committed intervals do not overlap `[start, stop)`.
    fn find_staff(
        &self,
        pool: &[StaffMember],
        ledger: &HashMap<String, Vec<(f64, f64)>>,
        offset: usize,
        start: f64,
        stop: f64,
    ) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }
        for j in 0..pool.len() {
            let idx = (offset + j) % pool.len();
            let committed = ledger.get(&pool[idx].name);
            let free = committed
                .map(|iv| !iv.iter().any(|&(a, b)| intervals_overlap(a, b, start, stop)))
                .unwrap_or(true);
            if free {
                return Some(idx);
            }
        }
        None
    }
}

impl Default for RotationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(names: &[&str]) -> Vec<StaffMember> {
        names.iter().map(|n| StaffMember::new(*n, 0)).collect()
    }

    fn assert_no_staff_overlap(outcome: &RotationOutcome) {
        let mut by_staff: HashMap<&str, Vec<&RotationRound>> = HashMap::new();
        for r in &outcome.rounds {
            by_staff.entry(r.staff_name.as_str()).or_default().push(r);
        }
        for rounds in by_staff.values() {
            for i in 0..rounds.len() {
                for j in (i + 1)..rounds.len() {
                    assert!(
                        !rounds[i].overlaps(rounds[j]),
                        "{} double-booked: [{}, {}) vs [{}, {})",
                        rounds[i].staff_name,
                        rounds[i].start,
                        rounds[i].stop,
                        rounds[j].start,
                        rounds[j].stop
                    );
                }
            }
        }
    }

    #[test]
    fn test_default_window_layout() {
        let scheduler = RotationScheduler::new();
        let request = RotationRequest::over_window("R1", staff(&["S1", "S2"]), 4, 12.0);
        let outcome = scheduler.schedule(&[request]);

        assert_eq!(outcome.rounds.len(), 4);
        assert!(outcome.unfilled.is_empty());

        let starts: Vec<f64> = outcome.rounds.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0.0, 3.0, 6.0, 9.0]);

        // Durations cycle 15/20/30/15 minutes
        let durations: Vec<f64> = outcome.rounds.iter().map(|r| r.stop - r.start).collect();
        assert!((durations[0] - 0.25).abs() < 1e-10);
        assert!((durations[1] - 20.0 / 60.0).abs() < 1e-10);
        assert!((durations[2] - 0.5).abs() < 1e-10);
        assert!((durations[3] - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_rotating_offset_alternates_staff() {
        let scheduler = RotationScheduler::new();
        let request = RotationRequest::over_window("R1", staff(&["S1", "S2"]), 4, 12.0);
        let outcome = scheduler.schedule(&[request]);

        let names: Vec<&str> = outcome.rounds.iter().map(|r| r.staff_name.as_str()).collect();
        assert_eq!(names, ["S1", "S2", "S1", "S2"]);
    }

    #[test]
    fn test_load_biases_search_start() {
        let scheduler = RotationScheduler::new();
        let candidates = vec![StaffMember::new("Busy", 5), StaffMember::new("Idle", 1)];
        let request = RotationRequest::over_window("R1", candidates, 1, 12.0);
        let outcome = scheduler.schedule(&[request]);
        assert_eq!(outcome.rounds[0].staff_name, "Idle");
    }

    #[test]
    fn test_stress_refuses_double_assignment() {
        // 8 rounds over a 2 h window: step 15 min, but the 20- and 30-minute
        // rounds spill into later slots, so one staff member cannot cover
        // everything.
        let scheduler = RotationScheduler::new();
        let request = RotationRequest::over_window("R1", staff(&["S1"]), 8, 2.0);
        let outcome = scheduler.schedule(&[request]);

        assert_no_staff_overlap(&outcome);
        assert!(
            !outcome.unfilled.is_empty(),
            "infeasible slots must be reported, not force-assigned"
        );
        assert_eq!(outcome.rounds.len() + outcome.unfilled.len(), 8);
    }

    #[test]
    fn test_stress_two_staff_cover_more() {
        let scheduler = RotationScheduler::new();
        let one = scheduler.schedule(&[RotationRequest::over_window(
            "R1",
            staff(&["S1"]),
            8,
            2.0,
        )]);
        let two = scheduler.schedule(&[RotationRequest::over_window(
            "R1",
            staff(&["S1", "S2"]),
            8,
            2.0,
        )]);
        assert_no_staff_overlap(&two);
        assert!(two.rounds.len() > one.rounds.len());
    }

    #[test]
    fn test_overlap_check_spans_requests() {
        // The same staff name appears in two resources' candidate pools;
        // both lay out identical slots, so X can serve only one of the two
        // resources per slot.
        let scheduler = RotationScheduler::new();
        let requests = vec![
            RotationRequest::over_window("R1", staff(&["X"]), 4, 12.0),
            RotationRequest::over_window("R2", staff(&["X"]), 4, 12.0),
        ];
        let outcome = scheduler.schedule(&requests);

        assert_no_staff_overlap(&outcome);
        assert_eq!(outcome.rounds.len(), 4);
        assert_eq!(outcome.unfilled.len(), 4);
        for slot in &outcome.unfilled {
            assert_eq!(slot.resource_id, "R2");
        }
    }

    #[test]
    fn test_interval_cadence() {
        let scheduler = RotationScheduler::new();
        let request = RotationRequest::at_interval("R1", staff(&["S1", "S2"]), 3, 4.0);
        let outcome = scheduler.schedule(&[request]);

        let starts: Vec<f64> = outcome.rounds.iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![0.0, 4.0, 8.0]);
    }

    #[test]
    fn test_empty_candidate_pool() {
        let scheduler = RotationScheduler::new();
        let request = RotationRequest::over_window("R1", Vec::new(), 4, 12.0);
        let outcome = scheduler.schedule(&[request]);
        assert!(outcome.rounds.is_empty());
        assert_eq!(outcome.unfilled.len(), 4);
    }

    #[test]
    fn test_rounds_for_request_on_shared_resource() {
        // Two requests over the same resource with disjoint staff; a join
        // on resource id could not tell their rounds apart.
        let scheduler = RotationScheduler::new();
        let requests = vec![
            RotationRequest::at_interval("R1", staff(&["X"]), 2, 4.0),
            RotationRequest::at_interval("R1", staff(&["Y"]), 2, 4.0),
        ];
        let outcome = scheduler.schedule(&requests);

        assert_eq!(outcome.rounds_for_request(0).len(), 2);
        assert_eq!(outcome.rounds_for_request(1).len(), 2);
        assert!(outcome
            .rounds_for_request(0)
            .iter()
            .all(|r| r.staff_name == "X"));
        assert!(outcome
            .rounds_for_request(1)
            .iter()
            .all(|r| r.staff_name == "Y"));
        assert!(outcome.rounds_for_request(2).is_empty());
    }

    #[test]
    fn test_outcome_queries() {
        let scheduler = RotationScheduler::new();
        let outcome = scheduler.schedule(&[RotationRequest::over_window(
            "R1",
            staff(&["S1", "S2"]),
            4,
            12.0,
        )]);
        assert_eq!(outcome.rounds_for_resource("R1").len(), 4);
        assert_eq!(outcome.rounds_for_resource("R9").len(), 0);
        assert_eq!(outcome.rounds_for_staff("S1").len(), 2);
    }
}
