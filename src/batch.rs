//! End-to-end batch pipeline.
//!
//! Drives one window of the request feed through the full path: project
//! features, consult the predictor, gate on the admission threshold, book
//! resources earliest-available-first, then lay out conflict-free staff
//! rounds over every occupied resource. The run ends with a state snapshot
//! a later batch can continue from.
//!
//! Progress reporting goes through an injected [`ProgressObserver`] owned
//! by the runner; there is no process-global event registry, so concurrent
//! runs never share reporting state.

use log::{info, warn};

use crate::config::ScheduleConfig;
use crate::error::{AllocError, AllocResult};
use crate::feed::RequestFeed;
use crate::models::{AllocationState, Request, RotationRound, StaffMember};
use crate::pool::ResourcePool;
use crate::predictor::{admit, Admission, PredictorTask, RiskPredictor};
use crate::rotation::{RotationRequest, RotationScheduler, UnfilledSlot};
use crate::validation::{validate_rounds, RotationConflict};
use crate::views::{booking_view, staff_view, RequestBooking, StaffSchedule};

/// Observer for batch progress.
///
/// All methods default to no-ops; implementations override what they care
/// about. The observer is injected per runner, never registered globally.
pub trait ProgressObserver {
    /// A batch window is about to be processed.
    fn batch_started(&self, _start_index: usize, _count: usize) {}

    /// One request finished the predict-and-book path.
    fn request_processed(&self, _request_id: &str, _admitted: bool) {}

    /// The batch window finished.
    fn batch_completed(&self, _assigned: usize, _total: usize) {}
}

/// Observer that reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}

/// Shared-handle observers: the caller keeps a clone to read results
/// after the runner consumes its copy.
impl<T: ProgressObserver + ?Sized> ProgressObserver for std::rc::Rc<T> {
    fn batch_started(&self, start_index: usize, count: usize) {
        (**self).batch_started(start_index, count)
    }

    fn request_processed(&self, request_id: &str, admitted: bool) {
        (**self).request_processed(request_id, admitted)
    }

    fn batch_completed(&self, assigned: usize, total: usize) {
        (**self).batch_completed(assigned, total)
    }
}

/// Admission decision trail for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct AdmissionRecord {
    /// Request identifier.
    pub request_id: String,
    /// Predicted need probability.
    pub probability: f64,
    /// Whether the probability reached the threshold.
    pub admitted: bool,
    /// Predicted stay (hours); only present when admitted.
    pub duration_hours: Option<f64>,
}

/// Result of one batch window.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// One request per feed row, assigned or not, in feed order.
    pub requests: Vec<Request>,
    /// Prediction trail per request, in feed order.
    pub admissions: Vec<AdmissionRecord>,
    /// End-of-run snapshot for continuation.
    pub state: AllocationState,
    /// Committed rotation rounds over the occupied resources.
    pub rounds: Vec<RotationRound>,
    /// Rotation slots left open (non-fatal).
    pub unfilled: Vec<UnfilledSlot>,
    /// Double-bookings detected post-hoc (advisory).
    pub conflicts: Vec<RotationConflict>,
}

impl BatchOutcome {
    /// Per-staff round lists, sorted by start time.
    pub fn staff_view(&self) -> Vec<StaffSchedule> {
        staff_view(&self.rounds)
    }

    /// Per-request booked windows joined with their resources' rounds.
    pub fn request_view(&self) -> Vec<RequestBooking> {
        booking_view(&self.requests, &self.rounds)
    }

    /// Requests that received a booking.
    pub fn assigned(&self) -> Vec<&Request> {
        self.requests.iter().filter(|r| r.is_assigned()).collect()
    }
}

/// Runs batch windows of a request feed against a predictor.
pub struct BatchRunner {
    config: ScheduleConfig,
    roster: Vec<StaffMember>,
    observer: Box<dyn ProgressObserver>,
}

impl BatchRunner {
    /// Creates a runner with the default config, an empty roster and no
    /// progress reporting.
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            roster: Vec::new(),
            observer: Box::new(NoopObserver),
        }
    }

    /// Sets the staff roster rounds are drawn from.
    pub fn with_roster(mut self, roster: Vec<StaffMember>) -> Self {
        self.roster = roster;
        self
    }

    /// Sets the progress observer.
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Processes one window of the feed.
    ///
    /// The window covers up to `max_count` rows starting at `start_index`
    /// (the configured batch size when `max_count` is `None`), truncated at
    /// the feed end. `prior` continues from an earlier snapshot; without
    /// one the run starts on a fresh generated pool.
    ///
    /// # Errors
    /// [`AllocError::MissingInput`] on an empty feed and
    /// [`AllocError::WindowOutOfRange`] when `start_index` is past the
    /// feed end. Nothing else is fatal.
    pub fn run<P: RiskPredictor + ?Sized>(
        &self,
        feed: &RequestFeed,
        predictor: &P,
        start_index: usize,
        max_count: Option<usize>,
        prior: Option<&AllocationState>,
    ) -> AllocResult<BatchOutcome> {
        if feed.is_empty() {
            return Err(AllocError::MissingInput("request feed is empty".into()));
        }
        if start_index >= feed.len() {
            return Err(AllocError::WindowOutOfRange {
                start_index,
                feed_len: feed.len(),
            });
        }

        let count = max_count.unwrap_or(self.config.default_batch_size);
        let end = (start_index + count).min(feed.len());
        let window = &feed.rows()[start_index..end];

        info!(
            "batch window [{start_index}, {end}) of {} rows",
            feed.len()
        );
        self.observer.batch_started(start_index, window.len());

        let mut pool = match prior {
            Some(state) => ResourcePool::from_state(state),
            None => ResourcePool::with_generated_ids(self.config.default_resource_count),
        };

        let mut requests = Vec::with_capacity(window.len());
        let mut admissions = Vec::with_capacity(window.len());

        for row in window {
            let need = feed.features_for(row, PredictorTask::Need);
            let duration = feed.features_for(row, PredictorTask::Duration);
            let admission = admit(
                predictor,
                &need,
                &duration,
                self.config.admission_threshold,
            );

            let mut request = Request::new(&row.id);
            let record = match admission {
                Admission::Required {
                    probability,
                    duration_hours,
                } => {
                    if let Some(booking) = pool.allocate(duration_hours) {
                        request.assign(booking.resource_id, booking.start, booking.stop);
                    }
                    AdmissionRecord {
                        request_id: row.id.clone(),
                        probability,
                        admitted: true,
                        duration_hours: Some(duration_hours),
                    }
                }
                Admission::NotRequired { probability } => AdmissionRecord {
                    request_id: row.id.clone(),
                    probability,
                    admitted: false,
                    duration_hours: None,
                },
            };

            self.observer.request_processed(&row.id, record.admitted);
            requests.push(request);
            admissions.push(record);
        }

        let rotation = self.rotate_occupied(&pool);
        let conflicts = match validate_rounds(&rotation.rounds) {
            Ok(()) => Vec::new(),
            Err(conflicts) => {
                for conflict in &conflicts {
                    warn!("rotation conflict: {conflict}");
                }
                conflicts
            }
        };

        let assigned = requests.iter().filter(|r| r.is_assigned()).count();
        info!(
            "batch window done: {assigned}/{} assigned, {} rounds, {} unfilled",
            requests.len(),
            rotation.rounds.len(),
            rotation.unfilled.len()
        );
        self.observer.batch_completed(assigned, requests.len());

        let mut state = AllocationState::from_resources(pool.snapshot());
        state.requests = requests.clone();

        Ok(BatchOutcome {
            requests,
            admissions,
            state,
            rounds: rotation.rounds,
            unfilled: rotation.unfilled,
            conflicts,
        })
    }

    /// Lays out the fixed per-resource rounds over every occupied resource,
    /// drawing all of them from the shared roster.
    fn rotate_occupied(&self, pool: &ResourcePool) -> crate::rotation::RotationOutcome {
        let requests: Vec<RotationRequest> = pool
            .occupied()
            .iter()
            .map(|resource| {
                RotationRequest::over_window(
                    resource.id.clone(),
                    self.roster.clone(),
                    self.config.rounds_per_resource,
                    self.config.rotation_window_hours,
                )
            })
            .collect();
        RotationScheduler::from_config(&self.config).schedule(&requests)
    }
}
