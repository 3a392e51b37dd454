//! Run configuration.
//!
//! All recognized constants with their defaults. Every knob has a builder
//! setter; a default-constructed config reproduces the reference behavior.

use serde::{Deserialize, Serialize};

/// Configuration for allocation and rotation runs.
///
/// # Defaults
///
/// | Constant | Default | Effect |
/// |----------|---------|--------|
/// | `admission_threshold` | 0.35 | Gates duration prediction and booking |
/// | `rotation_window_hours` | 12.0 | Window the default rounds spread over |
/// | `rounds_per_resource` | 4 | Rounds per occupied resource |
/// | `round_durations_hours` | 0.25/0.333../0.5 | 15/20/30 min, cycled |
/// | `default_resource_count` | 50 | Pool size when no id list is given |
/// | `default_batch_size` | 25 | Requests per batch window |
/// | `max_staff_load` | 6 | Load ceiling in the load fit score |
/// | `rotation_interval_hours` | 4.0 | Cadence for duration-derived rounds |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Probability cutoff above which a resource request is generated.
    pub admission_threshold: f64,
    /// Window (hours) that the fixed per-resource rounds spread over.
    pub rotation_window_hours: f64,
    /// Number of rounds per occupied resource in window mode.
    pub rounds_per_resource: usize,
    /// Allowed round durations (hours), cycled in order across rounds.
    pub round_durations_hours: Vec<f64>,
    /// Pool size when resources are created from scratch.
    pub default_resource_count: usize,
    /// Requests processed per batch window when no count is given.
    pub default_batch_size: usize,
    /// Staff load ceiling used by the load fit score.
    pub max_staff_load: u32,
    /// Cadence (hours) between duration-derived rotation rounds.
    pub rotation_interval_hours: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            admission_threshold: 0.35,
            rotation_window_hours: 12.0,
            rounds_per_resource: 4,
            round_durations_hours: vec![15.0 / 60.0, 20.0 / 60.0, 30.0 / 60.0],
            default_resource_count: 50,
            default_batch_size: 25,
            max_staff_load: 6,
            rotation_interval_hours: 4.0,
        }
    }
}

impl ScheduleConfig {
    /// Creates a config with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the admission threshold.
    pub fn with_admission_threshold(mut self, threshold: f64) -> Self {
        self.admission_threshold = threshold;
        self
    }

    /// Sets the rotation window (hours).
    pub fn with_rotation_window(mut self, hours: f64) -> Self {
        self.rotation_window_hours = hours;
        self
    }

    /// Sets the number of rounds per occupied resource.
    pub fn with_rounds_per_resource(mut self, rounds: usize) -> Self {
        self.rounds_per_resource = rounds;
        self
    }

    /// Sets the cycled round durations (hours).
    pub fn with_round_durations(mut self, hours: Vec<f64>) -> Self {
        self.round_durations_hours = hours;
        self
    }

    /// Sets the default resource count.
    pub fn with_default_resource_count(mut self, count: usize) -> Self {
        self.default_resource_count = count;
        self
    }

    /// Sets the default batch size.
    pub fn with_default_batch_size(mut self, size: usize) -> Self {
        self.default_batch_size = size;
        self
    }

    /// Sets the staff load ceiling.
    pub fn with_max_staff_load(mut self, max_load: u32) -> Self {
        self.max_staff_load = max_load;
        self
    }

    /// Sets the duration-derived rotation cadence (hours).
    pub fn with_rotation_interval(mut self, hours: f64) -> Self {
        self.rotation_interval_hours = hours;
        self
    }
}
