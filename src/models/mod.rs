//! Allocation domain models.
//!
//! Core data types for representing allocation problems and their results:
//! resources with occupancy windows, incoming requests with risk signals,
//! candidate pairings, rotation rounds, and end-of-run snapshots.
//!
//! # Time Representation
//! All times are `f64` hours relative to a batch epoch (t=0). The consumer
//! defines what t=0 means (e.g. shift start, admission window open).

mod allocation;
mod request;
mod resource;
mod rotation;
mod state;

pub use allocation::{waitlist_band, AllocationRecord, AllocationStatus};
pub use request::{FeasibleOption, Request, RiskProfile, StaffMember};
pub use resource::{Occupancy, Resource};
pub use rotation::{intervals_overlap, RotationRound};
pub use state::AllocationState;
