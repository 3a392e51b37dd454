//! Time-interval allocation for scarce shared resources under risk priority.
//!
//! Models a ward-style allocation problem: requests arrive with a predicted
//! probability of needing a resource, resources are booked on per-resource
//! timelines earliest-available-first, staff rotation rounds are laid out
//! conflict-free across the whole batch, and contended (staff, resource)
//! pairings are handed out in strictly descending risk order with the rest
//! waitlisted by band.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Resource`, `Request`, `RiskProfile`,
//!   `FeasibleOption`, `RotationRound`, `AllocationRecord`, `AllocationState`
//! - **`pool`**: Earliest-available greedy resource booking
//! - **`rotation`**: Conflict-free staff round layout
//! - **`allocator`**: Serial-dictatorship priority allocation with fit scoring
//! - **`predictor`**: External risk predictor seam with never-fail fallbacks
//! - **`duration`**: Stay-label parsing ("5-7 days") and round counts
//! - **`feed`**: Tabular request feed with per-task feature projection
//! - **`batch`**: End-to-end batch pipeline with snapshot continuation
//! - **`validation`**: Post-hoc rotation conflict checks
//! - **`views`**: Staff-centric and request-centric report projections
//!
//! # Time Representation
//!
//! All times are `f64` hours relative to a batch epoch (t=0); overlap is
//! always tested on half-open `[start, stop)` intervals.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Abdulkadiroglu & Sonmez (1998), "Random Serial Dictatorship and the
//!   Core from Random Endowments"

pub mod allocator;
pub mod batch;
pub mod config;
pub mod duration;
pub mod error;
pub mod feed;
pub mod models;
pub mod pool;
pub mod predictor;
pub mod rotation;
pub mod validation;
pub mod views;
