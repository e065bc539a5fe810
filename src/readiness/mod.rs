//! Page readiness: generic polling plus element-count stability detection.
pub mod polling;
pub mod stability;

pub use polling::{wait_for, Condition, PollOptions, PollOutcome};
pub use stability::{wait_till_stable, StabilityOptions, StabilityTracker, MIN_STABLE_SAMPLES};
