mod interval;
mod reconstruct;
mod tracker;

#[cfg(test)]
mod tracker_tests;

pub use interval::MitigationInterval;
pub use reconstruct::{reconstruct_attempt, reconstruct_hit};
pub use tracker::MitigationTracker;
