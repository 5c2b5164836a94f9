//! Core seams for the dispatch planner.
//!
//! Kept minimal so schedulers can run against the loaded distance table or
//! against an in-memory stand-in in tests.

/// Point-to-point distance between two canonical address keys.
///
/// Implementations never fail: a pair with no entry reports
/// [`crate::distance::UNREACHABLE`].
pub trait DistanceLookup {
    fn distance(&self, from: &str, to: &str) -> f64;
}
