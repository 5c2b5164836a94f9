//! parcel-dispatch core
//!
//! Same-day parcel delivery: a keyed parcel store, greedy nearest-neighbor
//! route construction per vehicle, and time-dependent status queries.

pub mod traits;
pub mod error;
pub mod distance;
pub mod address;
pub mod parcel;
pub mod store;
pub mod vehicle;
pub mod config;
pub mod scheduler;
pub mod status;
pub mod dispatch;
pub mod loader;
