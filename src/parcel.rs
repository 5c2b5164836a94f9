//! Parcel records and their delivery status.

use std::fmt;

use jiff::civil::Time;
use serde::Serialize;

pub type ParcelId = u32;

/// Status derived from a parcel's timestamps at a query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ParcelStatus {
    #[default]
    AtHub,
    EnRoute,
    Delivered,
}
