//! Fleet and correction configuration.
//!
//! `Default` reproduces the standard delivery day; other assignments are
//! supplied as JSON.

use std::path::Path;

use jiff::civil::{Time, time};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::parcel::ParcelId;
use crate::store::DEFAULT_BUCKETS;

pub const HUB_ADDRESS: &str = "4001 South 700 East";

const DEFAULT_SPEED_MPH: f64 = 18.0;
const DEFAULT_CAPACITY: f64 = 16.0;

/// When a vehicle leaves the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartureRule {
    At(Time),
    /// Leave when the first of the named (earlier scheduled) vehicles finishes.
    AfterFirstReturn(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    pub name: String,
    #[serde(default = "default_capacity")]
    pub capacity: f64,
    #[serde(default = "default_speed")]
    pub speed: f64,
    pub parcel_ids: Vec<ParcelId>,
    pub departure: DepartureRule,
}

fn default_capacity() -> f64 {
    DEFAULT_CAPACITY
}

fn default_speed() -> f64 {
    DEFAULT_SPEED_MPH
}

/// A delivery address that is known to be wrong until a fixed time of day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCorrection {
    pub parcel_id: ParcelId,
    pub effective_at: Time,
    /// Address shown for queries before `effective_at`.
    pub placeholder_address: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Default for AddressCorrection {
    fn default() -> Self {
        Self {
            parcel_id: 9,
            effective_at: time(10, 20, 0, 0),
            placeholder_address: "300 State St".to_string(),
            address: "410 S State St".to_string(),
            city: "Salt Lake City".to_string(),
            state: "UT".to_string(),
            zip: "84103".to_string(),
        }
    }
}

impl AddressCorrection {
    pub fn is_effective(&self, at: Time) -> bool {
        at >= self.effective_at
    }

    pub fn full_address(&self) -> String {
        format!("{}, {}, {} {}", self.address, self.city, self.state, self.zip)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub hub: String,
    pub vehicles: Vec<VehicleConfig>,
    pub correction: Option<AddressCorrection>,
    pub store_buckets: usize,
}

impl Default for FleetConfig {
    fn default() -> Self {
        let vehicle = |name: &str, parcel_ids: Vec<ParcelId>, departure| VehicleConfig {
            name: name.to_string(),
            capacity: DEFAULT_CAPACITY,
            speed: DEFAULT_SPEED_MPH,
            parcel_ids,
            departure,
        };

        Self {
            hub: HUB_ADDRESS.to_string(),
            vehicles: vec![
                vehicle(
                    "truck-1",
                    vec![1, 13, 14, 15, 16, 20, 29, 30, 31, 34, 37, 40],
                    DepartureRule::At(time(8, 0, 0, 0)),
                ),
                vehicle(
                    "truck-2",
                    vec![3, 6, 12, 17, 18, 19, 21, 22, 23, 24, 25, 27, 28, 33, 35, 36, 38, 39],
                    DepartureRule::At(time(8, 0, 0, 0)),
                ),
                vehicle(
                    "truck-3",
                    vec![4, 7, 8, 9, 10, 11, 26, 32],
                    DepartureRule::AfterFirstReturn(vec![
                        "truck-1".to_string(),
                        "truck-2".to_string(),
                    ]),
                ),
            ],
            correction: Some(AddressCorrection::default()),
            store_buckets: DEFAULT_BUCKETS,
        }
    }
}

impl FleetConfig {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}
