use std::path::PathBuf;

use thiserror::Error;

use crate::parcel::ParcelId;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("address '{0}' could not be located")]
    UnresolvableAddress(String),

    #[error("vehicle '{0}' has not been scheduled")]
    UnknownVehicle(String),

    #[error("route for '{vehicle}' runs past midnight after parcel {parcel_id}")]
    ClockOverflow { vehicle: String, parcel_id: ParcelId },

    #[error("invalid travel leg of {distance} at speed {speed}")]
    InvalidLeg { distance: f64, speed: f64 },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fleet configuration: {0}")]
    Config(#[from] serde_json::Error),
}
