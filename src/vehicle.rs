//! Delivery vehicle state advanced by the route scheduler.

use jiff::SignedDuration;
use jiff::civil::Time;

use crate::error::RouteError;
use crate::parcel::ParcelId;

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub name: String,
    /// Maximum carry weight.
    pub capacity: f64,
    /// Travel speed in distance units per hour.
    pub speed: f64,
    /// Weight currently aboard.
    pub load: f64,
    /// Assigned parcels; reordered into delivery order by the scheduler.
    pub parcel_ids: Vec<ParcelId>,
    pub mileage: f64,
    pub location: String,
    pub departure_time: Time,
    pub current_time: Time,
}

impl Vehicle {
    pub fn new(
        name: impl Into<String>,
        capacity: f64,
        speed: f64,
        parcel_ids: Vec<ParcelId>,
        location: impl Into<String>,
        departure_time: Time,
    ) -> Self {
        Self {
            name: name.into(),
            capacity,
            speed,
            load: 0.0,
            parcel_ids,
            mileage: 0.0,
            location: location.into(),
            departure_time,
            current_time: departure_time,
        }
    }

    /// Move the departure (and the clock) to `at`. Only meaningful before routing.
    pub fn depart_at(&mut self, at: Time) {
        self.departure_time = at;
        self.current_time = at;
    }

    /// Time needed to cover `distance` at this vehicle's speed.
    pub fn travel_time(&self, distance: f64) -> Result<SignedDuration, RouteError> {
        let invalid = || RouteError::InvalidLeg {
            distance,
            speed: self.speed,
        };
        if self.speed.is_nan() || self.speed <= 0.0 || !distance.is_finite() || distance < 0.0 {
            return Err(invalid());
        }
        SignedDuration::try_from_secs_f64(distance / self.speed * 3600.0).map_err(|_| invalid())
    }

    /// Drive `distance` to `destination` for `parcel_id`.
    ///
    /// Leaves the vehicle untouched when the leg is invalid or would carry the
    /// clock past midnight.
    pub fn advance(
        &mut self,
        distance: f64,
        destination: &str,
        parcel_id: ParcelId,
    ) -> Result<Time, RouteError> {
        let elapsed = self.travel_time(distance)?;
        let arrival = self
            .current_time
            .checked_add(elapsed)
            .map_err(|_| RouteError::ClockOverflow {
                vehicle: self.name.clone(),
                parcel_id,
            })?;

        self.mileage += distance;
        self.location = destination.to_string();
        self.current_time = arrival;
        Ok(arrival)
    }

    pub fn is_overloaded(&self) -> bool {
        self.load > self.capacity
    }
}
