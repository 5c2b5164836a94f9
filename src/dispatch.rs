//! One delivery day: loaded tables, the parcel store and the fleet.

use jiff::civil::Time;
use tracing::info;

use crate::address::AddressBook;
use crate::config::{AddressCorrection, DepartureRule, FleetConfig};
use crate::distance::DistanceTable;
use crate::error::RouteError;
use crate::parcel::ParcelId;
use crate::scheduler::{RouteScheduler, RouteSummary};
use crate::status::{StatusReport, StatusResolver};
use crate::store::ParcelStore;
use crate::vehicle::Vehicle;

/// Sum of the mileage driven by `vehicles`.
pub fn total_mileage(vehicles: &[Vehicle]) -> f64 {
    vehicles.iter().map(|vehicle| vehicle.mileage).sum()
}

#[derive(Debug, Clone)]
pub struct Dispatch {
    distances: DistanceTable,
    addresses: AddressBook,
    store: ParcelStore,
    vehicles: Vec<Vehicle>,
    departures: Vec<DepartureRule>,
    correction: Option<AddressCorrection>,
    summaries: Vec<RouteSummary>,
}

impl Dispatch {
    pub fn new(
        config: &FleetConfig,
        distances: DistanceTable,
        addresses: AddressBook,
        store: ParcelStore,
    ) -> Self {
        let vehicles = config
            .vehicles
            .iter()
            .map(|v| {
                let departure = match &v.departure {
                    DepartureRule::At(at) => *at,
                    // Placeholder until the vehicles it waits for are routed.
                    DepartureRule::AfterFirstReturn(_) => Time::MIN,
                };
                Vehicle::new(
                    v.name.clone(),
                    v.capacity,
                    v.speed,
                    v.parcel_ids.clone(),
                    config.hub.clone(),
                    departure,
                )
            })
            .collect();

        Self {
            distances,
            addresses,
            store,
            vehicles,
            departures: config.vehicles.iter().map(|v| v.departure.clone()).collect(),
            correction: config.correction.clone(),
            summaries: Vec::new(),
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn store(&self) -> &ParcelStore {
        &self.store
    }

    pub fn summaries(&self) -> &[RouteSummary] {
        &self.summaries
    }

    pub fn is_scheduled(&self) -> bool {
        !self.vehicles.is_empty() && self.summaries.len() == self.vehicles.len()
    }

    /// Route every vehicle in configuration order.
    ///
    /// Stops at the first failing vehicle; vehicles routed before it keep
    /// their routes. Calling again after success is a no-op.
    pub fn schedule_all(&mut self) -> Result<&[RouteSummary], RouteError> {
        while self.summaries.len() < self.vehicles.len() {
            let index = self.summaries.len();
            let departure = self.departure_for(index)?;
            self.vehicles[index].depart_at(departure);

            let summary = RouteScheduler::new(&self.distances, &self.addresses)
                .with_correction(self.correction.as_ref())
                .schedule_route(&mut self.vehicles[index], &mut self.store)?;
            self.summaries.push(summary);
        }

        info!(
            vehicles = self.vehicles.len(),
            mileage = self.total_mileage(),
            "all routes scheduled"
        );
        Ok(&self.summaries)
    }

    fn departure_for(&self, index: usize) -> Result<Time, RouteError> {
        match &self.departures[index] {
            DepartureRule::At(at) => Ok(*at),
            DepartureRule::AfterFirstReturn(names) => {
                let mut earliest: Option<Time> = None;
                for name in names {
                    let finish = self
                        .summaries
                        .iter()
                        .find(|summary| &summary.vehicle == name)
                        .map(|summary| summary.finish_time)
                        .ok_or_else(|| RouteError::UnknownVehicle(name.clone()))?;
                    earliest = Some(earliest.map_or(finish, |t| t.min(finish)));
                }
                earliest.ok_or_else(|| RouteError::UnknownVehicle(String::new()))
            }
        }
    }

    pub fn total_mileage(&self) -> f64 {
        total_mileage(&self.vehicles)
    }

    pub fn resolver(&self) -> StatusResolver<'_> {
        StatusResolver::new(self.correction.as_ref())
    }

    /// Status of one parcel at `at`; `None` when the ID is unknown.
    pub fn query_status(&mut self, id: ParcelId, at: Time) -> Option<StatusReport> {
        StatusResolver::new(self.correction.as_ref()).query(&mut self.store, id, at)
    }

    /// Status of every parcel at `at`, without touching the store.
    pub fn report(&self, at: Time) -> Vec<StatusReport> {
        self.resolver().report_all(&self.store, at)
    }
}
