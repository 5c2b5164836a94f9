//! Greedy nearest-neighbor route construction.
//!
//! A vehicle's unordered parcel assignment is turned into a delivery order by
//! repeatedly driving to the closest pending delivery address. Mileage, clock
//! and per-parcel timestamps are derived along the way and written back into
//! the vehicle and the parcel store.

use jiff::civil::Time;
use tracing::{debug, info, warn};

use crate::address::AddressBook;
use crate::config::AddressCorrection;
use crate::distance::is_unreachable;
use crate::error::RouteError;
use crate::parcel::ParcelId;
use crate::store::ParcelStore;
use crate::traits::DistanceLookup;
use crate::vehicle::Vehicle;

/// One driven (or attempted) stop of a route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub parcel_id: ParcelId,
    pub from: String,
    pub to: String,
    /// `None` when no distance entry exists for the pair.
    pub distance: Option<f64>,
    pub arrival: Option<Time>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub vehicle: String,
    pub order: Vec<ParcelId>,
    pub legs: Vec<RouteLeg>,
    pub mileage: f64,
    pub departure_time: Time,
    pub finish_time: Time,
    /// Assigned IDs with no record in the store.
    pub skipped: Vec<ParcelId>,
    /// Parcels selected at the unreachable sentinel distance; never stamped delivered.
    pub unreachable: Vec<ParcelId>,
}

#[derive(Debug, Clone)]
struct Pending {
    id: ParcelId,
    key: String,
}

pub struct RouteScheduler<'a, D: DistanceLookup> {
    distances: &'a D,
    addresses: &'a AddressBook,
    correction: Option<&'a AddressCorrection>,
}

impl<'a, D: DistanceLookup> RouteScheduler<'a, D> {
    pub fn new(distances: &'a D, addresses: &'a AddressBook) -> Self {
        Self {
            distances,
            addresses,
            correction: None,
        }
    }

    pub fn with_correction(mut self, correction: Option<&'a AddressCorrection>) -> Self {
        self.correction = correction;
        self
    }

    /// Order `vehicle`'s parcels by nearest neighbor and stamp their times.
    ///
    /// The route is driven on a scratch copy of the vehicle and only written
    /// back, together with the parcel stamps, once every leg succeeded. Any
    /// error leaves both the vehicle and the store untouched.
    /// Equidistant candidates resolve to the lowest parcel ID.
    pub fn schedule_route(
        &self,
        vehicle: &mut Vehicle,
        store: &mut ParcelStore,
    ) -> Result<RouteSummary, RouteError> {
        if vehicle.speed.is_nan() || vehicle.speed <= 0.0 {
            return Err(RouteError::InvalidLeg {
                distance: 0.0,
                speed: vehicle.speed,
            });
        }
        let start = self.addresses.resolve(&vehicle.location)?.to_string();

        let mut assigned = vehicle.parcel_ids.clone();
        assigned.sort_unstable();
        assigned.dedup();

        let mut pending: Vec<Pending> = Vec::with_capacity(assigned.len());
        let mut skipped = Vec::new();
        // Key the corrected parcel switches to once the clock reaches the cutoff.
        let mut corrected_key = None;
        let mut corrected = false;
        for id in assigned {
            let Some(parcel) = store.get(id) else {
                warn!(vehicle = %vehicle.name, parcel_id = id, "assigned parcel not in store, skipping");
                skipped.push(id);
                continue;
            };
            let key = match self.correction.filter(|c| c.parcel_id == id) {
                Some(correction) if correction.is_effective(vehicle.current_time) => {
                    corrected = true;
                    self.addresses.resolve(&correction.address)?.to_string()
                }
                Some(correction) => {
                    corrected_key = Some(self.addresses.resolve(&correction.address)?.to_string());
                    self.addresses.resolve(&parcel.address)?.to_string()
                }
                None => self.addresses.resolve(&parcel.address)?.to_string(),
            };
            pending.push(Pending { id, key });
        }

        let mut route = vehicle.clone();
        route.location = start;
        let departure_time = route.departure_time;
        let mut order = Vec::with_capacity(pending.len());
        let mut legs = Vec::with_capacity(pending.len());
        let mut stamps: Vec<(ParcelId, Option<Time>)> = Vec::with_capacity(pending.len());
        let mut unreachable = Vec::new();

        while !pending.is_empty() {
            if let Some(correction) = self.correction.filter(|c| c.is_effective(route.current_time)) {
                if let Some(key) = corrected_key.take() {
                    if let Some(entry) = pending.iter_mut().find(|p| p.id == correction.parcel_id) {
                        entry.key = key;
                        corrected = true;
                    }
                }
            }

            let (index, distance) = self.nearest(&route.location, &pending);
            let next = pending.remove(index);
            let from = route.location.clone();

            let arrival = if is_unreachable(distance) {
                warn!(
                    vehicle = %route.name,
                    parcel_id = next.id,
                    from = %from,
                    to = %next.key,
                    "nearest pending parcel is unreachable"
                );
                unreachable.push(next.id);
                None
            } else {
                Some(route.advance(distance, &next.key, next.id)?)
            };

            debug!(
                vehicle = %route.name,
                parcel_id = next.id,
                distance,
                mileage = route.mileage,
                clock = %route.current_time,
                "routed parcel"
            );

            stamps.push((next.id, arrival));
            order.push(next.id);
            legs.push(RouteLeg {
                parcel_id: next.id,
                from,
                to: next.key,
                distance: arrival.map(|_| distance),
                arrival,
            });
        }

        for (id, arrival) in stamps {
            if let Some(parcel) = store.get_mut(id) {
                parcel.set_departure(departure_time);
                if let Some(at) = arrival {
                    parcel.set_delivered(at);
                }
            }
        }
        if let Some(correction) = self.correction.filter(|_| corrected) {
            write_correction(correction, store);
            info!(
                vehicle = %route.name,
                parcel_id = correction.parcel_id,
                address = %correction.address,
                "applied address correction"
            );
        }

        route.load = order
            .iter()
            .filter_map(|id| store.get(*id))
            .map(|parcel| parcel.weight)
            .sum();
        if route.is_overloaded() {
            debug!(vehicle = %route.name, load = route.load, capacity = route.capacity, "load exceeds capacity");
        }
        route.parcel_ids = order.clone();

        info!(
            vehicle = %route.name,
            stops = order.len(),
            mileage = route.mileage,
            finish = %route.current_time,
            "route scheduled"
        );

        let summary = RouteSummary {
            vehicle: route.name.clone(),
            order,
            legs,
            mileage: route.mileage,
            departure_time,
            finish_time: route.current_time,
            skipped,
            unreachable,
        };
        *vehicle = route;
        Ok(summary)
    }

    /// Index and distance of the closest pending parcel.
    ///
    /// Strict comparison over ID-ordered candidates: the first (lowest ID)
    /// minimum wins, including when every candidate is unreachable.
    fn nearest(&self, from: &str, pending: &[Pending]) -> (usize, f64) {
        let mut best = (0, self.distances.distance(from, &pending[0].key));
        for (index, candidate) in pending.iter().enumerate().skip(1) {
            let distance = self.distances.distance(from, &candidate.key);
            if distance < best.1 {
                best = (index, distance);
            }
        }
        best
    }
}

fn write_correction(correction: &AddressCorrection, store: &mut ParcelStore) {
    if let Some(parcel) = store.get_mut(correction.parcel_id) {
        parcel.address = correction.address.clone();
        parcel.city = correction.city.clone();
        parcel.state = correction.state.clone();
        parcel.zip = correction.zip.clone();
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;

    use super::*;
    use crate::distance::DistanceTable;
    use crate::parcel::Parcel;

    fn graph() -> (DistanceTable, AddressBook) {
        let mut table = DistanceTable::new();
        for (from, to, d) in [
            ("Hub", "A", 2.0),
            ("Hub", "B", 5.0),
            ("Hub", "C", 9.0),
            ("A", "B", 3.0),
            ("A", "C", 6.0),
            ("B", "C", 1.0),
            ("B", "A", 3.0),
            ("C", "A", 6.0),
            ("C", "B", 1.0),
        ] {
            table.insert(from, to, d);
        }
        (table, AddressBook::from_addresses(["Hub", "A", "B", "C"]))
    }

    fn store_with(parcels: &[(ParcelId, &str)]) -> ParcelStore {
        let mut store = ParcelStore::new();
        for (id, address) in parcels {
            store.insert(*id, Parcel::new(*id, *address, "City", "UT", "84000", "EOD", 1.0));
        }
        store
    }

    #[test]
    fn test_nearest_neighbor_order() {
        let (table, book) = graph();
        let mut store = store_with(&[(1, "C"), (2, "B"), (3, "A")]);
        let mut vehicle = Vehicle::new("v", 16.0, 18.0, vec![1, 2, 3], "Hub", time(8, 0, 0, 0));

        let summary = RouteScheduler::new(&table, &book)
            .schedule_route(&mut vehicle, &mut store)
            .unwrap();

        assert_eq!(summary.order, vec![3, 2, 1]);
        assert_eq!(vehicle.parcel_ids, vec![3, 2, 1]);
        assert_eq!(summary.mileage, 6.0);
        assert_eq!(vehicle.location, "C");
        assert_eq!(vehicle.load, 3.0);
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        let mut table = DistanceTable::new();
        table.insert("Hub", "A", 4.0);
        table.insert("Hub", "B", 4.0);
        table.insert("A", "B", 1.0);
        table.insert("B", "A", 1.0);
        let book = AddressBook::from_addresses(["Hub", "A", "B"]);
        let mut store = store_with(&[(8, "A"), (5, "B")]);
        let mut vehicle = Vehicle::new("v", 16.0, 18.0, vec![8, 5], "Hub", time(8, 0, 0, 0));

        let summary = RouteScheduler::new(&table, &book)
            .schedule_route(&mut vehicle, &mut store)
            .unwrap();

        assert_eq!(summary.order, vec![5, 8]);
    }

    #[test]
    fn test_missing_parcel_is_skipped() {
        let (table, book) = graph();
        let mut store = store_with(&[(1, "A")]);
        let mut vehicle = Vehicle::new("v", 16.0, 18.0, vec![1, 99], "Hub", time(8, 0, 0, 0));

        let summary = RouteScheduler::new(&table, &book)
            .schedule_route(&mut vehicle, &mut store)
            .unwrap();

        assert_eq!(summary.order, vec![1]);
        assert_eq!(summary.skipped, vec![99]);
    }

    #[test]
    fn test_unresolvable_address_leaves_state_untouched() {
        let (table, book) = graph();
        let mut store = store_with(&[(1, "A"), (2, "Nowhere")]);
        let mut vehicle = Vehicle::new("v", 16.0, 18.0, vec![1, 2], "Hub", time(8, 0, 0, 0));
        let before = vehicle.clone();

        let err = RouteScheduler::new(&table, &book)
            .schedule_route(&mut vehicle, &mut store)
            .unwrap_err();

        assert!(matches!(err, RouteError::UnresolvableAddress(ref a) if a == "Nowhere"));
        assert_eq!(vehicle, before);
        assert_eq!(store.get(1).unwrap().delivery_time(), None);
    }

    #[test]
    fn test_clock_overflow_leaves_state_untouched() {
        let mut table = DistanceTable::new();
        table.insert("Hub", "A", 18.0);
        table.insert("A", "B", 360.0);
        let book = AddressBook::from_addresses(["Hub", "A", "B"]);
        let mut store = store_with(&[(2, "B"), (1, "A")]);
        let mut vehicle = Vehicle::new("v", 16.0, 18.0, vec![2, 1], "Hub", time(8, 0, 0, 0));
        let before = vehicle.clone();

        // A at 09:00, then twenty hours on to B
        let err = RouteScheduler::new(&table, &book)
            .schedule_route(&mut vehicle, &mut store)
            .unwrap_err();

        assert!(matches!(err, RouteError::ClockOverflow { parcel_id: 2, .. }));
        assert_eq!(vehicle, before);
        for id in [1, 2] {
            assert_eq!(store.get(id).unwrap().departure_time(), None);
            assert_eq!(store.get(id).unwrap().delivery_time(), None);
        }
    }

    #[test]
    fn test_non_positive_speed_rejected_before_routing() {
        let (table, book) = graph();
        let mut store = store_with(&[(1, "A")]);
        let mut vehicle = Vehicle::new("v", 16.0, 0.0, vec![1], "Hub", time(8, 0, 0, 0));
        let before = vehicle.clone();

        let err = RouteScheduler::new(&table, &book)
            .schedule_route(&mut vehicle, &mut store)
            .unwrap_err();

        assert!(matches!(err, RouteError::InvalidLeg { speed, .. } if speed == 0.0));
        assert_eq!(vehicle, before);
        assert_eq!(store.get(1).unwrap().departure_time(), None);
    }

    #[test]
    fn test_failed_route_keeps_placeholder_address() {
        let mut table = DistanceTable::new();
        table.insert("Hub", "A", 18.0);
        table.insert("Hub", "410 S State St", 9.0);
        table.insert("A", "410 S State St", 360.0);
        let book = AddressBook::from_addresses(["Hub", "A", "300 State St", "410 S State St"]);
        let mut store = store_with(&[(9, "300 State St"), (1, "A")]);
        let correction = AddressCorrection::default();
        let mut vehicle = Vehicle::new("v", 16.0, 18.0, vec![1, 9], "Hub", time(10, 0, 0, 0));

        // the correction becomes due at A (11:00) but the next leg overflows
        let err = RouteScheduler::new(&table, &book)
            .with_correction(Some(&correction))
            .schedule_route(&mut vehicle, &mut store)
            .unwrap_err();

        assert!(matches!(err, RouteError::ClockOverflow { parcel_id: 9, .. }));
        assert_eq!(store.get(9).unwrap().address, "300 State St");
    }

    #[test]
    fn test_timestamps_written_back() {
        let (table, book) = graph();
        let mut store = store_with(&[(1, "A")]);
        let mut vehicle = Vehicle::new("v", 16.0, 2.0, vec![1], "Hub", time(8, 0, 0, 0));

        RouteScheduler::new(&table, &book)
            .schedule_route(&mut vehicle, &mut store)
            .unwrap();

        let parcel = store.get(1).unwrap();
        assert_eq!(parcel.departure_time(), Some(time(8, 0, 0, 0)));
        // 2 miles at 2 mph
        assert_eq!(parcel.delivery_time(), Some(time(9, 0, 0, 0)));
    }

    #[test]
    fn test_empty_assignment() {
        let (table, book) = graph();
        let mut store = ParcelStore::new();
        let mut vehicle = Vehicle::new("v", 16.0, 18.0, vec![], "Hub", time(8, 0, 0, 0));

        let summary = RouteScheduler::new(&table, &book)
            .schedule_route(&mut vehicle, &mut store)
            .unwrap();

        assert!(summary.order.is_empty());
        assert_eq!(summary.finish_time, time(8, 0, 0, 0));
    }
}
