//! Parcel status at a given time of day.

use jiff::civil::Time;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::AddressCorrection;
use crate::parcel::{Parcel, ParcelId, ParcelStatus};
use crate::store::ParcelStore;

/// What a status query answers for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub parcel_id: ParcelId,
    pub status: ParcelStatus,
    pub display_address: String,
    pub deadline: String,
    pub weight: f64,
    pub departure_time: Option<Time>,
    /// Set only once the parcel is delivered at the query time.
    pub delivery_time: Option<Time>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusResolver<'a> {
    correction: Option<&'a AddressCorrection>,
}

impl<'a> StatusResolver<'a> {
    pub fn new(correction: Option<&'a AddressCorrection>) -> Self {
        Self { correction }
    }

    /// Before departure: at hub. From departure until delivery: en route.
    /// At or after delivery: delivered. Unstamped parcels stay at the hub.
    pub fn status(&self, parcel: &Parcel, at: Time) -> ParcelStatus {
        if parcel.delivery_time().is_some_and(|delivered| at >= delivered) {
            ParcelStatus::Delivered
        } else if parcel.departure_time().is_some_and(|departed| at >= departed) {
            ParcelStatus::EnRoute
        } else {
            ParcelStatus::AtHub
        }
    }

    /// Address to show for `parcel` at `at`.
    ///
    /// The corrected parcel shows its placeholder before the cutoff and the
    /// corrected address from the cutoff on, whatever the store holds.
    pub fn display_address(&self, parcel: &Parcel, at: Time) -> String {
        match self.correction {
            Some(correction) if correction.parcel_id == parcel.id() => {
                if correction.is_effective(at) {
                    correction.full_address()
                } else {
                    correction.placeholder_address.clone()
                }
            }
            _ => parcel.full_address(),
        }
    }

    pub fn report(&self, parcel: &Parcel, at: Time) -> StatusReport {
        let status = self.status(parcel, at);
        StatusReport {
            parcel_id: parcel.id(),
            status,
            display_address: self.display_address(parcel, at),
            deadline: parcel.deadline.clone(),
            weight: parcel.weight,
            departure_time: parcel.departure_time(),
            delivery_time: parcel
                .delivery_time()
                .filter(|_| status == ParcelStatus::Delivered),
        }
    }

    /// Answer a single status query, recording the derived status in the store.
    ///
    /// A query at or after the correction cutoff also writes the corrected
    /// address into the store if the corrected parcel is resident.
    pub fn query(&self, store: &mut ParcelStore, id: ParcelId, at: Time) -> Option<StatusReport> {
        self.apply_correction(store, at);
        let parcel = store.get_mut(id)?;
        let report = self.report(parcel, at);
        parcel.status = report.status;
        Some(report)
    }

    /// Status of every stored parcel at `at`, ascending by ID. Read-only.
    pub fn report_all(&self, store: &ParcelStore, at: Time) -> Vec<StatusReport> {
        store
            .ids()
            .par_iter()
            .filter_map(|id| store.get(*id))
            .map(|parcel| self.report(parcel, at))
            .collect()
    }

    fn apply_correction(&self, store: &mut ParcelStore, at: Time) {
        let Some(correction) = self.correction.filter(|c| c.is_effective(at)) else {
            return;
        };
        let Some(parcel) = store.get_mut(correction.parcel_id) else {
            return;
        };
        if parcel.address != correction.address {
            debug!(parcel_id = correction.parcel_id, address = %correction.address, "correcting address on query");
            parcel.address = correction.address.clone();
            parcel.city = correction.city.clone();
            parcel.state = correction.state.clone();
            parcel.zip = correction.zip.clone();
        }
    }
}
