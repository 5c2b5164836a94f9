//! Test fixtures for parcel-dispatch.
//!
//! Provides:
//! - the four-location graph used for nearest-neighbor checks
//! - a miniature delivery day as CSV text, loaded through the real loader
//!
//! Distances in the miniature day are chosen so that travel times at 18 mph
//! land on whole seconds (1.125 miles = 225 s).

#![allow(dead_code)]

use parcel_dispatch::address::AddressBook;
use parcel_dispatch::distance::DistanceTable;
use parcel_dispatch::loader;
use parcel_dispatch::parcel::{Parcel, ParcelId};
use parcel_dispatch::store::ParcelStore;

pub const HUB: &str = "4001 South 700 East";

// ============================================================================
// Small fixed graph
// ============================================================================

/// Hub, A, B, C with Hub->A=2, Hub->B=5, Hub->C=9, A->B=3, A->C=6, B->C=1.
pub fn small_graph() -> (DistanceTable, AddressBook) {
    let mut table = DistanceTable::new();
    for (from, to, d) in [
        ("Hub", "A", 2.0),
        ("Hub", "B", 5.0),
        ("Hub", "C", 9.0),
        ("A", "B", 3.0),
        ("A", "C", 6.0),
        ("B", "C", 1.0),
    ] {
        table.insert(from, to, d);
        table.insert(to, from, d);
    }
    (table, AddressBook::from_addresses(["Hub", "A", "B", "C"]))
}

/// A store holding one parcel per `(id, address)` pair.
pub fn store_with(parcels: &[(ParcelId, &str)]) -> ParcelStore {
    let mut store = ParcelStore::new();
    for (id, address) in parcels {
        store.insert(
            *id,
            Parcel::new(*id, *address, "Salt Lake City", "UT", "84115", "EOD", 5.0),
        );
    }
    store
}

// ============================================================================
// Miniature delivery day
// ============================================================================

pub const ADDRESSES_CSV: &str = "\u{feff}id,address,name
0,4001 South 700 East,Western Governors University
1,195 W Oakland Ave,Deker Lake
2,2530 S 500 E,Housing Auth. of Salt Lake County
3,233 Canyon Rd,Salt Lake City Division of Health Services
4,300 State St,City Center of Rock Springs
5,410 S State St,Council Hall
";

const EDGES: &[(&str, &str, f64)] = &[
    (HUB, "195 W Oakland Ave", 2.25),
    (HUB, "2530 S 500 E", 4.5),
    (HUB, "233 Canyon Rd", 6.75),
    (HUB, "300 State St", 5.625),
    (HUB, "410 S State St", 6.75),
    ("195 W Oakland Ave", "2530 S 500 E", 1.125),
    ("195 W Oakland Ave", "233 Canyon Rd", 4.5),
    ("195 W Oakland Ave", "300 State St", 3.375),
    ("195 W Oakland Ave", "410 S State St", 4.5),
    ("2530 S 500 E", "233 Canyon Rd", 2.25),
    ("2530 S 500 E", "300 State St", 4.5),
    ("2530 S 500 E", "410 S State St", 5.625),
    ("233 Canyon Rd", "300 State St", 3.375),
    ("233 Canyon Rd", "410 S State St", 1.125),
    ("300 State St", "410 S State St", 1.125),
];

/// Distance table text with both directions and zero self-distances.
pub fn distances_csv() -> String {
    let mut text = String::new();
    let mut seen = Vec::new();
    for (from, to, d) in EDGES {
        text.push_str(&format!("{from},{to},{d}\n{to},{from},{d}\n"));
        for place in [from, to] {
            if !seen.contains(place) {
                seen.push(*place);
                text.push_str(&format!("{place},{place},0\n"));
            }
        }
    }
    text
}

pub const PARCELS_CSV: &str = "\
1,195 W Oakland Ave,Salt Lake City,UT,84115,10:30 AM,21 Kilos,
2,2530 S 500 E,Salt Lake City,UT,84106,EOD,44 Kilos,
3,233 Canyon Rd,Salt Lake City,UT,84103,EOD,2 Kilos,
4,2530 S 500 E,Salt Lake City,UT,84106,EOD,4 Kilos,
9,300 State St,Salt Lake City,UT,84103,EOD,2 Kilos,Wrong address listed
";

pub fn mini_day() -> (DistanceTable, AddressBook, ParcelStore) {
    let (addresses, _) = loader::parse_addresses(ADDRESSES_CSV);
    let (distances, _) = loader::parse_distances(&distances_csv());
    let mut store = ParcelStore::new();
    loader::parse_parcels(PARCELS_CSV, &mut store);
    (distances, addresses, store)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
