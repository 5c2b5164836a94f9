//! Parcel store: a fixed-size chained hash table keyed by parcel ID.
//!
//! Each bucket is an append-ordered list of `(id, parcel)` pairs. The bucket
//! count is chosen at construction and never changes; chains simply grow.

use crate::parcel::{Parcel, ParcelId};

/// Bucket count used by [`ParcelStore::new`]; sized for a single day's parcels.
pub const DEFAULT_BUCKETS: usize = 30;

#[derive(Debug, Clone)]
pub struct ParcelStore {
    buckets: Vec<Vec<(ParcelId, Parcel)>>,
    len: usize,
}

impl Default for ParcelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParcelStore {
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Create a store with `buckets` chains (at least one).
    pub fn with_buckets(buckets: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); buckets.max(1)],
            len: 0,
        }
    }

    fn bucket_index(&self, id: ParcelId) -> usize {
        (fxhash::hash64(&id) % self.buckets.len() as u64) as usize
    }

    /// Insert or overwrite the record stored under `id`.
    pub fn insert(&mut self, id: ParcelId, parcel: Parcel) {
        let index = self.bucket_index(id);
        let bucket = &mut self.buckets[index];
        match bucket.iter().position(|(key, _)| *key == id) {
            Some(position) => bucket[position].1 = parcel,
            None => {
                bucket.push((id, parcel));
                self.len += 1;
            }
        }
    }

    /// Upsert keyed by the parcel's own ID.
    pub fn update(&mut self, parcel: Parcel) {
        self.insert(parcel.id(), parcel);
    }

    pub fn get(&self, id: ParcelId) -> Option<&Parcel> {
        self.buckets[self.bucket_index(id)]
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, parcel)| parcel)
    }

    pub fn get_mut(&mut self, id: ParcelId) -> Option<&mut Parcel> {
        let index = self.bucket_index(id);
        self.buckets[index]
            .iter_mut()
            .find(|(key, _)| *key == id)
            .map(|(_, parcel)| parcel)
    }

    pub fn contains(&self, id: ParcelId) -> bool {
        self.get(id).is_some()
    }

    /// Remove and return the record under `id`, if any.
    pub fn remove(&mut self, id: ParcelId) -> Option<Parcel> {
        let index = self.bucket_index(id);
        let bucket = &mut self.buckets[index];
        let position = bucket.iter().position(|(key, _)| *key == id)?;
        self.len -= 1;
        Some(bucket.remove(position).1)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// All stored IDs in ascending order.
    pub fn ids(&self) -> Vec<ParcelId> {
        let mut ids: Vec<ParcelId> = self.iter().map(Parcel::id).collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate records in bucket order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = &Parcel> {
        self.buckets.iter().flatten().map(|(_, parcel)| parcel)
    }
}
