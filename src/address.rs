//! Address table used to canonicalise delivery addresses.

use crate::error::RouteError;

/// One row of the address table.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressEntry {
    pub id: u32,
    pub name: String,
    pub address: String,
}

/// Ordered address rows. Resolution walks rows in load order.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    entries: Vec<AddressEntry>,
}

impl AddressBook {
    pub fn new(entries: Vec<AddressEntry>) -> Self {
        Self { entries }
    }

    /// Build a book whose rows are just the given addresses, numbered from 0.
    pub fn from_addresses<I, S>(addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = addresses
            .into_iter()
            .enumerate()
            .map(|(id, address)| {
                let address = address.into();
                AddressEntry {
                    id: id as u32,
                    name: address.clone(),
                    address,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn push(&mut self, entry: AddressEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[AddressEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve free-form address text to the canonical address key.
    ///
    /// An exact match wins; otherwise the first row whose address contains
    /// the text is taken, so "410 S State St" resolves against a row that
    /// carries extra suffixes.
    pub fn resolve(&self, text: &str) -> Result<&str, RouteError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RouteError::UnresolvableAddress(text.to_string()));
        }
        self.entries
            .iter()
            .find(|entry| entry.address == text)
            .or_else(|| self.entries.iter().find(|entry| entry.address.contains(text)))
            .map(|entry| entry.address.as_str())
            .ok_or_else(|| RouteError::UnresolvableAddress(text.to_string()))
    }
}
