// src/shipment/mod.rs

//! Shipment records and the ordered collection that owns them
//!
//! The collection keeps insertion order, which doubles as the display order
//! and the source of 1-based item numbers accepted wherever a tracking number
//! is.

mod listing;

use crate::error::{Error, Result};
use crate::update::{UpdateReport, Updater};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::debug;

pub use listing::render_row;

/// A single tracked package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub tracking_number: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub delivered: bool,

    /// Latest status text reported by the carrier, empty until first update
    #[serde(default)]
    pub carrier_status: String,
}

impl Shipment {
    /// Create a new, not-yet-updated shipment
    pub fn new(tracking_number: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into().trim().to_string(),
            description: description.into(),
            delivered: false,
            carrier_status: String::new(),
        }
    }
}

/// Ordered set of shipments, unique by tracking number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentCollection {
    items: Vec<Shipment>,
}

impl ShipmentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from stored records, enforcing the invariants
    /// `add_item` would have enforced
    pub fn from_shipments(shipments: Vec<Shipment>) -> Result<Self> {
        let mut collection = Self::new();
        for shipment in shipments {
            collection.add_item(shipment)?;
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shipment> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Shipment] {
        &self.items
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Shipment] {
        &mut self.items
    }

    /// Append a shipment, rejecting empty or already tracked numbers
    pub fn add_item(&mut self, mut shipment: Shipment) -> Result<()> {
        shipment.tracking_number = shipment.tracking_number.trim().to_string();

        if shipment.tracking_number.is_empty() {
            return Err(Error::EmptyTrackingNumber);
        }

        if self
            .items
            .iter()
            .any(|s| s.tracking_number == shipment.tracking_number)
        {
            return Err(Error::DuplicateTrackingNumber(shipment.tracking_number));
        }

        debug!("Tracking {}", shipment.tracking_number);
        self.items.push(shipment);
        Ok(())
    }

    /// Resolve an identifier to a position in the collection
    ///
    /// An exact tracking-number match wins. Only when nothing matches is the
    /// identifier read as a 1-based item number, so a short all-digit
    /// tracking number shadows the item at that position.
    pub fn find(&self, identifier: &str) -> Option<usize> {
        let identifier = identifier.trim();

        if let Some(index) = self
            .items
            .iter()
            .position(|s| s.tracking_number == identifier)
        {
            return Some(index);
        }

        match identifier.parse::<usize>() {
            Ok(item) if (1..=self.items.len()).contains(&item) => Some(item - 1),
            _ => None,
        }
    }

    /// Look up a shipment by tracking number or item number
    pub fn get(&self, identifier: &str) -> Option<&Shipment> {
        self.find(identifier).map(|index| &self.items[index])
    }

    /// Remove the shipment matching the identifier
    pub fn remove_item(&mut self, identifier: &str) -> Result<Shipment> {
        let index = self
            .find(identifier)
            .ok_or_else(|| Error::NotFound(identifier.to_string()))?;

        let removed = self.items.remove(index);
        debug!("Removed {}", removed.tracking_number);
        Ok(removed)
    }

    /// Drop every delivered shipment, returning how many were removed
    pub fn remove_delivered(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|s| !s.delivered);
        before - self.items.len()
    }

    /// Refresh every shipment's status through the updater's carriers
    pub fn update_tracking(&mut self, updater: &Updater) -> UpdateReport {
        updater.run(self)
    }

    /// Formatted rows for all shipments, or for the one matching `filter`
    ///
    /// An empty filter selects everything. The returned iterator is lazy and
    /// borrows the collection.
    pub fn rows<'a>(
        &'a self,
        filter: &str,
        detailed: bool,
    ) -> Result<impl Iterator<Item = String> + 'a> {
        let range = if filter.trim().is_empty() {
            0..self.items.len()
        } else {
            let index = self
                .find(filter)
                .ok_or_else(|| Error::NotFound(filter.to_string()))?;
            index..index + 1
        };

        let start = range.start;
        Ok(self.items[range]
            .iter()
            .enumerate()
            .map(move |(offset, shipment)| render_row(start + offset + 1, shipment, detailed)))
    }

    /// Write the rows selected by `filter` to `out`
    pub fn list<W: Write>(&self, filter: &str, detailed: bool, out: &mut W) -> Result<()> {
        for row in self.rows(filter, detailed)? {
            writeln!(out, "{}", row)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ShipmentCollection {
    type Item = &'a Shipment;
    type IntoIter = std::slice::Iter<'a, Shipment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
