// src/update.rs

//! Update pass over a shipment collection
//!
//! Lookups run concurrently on a bounded worker pool, one per shipment, and
//! only read the tracking number. Results are then merged back sequentially
//! in collection order, so a failed lookup leaves that shipment's stored
//! status exactly as it was.

use crate::carriers::{CarrierError, CarrierRegistry, TrackingStatus};
use crate::error::{Error, Result};
use crate::shipment::ShipmentCollection;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

/// A shipment whose lookup failed during a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFailure {
    pub tracking_number: String,
    /// Carrier that was asked, if one claimed the number
    pub carrier: Option<String>,
    pub error: CarrierError,
}

/// Outcome of one update pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Shipments visited
    pub checked: usize,
    /// Shipments whose status was refreshed
    pub updated: usize,
    /// Shipments that became delivered during this pass
    pub newly_delivered: usize,
    pub failures: Vec<UpdateFailure>,
}

impl UpdateReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs update passes against a fixed set of carriers
pub struct Updater {
    carriers: CarrierRegistry,
    pool: ThreadPool,
}

impl Updater {
    /// Create an updater running at most `threads` lookups at once
    pub fn new(carriers: CarrierRegistry, threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("wms-lookup-{}", i))
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create lookup pool: {}", e)))?;

        Ok(Self { carriers, pool })
    }

    /// Refresh every shipment in place and report per-shipment failures
    pub fn run(&self, shipments: &mut ShipmentCollection) -> UpdateReport {
        info!(
            "Updating {} shipment(s) via {}",
            shipments.len(),
            self.carriers.names().join(", ")
        );

        let outcomes: Vec<(Option<String>, std::result::Result<TrackingStatus, CarrierError>)> =
            self.pool.install(|| {
                shipments
                    .as_slice()
                    .par_iter()
                    .map(|shipment| self.lookup(&shipment.tracking_number))
                    .collect()
            });

        let mut report = UpdateReport {
            checked: outcomes.len(),
            ..UpdateReport::default()
        };

        for (shipment, (carrier, outcome)) in shipments.as_mut_slice().iter_mut().zip(outcomes) {
            match outcome {
                Ok(status) => {
                    if status.delivered && !shipment.delivered {
                        report.newly_delivered += 1;
                    }
                    shipment.carrier_status = status.status;
                    shipment.delivered = status.delivered;
                    report.updated += 1;
                }
                Err(error) => {
                    warn!("Could not update {}: {}", shipment.tracking_number, error);
                    report.failures.push(UpdateFailure {
                        tracking_number: shipment.tracking_number.clone(),
                        carrier,
                        error,
                    });
                }
            }
        }

        info!(
            "Updated {} of {} shipment(s), {} failure(s)",
            report.updated,
            report.checked,
            report.failures.len()
        );
        report
    }

    fn lookup(
        &self,
        tracking_number: &str,
    ) -> (Option<String>, std::result::Result<TrackingStatus, CarrierError>) {
        match self.carriers.resolve(tracking_number) {
            Some(carrier) => {
                debug!("{} resolved to {}", tracking_number, carrier.name());
                (
                    Some(carrier.name().to_string()),
                    carrier.fetch_status(tracking_number),
                )
            }
            None => (None, Err(CarrierError::UnrecognizedCarrier)),
        }
    }
}
