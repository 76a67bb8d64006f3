// src/commands.rs

//! One function per CLI command
//!
//! Each command does a full load, works on the collection in memory, and
//! saves when it mutated something. The binary only parses arguments and
//! prints.

use crate::error::Result;
use crate::repository::Repository;
use crate::shipment::{Shipment, ShipmentCollection};
use crate::update::{UpdateReport, Updater};
use std::io::Write;
use tracing::info;

/// Track a new shipment
///
/// An empty tracking number is ignored and nothing is written. Returns
/// whether a shipment was added.
pub fn add(repo: &Repository, tracking_number: &str, description: &str) -> Result<bool> {
    if tracking_number.trim().is_empty() {
        return Ok(false);
    }

    let mut shipments = repo.load()?;
    shipments.add_item(Shipment::new(tracking_number, description))?;
    repo.save(&shipments)?;

    info!("Added {}", tracking_number.trim());
    Ok(true)
}

/// Stop tracking the shipment matching a tracking number or item number
pub fn remove(repo: &Repository, identifier: &str) -> Result<Shipment> {
    let mut shipments = repo.load()?;
    let removed = shipments.remove_item(identifier)?;
    repo.save(&shipments)?;

    info!("Removed {}", removed.tracking_number);
    Ok(removed)
}

/// Refresh every shipment's status and save whatever succeeded
pub fn update(repo: &Repository, updater: &Updater) -> Result<UpdateReport> {
    let mut shipments = repo.load()?;
    let report = shipments.update_tracking(updater);
    repo.save(&shipments)?;
    Ok(report)
}

/// Print summary or detail rows, optionally for a single shipment
pub fn list<W: Write>(
    repo: &Repository,
    filter: Option<&str>,
    detailed: bool,
    out: &mut W,
) -> Result<()> {
    let shipments: ShipmentCollection = repo.load()?;
    shipments.list(filter.unwrap_or_default(), detailed, out)
}

/// Drop delivered shipments, returning how many were removed
pub fn clean(repo: &Repository) -> Result<usize> {
    let mut shipments = repo.load()?;
    let removed = shipments.remove_delivered();
    repo.save(&shipments)?;

    info!("Removed {} delivered shipment(s)", removed);
    Ok(removed)
}

/// Human-readable summary of an update pass, one line per failure
pub fn format_report(report: &UpdateReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Updated {} of {} shipment(s); {} newly delivered",
        report.updated, report.checked, report.newly_delivered
    )];

    for failure in &report.failures {
        let carrier = failure.carrier.as_deref().unwrap_or("no carrier");
        lines.push(format!(
            "  {} ({}): {}",
            failure.tracking_number, carrier, failure.error
        ));
    }
    lines
}
