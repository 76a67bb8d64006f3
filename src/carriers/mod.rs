// src/carriers/mod.rs

//! Carrier tracking lookups
//!
//! Each supported carrier implements the `Carrier` trait:
//! - `owns` recognizes the carrier's tracking number format
//! - `fetch_status` queries the carrier and normalizes the answer
//!
//! A `CarrierRegistry` holds the carriers in resolution order. The first
//! carrier that claims a tracking number handles it.

pub mod fedex;
mod http;
pub mod ups;
pub mod usps;

use crate::config::CarrierSettings;
use crate::error::Result;
use thiserror::Error;

pub use fedex::FedexCarrier;
pub use ups::UpsCarrier;
pub use usps::UspsCarrier;

/// Normalized tracking status returned by every carrier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingStatus {
    /// Human-readable status line as reported by the carrier
    pub status: String,

    /// Whether the carrier reports final delivery
    pub delivered: bool,
}

impl TrackingStatus {
    pub fn new(status: impl Into<String>, delivered: bool) -> Self {
        Self {
            status: status.into(),
            delivered,
        }
    }
}

/// Per-shipment lookup failures
///
/// These never abort an update pass; they are collected into the pass report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CarrierError {
    /// No registered carrier recognizes the tracking number
    #[error("No supported carrier recognizes this tracking number")]
    UnrecognizedCarrier,

    /// Carrier unreachable, HTTP failure, or unparseable response
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Carrier does not know the tracking number
    #[error("Not tracked by carrier: {0}")]
    NotTracked(String),

    /// Carrier API credentials are not configured
    #[error("Missing credentials: set {0}")]
    MissingCredentials(&'static str),
}

/// Tracking capability of a single carrier
pub trait Carrier: Send + Sync {
    /// Display name used in logs and reports
    fn name(&self) -> &str;

    /// Whether the tracking number follows this carrier's numbering scheme
    ///
    /// Must be cheap and free of side effects; it runs for every shipment on
    /// every update pass.
    fn owns(&self, tracking_number: &str) -> bool;

    /// Look up the current status of a tracking number
    fn fetch_status(&self, tracking_number: &str) -> std::result::Result<TrackingStatus, CarrierError>;
}

/// Ordered set of carriers used to resolve tracking numbers
pub struct CarrierRegistry {
    carriers: Vec<Box<dyn Carrier>>,
}

impl CarrierRegistry {
    pub fn new(carriers: Vec<Box<dyn Carrier>>) -> Self {
        Self { carriers }
    }

    /// FedEx, UPS and USPS, in that order
    pub fn standard(settings: &CarrierSettings) -> Result<Self> {
        Ok(Self::new(vec![
            Box::new(FedexCarrier::new(settings)?),
            Box::new(UpsCarrier::new(settings)?),
            Box::new(UspsCarrier::new(settings)?),
        ]))
    }

    /// First registered carrier that owns the tracking number
    pub fn resolve(&self, tracking_number: &str) -> Option<&dyn Carrier> {
        self.carriers
            .iter()
            .map(|c| &**c)
            .find(|c| c.owns(tracking_number))
    }

    pub fn names(&self) -> Vec<&str> {
        self.carriers.iter().map(|c| c.name()).collect()
    }
}

/// Whether a tracking number is made of ASCII digits only, with a length in `lengths`
pub(crate) fn is_digits(tracking_number: &str, lengths: &[usize]) -> bool {
    lengths.contains(&tracking_number.len())
        && tracking_number.bytes().all(|b| b.is_ascii_digit())
}
