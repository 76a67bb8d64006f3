// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for wheres-my-ship
///
/// These are the structural failures that abort a command. Per-shipment
/// lookup failures during an update pass are `CarrierError`s instead and
/// never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// A shipment with this tracking number is already tracked
    #[error("Tracking number already exists: {0}")]
    DuplicateTrackingNumber(String),

    /// Tracking number was empty after trimming
    #[error("Tracking number must not be empty")]
    EmptyTrackingNumber,

    /// Identifier matched neither a tracking number nor an item number
    #[error("No shipment matches '{0}'")]
    NotFound(String),

    /// The store exists but does not hold a valid shipment list
    #[error("Shipment store {} is corrupt: {message}", .path.display())]
    CorruptState { path: PathBuf, message: String },

    /// Reading or writing the store failed
    #[error("Failed to access shipment store {}: {source}", .path.display())]
    PersistenceError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client or worker pool could not be created
    #[error("Failed to initialize: {0}")]
    InitError(String),

    /// I/O errors while writing output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;
