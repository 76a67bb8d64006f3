// src/lib.rs

//! Where's My Ship
//!
//! Tracks shipment packages across shipping carriers from the command line.
//!
//! # Architecture
//!
//! - Shipments: an ordered collection, unique by tracking number, addressable
//!   by tracking number or 1-based item number
//! - Repository: the whole collection in one JSON file, replaced atomically
//! - Carriers: one `Carrier` implementation per carrier, resolved by tracking
//!   number format in registration order
//! - Updates: concurrent lookups, sequential merge, per-shipment failures
//!   reported instead of aborting the pass

pub mod carriers;
pub mod commands;
pub mod config;
mod error;
pub mod repository;
pub mod shipment;
pub mod update;

pub use error::{Error, Result};
