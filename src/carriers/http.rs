// src/carriers/http.rs

//! Blocking HTTP plumbing shared by the carrier lookups

use super::CarrierError;
use crate::error::{Error, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("wheres-my-ship/", env!("CARGO_PKG_VERSION"));

/// Build a client with a bounded per-request timeout
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {}", e)))
}

/// Send a request and read the body, mapping transport failures
///
/// A 404 is reported as `NotTracked`; carriers that signal unknown numbers
/// in the body instead inspect the returned text themselves.
pub fn send(
    request: reqwest::blocking::RequestBuilder,
    carrier: &str,
    tracking_number: &str,
) -> std::result::Result<(StatusCode, String), CarrierError> {
    let response: Response = request.send().map_err(|e| {
        CarrierError::NetworkError(format!("{} request failed: {}", carrier, e))
    })?;

    let status = response.status();
    debug!("{} answered HTTP {} for {}", carrier, status, tracking_number);

    if status == StatusCode::NOT_FOUND {
        return Err(CarrierError::NotTracked(tracking_number.to_string()));
    }

    let body = response.text().map_err(|e| {
        CarrierError::NetworkError(format!("Failed to read {} response: {}", carrier, e))
    })?;

    Ok((status, body))
}

/// Error for a non-success status whose body carried nothing more specific
pub fn unexpected_status(carrier: &str, status: StatusCode) -> CarrierError {
    CarrierError::NetworkError(format!("{} returned HTTP {}", carrier, status))
}

/// Error for a body that does not match the carrier's schema
pub fn malformed(carrier: &str, detail: impl std::fmt::Display) -> CarrierError {
    CarrierError::NetworkError(format!("Malformed {} response: {}", carrier, detail))
}
