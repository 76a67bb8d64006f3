// src/carriers/fedex.rs

//! FedEx Track API lookup
//!
//! Posts the tracking number to the Track API and reads the latest status
//! detail of the first track result. Status code `DL` means delivered.

use super::http::{self, build_client};
use super::{Carrier, CarrierError, TrackingStatus, is_digits};
use crate::config::{CarrierEndpoint, CarrierSettings};
use crate::error::Result;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const NAME: &str = "FedEx";
const CREDENTIAL_KEY: &str = "FEDEX_ACCESS_TOKEN";
const DELIVERED_CODE: &str = "DL";

pub struct FedexCarrier {
    client: Client,
    endpoint: CarrierEndpoint,
}

impl FedexCarrier {
    pub fn new(settings: &CarrierSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            endpoint: settings.fedex.clone(),
        })
    }
}

impl Carrier for FedexCarrier {
    fn name(&self) -> &str {
        NAME
    }

    /// Express (12 digits) and Ground (15 digits) numbers
    fn owns(&self, tracking_number: &str) -> bool {
        is_digits(tracking_number, &[12, 15])
    }

    fn fetch_status(&self, tracking_number: &str) -> std::result::Result<TrackingStatus, CarrierError> {
        let token = self
            .endpoint
            .credential
            .as_deref()
            .ok_or(CarrierError::MissingCredentials(CREDENTIAL_KEY))?;

        debug!("Querying FedEx for {}", tracking_number);

        let body = json!({
            "includeDetailedScans": false,
            "trackingInfo": [
                { "trackingNumberInfo": { "trackingNumber": tracking_number } }
            ]
        });

        let request = self
            .client
            .post(&self.endpoint.url)
            .bearer_auth(token)
            .json(&body);

        let (status, text) = http::send(request, NAME, tracking_number)?;

        match parse_response(tracking_number, &text) {
            Err(CarrierError::NetworkError(_)) if !status.is_success() => {
                Err(http::unexpected_status(NAME, status))
            }
            result => result,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackResponse {
    output: Option<TrackOutput>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackOutput {
    #[serde(default)]
    complete_track_results: Vec<CompleteTrackResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteTrackResult {
    #[serde(default)]
    track_results: Vec<TrackResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackResult {
    latest_status_detail: Option<StatusDetail>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusDetail {
    code: Option<String>,
    description: Option<String>,
    status_by_locale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    message: Option<String>,
}

impl ApiError {
    fn into_carrier_error(self, tracking_number: &str) -> CarrierError {
        if self.code.contains("NOTFOUND") {
            CarrierError::NotTracked(tracking_number.to_string())
        } else {
            CarrierError::NetworkError(format!(
                "FedEx error {}: {}",
                self.code,
                self.message.unwrap_or_default()
            ))
        }
    }
}

/// Normalize a Track API response body
fn parse_response(
    tracking_number: &str,
    body: &str,
) -> std::result::Result<TrackingStatus, CarrierError> {
    let response: TrackResponse =
        serde_json::from_str(body).map_err(|e| http::malformed(NAME, e))?;

    if let Some(error) = response.errors.into_iter().next() {
        return Err(error.into_carrier_error(tracking_number));
    }

    let result = response
        .output
        .and_then(|o| o.complete_track_results.into_iter().next())
        .and_then(|c| c.track_results.into_iter().next())
        .ok_or_else(|| http::malformed(NAME, "no track results"))?;

    if let Some(error) = result.error {
        return Err(error.into_carrier_error(tracking_number));
    }

    let detail = result
        .latest_status_detail
        .ok_or_else(|| http::malformed(NAME, "no latest status detail"))?;

    let delivered = detail.code.as_deref() == Some(DELIVERED_CODE);
    let status = detail
        .description
        .or(detail.status_by_locale)
        .unwrap_or_default();

    Ok(TrackingStatus::new(status, delivered))
}
