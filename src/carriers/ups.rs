// src/carriers/ups.rs

//! UPS Track API lookup

use super::http::{self, build_client};
use super::{Carrier, CarrierError, TrackingStatus};
use crate::config::{CarrierEndpoint, CarrierSettings};
use crate::error::Result;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

const NAME: &str = "UPS";
const CREDENTIAL_KEY: &str = "UPS_ACCESS_TOKEN";
const DELIVERED_CODE: &str = "011";
const NOT_FOUND_CODES: &[&str] = &["TW0001", "151044"];

pub struct UpsCarrier {
    client: Client,
    endpoint: CarrierEndpoint,
}

impl UpsCarrier {
    pub fn new(settings: &CarrierSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            endpoint: settings.ups.clone(),
        })
    }
}

impl Carrier for UpsCarrier {
    fn name(&self) -> &str {
        NAME
    }

    /// `1Z` followed by 16 alphanumerics
    fn owns(&self, tracking_number: &str) -> bool {
        let bytes = tracking_number.as_bytes();
        bytes.len() == 18
            && bytes[..2].eq_ignore_ascii_case(b"1Z")
            && bytes.iter().all(u8::is_ascii_alphanumeric)
    }

    fn fetch_status(&self, tracking_number: &str) -> std::result::Result<TrackingStatus, CarrierError> {
        let token = self
            .endpoint
            .credential
            .as_deref()
            .ok_or(CarrierError::MissingCredentials(CREDENTIAL_KEY))?;

        debug!("Querying UPS for {}", tracking_number);

        let url = format!(
            "{}/{}",
            self.endpoint.url.trim_end_matches('/'),
            tracking_number.to_ascii_uppercase()
        );

        let request = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("transId", tracking_number)
            .header("transactionSrc", "wheres-my-ship")
            .query(&[("locale", "en_US"), ("returnSignature", "false")]);

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
struct Envelope {
    track_response: Option<TrackResponse>,
    response: Option<ErrorResponse>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct TrackResponse {
    #[serde(default)]
    shipment: Vec<Shipment>,
}

#[derive(Debug, Deserialize)]
struct Shipment {
    #[serde(default)]
    package: Vec<Package>,
    #[serde(default)]
    warnings: Vec<Message>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Package {
    current_status: Option<CurrentStatus>,
}

#[derive(Debug, Deserialize)]
struct CurrentStatus {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Message {
    code: String,
    message: Option<String>,
}

impl Message {
    fn into_carrier_error(self, tracking_number: &str) -> CarrierError {
        if NOT_FOUND_CODES.contains(&self.code.as_str()) {
            CarrierError::NotTracked(tracking_number.to_string())
        } else {
            CarrierError::NetworkError(format!(
                "UPS error {}: {}",
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
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| http::malformed(NAME, e))?;

    if let Some(error) = envelope.response.and_then(|r| r.errors.into_iter().next()) {
        return Err(error.into_carrier_error(tracking_number));
    }

    let shipment = envelope
        .track_response
        .and_then(|t| t.shipment.into_iter().next())
        .ok_or_else(|| http::malformed(NAME, "no shipment"))?;

    let current = shipment
        .package
        .into_iter()
        .find_map(|p| p.current_status);

    match current {
        Some(current) => {
            let delivered = current.code.as_deref() == Some(DELIVERED_CODE);
            Ok(TrackingStatus::new(
                current.description.unwrap_or_default().trim(),
                delivered,
            ))
        }
        None => match shipment.warnings.into_iter().next() {
            Some(warning) => Err(warning.into_carrier_error(tracking_number)),
            None => Err(http::malformed(NAME, "no package status")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owns() {
        let carrier = UpsCarrier::new(&CarrierSettings::default()).unwrap();
        assert!(carrier.owns("1Z999AA10123456784"));
        assert!(carrier.owns("1z999aa10123456784"));
        assert!(!carrier.owns("1Z999AA1012345678"));
        assert!(!carrier.owns("2Z999AA10123456784"));
        assert!(!carrier.owns("1Z999AA1012345678-"));
        assert!(!carrier.owns("1Ä999AA1012345678"));
    }

    #[test]
    fn test_parse_delivered() {
        let body = r#"{"trackResponse":{"shipment":[{"inquiryNumber":"1Z999AA10123456784",
            "package":[{"trackingNumber":"1Z999AA10123456784",
                "currentStatus":{"description":"Delivered","code":"011"}}]}]}}"#;

        let status = parse_response("1Z999AA10123456784", body).unwrap();
        assert_eq!(status, TrackingStatus::new("Delivered", true));
    }

    #[test]
    fn test_parse_in_transit() {
        let body = r#"{"trackResponse":{"shipment":[{"package":[
            {"currentStatus":{"description":"On the Way ","code":"005"}}]}]}}"#;

        let status = parse_response("1Z999AA10123456784", body).unwrap();
        assert_eq!(status, TrackingStatus::new("On the Way", false));
    }

    #[test]
    fn test_parse_warning_not_found() {
        let body = r#"{"trackResponse":{"shipment":[{"inquiryNumber":"1Z999AA10123456784",
            "warnings":[{"code":"TW0001","message":"Tracking Information Not Found"}]}]}}"#;

        assert_eq!(
            parse_response("1Z999AA10123456784", body),
            Err(CarrierError::NotTracked("1Z999AA10123456784".to_string()))
        );
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"response":{"errors":[{"code":"250002","message":"Invalid Authentication Information."}]}}"#;

        assert!(matches!(
            parse_response("1Z999AA10123456784", body),
            Err(CarrierError::NetworkError(m)) if m.contains("250002")
        ));
    }

    #[test]
    fn test_missing_credentials() {
        let carrier = UpsCarrier::new(&CarrierSettings::default()).unwrap();
        assert_eq!(
            carrier.fetch_status("1Z999AA10123456784"),
            Err(CarrierError::MissingCredentials(CREDENTIAL_KEY))
        );
    }
}
