// src/carriers/usps.rs

//! USPS Web Tools `TrackV2` lookup
//!
//! The request is an XML document passed in the query string; the response
//! is XML with either a `TrackSummary` per `TrackInfo`, an `Error` inside
//! `TrackInfo` for unknown numbers, or a top-level `Error` when the request
//! itself is rejected.

use super::http::{self, build_client};
use super::{Carrier, CarrierError, TrackingStatus, is_digits};
use crate::config::{CarrierEndpoint, CarrierSettings};
use crate::error::Result;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use reqwest::blocking::Client;
use tracing::debug;

const NAME: &str = "USPS";
const CREDENTIAL_KEY: &str = "USPS_USER_ID";

pub struct UspsCarrier {
    client: Client,
    endpoint: CarrierEndpoint,
}

impl UspsCarrier {
    pub fn new(settings: &CarrierSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeout)?,
            endpoint: settings.usps.clone(),
        })
    }
}

impl Carrier for UspsCarrier {
    fn name(&self) -> &str {
        NAME
    }

    /// Domestic 20-22 digit numbers and international S10 numbers (`EA123456789US`)
    fn owns(&self, tracking_number: &str) -> bool {
        is_digits(tracking_number, &[20, 21, 22]) || is_s10(tracking_number)
    }

    fn fetch_status(&self, tracking_number: &str) -> std::result::Result<TrackingStatus, CarrierError> {
        let user_id = self
            .endpoint
            .credential
            .as_deref()
            .ok_or(CarrierError::MissingCredentials(CREDENTIAL_KEY))?;

        debug!("Querying USPS for {}", tracking_number);

        let request_xml = format!(
            r#"<TrackRequest USERID="{}"><TrackID ID="{}"></TrackID></TrackRequest>"#,
            escape(user_id),
            escape(&tracking_number.to_ascii_uppercase())
        );

        let request = self
            .client
            .get(&self.endpoint.url)
            .query(&[("API", "TrackV2"), ("XML", request_xml.as_str())]);

        let (status, text) = http::send(request, NAME, tracking_number)?;
        if !status.is_success() {
            return Err(http::unexpected_status(NAME, status));
        }

        parse_response(tracking_number, &text)
    }
}

/// Two letters, nine digits, `US`
fn is_s10(tracking_number: &str) -> bool {
    let bytes = tracking_number.as_bytes();
    bytes.len() == 13
        && bytes[..2].iter().all(u8::is_ascii_alphabetic)
        && bytes[2..11].iter().all(u8::is_ascii_digit)
        && bytes[11..].eq_ignore_ascii_case(b"US")
}

fn is_delivered(summary: &str) -> bool {
    let summary = summary.to_ascii_lowercase();
    summary.starts_with("delivered") || summary.contains("was delivered")
}

/// Normalize a `TrackResponse` (or top-level `Error`) document
fn parse_response(
    tracking_number: &str,
    body: &str,
) -> std::result::Result<TrackingStatus, CarrierError> {
    let mut reader = Reader::from_str(body);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut summary: Option<String> = None;
    let mut track_error: Option<String> = None;
    let mut request_error: Option<String> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                saw_root = true;
                path.push(String::from_utf8_lossy(e.name().as_ref()).to_string());
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Empty(_)) => {
                saw_root = true;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| http::malformed(NAME, err))?
                    .to_string();
                let tags: Vec<&str> = path.iter().map(String::as_str).collect();

                match tags.as_slice() {
                    [.., "TrackInfo", "TrackSummary"] => summary = Some(text),
                    [.., "TrackInfo", "Error", "Description"] => track_error = Some(text),
                    ["Error", "Description"] => request_error = Some(text),
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(http::malformed(NAME, e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(message) = request_error {
        return Err(CarrierError::NetworkError(format!("USPS error: {}", message)));
    }

    if let Some(message) = track_error {
        debug!("USPS does not track {}: {}", tracking_number, message);
        return Err(CarrierError::NotTracked(tracking_number.to_string()));
    }

    match summary {
        Some(summary) => {
            let delivered = is_delivered(&summary);
            Ok(TrackingStatus::new(summary, delivered))
        }
        None if saw_root => Err(http::malformed(NAME, "no TrackSummary")),
        None => Err(http::malformed(NAME, "empty document")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owns() {
        let carrier = UspsCarrier::new(&CarrierSettings::default()).unwrap();
        assert!(carrier.owns("9400111899223856928499"));
        assert!(carrier.owns("94001118992238569284"));
        assert!(carrier.owns("EA123456789US"));
        assert!(carrier.owns("ea123456789us"));
        assert!(!carrier.owns("EA12345678US"));
        assert!(!carrier.owns("EA123456789GB"));
        assert!(!carrier.owns("123456789012"));
    }

    #[test]
    fn test_parse_delivered() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?>
            <TrackResponse>
                <TrackInfo ID="9400111899223856928499">
                    <TrackSummary>Your item was delivered in or at the mailbox at 3:12 pm on March 28, 2024 in AUSTIN, TX 78701.</TrackSummary>
                    <TrackDetail>Out for Delivery, March 28, 2024, 8:10 am, AUSTIN, TX 78701</TrackDetail>
                </TrackInfo>
            </TrackResponse>"#;

        let status = parse_response("9400111899223856928499", body).unwrap();
        assert!(status.delivered);
        assert!(status.status.starts_with("Your item was delivered"));
    }

    #[test]
    fn test_parse_in_transit() {
        let body = r#"<TrackResponse><TrackInfo ID="EA123456789US">
            <TrackSummary>Your item departed our USPS facility in CHICAGO IL &amp; is in transit.</TrackSummary>
            </TrackInfo></TrackResponse>"#;

        let status = parse_response("EA123456789US", body).unwrap();
        assert!(!status.delivered);
        assert_eq!(
            status.status,
            "Your item departed our USPS facility in CHICAGO IL & is in transit."
        );
    }

    #[test]
    fn test_parse_not_tracked() {
        let body = r#"<TrackResponse><TrackInfo ID="9400111899223856928499"><Error>
            <Number>-2147219283</Number>
            <Description>A status update is not yet available on your Package.</Description>
            </Error></TrackInfo></TrackResponse>"#;

        assert_eq!(
            parse_response("9400111899223856928499", body),
            Err(CarrierError::NotTracked("9400111899223856928499".to_string()))
        );
    }

    #[test]
    fn test_parse_request_error() {
        let body = r#"<Error><Number>80040B1A</Number>
            <Description>Authorization failure.</Description></Error>"#;

        assert!(matches!(
            parse_response("9400111899223856928499", body),
            Err(CarrierError::NetworkError(m)) if m.contains("Authorization failure")
        ));
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            parse_response("9400111899223856928499", ""),
            Err(CarrierError::NetworkError(_))
        ));
    }

    #[test]
    fn test_is_delivered() {
        assert!(is_delivered("Delivered, In/At Mailbox"));
        assert!(!is_delivered("Delivery Attempted - No Access to Delivery Location"));
        assert!(!is_delivered("Your item could not be delivered"));
    }
}
