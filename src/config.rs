// src/config.rs

//! Start-up configuration
//!
//! Everything that is process-wide in the command (store location, carrier
//! credentials, lookup timeout and concurrency) is resolved here once and
//! then handed to constructors explicitly.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Store file name, relative to the user's home directory
pub const DEFAULT_STORE_FILE: &str = ".wheres-my-ship";

/// Default timeout for carrier HTTP requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of concurrent carrier lookups
pub const DEFAULT_THREADS: usize = 4;

pub const FEDEX_TRACK_URL: &str = "https://apis.fedex.com/track/v1/trackingnumbers";
pub const UPS_TRACK_URL: &str = "https://onlinetools.ups.com/api/track/v1/details";
pub const USPS_TRACK_URL: &str = "https://secure.shippingapis.com/ShippingAPI.dll";

/// Endpoint and credential for one carrier API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierEndpoint {
    pub url: String,
    /// Bearer token (FedEx, UPS) or Web Tools user id (USPS)
    pub credential: Option<String>,
}

/// Settings shared by the built-in carriers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierSettings {
    pub timeout: Duration,
    pub fedex: CarrierEndpoint,
    pub ups: CarrierEndpoint,
    pub usps: CarrierEndpoint,
}

impl Default for CarrierSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
            fedex: CarrierEndpoint {
                url: FEDEX_TRACK_URL.to_string(),
                credential: None,
            },
            ups: CarrierEndpoint {
                url: UPS_TRACK_URL.to_string(),
                credential: None,
            },
            usps: CarrierEndpoint {
                url: USPS_TRACK_URL.to_string(),
                credential: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub threads: usize,
    pub carriers: CarrierSettings,
}

impl Config {
    /// Resolve configuration from the process environment
    ///
    /// `store_override` (the `--store` flag) takes precedence over
    /// `WHERES_MY_SHIP_STORE`, which takes precedence over the home default.
    pub fn load(store_override: Option<PathBuf>) -> Result<Self> {
        Self::from_lookup(store_override, |key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup
    pub fn from_lookup<F>(store_override: Option<PathBuf>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let value_of = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_path = store_override.or_else(|| value_of("WHERES_MY_SHIP_STORE").map(PathBuf::from));
        let store_path = match store_path {
            Some(path) => expand_tilde(&path)?,
            None => default_store_path()?,
        };

        let timeout = match value_of("WHERES_MY_SHIP_TIMEOUT") {
            Some(value) => Duration::from_secs(parse_positive("WHERES_MY_SHIP_TIMEOUT", &value)?),
            None => DEFAULT_HTTP_TIMEOUT,
        };

        let threads = match value_of("WHERES_MY_SHIP_THREADS") {
            Some(value) => parse_positive("WHERES_MY_SHIP_THREADS", &value)? as usize,
            None => DEFAULT_THREADS,
        };

        let endpoint = |url_key: &str, credential_key: &str, default_url: &str| CarrierEndpoint {
            url: value_of(url_key).unwrap_or_else(|| default_url.to_string()),
            credential: value_of(credential_key),
        };

        Ok(Self {
            store_path,
            threads,
            carriers: CarrierSettings {
                timeout,
                fedex: endpoint("FEDEX_TRACK_URL", "FEDEX_ACCESS_TOKEN", FEDEX_TRACK_URL),
                ups: endpoint("UPS_TRACK_URL", "UPS_ACCESS_TOKEN", UPS_TRACK_URL),
                usps: endpoint("USPS_TRACK_URL", "USPS_USER_ID", USPS_TRACK_URL),
            },
        })
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::Config(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs_next::home_dir()
        .ok_or_else(|| Error::Config("Unable to determine home directory".to_string()))
}

/// `~/.wheres-my-ship`
pub fn default_store_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(DEFAULT_STORE_FILE))
}

fn expand_tilde(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => Ok(home_dir()?.join(rest)),
        Err(_) => Ok(path.to_path_buf()),
    }
}
