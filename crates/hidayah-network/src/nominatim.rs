//! Reverse geocoding through OpenStreetMap Nominatim.
//!
//! Nominatim allows one request per second per client. Callers resolve a
//! label once per location fix, never per heading sample.

use std::time::Duration;

use hidayah_types::{GeoPoint, HidayahError, LocationInfo, ReverseGeocoder};
use serde::Deserialize;
use tracing::debug;

use crate::aladhan::USER_AGENT;

/// Public Nominatim endpoint.
pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    fn into_info(self, coords: GeoPoint) -> LocationInfo {
        LocationInfo {
            coords,
            city: self.city.or(self.town).or(self.village),
            region: self.state,
            country: self.country,
        }
    }
}

/// [`ReverseGeocoder`] that asks a Nominatim server for the place name.
#[derive(Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    language: String,
}

impl std::fmt::Debug for NominatimClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimClient")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish()
    }
}

impl NominatimClient {
    /// Client for the public endpoint with English place names.
    ///
    /// # Errors
    /// Returns `NetworkError` if the HTTP client cannot be built.
    pub fn new() -> Result<Self, HidayahError> {
        Self::with_base_url(NOMINATIM_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, HidayahError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HidayahError::network("Failed to create HTTP client", e))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: "en".to_string(),
        })
    }

    /// `accept-language` sent with each request, e.g. `"id"`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

impl ReverseGeocoder for NominatimClient {
    async fn reverse(&self, coords: GeoPoint) -> Result<LocationInfo, HidayahError> {
        let url = format!("{}/reverse", self.base_url);
        debug!(%coords, "nominatim reverse lookup");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lng.to_string()),
                ("format", "json".to_string()),
                ("addressdetails", "1".to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .await
            .map_err(|e| HidayahError::network("Nominatim request failed", e))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(HidayahError::NetworkError(format!("HTTP {} for {}", status, url)));
        }

        let data: NominatimResponse = response
            .json()
            .await
            .map_err(|e| HidayahError::network("Failed to parse Nominatim response", e))?;

        Ok(data.address.into_info(coords))
    }
}
