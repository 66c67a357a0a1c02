//! Reverse geocoding lookup
//!
//! Resolves coordinates to a place name via the Nominatim API. Transport and
//! decoding failures are logged at warning level and degraded to `None`;
//! callers treat a missing name as "no location available".

use serde_json::Value;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// Reverse geocoding client
#[derive(Debug, Clone, Default)]
pub struct LocationLookup {
    client: reqwest::Client,
}

impl LocationLookup {
    /// Create a new lookup client
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve coordinates to a suburb/place name
    ///
    /// Returns `None` for zero coordinates (unconfigured location) and for
    /// any transport, status or decoding failure.
    pub async fn location_name(&self, lat: f64, lon: f64) -> Option<String> {
        if lat == 0.0 || lon == 0.0 {
            tracing::debug!(lat, lon, "lat or lon are zero, not sending request");
            return None;
        }

        // API documentation: https://nominatim.org/release-docs/develop/api/Reverse/
        let response = match self
            .client
            .get(NOMINATIM_URL)
            .query(&[("lat", lat.to_string()), ("lon", lon.to_string())])
            .query(&[("format", "jsonv2")])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "location_name: error sending GET request");
                return None;
            }
        };

        if response.status().is_server_error() {
            tracing::warn!(status = %response.status(), "location_name: server error");
            return None;
        }

        let json: Value = match response.json().await {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(error = %e, "location_name: response is no valid json");
                return None;
            }
        };

        json.get("address")
            .and_then(|a| a.get("suburb"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
