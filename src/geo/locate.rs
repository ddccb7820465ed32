//! IP geolocation lookups.
//!
//! Public IP from ipify, coordinates from the Nominatim search API.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::geo::distance::Coordinates;

const PUBLIC_IP_ENDPOINT: &str = "https://api.ipify.org";
const SEARCH_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
const USER_AGENT: &str = concat!("health-lb/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("geolocation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no coordinates found for {0}")]
    NotFound(String),

    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
}

/// Nominatim returns coordinates as strings; accept numbers too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Result<f64, GeoError> {
        match self {
            Coordinate::Number(v) => Ok(*v),
            Coordinate::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| GeoError::InvalidCoordinate(s.clone())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: Coordinate,
    lon: Coordinate,
}

/// First usable result of a search response.
fn first_place(places: &[Place], query: &str) -> Result<Coordinates, GeoError> {
    let place = places
        .first()
        .ok_or_else(|| GeoError::NotFound(query.to_string()))?;
    Ok(Coordinates {
        latitude: place.lat.value()?,
        longitude: place.lon.value()?,
    })
}

/// Client for the geolocation services.
#[derive(Debug, Clone)]
pub struct GeoLocator {
    client: reqwest::Client,
    ip_endpoint: String,
    search_endpoint: String,
}

impl GeoLocator {
    pub fn new() -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            ip_endpoint: PUBLIC_IP_ENDPOINT.to_string(),
            search_endpoint: SEARCH_ENDPOINT.to_string(),
        })
    }

    /// Point the locator at other services (used by tests).
    pub fn with_endpoints(mut self, ip_endpoint: &str, search_endpoint: &str) -> Self {
        self.ip_endpoint = ip_endpoint.to_string();
        self.search_endpoint = search_endpoint.to_string();
        self
    }

    /// This host's public IP address.
    pub async fn public_ip(&self) -> Result<String, GeoError> {
        let ip = self
            .client
            .get(&self.ip_endpoint)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(ip.trim().to_string())
    }

    /// Coordinates for an IP address or host name.
    pub async fn coordinates(&self, query: &str) -> Result<Coordinates, GeoError> {
        let places: Vec<Place> = self
            .client
            .get(&self.search_endpoint)
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        first_place(&places, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_number_coordinates() {
        let places: Vec<Place> =
            serde_json::from_str(r#"[{"lat":"48.85","lon":2.35,"display_name":"Paris"}]"#).unwrap();
        let c = first_place(&places, "paris").unwrap();
        assert_eq!(c, Coordinates { latitude: 48.85, longitude: 2.35 });
    }

    #[test]
    fn test_empty_result() {
        let places: Vec<Place> = serde_json::from_str("[]").unwrap();
        assert!(matches!(first_place(&places, "10.0.0.1"), Err(GeoError::NotFound(_))));
    }

    #[test]
    fn test_garbage_coordinate() {
        let places: Vec<Place> = serde_json::from_str(r#"[{"lat":"north","lon":"1"}]"#).unwrap();
        assert!(matches!(
            first_place(&places, "x"),
            Err(GeoError::InvalidCoordinate(_))
        ));
    }
}
