use geo::Point;
use serde::Deserialize;
use tracing::debug;

use crate::{
    distance::coordinate,
    error::LookupError,
    google::{Endpoint, Status},
};

pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<Point, LookupError>;
}

/// Google Geocoding API. Every call hits the network; nothing is cached.
pub struct GoogleGeocoder {
    endpoint: Endpoint,
}

impl GoogleGeocoder {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

impl Geocoder for GoogleGeocoder {
    fn geocode(&self, address: &str) -> Result<Point, LookupError> {
        debug!(address, "geocoding");
        let response: GeocodeResponse = self.endpoint.get(&[("address", address)])?;
        response.first_location(address)
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(flatten)]
    status: Status,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

impl GeocodeResponse {
    fn first_location(self, address: &str) -> Result<Point, LookupError> {
        self.status.check()?;
        let result = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NoResults(address.to_string()))?;
        let RawLocation { lat, lng } = result.geometry.location;
        Ok(coordinate(lat, lng))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: RawLocation,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    lat: f64,
    lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Point, LookupError> {
        serde_json::from_str::<GeocodeResponse>(json)
            .unwrap()
            .first_location("1 Main St")
    }

    #[test]
    fn takes_first_result() {
        let point = parse(
            r#"{
                "status": "OK",
                "results": [
                    {"formatted_address": "1 Main St", "geometry": {"location": {"lat": 34.05, "lng": -118.24}}},
                    {"formatted_address": "1 Main Ave", "geometry": {"location": {"lat": 40.71, "lng": -74.0}}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(point, coordinate(34.05, -118.24));
    }

    #[test]
    fn zero_results() {
        assert!(matches!(
            parse(r#"{"status": "ZERO_RESULTS", "results": []}"#),
            Err(LookupError::NoResults(x)) if x == "1 Main St"
        ));
        // status says OK but the list is empty anyway
        assert!(matches!(
            parse(r#"{"status": "OK", "results": []}"#),
            Err(LookupError::NoResults(_))
        ));
    }

    #[test]
    fn service_error() {
        assert!(matches!(
            parse(r#"{"status": "OVER_QUERY_LIMIT", "results": []}"#),
            Err(LookupError::Service { status, .. }) if status == "OVER_QUERY_LIMIT"
        ));
    }
}
