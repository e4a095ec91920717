use serde::Deserialize;
use tracing::debug;

use crate::{
    error::LookupError,
    google::{Endpoint, Status},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub formatted_address: String,
}

impl Place {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, formatted_address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            formatted_address: formatted_address.into(),
        }
    }

    /// Name and address in one line, as written to the output and geocoded.
    pub fn describe(&self) -> String {
        format!("{} {}", self.name, self.formatted_address)
    }
}

pub trait PlaceResolver {
    fn find_place(&self, query: &str, business_name: &str) -> Result<Option<Place>, LookupError>;
}

/// A lone candidate is trusted as-is, even under a different name: we are
/// looking for a known business that moved, not checking that the business
/// is the right one. With several candidates only a case-insensitive name
/// match is taken, first one wins.
pub fn pick_candidate(candidates: Vec<Place>, business_name: &str) -> Option<Place> {
    if candidates.len() == 1 {
        return candidates.into_iter().next();
    }

    let wanted = business_name.to_lowercase();
    candidates
        .into_iter()
        .find(|x| x.name.to_lowercase() == wanted)
}

/// Google Places "Find Place from Text".
pub struct GooglePlaces {
    endpoint: Endpoint,
}

impl GooglePlaces {
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

impl PlaceResolver for GooglePlaces {
    fn find_place(&self, query: &str, business_name: &str) -> Result<Option<Place>, LookupError> {
        debug!(query, "finding place");
        let response: FindPlaceResponse = self.endpoint.get(&[
            ("input", query),
            ("inputtype", "textquery"),
            ("fields", "name,formatted_address"),
        ])?;
        response.resolve(business_name)
    }
}

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    #[serde(flatten)]
    status: Status,
    #[serde(default)]
    candidates: Vec<Place>,
}

impl FindPlaceResponse {
    fn resolve(self, business_name: &str) -> Result<Option<Place>, LookupError> {
        self.status.check()?;
        Ok(pick_candidate(self.candidates, business_name))
    }
}
