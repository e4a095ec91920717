use std::time::Duration;

use serde::Deserialize;
use ureq::{Agent, AgentBuilder};

use crate::error::LookupError;

pub const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const FIND_PLACE_URL: &str =
    "https://maps.googleapis.com/maps/api/place/findplacefromtext/json";

pub fn agent(timeout: Duration) -> Agent {
    AgentBuilder::new().timeout(timeout).build()
}

/// Credentials and endpoint shared by every request to one API.
#[derive(Clone)]
pub struct Endpoint {
    pub agent: Agent,
    pub url: String,
    pub key: String,
}

impl Endpoint {
    pub fn new(agent: Agent, url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            agent,
            url: url.into(),
            key: key.into(),
        }
    }

    pub fn get<T>(&self, params: &[(&str, &str)]) -> Result<T, LookupError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let mut request = self.agent.get(&self.url);
        for (k, v) in params {
            request = request.query(k, v);
        }
        Ok(request.query("key", &self.key).call()?.into_json()?)
    }
}

/// Both APIs report failures in-band next to an HTTP 200.
#[derive(Debug, Deserialize)]
pub struct Status {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Status {
    /// An empty result set is not an error here; callers decide what no
    /// results means.
    pub fn check(&self) -> Result<(), LookupError> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(()),
            status => Err(LookupError::Service {
                status: status.to_string(),
                message: self
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "no message".to_string()),
            }),
        }
    }
}
