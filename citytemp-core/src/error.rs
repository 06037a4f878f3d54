use thiserror::Error;

use crate::model::{Coordinate, LocationId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse JSON returned by {url}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{expected} cities were not returned by the HTTP response (got {found})")]
    IncompleteCityList { expected: usize, found: usize },

    #[error("City record {index} has invalid coordinates: {reason}")]
    InvalidCoordinate { index: usize, reason: String },

    #[error("A Where On Earth ID was not returned for coordinates {0}")]
    NoLocationId(Coordinate),

    #[error("A temperature reading was not returned for WOE ID {0}")]
    NoTemperature(LocationId),

    #[error("No temperature readings were collected")]
    NoReadings,
}

impl Error {
    /// Whether the survey may skip the current city and keep going.
    pub fn is_soft(&self) -> bool {
        matches!(self, Error::NoTemperature(_))
    }
}
