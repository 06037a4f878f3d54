use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    config::EndpointConfig,
    error::{Error, Result},
    model::{Coordinate, LocationId},
};

use super::{LocationResolver, TemperatureSource, get_json};

/// MetaWeather location search and per-day consolidated readings.
#[derive(Debug, Clone)]
pub struct MetaWeather {
    search_url: String,
    location_url: String,
    http: Client,
}

impl MetaWeather {
    pub fn new(search_url: impl Into<String>, location_url: impl Into<String>, http: Client) -> Self {
        Self {
            search_url: search_url.into(),
            location_url: location_url.into(),
            http,
        }
    }

    pub fn from_endpoints(endpoints: &EndpointConfig, http: Client) -> Self {
        Self::new(&endpoints.location_search_url, &endpoints.location_url, http)
    }

    fn day_url(&self, location: LocationId, date: NaiveDate) -> String {
        format!(
            "{}/{}/{}/{}/{}/",
            self.location_url.trim_end_matches('/'),
            location,
            date.year(),
            date.month(),
            date.day()
        )
    }
}

#[derive(Debug, Deserialize)]
struct MwLocation {
    woeid: Option<i64>,
}

#[async_trait]
impl LocationResolver for MetaWeather {
    /// Results come back closest first; only the first one is considered.
    async fn location_id(&self, coordinate: Coordinate) -> Result<LocationId> {
        let query = [("lattlong", coordinate.to_string())];
        let parsed: Vec<MwLocation> = get_json(&self.http, &self.search_url, &query).await?;

        parsed
            .first()
            .and_then(|loc| loc.woeid)
            .filter(|&woeid| woeid != 0)
            .map(LocationId)
            .ok_or(Error::NoLocationId(coordinate))
    }
}

#[async_trait]
impl TemperatureSource for MetaWeather {
    /// Readings come back most recent first. Anything other than a non-zero
    /// number at `[0].the_temp` counts as absent.
    async fn temperature(&self, location: LocationId, date: NaiveDate) -> Result<f64> {
        let url = self.day_url(location, date);
        let parsed: Value = get_json(&self.http, &url, &[]).await?;

        latest_reading(&parsed).ok_or(Error::NoTemperature(location))
    }
}

fn latest_reading(readings: &Value) -> Option<f64> {
    readings
        .as_array()?
        .first()?
        .get("the_temp")?
        .as_f64()
        .filter(|&temp| temp != 0.0)
}
