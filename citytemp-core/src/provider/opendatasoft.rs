use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{Error, Result},
    model::{CITY_COUNT, CityList, Coordinate},
};

use super::{CitySource, get_json};

/// City ranking backed by the OpenDataSoft geonames dataset.
///
/// The configured URL already carries the row count, country filter and sort
/// order; only `records[].fields.coordinates` is read, as a `[lat, lon]` pair.
#[derive(Debug, Clone)]
pub struct OpenDataSoftCities {
    url: String,
    http: Client,
}

impl OpenDataSoftCities {
    pub fn new(url: impl Into<String>, http: Client) -> Self {
        Self { url: url.into(), http }
    }
}

#[derive(Debug, Deserialize)]
struct OdsResponse {
    #[serde(default)]
    records: Vec<OdsRecord>,
}

#[derive(Debug, Deserialize)]
struct OdsRecord {
    #[serde(default)]
    fields: OdsFields,
}

#[derive(Debug, Default, Deserialize)]
struct OdsFields {
    coordinates: Option<Value>,
}

#[async_trait]
impl CitySource for OpenDataSoftCities {
    async fn city_coordinates(&self) -> Result<CityList> {
        let parsed: OdsResponse = get_json(&self.http, &self.url, &[]).await?;
        parse_records(parsed.records)
    }
}

fn parse_records(records: Vec<OdsRecord>) -> Result<CityList> {
    let found = records.len();
    if found < CITY_COUNT {
        return Err(Error::IncompleteCityList { expected: CITY_COUNT, found });
    }
    if found > CITY_COUNT {
        tracing::warn!(found, "City ranking returned more records than requested; keeping the first {CITY_COUNT}");
    }

    let coords = records
        .into_iter()
        .take(CITY_COUNT)
        .enumerate()
        .map(|(index, record)| {
            coordinate_from(record.fields.coordinates.as_ref())
                .map_err(|reason| Error::InvalidCoordinate { index, reason })
        })
        .collect::<Result<Vec<_>>>()?;

    coords.try_into().map_err(|coords: Vec<Coordinate>| Error::IncompleteCityList {
        expected: CITY_COUNT,
        found: coords.len(),
    })
}

fn coordinate_from(value: Option<&Value>) -> std::result::Result<Coordinate, String> {
    let pair = match value {
        Some(Value::Array(pair)) => pair,
        Some(other) => return Err(format!("expected a [latitude, longitude] array, got {other}")),
        None => return Err("missing coordinates field".to_string()),
    };

    match pair.as_slice() {
        [lat, lon] => {
            let lat = lat.as_f64().ok_or_else(|| format!("latitude {lat} is not a number"))?;
            let lon = lon.as_f64().ok_or_else(|| format!("longitude {lon} is not a number"))?;
            Coordinate::new(lat, lon)
        }
        _ => Err(format!("expected 2 values, got {}", pair.len())),
    }
}
