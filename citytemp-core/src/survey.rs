//! Orchestration of one survey run.
//!
//! Cities are fetched once, then each coordinate is resolved and its
//! temperature fetched in ranking order, one city at a time. A missing
//! temperature skips the city; every other failure aborts the run and the
//! partial aggregate is dropped.

use chrono::NaiveDate;
use reqwest::Client;

use crate::{
    config::{Config, ReportConfig},
    error::{Error, Result},
    model::{Accumulator, SurveyReport},
    provider::{
        CitySource, LocationResolver, TemperatureSource, metaweather::MetaWeather,
        opendatasoft::OpenDataSoftCities,
    },
};

/// Run the survey against the configured HTTP endpoints, sharing one client.
pub async fn run_with_config(config: &Config, date: NaiveDate) -> Result<SurveyReport> {
    let http = Client::new();
    let cities = OpenDataSoftCities::new(&config.endpoints.cities_url, http.clone());
    let weather = MetaWeather::from_endpoints(&config.endpoints, http);

    run(&cities, &weather, &weather, date, &config.report).await
}

pub async fn run<C, R, T>(
    cities: &C,
    resolver: &R,
    temperatures: &T,
    date: NaiveDate,
    report: &ReportConfig,
) -> Result<SurveyReport>
where
    C: CitySource + ?Sized,
    R: LocationResolver + ?Sized,
    T: TemperatureSource + ?Sized,
{
    tracing::info!("Fetching the most populous cities");
    let coords = cities.city_coordinates().await?;

    tracing::info!(cities = coords.len(), %date, "Collecting temperatures");
    let mut acc = Accumulator::default();
    let mut skipped = Vec::new();

    for (rank, coord) in coords.iter().enumerate() {
        let location = resolver.location_id(*coord).await?;

        match temperatures.temperature(location, date).await {
            Ok(temp) => {
                tracing::debug!(rank, %coord, %location, temp, "Temperature collected");
                acc.add(temp);
            }
            Err(err) if err.is_soft() => {
                tracing::warn!("Failed to get temperature for WOE ID: {location}. Continuing anyways.");
                skipped.push(location);
            }
            Err(err) => return Err(err),
        }
    }

    let mean = acc.mean().ok_or(Error::NoReadings)?;

    Ok(SurveyReport {
        country: report.country.clone(),
        unit: report.unit.clone(),
        cities: coords.len(),
        sampled: acc.count(),
        skipped,
        mean,
    })
}
