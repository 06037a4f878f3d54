//! Core library for the `citytemp` CLI.
//!
//! This crate defines:
//! - Configuration of the remote endpoints and report labels
//! - The three lookups behind the survey (city ranking, location search, daily readings)
//! - The survey itself, which averages the latest temperature of the most populous cities
//!
//! It is used by `citytemp-cli`, but the survey is generic over its sources and can be
//! driven by other binaries or tests.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod survey;

pub use config::{Config, EndpointConfig, ReportConfig};
pub use error::{Error, Result};
pub use model::{CITY_COUNT, CityList, Coordinate, LocationId, SurveyReport};
pub use provider::{CitySource, LocationResolver, TemperatureSource};
