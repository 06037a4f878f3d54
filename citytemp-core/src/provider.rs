use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::{
    error::{Error, Result},
    model::{CityList, Coordinate, LocationId},
};

pub mod metaweather;
pub mod opendatasoft;

/// Ranks cities by population and hands back their coordinates.
#[async_trait]
pub trait CitySource: Send + Sync + Debug {
    async fn city_coordinates(&self) -> Result<CityList>;
}

/// Turns a coordinate into the closest known location.
#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn location_id(&self, coordinate: Coordinate) -> Result<LocationId>;
}

/// Most recent temperature for a location on a given day.
#[async_trait]
pub trait TemperatureSource: Send + Sync + Debug {
    async fn temperature(&self, location: LocationId, date: NaiveDate) -> Result<f64>;
}

/// GET `url` with `query`, check the status and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, String)],
) -> Result<T> {
    tracing::debug!(url, ?query, "GET");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| Error::Transport { url: url.to_string(), source })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| Error::Transport { url: url.to_string(), source })?;

    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| Error::Json { url: url.to_string(), source })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    #[derive(Debug, Deserialize)]
    struct Probe {
        ok: bool,
    }

    #[test]
    fn truncate_body_limits_long_payloads() {
        let long = "x".repeat(250);
        let short = truncate_body(&long);

        assert_eq!(short.len(), 203);
        assert!(short.ends_with("..."));
        assert_eq!(truncate_body("short"), "short");
    }

    #[tokio::test]
    async fn get_json_sends_query_and_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/probe"))
            .and(query_param("q", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/probe", server.uri());
        let probe: Probe = get_json(&Client::new(), &url, &[("q", "1".into())]).await.unwrap();

        assert!(probe.ok);
    }

    #[tokio::test]
    async fn get_json_reports_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
            .mount(&server)
            .await;

        let url = format!("{}/probe", server.uri());
        let err = get_json::<Probe>(&Client::new(), &url, &[]).await.unwrap_err();

        match err {
            Error::HttpStatus { status, body, .. } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "down for maintenance");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_json_reports_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let url = format!("{}/probe", server.uri());
        let err = get_json::<Probe>(&Client::new(), &url, &[]).await.unwrap_err();

        assert!(matches!(err, Error::Json { .. }));
    }

    #[tokio::test]
    async fn get_json_reports_connection_failure() {
        // Nothing listens on the discard port.
        let err = get_json::<Probe>(&Client::new(), "http://127.0.0.1:9/probe", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport { .. }));
    }
}
