use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::model::{MetarSnapshot, Observation};

use super::ObservationProvider;

/// Client for the station's HTTP service (`/latest` and `/metar`).
#[derive(Debug, Clone)]
pub struct HttpProvider {
    base_url: Url,
    http: Client,
}

impl HttpProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        // A trailing slash makes `join` append instead of replacing the last segment.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid weather service URL: {base_url}"))?;

        Ok(Self {
            base_url,
            http: Client::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_body(&self, path: &str, query: &[(&str, String)], what: &str) -> Result<String> {
        let url = self.base_url.join(path).with_context(|| format!("Invalid {what} path"))?;
        debug!(%url, "requesting {what}");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request for {what}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Request for {what} failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl ObservationProvider for HttpProvider {
    async fn fetch_latest(&self, limit: u32) -> Result<Vec<Observation>> {
        if limit == 0 {
            bail!("Observation limit must be positive");
        }

        let body = self
            .get_body(
                "latest",
                &[("limit", limit.to_string())],
                "latest observations",
            )
            .await?;

        let mut observations = parse_observations(&body)?;
        if observations.len() > limit as usize {
            debug!(
                got = observations.len(),
                limit,
                "service returned more observations than asked"
            );
            observations.truncate(limit as usize);
        }

        Ok(observations)
    }

    async fn fetch_metar(&self) -> Result<Option<MetarSnapshot>> {
        let body = self.get_body("metar", &[], "METAR snapshot").await?;
        parse_metar(&body)
    }
}

pub fn parse_observations(body: &str) -> Result<Vec<Observation>> {
    serde_json::from_str(body).context("Failed to parse latest observations JSON")
}

/// `null` and an empty body both mean "no snapshot".
pub fn parse_metar(body: &str) -> Result<Option<MetarSnapshot>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body).context("Failed to parse METAR JSON")
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
