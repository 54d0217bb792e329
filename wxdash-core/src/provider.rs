use crate::{
    Config,
    model::{MetarSnapshot, Observation},
    provider::http::HttpProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod http;

/// Source of station data. Both calls are independent and may be polled
/// concurrently.
#[async_trait]
pub trait ObservationProvider: Send + Sync + Debug {
    /// Most recent observations first, at most `limit` of them.
    async fn fetch_latest(&self, limit: u32) -> anyhow::Result<Vec<Observation>>;

    /// Current METAR-derived snapshot; `None` when the service has none.
    async fn fetch_metar(&self) -> anyhow::Result<Option<MetarSnapshot>>;
}

/// Construct the HTTP provider for the configured weather service.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ObservationProvider>> {
    let provider = HttpProvider::new(&config.base_url)?;
    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_default_config() {
        let cfg = Config::default();
        assert!(provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn provider_from_config_rejects_bad_url() {
        let cfg = Config {
            base_url: "::nope::".into(),
            ..Config::default()
        };
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid weather service URL"));
    }
}
